//! Packing tests - placement correctness of the atlas allocator

use sloth_atlas::{AtlasAllocator, AtlasId, AtlasPhase, AtlasRect, Fit, ItemKind};

/// Small deterministic generator so sequences are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, max: u32) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) % max as u64) as u32 + 1
    }
}

fn place_many(allocator: &mut AtlasAllocator, seed: u64, count: usize, max: u32) -> Vec<(AtlasId, AtlasRect)> {
    let mut rng = Lcg(seed);
    (0..count)
        .map(|_| {
            let (w, h) = (rng.next(max), rng.next(max));
            let p = allocator.place(w, h, ItemKind::Image);
            (p.atlas, p.rect(w, h))
        })
        .collect()
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_no_overlap_on_same_atlas() {
    for seed in 1..20 {
        let mut allocator = AtlasAllocator::new(128, 12);
        let placed = place_many(&mut allocator, seed, 200, 40);

        for (i, (atlas_a, a)) in placed.iter().enumerate() {
            for (atlas_b, b) in &placed[i + 1..] {
                if atlas_a == atlas_b {
                    assert!(!a.overlaps(b), "seed {seed}: {a:?} overlaps {b:?}");
                }
            }
        }
    }
}

#[test]
fn test_placements_stay_inside_atlas() {
    for seed in 1..20 {
        let mut allocator = AtlasAllocator::new(128, 12);
        for (_, rect) in place_many(&mut allocator, seed, 200, 64) {
            assert!(rect.fits_within(128), "seed {seed}: {rect:?} escapes atlas");
        }
    }
}

#[test]
fn test_cursor_invariant_holds() {
    let mut allocator = AtlasAllocator::new(256, 16);
    let mut rng = Lcg(7);
    for _ in 0..500 {
        allocator.place(rng.next(60), rng.next(60), ItemKind::Rect);
        let atlas = allocator.current();
        let (x, y) = atlas.cursor();
        assert!(x <= atlas.size());
        assert!(y + atlas.next_row_height() <= atlas.size());
    }
}

#[test]
fn test_new_atlas_when_no_row_fits() {
    let mut allocator = AtlasAllocator::new(100, 20);
    for _ in 0..4 {
        allocator.place(100, 20, ItemKind::Rect);
    }
    allocator.place(40, 20, ItemKind::Rect);
    assert_eq!(allocator.current().cursor(), (40, 80));

    let p = allocator.place(10, 30, ItemKind::Rect);
    assert_eq!(p.fit, Fit::NewAtlas);
    assert_eq!((p.atlas, p.x, p.y), (AtlasId(1), 0, 0));

    let old = allocator.atlas(AtlasId(0)).unwrap();
    assert!(old.is_dirty());
    assert!(old.is_closed());
    assert_eq!(old.phase(), AtlasPhase::Full);
}

#[test]
fn test_only_newest_atlas_receives_placements() {
    let mut allocator = AtlasAllocator::new(32, 16);
    allocator.place(32, 32, ItemKind::Image);
    allocator.place(32, 32, ItemKind::Image);
    let p = allocator.place(1, 1, ItemKind::Rect);
    assert_eq!(p.atlas, AtlasId(2));
    assert_eq!(allocator.atlas(AtlasId(0)).unwrap().placements(), 1);
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_scenario_new_row() {
    let mut allocator = AtlasAllocator::new(100, 20);

    let first = allocator.place(60, 20, ItemKind::Text);
    assert_eq!((first.x, first.y, first.fit), (0, 0, Fit::SameRow));

    let second = allocator.place(50, 20, ItemKind::Text);
    assert_eq!((second.x, second.y, second.fit), (0, 20, Fit::NewRow));
    assert_eq!(second.atlas, first.atlas);
}

#[test]
fn test_scenario_new_atlas() {
    let mut allocator = AtlasAllocator::new(100, 20);
    allocator.place(100, 20, ItemKind::Text);
    allocator.place(100, 20, ItemKind::Text);
    allocator.place(100, 20, ItemKind::Text);
    allocator.place(100, 20, ItemKind::Text);
    allocator.place(10, 20, ItemKind::Text);
    assert_eq!(allocator.current().cursor().1, 80);
    assert_eq!(allocator.current().next_row_height(), 20);

    let p = allocator.place(10, 30, ItemKind::Image);
    assert_eq!(p.atlas, AtlasId(1));
    assert_eq!((p.x, p.y), (0, 0));
    assert_eq!(allocator.len(), 2);
}

#[test]
fn test_texture_coordinates_use_atlas_origin() {
    let mut allocator = AtlasAllocator::new(128, 16);
    allocator.place(64, 16, ItemKind::Text);
    let p = allocator.place(32, 16, ItemKind::Text);
    let atlas = allocator.atlas(p.atlas).unwrap();

    assert_eq!(atlas.tex_coord(p.x, p.y), [0.5, 0.0]);
    assert_eq!(p.rect(32, 16).uv(atlas.size()), (0.5, 0.0, 0.75, 0.125));
}
