//! Atlas Allocator
//!
//! Decides where each drawing request lands. Requests only ever go to the
//! newest atlas; once an atlas cannot take a request it is closed and a
//! fresh one of the same size is opened. Older atlases stay alive and
//! renderable for the rest of the session.

use crate::atlas::{Atlas, AtlasId, AtlasRect};

/// Kind of content being placed (used for logging and stats)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Text,
    Image,
    Rect,
    Path,
}

/// Outcome of the fit test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Placed on the open row
    SameRow,
    /// Opened a new row below the current one
    NewRow,
    /// Opened a new atlas and placed at its origin
    NewAtlas,
}

/// Where a request was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub atlas: AtlasId,
    pub x: u32,
    pub y: u32,
    pub fit: Fit,
}

impl Placement {
    /// Atlas-space rectangle of a `width` x `height` request at this placement
    pub fn rect(&self, width: u32, height: u32) -> AtlasRect {
        AtlasRect::new(self.x, self.y, width, height)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatorStats {
    pub atlases_created: u32,
    pub placements: u32,
    pub same_row: u32,
    pub new_row: u32,
    pub new_atlas: u32,
    pub oversized: u32,
    pub used_pixels: u64,
}

impl AllocatorStats {
    /// Fraction of allocated atlas pixels covered by placements
    pub fn utilization(&self, atlas_size: u32) -> f32 {
        let total = self.atlases_created as u64 * atlas_size as u64 * atlas_size as u64;
        if total == 0 {
            0.0
        } else {
            self.used_pixels as f32 / total as f32
        }
    }
}

/// Owns every atlas and the packing cursor of the open one
#[derive(Debug)]
pub struct AtlasAllocator {
    atlases: Vec<Atlas>,
    atlas_size: u32,
    line_height: u32,
    stats: AllocatorStats,
}

impl AtlasAllocator {
    /// Create an allocator with one empty atlas open
    pub fn new(atlas_size: u32, line_height: u32) -> Self {
        let mut allocator = Self {
            atlases: Vec::new(),
            atlas_size,
            line_height,
            stats: AllocatorStats::default(),
        };
        allocator.open_atlas();
        allocator
    }

    /// Place a `width` x `height` request.
    ///
    /// Tries the open row, then a new row, then a new atlas. Never fails.
    pub fn place(&mut self, width: u32, height: u32, kind: ItemKind) -> Placement {
        if width > self.atlas_size || height > self.atlas_size {
            self.stats.oversized += 1;
            tracing::warn!(
                "{:?} item {}x{} exceeds atlas size {}",
                kind, width, height, self.atlas_size
            );
        }

        let fit = self.current().fit(width, height);
        let fit = match fit {
            Some(fit) => fit,
            None => {
                let id = self.current().id();
                self.current_mut().close();
                tracing::debug!("Atlas {:?} full, opening another", id);
                self.open_atlas();
                Fit::NewAtlas
            }
        };

        let atlas = self.current_mut();
        let (x, y) = atlas.commit(fit, width, height);
        let placement = Placement {
            atlas: atlas.id(),
            x,
            y,
            fit,
        };

        self.stats.placements += 1;
        self.stats.used_pixels += width as u64 * height as u64;
        match fit {
            Fit::SameRow => self.stats.same_row += 1,
            Fit::NewRow => self.stats.new_row += 1,
            Fit::NewAtlas => self.stats.new_atlas += 1,
        }

        tracing::debug!(
            "Placed {:?} {}x{} on atlas {:?} at ({}, {}) via {:?}",
            kind, width, height, placement.atlas, x, y, fit
        );
        placement
    }

    /// Change the baseline row height (active font changed)
    pub fn set_line_height(&mut self, height: u32) {
        self.line_height = height;
        self.current_mut().set_line_height(height);
    }

    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    /// Edge length shared by every atlas
    pub fn atlas_size(&self) -> u32 {
        self.atlas_size
    }

    /// The atlas currently accepting placements
    pub fn current(&self) -> &Atlas {
        let last = self.atlases.len() - 1;
        &self.atlases[last]
    }

    pub fn current_mut(&mut self) -> &mut Atlas {
        let last = self.atlases.len() - 1;
        &mut self.atlases[last]
    }

    /// Get atlas by ID
    pub fn atlas(&self, id: AtlasId) -> Option<&Atlas> {
        self.atlases.get(id.0 as usize)
    }

    pub fn atlas_mut(&mut self, id: AtlasId) -> Option<&mut Atlas> {
        self.atlases.get_mut(id.0 as usize)
    }

    pub fn atlases(&self) -> &[Atlas] {
        &self.atlases
    }

    /// Number of atlases
    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    /// Always false: one atlas is open from construction on
    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }

    /// Force every atlas to be uploaded again
    pub fn mark_all_dirty(&mut self) {
        for atlas in &mut self.atlases {
            atlas.mark_dirty();
        }
    }

    pub fn stats(&self) -> &AllocatorStats {
        &self.stats
    }

    /// Total memory usage
    pub fn memory_size(&self) -> usize {
        self.atlases.iter().map(|a| a.memory_size()).sum()
    }

    fn open_atlas(&mut self) {
        let id = AtlasId(self.atlases.len() as u32);
        self.atlases
            .push(Atlas::new(id, self.atlas_size, self.line_height));
        self.stats.atlases_created += 1;
        tracing::info!(
            "Created atlas {:?} ({}x{})",
            id, self.atlas_size, self.atlas_size
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasPhase;

    #[test]
    fn test_first_placement_at_origin() {
        let mut allocator = AtlasAllocator::new(256, 16);
        let p = allocator.place(32, 16, ItemKind::Text);
        assert_eq!((p.x, p.y, p.fit), (0, 0, Fit::SameRow));
        assert_eq!(p.atlas, AtlasId(0));
        assert!(allocator.current().is_dirty());
    }

    #[test]
    fn test_new_atlas_closes_previous() {
        let mut allocator = AtlasAllocator::new(64, 32);
        allocator.place(64, 32, ItemKind::Rect);
        allocator.place(64, 32, ItemKind::Rect);
        let p = allocator.place(64, 32, ItemKind::Rect);

        assert_eq!(p.fit, Fit::NewAtlas);
        assert_eq!(p.atlas, AtlasId(1));
        assert_eq!((p.x, p.y), (0, 0));

        let old = allocator.atlas(AtlasId(0)).unwrap();
        assert!(old.is_closed());
        assert!(old.is_dirty());
        assert_eq!(old.phase(), AtlasPhase::Full);
        assert_eq!(allocator.stats().atlases_created, 2);
    }

    #[test]
    fn test_new_atlas_seeded_with_line_height() {
        let mut allocator = AtlasAllocator::new(64, 10);
        allocator.set_line_height(12);
        allocator.place(64, 64, ItemKind::Image);
        allocator.place(8, 8, ItemKind::Rect);
        assert_eq!(allocator.len(), 2);
        assert_eq!(allocator.current().line_height(), 12);
    }

    #[test]
    fn test_oversized_forces_new_atlas() {
        let mut allocator = AtlasAllocator::new(64, 8);
        allocator.place(8, 8, ItemKind::Rect);
        let p = allocator.place(100, 10, ItemKind::Image);
        assert_eq!(p.fit, Fit::NewAtlas);
        assert_eq!((p.x, p.y), (0, 0));

        let again = allocator.place(100, 10, ItemKind::Image);
        assert_eq!(again.fit, Fit::NewAtlas);
        assert_eq!(again.atlas, AtlasId(2));

        let next = allocator.place(8, 8, ItemKind::Rect);
        assert_eq!(next.fit, Fit::NewRow);
        assert_eq!((next.atlas, next.x, next.y), (AtlasId(2), 0, 10));
        assert_eq!(allocator.stats().oversized, 2);
    }

    #[test]
    fn test_utilization() {
        let mut allocator = AtlasAllocator::new(64, 32);
        allocator.place(32, 32, ItemKind::Rect);
        assert_eq!(allocator.stats().utilization(64), 0.25);
    }
}
