//! Slot tests - FIFO texture slot management against the headless GPU

use sloth_atlas::{
    Atlas, AtlasAllocator, AtlasId, AtlasPhase, GpuCall, HeadlessGpu, ItemKind, SlotIndex,
    SlotManager, MAX_SLOTS,
};

fn dirty_atlases(n: u32) -> Vec<Atlas> {
    (0..n)
        .map(|i| {
            let mut atlas = Atlas::new(AtlasId(i), 32, 8);
            atlas.mark_dirty();
            atlas
        })
        .collect()
}

#[test]
fn test_fifo_eviction_of_first_atlas() {
    let mut gpu = HeadlessGpu::new();
    let mut slots = SlotManager::new();
    let mut atlases = dirty_atlases(9);

    for atlas in atlases.iter_mut().take(8) {
        slots.resolve_for_render(atlas, &mut gpu).unwrap();
    }
    for i in 0..8 {
        assert_eq!(slots.occupant(SlotIndex(i)), Some(AtlasId(i)));
    }

    let slot = slots.resolve_for_render(&mut atlases[8], &mut gpu).unwrap();
    assert_eq!(slot, SlotIndex(0));
    assert_eq!(slots.slot_of(AtlasId(0)), None);
    for i in 1..8 {
        assert_eq!(slots.slot_of(AtlasId(i)), Some(SlotIndex(i)));
    }
    assert_eq!(slots.len(), MAX_SLOTS);
}

#[test]
fn test_eviction_ignores_recent_use() {
    let mut gpu = HeadlessGpu::new();
    let mut slots = SlotManager::new();
    let mut atlases = dirty_atlases(9);

    for atlas in atlases.iter_mut().take(8) {
        slots.resolve_for_render(atlas, &mut gpu).unwrap();
    }
    // Heavy reuse of atlas 0 does not protect it
    for _ in 0..5 {
        slots.resolve_for_render(&mut atlases[0], &mut gpu).unwrap();
    }
    slots.resolve_for_render(&mut atlases[8], &mut gpu).unwrap();
    assert_eq!(slots.slot_of(AtlasId(0)), None);
}

#[test]
fn test_evicted_neighbour_keeps_its_slot() {
    let mut gpu = HeadlessGpu::new();
    let mut slots = SlotManager::new();
    let mut atlases = dirty_atlases(9);

    for atlas in atlases.iter_mut() {
        slots.resolve_for_render(atlas, &mut gpu).unwrap();
    }
    assert_eq!(slots.slot_of(AtlasId(8)), Some(SlotIndex(0)));

    let binds = gpu.bind_count();
    let slot = slots.resolve_for_render(&mut atlases[1], &mut gpu).unwrap();
    assert_eq!(slot, SlotIndex(1));
    assert_eq!(gpu.bind_count(), binds);
}

#[test]
fn test_same_atlas_twice_reuses_slot() {
    let mut gpu = HeadlessGpu::new();
    let mut slots = SlotManager::new();
    let mut atlases = dirty_atlases(3);

    slots.resolve_for_render(&mut atlases[0], &mut gpu).unwrap();
    let first = slots.resolve_for_render(&mut atlases[2], &mut gpu).unwrap();
    let binds = gpu.bind_count();
    let second = slots.resolve_for_render(&mut atlases[2], &mut gpu).unwrap();

    assert_eq!(first, second);
    assert_eq!(slots.len(), 2);
    assert_eq!(gpu.bind_count(), binds);
    assert_eq!(slots.stats().hits, 1);
}

#[test]
fn test_upload_twice_uploads_once() {
    let mut gpu = HeadlessGpu::new();
    let mut slots = SlotManager::new();
    let mut allocator = AtlasAllocator::new(32, 8);
    allocator.place(8, 8, ItemKind::Rect);

    let atlas = allocator.current_mut();
    slots.resolve_for_upload(atlas, &mut gpu).unwrap();
    slots.resolve_for_upload(atlas, &mut gpu).unwrap();

    assert_eq!(gpu.upload_count(), 1);
    assert!(!atlas.is_dirty());
    assert_eq!(atlas.phase(), AtlasPhase::Uploaded);
    assert_eq!(slots.stats().skipped_uploads, 1);
}

#[test]
fn test_write_after_upload_goes_stale_then_reuploads() {
    let mut gpu = HeadlessGpu::new();
    let mut slots = SlotManager::new();
    let mut allocator = AtlasAllocator::new(32, 8);

    allocator.place(8, 8, ItemKind::Rect);
    slots.resolve_for_upload(allocator.current_mut(), &mut gpu).unwrap();
    allocator.place(8, 8, ItemKind::Rect);
    assert_eq!(allocator.current().phase(), AtlasPhase::Stale);

    slots.resolve_for_upload(allocator.current_mut(), &mut gpu).unwrap();
    assert_eq!(gpu.upload_count(), 2);
    assert_eq!(allocator.current().phase(), AtlasPhase::Uploaded);
}

#[test]
fn test_upload_lands_in_bound_texture() {
    let mut gpu = HeadlessGpu::new();
    let mut slots = SlotManager::new();
    let mut atlases = dirty_atlases(1);
    atlases[0].surface_mut().data_mut()[0] = 200;

    let slot = slots.resolve_for_upload(&mut atlases[0], &mut gpu).unwrap();
    let handle = atlases[0].gpu_surface().unwrap();
    assert_eq!(gpu.bound(slot), Some(handle));
    assert_eq!(gpu.texture_data(handle).map(|d| d[0]), Some(200));

    let calls = gpu.calls();
    assert_eq!(calls[0], GpuCall::CreateSurface(handle));
    assert_eq!(calls[1], GpuCall::Bind { slot, handle });
    assert_eq!(calls[2], GpuCall::Upload { handle, slot });
}

#[test]
fn test_render_path_rebinds_evicted_atlas_without_upload() {
    let mut gpu = HeadlessGpu::new();
    let mut slots = SlotManager::new();
    let mut atlases = dirty_atlases(9);

    for atlas in atlases.iter_mut() {
        slots.resolve_for_upload(atlas, &mut gpu).unwrap();
    }
    let uploads = gpu.upload_count();

    let slot = slots.resolve_for_render(&mut atlases[0], &mut gpu).unwrap();
    assert_eq!(slot, SlotIndex(1));
    assert_eq!(gpu.bound(slot), atlases[0].gpu_surface());
    assert_eq!(gpu.upload_count(), uploads);
}
