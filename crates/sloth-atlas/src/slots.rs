//! Texture Slot Manager
//!
//! Maps atlases onto the 8 texture slots every GPU is guaranteed to have.
//! Slots fill in order 0..8; once full, the oldest-bound slot is replaced
//! first (FIFO, not LRU). The table is a fixed ring so eviction never shifts
//! entries: the slot of every other atlas is stable until it is evicted.

use crate::atlas::{Atlas, AtlasId};
use crate::error::Result;
use crate::gpu::{GpuBackend, SurfaceHandle};

/// Number of hardware texture slots
pub const MAX_SLOTS: usize = 8;

/// Texture slot index (0..MAX_SLOTS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SlotStats {
    pub hits: u64,
    pub binds: u64,
    pub evictions: u64,
    pub uploads: u64,
    pub skipped_uploads: u64,
}

/// Slot selection for an atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Bound(SlotIndex),
    Append(SlotIndex),
    Evict(SlotIndex, AtlasId),
}

/// FIFO table of slot bindings
#[derive(Debug, Default)]
pub struct SlotManager {
    /// `entries[n]` is the atlas bound at slot `n`
    entries: Vec<AtlasId>,
    /// Next slot to evict once the table is full
    oldest: usize,
    stats: SlotStats,
}

impl SlotManager {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_SLOTS),
            oldest: 0,
            stats: SlotStats::default(),
        }
    }

    /// Slot currently holding `atlas`
    pub fn slot_of(&self, atlas: AtlasId) -> Option<SlotIndex> {
        self.entries
            .iter()
            .position(|&id| id == atlas)
            .map(|i| SlotIndex(i as u32))
    }

    /// Atlas currently bound at `slot`
    pub fn occupant(&self, slot: SlotIndex) -> Option<AtlasId> {
        self.entries.get(slot.index()).copied()
    }

    /// Slot that the next eviction will reuse
    pub fn next_victim(&self) -> Option<SlotIndex> {
        self.is_full().then_some(SlotIndex(self.oldest as u32))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == MAX_SLOTS
    }

    /// `(slot, atlas)` pairs in slot order
    pub fn entries(&self) -> impl Iterator<Item = (SlotIndex, AtlasId)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, &id)| (SlotIndex(i as u32), id))
    }

    pub fn stats(&self) -> &SlotStats {
        &self.stats
    }

    /// Resolve the slot to sample `atlas` from, binding it if needed.
    ///
    /// An atlas that has never been uploaded goes through
    /// [`SlotManager::resolve_for_upload`] instead.
    pub fn resolve_for_render(&mut self, atlas: &mut Atlas, gpu: &mut dyn GpuBackend) -> Result<SlotIndex> {
        match atlas.gpu_surface() {
            Some(handle) => self.resolve(atlas.id(), handle, gpu),
            None => self.resolve_for_upload(atlas, gpu),
        }
    }

    /// Resolve a slot for `atlas` and push its pixels if they changed.
    ///
    /// Creates the GPU surface on first use. Uploads only when the atlas is
    /// dirty, then clears the dirty flag.
    pub fn resolve_for_upload(&mut self, atlas: &mut Atlas, gpu: &mut dyn GpuBackend) -> Result<SlotIndex> {
        let handle = match atlas.gpu_surface() {
            Some(handle) => handle,
            None => {
                let handle = gpu.create_surface(atlas.size(), atlas.size())?;
                tracing::debug!("Atlas {:?} got GPU surface {:?}", atlas.id(), handle);
                atlas.attach_gpu_surface(handle);
                handle
            }
        };

        let slot = self.resolve(atlas.id(), handle, gpu)?;

        if atlas.is_dirty() {
            gpu.upload_pixels(handle, slot, atlas.surface())?;
            atlas.mark_uploaded();
            self.stats.uploads += 1;
            tracing::debug!("Uploaded atlas {:?} to slot {}", atlas.id(), slot.0);
        } else {
            self.stats.skipped_uploads += 1;
        }

        Ok(slot)
    }

    fn choose(&self, atlas: AtlasId) -> Choice {
        if let Some(slot) = self.slot_of(atlas) {
            return Choice::Bound(slot);
        }
        if !self.is_full() {
            return Choice::Append(SlotIndex(self.entries.len() as u32));
        }
        Choice::Evict(SlotIndex(self.oldest as u32), self.entries[self.oldest])
    }

    fn resolve(&mut self, atlas: AtlasId, handle: SurfaceHandle, gpu: &mut dyn GpuBackend) -> Result<SlotIndex> {
        match self.choose(atlas) {
            Choice::Bound(slot) => {
                self.stats.hits += 1;
                Ok(slot)
            }
            Choice::Append(slot) => {
                gpu.bind_slot(slot, handle)?;
                self.entries.push(atlas);
                self.stats.binds += 1;
                Ok(slot)
            }
            Choice::Evict(slot, victim) => {
                gpu.bind_slot(slot, handle)?;
                self.entries[slot.index()] = atlas;
                self.oldest = (self.oldest + 1) % MAX_SLOTS;
                self.stats.binds += 1;
                self.stats.evictions += 1;
                tracing::debug!("Slot {} evicted atlas {:?} for {:?}", slot.0, victim, atlas);
                Ok(slot)
            }
        }
    }
}
