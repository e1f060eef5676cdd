//! Frame Renderer
//!
//! Walks the scene in creation order and turns every placed item into one
//! textured quad. A failing item is logged and skipped; the rest of the
//! frame still draws.

use crate::allocator::{AtlasAllocator, ItemKind, Placement};
use crate::error::{Result, SlothError};
use crate::gpu::GpuBackend;
use crate::item::{ItemId, PlacedItem};
use crate::projection::projection;
use crate::shader::ShaderBindings;
use crate::slots::SlotManager;

/// Default clear color (dark grey)
pub const DEFAULT_CLEAR_COLOR: [f32; 4] = [0.2, 0.2, 0.2, 1.0];

/// Ordered list of placed items
#[derive(Debug, Default)]
pub struct Scene {
    items: Vec<PlacedItem>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item for a fresh placement
    pub fn push(&mut self, kind: ItemKind, placement: Placement, width: u32, height: u32, x: f32, y: f32) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items
            .push(PlacedItem::new(id, kind, placement, width, height, x, y));
        id
    }

    /// Get item by ID
    pub fn get(&self, id: ItemId) -> Option<&PlacedItem> {
        self.index_of(id).map(|i| &self.items[i])
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut PlacedItem> {
        self.index_of(id).map(move |i| &mut self.items[i])
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every item. IDs are not reused.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Send every item through the upload path on the next frame
    pub fn mark_all_stale(&mut self) {
        for item in &mut self.items {
            item.set_updated(false);
        }
    }

    // IDs are handed out in increasing order, so the list stays sorted.
    fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.binary_search_by_key(&id, |item| item.id()).ok()
    }
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub items_drawn: u32,
    pub items_failed: u32,
}

/// Per-frame driver
#[derive(Debug)]
pub struct Renderer {
    /// Resolved at setup to check the program links every name the
    /// renderer writes. Backends address bindings by name, so the
    /// locations are not read again while drawing.
    bindings: ShaderBindings,
    clear_color: [f32; 4],
    viewport: (u32, u32),
}

impl Renderer {
    /// Resolve shader bindings and install the projection for a viewport
    pub fn new(gpu: &mut dyn GpuBackend, width: u32, height: u32) -> Result<Self> {
        let bindings = ShaderBindings::resolve(gpu)?;
        let mut renderer = Self {
            bindings,
            clear_color: DEFAULT_CLEAR_COLOR,
            viewport: (width, height),
        };
        renderer.reproject(gpu, width, height)?;
        Ok(renderer)
    }

    /// Recompute the projection after a viewport resize
    pub fn reproject(&mut self, gpu: &mut dyn GpuBackend, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(SlothError::InvalidConfig(format!(
                "viewport must be non-empty, got {width}x{height}"
            )));
        }
        gpu.set_projection(&projection(width as f32, height as f32))?;
        self.viewport = (width, height);
        Ok(())
    }

    pub fn bindings(&self) -> &ShaderBindings {
        &self.bindings
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    /// Draw one frame
    pub fn render(
        &mut self,
        scene: &mut Scene,
        allocator: &mut AtlasAllocator,
        slots: &mut SlotManager,
        gpu: &mut dyn GpuBackend,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        gpu.clear(self.clear_color);

        for item in &mut scene.items {
            match Self::draw_item(item, allocator, slots, gpu) {
                Ok(()) => stats.items_drawn += 1,
                Err(err) => {
                    stats.items_failed += 1;
                    tracing::warn!("Item {:?} skipped this frame: {}", item.id(), err);
                }
            }
        }

        stats
    }

    fn draw_item(
        item: &mut PlacedItem,
        allocator: &mut AtlasAllocator,
        slots: &mut SlotManager,
        gpu: &mut dyn GpuBackend,
    ) -> Result<()> {
        let atlas = allocator
            .atlas_mut(item.atlas())
            .ok_or_else(|| SlothError::Draw(format!("unknown atlas {:?}", item.atlas())))?;

        let slot = if item.is_updated() {
            slots.resolve_for_render(atlas, gpu)?
        } else {
            let slot = slots.resolve_for_upload(atlas, gpu)?;
            item.set_updated(true);
            slot
        };

        let quad = item.quad(atlas.size());
        let sampler = gpu.sampler_unit(slot);
        gpu.draw_quad(&quad, sampler)
    }
}
