//! Placed Items
//!
//! One drawing call becomes one placed item: a region of an atlas and the
//! screen rectangle it is drawn to.

use crate::allocator::{ItemKind, Placement};
use crate::atlas::{AtlasId, AtlasRect};
use crate::projection::project_point;

/// Item handle returned by drawing calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ItemId(pub u32);

/// A textured quad ready for the GPU.
///
/// Corners are ordered top-left, bottom-left, top-right, bottom-right so a
/// 4-vertex triangle strip covers every item with the same indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub positions: [[f32; 2]; 4],
    pub tex_coords: [[f32; 2]; 4],
    /// Canvas-pixel offset added to every corner before projection
    pub translation: [f32; 2],
}

impl Quad {
    /// Triangle-strip indices shared by every quad
    pub const STRIP_INDICES: [u16; 4] = [0, 1, 2, 3];

    /// Interleaved `x, y, s, t` vertex data
    pub fn interleaved(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, (pos, tex)) in self.positions.iter().zip(&self.tex_coords).enumerate() {
            out[i * 4] = pos[0];
            out[i * 4 + 1] = pos[1];
            out[i * 4 + 2] = tex[0];
            out[i * 4 + 3] = tex[1];
        }
        out
    }

    /// Clip-space corners as the vertex shader computes them
    pub fn clip_positions(&self, projection: &[f32; 16]) -> [[f32; 2]; 4] {
        self.positions.map(|[x, y]| {
            let (cx, cy) = project_point(projection, x + self.translation[0], y + self.translation[1]);
            [cx, cy]
        })
    }
}

/// Rendering unit
#[derive(Debug, Clone)]
pub struct PlacedItem {
    id: ItemId,
    kind: ItemKind,
    atlas: AtlasId,
    region: AtlasRect,
    /// Screen-space origin
    x: f32,
    y: f32,
    translation: (f32, f32),
    /// Set once the item's atlas went through the upload path for it
    updated: bool,
}

impl PlacedItem {
    pub fn new(id: ItemId, kind: ItemKind, placement: Placement, width: u32, height: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            kind,
            atlas: placement.atlas,
            region: placement.rect(width, height),
            x,
            y,
            translation: (0.0, 0.0),
            updated: false,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn atlas(&self) -> AtlasId {
        self.atlas
    }

    /// Source rectangle in atlas space
    pub fn region(&self) -> AtlasRect {
        self.region
    }

    /// Destination `(x, y, width, height)` in screen space
    pub fn screen_rect(&self) -> (f32, f32, f32, f32) {
        (self.x, self.y, self.region.width as f32, self.region.height as f32)
    }

    pub fn translation(&self) -> (f32, f32) {
        self.translation
    }

    /// Move the item by `(tx, ty)` canvas pixels at render time without
    /// touching vertex data
    pub fn set_translation(&mut self, tx: f32, ty: f32) {
        self.translation = (tx, ty);
    }

    pub fn is_updated(&self) -> bool {
        self.updated
    }

    pub(crate) fn set_updated(&mut self, updated: bool) {
        self.updated = updated;
    }

    /// Build the quad for an atlas of edge length `atlas_size`
    pub fn quad(&self, atlas_size: u32) -> Quad {
        let (x, y, w, h) = self.screen_rect();
        let (u0, v0, u1, v1) = self.region.uv(atlas_size);

        Quad {
            positions: [[x, y], [x, y + h], [x + w, y], [x + w, y + h]],
            tex_coords: [[u0, v0], [u0, v1], [u1, v0], [u1, v1]],
            translation: [self.translation.0, self.translation.1],
        }
    }
}
