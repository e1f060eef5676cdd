//! Atlas Surfaces
//!
//! A fixed-size square surface packed row by row. The atlas keeps a single
//! cursor: `(last_x, last_y)` is the next free pixel on the open row and
//! `next_row_height` is the height reserved for that row.

use crate::allocator::Fit;
use crate::gpu::SurfaceHandle;
use crate::surface::Surface;

/// Atlas ID (index into the allocator's atlas list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct AtlasId(pub u32);

/// Rectangle in atlas space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl AtlasRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Area of this rect
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True if the two rects share at least one pixel
    pub fn overlaps(&self, other: &AtlasRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// True if the rect lies inside a `size` x `size` atlas
    pub fn fits_within(&self, size: u32) -> bool {
        self.right() <= size && self.bottom() <= size
    }

    /// Normalized texture coordinates `(u0, v0, u1, v1)`.
    ///
    /// Texture space shares the atlas origin: `v = y / size`, no flip.
    pub fn uv(&self, atlas_size: u32) -> (f32, f32, f32, f32) {
        let inv = 1.0 / atlas_size as f32;
        (
            self.x as f32 * inv,
            self.y as f32 * inv,
            self.right() as f32 * inv,
            self.bottom() as f32 * inv,
        )
    }
}

/// Lifecycle phase, derived from the atlas flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtlasPhase {
    /// Accepting placements, never uploaded
    Growing,
    /// Closed to placements, never uploaded
    Full,
    /// GPU copy matches the pixels
    Uploaded,
    /// Pixels changed since the last upload
    Stale,
}

/// A packing bin
#[derive(Debug)]
pub struct Atlas {
    id: AtlasId,
    size: u32,
    surface: Surface,
    last_x: u32,
    last_y: u32,
    next_row_height: u32,
    /// Baseline row height, from the active font
    line_height: u32,
    dirty: bool,
    closed: bool,
    uploaded: bool,
    gpu_surface: Option<SurfaceHandle>,
    placements: u32,
}

impl Atlas {
    /// Create an empty atlas whose first row is `line_height` tall
    pub fn new(id: AtlasId, size: u32, line_height: u32) -> Self {
        Self {
            id,
            size,
            surface: Surface::new(size, size),
            last_x: 0,
            last_y: 0,
            next_row_height: line_height,
            line_height,
            dirty: false,
            closed: false,
            uploaded: false,
            gpu_surface: None,
            placements: 0,
        }
    }

    pub fn id(&self) -> AtlasId {
        self.id
    }

    /// Edge length in pixels
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Next free position on the open row
    pub fn cursor(&self) -> (u32, u32) {
        (self.last_x, self.last_y)
    }

    pub fn next_row_height(&self) -> u32 {
        self.next_row_height
    }

    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    /// Change the baseline row height. The open row only ever grows.
    pub fn set_line_height(&mut self, height: u32) {
        self.line_height = height;
        if self.next_row_height < height {
            self.next_row_height = height;
        }
    }

    /// Number of placements made on this atlas
    pub fn placements(&self) -> u32 {
        self.placements
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Closed atlases never accept placements again
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// GPU surface, present once the atlas was first uploaded
    pub fn gpu_surface(&self) -> Option<SurfaceHandle> {
        self.gpu_surface
    }

    pub fn phase(&self) -> AtlasPhase {
        match (self.uploaded, self.dirty, self.closed) {
            (false, _, false) => AtlasPhase::Growing,
            (false, _, true) => AtlasPhase::Full,
            (true, false, _) => AtlasPhase::Uploaded,
            (true, true, _) => AtlasPhase::Stale,
        }
    }

    /// Texture coordinate of an atlas-space point
    pub fn tex_coord(&self, x: u32, y: u32) -> [f32; 2] {
        [x as f32 / self.size as f32, y as f32 / self.size as f32]
    }

    /// Run the same-row and new-row tests for a `width` x `height` request
    pub(crate) fn fit(&self, width: u32, height: u32) -> Option<Fit> {
        if self.closed {
            return None;
        }

        let room_x = self.size.saturating_sub(self.last_x);
        let room_y = self.size.saturating_sub(self.last_y);
        if room_x >= width && room_y >= self.next_row_height.max(height) {
            return Some(Fit::SameRow);
        }

        let below = self.last_y as u64 + self.next_row_height as u64 + height as u64;
        if width <= self.size && below <= self.size as u64 {
            return Some(Fit::NewRow);
        }

        None
    }

    /// Advance the cursor for a placement decided by [`Atlas::fit`].
    ///
    /// `Fit::NewAtlas` is only committed on a fresh atlas and behaves like a
    /// same-row placement at the origin.
    pub(crate) fn commit(&mut self, fit: Fit, width: u32, height: u32) -> (u32, u32) {
        if fit == Fit::NewRow {
            self.last_y += self.next_row_height;
            self.last_x = 0;
            self.next_row_height = height;
        }

        let origin = (self.last_x, self.last_y);
        self.last_x += width;
        if height > self.next_row_height {
            self.next_row_height = height;
        }

        self.placements += 1;
        self.dirty = true;
        origin
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
        self.dirty = true;
    }

    pub(crate) fn attach_gpu_surface(&mut self, handle: SurfaceHandle) {
        self.gpu_surface = Some(handle);
    }

    pub(crate) fn mark_uploaded(&mut self) {
        self.dirty = false;
        self.uploaded = true;
    }

    /// Memory size
    pub fn memory_size(&self) -> usize {
        std::mem::size_of::<Self>() + self.surface.byte_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let a = AtlasRect::new(0, 0, 10, 10);
        assert!(a.overlaps(&AtlasRect::new(9, 9, 5, 5)));
        assert!(!a.overlaps(&AtlasRect::new(10, 0, 5, 5)));
        assert!(!a.overlaps(&AtlasRect::new(0, 10, 5, 5)));
    }

    #[test]
    fn test_rect_uv() {
        let rect = AtlasRect::new(64, 32, 64, 32);
        let (u0, v0, u1, v1) = rect.uv(256);
        assert_eq!(u0, 0.25);
        assert_eq!(v0, 0.125);
        assert_eq!(u1, 0.5);
        assert_eq!(v1, 0.25);
    }

    #[test]
    fn test_fit_same_row_then_new_row() {
        let mut atlas = Atlas::new(AtlasId(0), 100, 20);
        assert_eq!(atlas.fit(60, 20), Some(Fit::SameRow));
        assert_eq!(atlas.commit(Fit::SameRow, 60, 20), (0, 0));

        assert_eq!(atlas.fit(50, 20), Some(Fit::NewRow));
        assert_eq!(atlas.commit(Fit::NewRow, 50, 20), (0, 20));
        assert_eq!(atlas.cursor(), (50, 20));
    }

    #[test]
    fn test_row_grows_to_tallest_item() {
        let mut atlas = Atlas::new(AtlasId(0), 100, 10);
        atlas.commit(Fit::SameRow, 10, 10);
        atlas.commit(Fit::SameRow, 10, 25);
        assert_eq!(atlas.next_row_height(), 25);
    }

    #[test]
    fn test_row_too_short_vertically() {
        let mut atlas = Atlas::new(AtlasId(0), 100, 20);
        for _ in 0..4 {
            let fit = atlas.fit(100, 20).unwrap();
            atlas.commit(fit, 100, 20);
        }
        atlas.commit(Fit::NewRow, 10, 20);
        assert_eq!(atlas.cursor(), (10, 80));
        assert_eq!(atlas.fit(10, 30), None);
    }

    #[test]
    fn test_closed_atlas_rejects() {
        let mut atlas = Atlas::new(AtlasId(0), 100, 20);
        atlas.close();
        assert_eq!(atlas.fit(1, 1), None);
        assert_eq!(atlas.phase(), AtlasPhase::Full);
    }

    #[test]
    fn test_phase_cycle() {
        let mut atlas = Atlas::new(AtlasId(0), 64, 8);
        assert_eq!(atlas.phase(), AtlasPhase::Growing);
        atlas.commit(Fit::SameRow, 8, 8);
        atlas.mark_uploaded();
        assert_eq!(atlas.phase(), AtlasPhase::Uploaded);
        atlas.commit(Fit::SameRow, 8, 8);
        assert_eq!(atlas.phase(), AtlasPhase::Stale);
        atlas.mark_uploaded();
        assert_eq!(atlas.phase(), AtlasPhase::Uploaded);
    }

    #[test]
    fn test_line_height_only_grows_open_row() {
        let mut atlas = Atlas::new(AtlasId(0), 64, 16);
        atlas.set_line_height(10);
        assert_eq!(atlas.next_row_height(), 16);
        atlas.set_line_height(24);
        assert_eq!(atlas.next_row_height(), 24);
        assert_eq!(atlas.line_height(), 24);
    }
}
