//! CPU Rasterizer Interface
//!
//! The canvas measures and draws content through this trait. Drawing always
//! targets a region of an atlas surface and must stay inside it.

use sloth_atlas::{AtlasRect, Surface};

use crate::color::Color;
use crate::font::FontSpec;
use crate::path::Path;

/// Measured text footprint in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextExtent {
    pub width: f32,
    pub height: f32,
}

impl TextExtent {
    /// Whole-pixel footprint
    pub fn pixels(&self) -> (u32, u32) {
        (self.width.ceil().max(0.0) as u32, self.height.ceil().max(0.0) as u32)
    }
}

/// Paint parameters for a path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub color: Color,
    pub line_width: f32,
    pub stroke: bool,
}

impl PathStyle {
    pub fn fill(color: Color) -> Self {
        Self {
            color,
            line_width: 0.0,
            stroke: false,
        }
    }

    pub fn stroke(color: Color, line_width: f32) -> Self {
        Self {
            color,
            line_width,
            stroke: true,
        }
    }
}

/// CPU-side text, image and shape rasterizer
pub trait Rasterizer {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextExtent;

    /// Height of one line of text
    fn line_height(&self, font: &FontSpec) -> f32;

    /// Draw `text` with its top-left corner at the region origin
    fn draw_text(&mut self, target: &mut Surface, region: AtlasRect, text: &str, font: &FontSpec, color: Color);

    /// Draw `image` scaled to fill the region
    fn draw_image(&mut self, target: &mut Surface, region: AtlasRect, image: &Surface);

    fn draw_rect(&mut self, target: &mut Surface, region: AtlasRect, color: Color);

    /// Replay `path` with its origin at the region origin
    fn draw_path(&mut self, target: &mut Surface, region: AtlasRect, path: &Path, style: PathStyle);
}
