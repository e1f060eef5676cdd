//! tiny-skia Rasterizer
//!
//! Draws into atlas surfaces in place. Atlas pixels are premultiplied RGBA,
//! which is the layout tiny-skia works in, so no copies are made.

use std::sync::Arc;

use sloth_atlas::{AtlasRect, Surface};
use tiny_skia::{
    FillRule, FilterQuality, Mask, Paint, PixmapMut, PixmapPaint, PixmapRef, Rect, Stroke,
    Transform,
};
use ttf_parser::{Face, OutlineBuilder};

use crate::color::Color;
use crate::font::FontSpec;
use crate::path::Path;
use crate::raster::{PathStyle, Rasterizer, TextExtent};

/// Width of one character, in ems, when no font is loaded
const FALLBACK_ADVANCE: f32 = 0.6;
/// Line height, in ems, when no font is loaded
const FALLBACK_LINE_HEIGHT: f32 = 1.2;

/// Rasterizer backed by tiny-skia and a fontdb font database
pub struct SkiaRasterizer {
    fonts: fontdb::Database,
}

impl SkiaRasterizer {
    /// Create a rasterizer with no fonts loaded
    pub fn new() -> Self {
        Self {
            fonts: fontdb::Database::new(),
        }
    }

    /// Create a rasterizer with system fonts loaded
    pub fn with_system_fonts() -> Self {
        let mut fonts = fontdb::Database::new();
        fonts.load_system_fonts();
        tracing::info!("Loaded {} system font faces", fonts.len());
        Self { fonts }
    }

    /// Load a font from memory
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.fonts
            .load_font_source(fontdb::Source::Binary(Arc::new(data)));
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    fn query(&self, font: &FontSpec) -> Option<fontdb::ID> {
        let family = match font.family.to_ascii_lowercase().as_str() {
            "serif" => fontdb::Family::Serif,
            "sans-serif" => fontdb::Family::SansSerif,
            "monospace" => fontdb::Family::Monospace,
            "cursive" => fontdb::Family::Cursive,
            "fantasy" => fontdb::Family::Fantasy,
            _ => fontdb::Family::Name(&font.family),
        };
        let families = [family, fontdb::Family::SansSerif];

        self.fonts
            .query(&fontdb::Query {
                families: &families,
                weight: if font.is_bold() {
                    fontdb::Weight::BOLD
                } else {
                    fontdb::Weight::NORMAL
                },
                stretch: fontdb::Stretch::Normal,
                style: if font.is_italic() {
                    fontdb::Style::Italic
                } else {
                    fontdb::Style::Normal
                },
            })
            .or_else(|| self.fonts.faces().next().map(|face| face.id))
    }

    /// Run `f` on the face matching `font`
    fn with_face<R>(&self, font: &FontSpec, f: impl FnOnce(&Face) -> R) -> Option<R> {
        let id = self.query(font)?;
        self.fonts
            .with_face_data(id, |data, index| Face::parse(data, index).ok().map(|face| f(&face)))
            .flatten()
    }

    fn pixmap(target: &mut Surface) -> Option<PixmapMut<'_>> {
        let (width, height) = (target.width(), target.height());
        PixmapMut::from_bytes(target.data_mut(), width, height)
    }

    fn clip(target: &Surface, region: AtlasRect) -> Option<Mask> {
        let mut mask = Mask::new(target.width(), target.height())?;
        let rect = Rect::from_xywh(
            region.x as f32,
            region.y as f32,
            region.width as f32,
            region.height as f32,
        )?;
        mask.fill_path(
            &tiny_skia::PathBuilder::from_rect(rect),
            FillRule::Winding,
            false,
            Transform::identity(),
        );
        Some(mask)
    }

    fn paint(color: Color) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color.to_tiny_skia());
        paint.anti_alias = true;
        paint
    }
}

impl Default for SkiaRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for SkiaRasterizer {
    fn measure_text(&self, text: &str, font: &FontSpec) -> TextExtent {
        let height = self.line_height(font);
        let width = self
            .with_face(font, |face| {
                let scale = font.size / face.units_per_em() as f32;
                text.chars()
                    .map(|c| {
                        face.glyph_index(c)
                            .and_then(|id| face.glyph_hor_advance(id))
                            .unwrap_or(face.units_per_em() / 2) as f32
                    })
                    .sum::<f32>()
                    * scale
            })
            .unwrap_or_else(|| text.chars().count() as f32 * font.size * FALLBACK_ADVANCE);

        TextExtent { width, height }
    }

    fn line_height(&self, font: &FontSpec) -> f32 {
        self.with_face(font, |face| {
            let scale = font.size / face.units_per_em() as f32;
            (face.ascender() as f32 - face.descender() as f32 + face.line_gap() as f32) * scale
        })
        .unwrap_or(font.size * FALLBACK_LINE_HEIGHT)
    }

    fn draw_text(&mut self, target: &mut Surface, region: AtlasRect, text: &str, font: &FontSpec, color: Color) {
        let path = self.with_face(font, |face| {
            let scale = font.size / face.units_per_em() as f32;
            let baseline = region.y as f32 + face.ascender() as f32 * scale;
            let mut builder = GlyphPathBuilder::new(scale, region.x as f32, baseline);

            for c in text.chars() {
                let Some(id) = face.glyph_index(c) else {
                    builder.advance(face.units_per_em() / 2);
                    continue;
                };
                face.outline_glyph(id, &mut builder);
                builder.advance(face.glyph_hor_advance(id).unwrap_or(0));
            }
            builder.finish()
        });

        let Some(Some(path)) = path else {
            tracing::debug!("No outlines for {:?} in {}", text, font);
            return;
        };
        let Some(mask) = Self::clip(target, region) else {
            return;
        };
        if let Some(mut pixmap) = Self::pixmap(target) {
            pixmap.fill_path(
                &path,
                &Self::paint(color),
                FillRule::Winding,
                Transform::identity(),
                Some(&mask),
            );
        }
    }

    fn draw_image(&mut self, target: &mut Surface, region: AtlasRect, image: &Surface) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let Some(source) = PixmapRef::from_bytes(image.data(), image.width(), image.height()) else {
            tracing::warn!("Image {}x{} has no pixel data", image.width(), image.height());
            return;
        };

        let transform = Transform::from_scale(
            region.width as f32 / image.width() as f32,
            region.height as f32 / image.height() as f32,
        )
        .post_translate(region.x as f32, region.y as f32);

        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        if let Some(mut pixmap) = Self::pixmap(target) {
            pixmap.draw_pixmap(0, 0, source, &paint, transform, None);
        }
    }

    fn draw_rect(&mut self, target: &mut Surface, region: AtlasRect, color: Color) {
        let Some(rect) = Rect::from_xywh(
            region.x as f32,
            region.y as f32,
            region.width as f32,
            region.height as f32,
        ) else {
            return;
        };
        let mut paint = Self::paint(color);
        paint.anti_alias = false;

        if let Some(mut pixmap) = Self::pixmap(target) {
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn draw_path(&mut self, target: &mut Surface, region: AtlasRect, path: &Path, style: PathStyle) {
        let Some(shape) = path.to_tiny_skia() else {
            return;
        };
        let Some(mask) = Self::clip(target, region) else {
            return;
        };
        let transform = Transform::from_translate(region.x as f32, region.y as f32);
        let paint = Self::paint(style.color);

        let Some(mut pixmap) = Self::pixmap(target) else {
            return;
        };
        if style.stroke {
            let stroke = Stroke {
                width: style.line_width,
                ..Stroke::default()
            };
            pixmap.stroke_path(&shape, &paint, &stroke, transform, Some(&mask));
        } else {
            pixmap.fill_path(&shape, &paint, FillRule::Winding, transform, Some(&mask));
        }
    }
}

/// Converts ttf-parser outlines into one tiny-skia path for a whole string
struct GlyphPathBuilder {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    pen_x: f32,
    baseline: f32,
}

impl GlyphPathBuilder {
    fn new(scale: f32, origin_x: f32, baseline: f32) -> Self {
        Self {
            builder: tiny_skia::PathBuilder::new(),
            scale,
            pen_x: origin_x,
            baseline,
        }
    }

    fn advance(&mut self, units: u16) {
        self.pen_x += units as f32 * self.scale;
    }

    fn transform_x(&self, x: f32) -> f32 {
        self.pen_x + x * self.scale
    }

    fn transform_y(&self, y: f32) -> f32 {
        self.baseline - y * self.scale // Flip Y axis
    }

    fn finish(self) -> Option<tiny_skia::Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.transform_x(x), self.transform_y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.transform_x(x), self.transform_y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x2), self.transform_y(y2),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
