//! Sloth Canvas Context
//!
//! Canvas-style drawing calls. Each call rasterizes its content into the
//! current atlas right away and appends one item to the scene; `render`
//! draws the whole scene.

use sloth_atlas::{
    AtlasAllocator, AtlasRect, FrameStats, GpuBackend, ItemId, ItemKind, PlacedItem, Placement,
    Renderer, Result, Scene, SlothError, SlotManager, Surface,
};

use crate::color::Color;
use crate::config::CanvasConfig;
use crate::font::FontSpec;
use crate::path::Path;
use crate::raster::{PathStyle, Rasterizer};

/// GPU-backed canvas
pub struct SlothCanvas<R: Rasterizer, G: GpuBackend> {
    /// Atlas packer
    allocator: AtlasAllocator,
    /// Texture slot table
    slots: SlotManager,
    /// Items in creation order
    scene: Scene,
    renderer: Renderer,
    rasterizer: R,
    gpu: G,
    /// Active font
    font: FontSpec,
    fill_style: Color,
    stroke_style: Color,
    line_width: f32,
    /// Path under construction
    path: Path,
}

impl<R: Rasterizer, G: GpuBackend> SlothCanvas<R, G> {
    /// Create a canvas for a `viewport` of `(width, height)` pixels
    pub fn new(config: CanvasConfig, rasterizer: R, mut gpu: G, viewport: (u32, u32)) -> Result<Self> {
        let font = config.validate()?;
        let line_height = rasterizer.line_height(&font).ceil() as u32;

        let mut renderer = Renderer::new(&mut gpu, viewport.0, viewport.1)?;
        renderer.set_clear_color(config.clear_color);

        tracing::info!(
            "Sloth canvas {}x{} with {}px atlases, font {}",
            viewport.0, viewport.1, config.atlas_size, font
        );

        Ok(Self {
            allocator: AtlasAllocator::new(config.atlas_size, line_height),
            slots: SlotManager::new(),
            scene: Scene::new(),
            renderer,
            rasterizer,
            gpu,
            font,
            fill_style: config.fill_style,
            stroke_style: config.stroke_style,
            line_width: config.line_width,
            path: Path::new(),
        })
    }

    // === Drawing ===

    /// Draw `text` with its top-left corner at `(x, y)`
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) -> ItemId {
        let (width, height) = self.rasterizer.measure_text(text, &self.font).pixels();
        let height = height.max(self.allocator.line_height());

        let (placement, region) = self.place(ItemKind::Text, width, height);
        if let Some(atlas) = self.allocator.atlas_mut(placement.atlas) {
            self.rasterizer
                .draw_text(atlas.surface_mut(), region, text, &self.font, self.fill_style);
        }
        self.scene.push(ItemKind::Text, placement, width, height, x, y)
    }

    /// Draw `image` at `(x, y)`, scaled to `size` or at its natural size
    pub fn draw_image(&mut self, image: &Surface, x: f32, y: f32, size: Option<(u32, u32)>) -> ItemId {
        let (width, height) = size.unwrap_or((image.width(), image.height()));

        let (placement, region) = self.place(ItemKind::Image, width, height);
        if let Some(atlas) = self.allocator.atlas_mut(placement.atlas) {
            self.rasterizer.draw_image(atlas.surface_mut(), region, image);
        }
        self.scene.push(ItemKind::Image, placement, width, height, x, y)
    }

    /// Draw raw premultiplied RGBA pixels at `(x, y)`
    pub fn draw_surface(&mut self, width: u32, height: u32, rgba: Vec<u8>, x: f32, y: f32) -> Result<ItemId> {
        let surface = Surface::from_rgba(width, height, rgba).ok_or_else(|| {
            SlothError::Draw(format!("pixel buffer does not match {width}x{height}"))
        })?;
        Ok(self.draw_image(&surface, x, y, None))
    }

    /// Fill a rectangle with the fill style
    pub fn fill_rect(&mut self, x: f32, y: f32, width: u32, height: u32) -> ItemId {
        let (placement, region) = self.place(ItemKind::Rect, width, height);
        if let Some(atlas) = self.allocator.atlas_mut(placement.atlas) {
            self.rasterizer
                .draw_rect(atlas.surface_mut(), region, self.fill_style);
        }
        self.scene.push(ItemKind::Rect, placement, width, height, x, y)
    }

    // === Paths ===

    pub fn begin_path(&mut self) {
        self.path.begin();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(x, y);
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(x, y);
    }

    pub fn close_path(&mut self) {
        self.path.close();
    }

    /// Stroke the current path. `None` if the path is empty.
    pub fn stroke(&mut self) -> Option<ItemId> {
        let style = PathStyle::stroke(self.stroke_style, self.line_width);
        self.draw_path(style, self.line_width / 2.0)
    }

    /// Fill the current path. `None` if the path is empty.
    pub fn fill(&mut self) -> Option<ItemId> {
        self.draw_path(PathStyle::fill(self.fill_style), 0.0)
    }

    // Path coordinates are canvas coordinates, so the item sits at the
    // canvas origin and covers the path's extent.
    fn draw_path(&mut self, style: PathStyle, pad: f32) -> Option<ItemId> {
        if self.path.is_empty() {
            return None;
        }
        let (width, height) = self.path.extent(pad);

        let (placement, region) = self.place(ItemKind::Path, width, height);
        if let Some(atlas) = self.allocator.atlas_mut(placement.atlas) {
            self.rasterizer
                .draw_path(atlas.surface_mut(), region, &self.path, style);
        }
        Some(self.scene.push(ItemKind::Path, placement, width, height, 0.0, 0.0))
    }

    fn place(&mut self, kind: ItemKind, width: u32, height: u32) -> (Placement, AtlasRect) {
        let placement = self.allocator.place(width, height, kind);
        (placement, placement.rect(width, height))
    }

    // === Drawing state ===

    /// Set the font from a shorthand such as `"12px Times New Roman"`
    pub fn set_font(&mut self, font: &str) -> Result<()> {
        let font: FontSpec = font.parse()?;
        let line_height = self.rasterizer.line_height(&font).ceil() as u32;
        self.allocator.set_line_height(line_height);
        self.font = font;
        Ok(())
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn set_fill_style(&mut self, color: Color) {
        self.fill_style = color;
    }

    pub fn fill_style(&self) -> Color {
        self.fill_style
    }

    pub fn set_stroke_style(&mut self, color: Color) {
        self.stroke_style = color;
    }

    pub fn stroke_style(&self) -> Color {
        self.stroke_style
    }

    pub fn set_line_width(&mut self, width: f32) -> Result<()> {
        if !(width.is_finite() && width > 0.0) {
            return Err(SlothError::InvalidConfig(format!(
                "line width {width} must be positive"
            )));
        }
        self.line_width = width;
        Ok(())
    }

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    // === Scene ===

    /// Move an item by `(tx, ty)` canvas pixels without repacking it
    pub fn set_translation(&mut self, id: ItemId, tx: f32, ty: f32) -> Result<()> {
        let item = self
            .scene
            .get_mut(id)
            .ok_or_else(|| SlothError::Draw(format!("unknown item {id:?}")))?;
        item.set_translation(tx, ty);
        Ok(())
    }

    /// Re-upload every atlas on the next frame
    pub fn update_all(&mut self) {
        self.allocator.mark_all_dirty();
        self.scene.mark_all_stale();
    }

    /// Remove every item. Atlas space is not reclaimed.
    pub fn clear_scene(&mut self) {
        self.scene.clear();
    }

    /// Draw one frame
    pub fn render(&mut self) -> FrameStats {
        let stats = self.renderer.render(
            &mut self.scene,
            &mut self.allocator,
            &mut self.slots,
            &mut self.gpu,
        );
        if stats.items_failed > 0 {
            tracing::warn!(
                "Frame drew {} items, {} failed",
                stats.items_drawn, stats.items_failed
            );
        }
        stats
    }

    /// Install the projection for a resized viewport
    pub fn reproject(&mut self, width: u32, height: u32) -> Result<()> {
        self.renderer.reproject(&mut self.gpu, width, height)
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.renderer.viewport()
    }

    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.renderer.set_clear_color(color);
    }

    // === Accessors ===

    pub fn item(&self, id: ItemId) -> Option<&PlacedItem> {
        self.scene.get(id)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn allocator(&self) -> &AtlasAllocator {
        &self.allocator
    }

    pub fn slots(&self) -> &SlotManager {
        &self.slots
    }

    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    pub fn gpu(&self) -> &G {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut G {
        &mut self.gpu
    }
}
