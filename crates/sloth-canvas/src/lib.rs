//! Sloth Canvas - Canvas-style drawing on the GPU
//!
//! Text, images, rectangles and paths are rasterized on the CPU into
//! texture atlases (see `sloth-atlas`) and drawn as textured quads.
//!
//! # Example
//! ```rust,ignore
//! use sloth_canvas::{CanvasConfig, SkiaRasterizer, SlothCanvas};
//! use sloth_atlas::HeadlessGpu;
//!
//! let mut canvas = SlothCanvas::new(
//!     CanvasConfig::default(),
//!     SkiaRasterizer::with_system_fonts(),
//!     HeadlessGpu::new(),
//!     (800, 600),
//! )?;
//! canvas.fill_text("Hello", 10.0, 10.0);
//! canvas.render();
//! ```

pub mod color;
pub mod config;
pub mod context;
pub mod font;
pub mod path;
pub mod raster;
pub mod skia;

pub use color::Color;
pub use config::CanvasConfig;
pub use context::SlothCanvas;
pub use font::FontSpec;
pub use path::{Path, PathCommand};
pub use raster::{PathStyle, Rasterizer, TextExtent};
pub use skia::SkiaRasterizer;

pub use sloth_atlas as atlas;

/// Parse errors for colors and fonts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid font: {0}")]
    InvalidFont(String),
}

impl From<ConfigError> for sloth_atlas::SlothError {
    fn from(err: ConfigError) -> Self {
        sloth_atlas::SlothError::InvalidConfig(err.to_string())
    }
}
