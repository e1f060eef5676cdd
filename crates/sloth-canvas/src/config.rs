//! Canvas Configuration

use sloth_atlas::{Result, SlothError, DEFAULT_ATLAS_SIZE, DEFAULT_CLEAR_COLOR, MAX_SLOTS};

use crate::color::Color;
use crate::font::FontSpec;

/// Common minimum for GL_MAX_TEXTURE_SIZE on current hardware
pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 4096;

/// Canvas configuration options
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Atlas edge length (power of two)
    pub atlas_size: u32,

    /// Largest texture the GPU accepts
    pub max_texture_size: u32,

    /// Initial font shorthand
    pub font: String,

    /// Initial fill color
    pub fill_style: Color,

    /// Initial stroke color
    pub stroke_style: Color,

    /// Initial stroke width
    pub line_width: f32,

    /// Color each frame is cleared to
    pub clear_color: [f32; 4],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            atlas_size: DEFAULT_ATLAS_SIZE,
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            font: "12px Times New Roman".to_string(),
            fill_style: Color::RED,
            stroke_style: Color::BLACK,
            line_width: 5.0,
            clear_color: DEFAULT_CLEAR_COLOR,
        }
    }
}

impl CanvasConfig {
    /// Set atlas size
    pub fn with_atlas_size(mut self, size: u32) -> Self {
        self.atlas_size = size;
        self
    }

    pub fn with_max_texture_size(mut self, size: u32) -> Self {
        self.max_texture_size = size;
        self
    }

    pub fn with_font(mut self, font: &str) -> Self {
        self.font = font.to_string();
        self
    }

    pub fn with_fill_style(mut self, color: Color) -> Self {
        self.fill_style = color;
        self
    }

    pub fn with_stroke_style(mut self, color: Color) -> Self {
        self.stroke_style = color;
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Texture slots available to the renderer (fixed)
    pub fn max_slots(&self) -> usize {
        MAX_SLOTS
    }

    /// Check the configuration and parse the font
    pub fn validate(&self) -> Result<FontSpec> {
        if !self.atlas_size.is_power_of_two() {
            return Err(SlothError::InvalidConfig(format!(
                "atlas size {} is not a power of two",
                self.atlas_size
            )));
        }
        if self.atlas_size > self.max_texture_size {
            return Err(SlothError::InvalidConfig(format!(
                "atlas size {} exceeds max texture size {}",
                self.atlas_size, self.max_texture_size
            )));
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(SlothError::InvalidConfig(format!(
                "line width {} must be positive",
                self.line_width
            )));
        }
        Ok(self.font.parse()?)
    }
}
