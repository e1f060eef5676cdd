//! Shader Pair
//!
//! The fixed vertex/fragment shaders every quad is drawn with, and the
//! binding lookup done once at setup.

use crate::error::{Result, SlothError};
use crate::gpu::{BindingLocation, GpuBackend};

/// Vertex shader: translation is in canvas pixels, applied before projection
pub const VERTEX_SHADER: &str = "\
attribute vec4 a_Position;
attribute vec2 a_TexCoord;
varying vec2 v_TexCoord;
uniform vec4 u_Translation;
uniform mat4 u_xformMatrix;
void main() {
  gl_Position = u_xformMatrix * (a_Position + u_Translation);
  v_TexCoord = a_TexCoord;
}
";

/// Fragment shader: plain texture lookup
pub const FRAGMENT_SHADER: &str = "\
#ifdef GL_ES
precision mediump float;
#endif
uniform sampler2D u_Sampler;
varying vec2 v_TexCoord;
void main() {
  gl_FragColor = texture2D(u_Sampler, v_TexCoord);
}
";

pub const A_POSITION: &str = "a_Position";
pub const A_TEX_COORD: &str = "a_TexCoord";
pub const U_TRANSLATION: &str = "u_Translation";
pub const U_PROJECTION: &str = "u_xformMatrix";
pub const U_SAMPLER: &str = "u_Sampler";

/// Every attribute and uniform the renderer writes
pub const REQUIRED_BINDINGS: [&str; 5] = [
    A_POSITION,
    A_TEX_COORD,
    U_TRANSLATION,
    U_PROJECTION,
    U_SAMPLER,
];

/// Resolved binding locations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderBindings {
    pub position: BindingLocation,
    pub tex_coord: BindingLocation,
    pub translation: BindingLocation,
    pub projection: BindingLocation,
    pub sampler: BindingLocation,
}

impl ShaderBindings {
    /// Look up every binding, failing on the first one missing
    pub fn resolve(gpu: &dyn GpuBackend) -> Result<Self> {
        let find = |name: &str| {
            gpu.binding_location(name)
                .ok_or_else(|| SlothError::BindingNotFound(name.to_string()))
        };

        Ok(Self {
            position: find(A_POSITION)?,
            tex_coord: find(A_TEX_COORD)?,
            translation: find(U_TRANSLATION)?,
            projection: find(U_PROJECTION)?,
            sampler: find(U_SAMPLER)?,
        })
    }
}
