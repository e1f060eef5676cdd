//! GPU Capability Interface
//!
//! Everything Sloth needs from a 3D drawing API. Shader compilation, buffer
//! management and draw-call encoding stay behind this trait.

use crate::error::Result;
use crate::item::Quad;
use crate::slots::SlotIndex;
use crate::surface::Surface;

/// Opaque handle to a GPU texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SurfaceHandle(pub u32);

/// Opaque sampler-unit identifier (e.g. `GL_TEXTURE0 + n`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SamplerUnit(pub u32);

/// Location of a shader attribute or uniform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct BindingLocation(pub u32);

/// GPU collaborator used by the slot manager and the renderer
pub trait GpuBackend {
    /// Create a texture of the given size.
    ///
    /// Fails with [`SlothError::ResourceExhausted`](crate::SlothError) when
    /// no more textures can be created.
    fn create_surface(&mut self, width: u32, height: u32) -> Result<SurfaceHandle>;

    /// Copy `pixels` into the texture bound at `slot`
    fn upload_pixels(&mut self, handle: SurfaceHandle, slot: SlotIndex, pixels: &Surface) -> Result<()>;

    /// Bind a texture to a texture slot
    fn bind_slot(&mut self, slot: SlotIndex, handle: SurfaceHandle) -> Result<()>;

    /// Sampler unit a shader uses to read `slot`
    fn sampler_unit(&self, slot: SlotIndex) -> SamplerUnit;

    /// Look up a shader attribute or uniform by name
    fn binding_location(&self, name: &str) -> Option<BindingLocation>;

    /// Install the 4x4 column-major projection matrix
    fn set_projection(&mut self, matrix: &[f32; 16]) -> Result<()>;

    /// Clear the render target
    fn clear(&mut self, color: [f32; 4]);

    /// Draw one textured quad as a 4-vertex triangle strip
    fn draw_quad(&mut self, quad: &Quad, sampler: SamplerUnit) -> Result<()>;
}
