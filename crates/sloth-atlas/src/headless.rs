//! Headless GPU
//!
//! In-memory [`GpuBackend`]: textures are byte vectors, texture units are an
//! array, and every call is recorded so tests and offscreen tools can see
//! exactly what a frame did. Failures can be injected per call kind.

use std::collections::HashMap;

use crate::error::{Result, SlothError};
use crate::gpu::{BindingLocation, GpuBackend, SamplerUnit, SurfaceHandle};
use crate::item::Quad;
use crate::shader::REQUIRED_BINDINGS;
use crate::slots::{SlotIndex, MAX_SLOTS};
use crate::surface::Surface;

/// `GL_TEXTURE0`
pub const GL_TEXTURE0: u32 = 0x84C0;

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateSurface(SurfaceHandle),
    Upload { handle: SurfaceHandle, slot: SlotIndex },
    Bind { slot: SlotIndex, handle: SurfaceHandle },
    SetProjection([f32; 16]),
    Clear([f32; 4]),
    DrawQuad { quad: Quad, sampler: SamplerUnit },
}

/// Texture object
#[derive(Debug)]
struct Texture {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Recording GPU backend
#[derive(Debug)]
pub struct HeadlessGpu {
    textures: HashMap<SurfaceHandle, Texture>,
    /// Texture bound at each unit
    units: [Option<SurfaceHandle>; MAX_SLOTS],
    bindings: HashMap<String, BindingLocation>,
    projection: Option<[f32; 16]>,
    calls: Vec<GpuCall>,
    next_id: u32,
    surface_limit: Option<usize>,
    fail_binds: bool,
    fail_draws: bool,
}

impl Default for HeadlessGpu {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessGpu {
    /// Create a backend exposing every binding of the Sloth shader pair
    pub fn new() -> Self {
        let bindings = REQUIRED_BINDINGS
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_string(), BindingLocation(i as u32)))
            .collect();

        Self {
            textures: HashMap::new(),
            units: [None; MAX_SLOTS],
            bindings,
            projection: None,
            calls: Vec::new(),
            next_id: 1,
            surface_limit: None,
            fail_binds: false,
            fail_draws: false,
        }
    }

    /// Refuse to create more than `limit` textures
    pub fn with_surface_limit(mut self, limit: usize) -> Self {
        self.surface_limit = Some(limit);
        self
    }

    /// Change the texture limit (`None` removes it)
    pub fn set_surface_limit(&mut self, limit: Option<usize>) {
        self.surface_limit = limit;
    }

    /// Pretend the linked program lacks `name`
    pub fn without_binding(mut self, name: &str) -> Self {
        self.bindings.remove(name);
        self
    }

    pub fn fail_binds(&mut self, fail: bool) {
        self.fail_binds = fail;
    }

    pub fn fail_draws(&mut self, fail: bool) {
        self.fail_draws = fail;
    }

    /// Every call since creation (or the last [`HeadlessGpu::take_calls`])
    pub fn calls(&self) -> &[GpuCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<GpuCall> {
        std::mem::take(&mut self.calls)
    }

    /// Texture currently bound at `slot`
    pub fn bound(&self, slot: SlotIndex) -> Option<SurfaceHandle> {
        self.units.get(slot.index()).copied().flatten()
    }

    /// Pixels last uploaded into a texture
    pub fn texture_data(&self, handle: SurfaceHandle) -> Option<&[u8]> {
        self.textures.get(&handle).map(|t| t.data.as_slice())
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn projection(&self) -> Option<&[f32; 16]> {
        self.projection.as_ref()
    }

    pub fn upload_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, GpuCall::Upload { .. }))
            .count()
    }

    pub fn bind_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, GpuCall::Bind { .. }))
            .count()
    }

    /// Quads drawn, in order
    pub fn quads(&self) -> Vec<(Quad, SamplerUnit)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GpuCall::DrawQuad { quad, sampler } => Some((*quad, *sampler)),
                _ => None,
            })
            .collect()
    }

    /// Clip-space corners of every drawn quad under the current projection
    pub fn clip_quads(&self) -> Vec<[[f32; 2]; 4]> {
        let Some(projection) = self.projection else {
            return Vec::new();
        };
        self.quads()
            .iter()
            .map(|(quad, _)| quad.clip_positions(&projection))
            .collect()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl GpuBackend for HeadlessGpu {
    fn create_surface(&mut self, width: u32, height: u32) -> Result<SurfaceHandle> {
        if let Some(limit) = self.surface_limit {
            if self.textures.len() >= limit {
                return Err(SlothError::ResourceExhausted(format!(
                    "texture limit of {limit} reached"
                )));
            }
        }

        let handle = SurfaceHandle(self.next_id());
        self.textures.insert(handle, Texture {
            width,
            height,
            data: Vec::new(),
        });
        self.calls.push(GpuCall::CreateSurface(handle));
        Ok(handle)
    }

    fn upload_pixels(&mut self, handle: SurfaceHandle, slot: SlotIndex, pixels: &Surface) -> Result<()> {
        if self.bound(slot) != Some(handle) {
            return Err(SlothError::Upload(format!(
                "texture {} is not bound at slot {}",
                handle.0, slot.0
            )));
        }

        let texture = self
            .textures
            .get_mut(&handle)
            .ok_or_else(|| SlothError::Upload(format!("unknown texture {}", handle.0)))?;
        if texture.width != pixels.width() || texture.height != pixels.height() {
            return Err(SlothError::Upload(format!(
                "size mismatch: texture {}x{}, pixels {}x{}",
                texture.width, texture.height, pixels.width(), pixels.height()
            )));
        }

        texture.data = pixels.data().to_vec();
        self.calls.push(GpuCall::Upload { handle, slot });
        Ok(())
    }

    fn bind_slot(&mut self, slot: SlotIndex, handle: SurfaceHandle) -> Result<()> {
        if self.fail_binds {
            return Err(SlothError::ResourceExhausted(format!(
                "cannot bind texture {} to slot {}",
                handle.0, slot.0
            )));
        }
        if !self.textures.contains_key(&handle) {
            return Err(SlothError::ResourceExhausted(format!("unknown texture {}", handle.0)));
        }

        let unit = self
            .units
            .get_mut(slot.index())
            .ok_or_else(|| SlothError::BindingNotFound(format!("texture unit {}", slot.0)))?;
        *unit = Some(handle);
        self.calls.push(GpuCall::Bind { slot, handle });
        Ok(())
    }

    fn sampler_unit(&self, slot: SlotIndex) -> SamplerUnit {
        SamplerUnit(GL_TEXTURE0 + slot.0)
    }

    fn binding_location(&self, name: &str) -> Option<BindingLocation> {
        self.bindings.get(name).copied()
    }

    fn set_projection(&mut self, matrix: &[f32; 16]) -> Result<()> {
        self.projection = Some(*matrix);
        self.calls.push(GpuCall::SetProjection(*matrix));
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.calls.push(GpuCall::Clear(color));
    }

    fn draw_quad(&mut self, quad: &Quad, sampler: SamplerUnit) -> Result<()> {
        if self.fail_draws {
            return Err(SlothError::Draw("draw calls disabled".to_string()));
        }
        self.calls.push(GpuCall::DrawQuad {
            quad: *quad,
            sampler,
        });
        Ok(())
    }
}
