//! Sloth Atlas - Packing and Texture Slots
//!
//! The GPU-facing half of Sloth:
//! - Row-based packing of rasterized content into fixed-size atlases
//! - FIFO management of the 8 hardware texture slots
//! - Placed items and the per-frame quad renderer
//!
//! The GPU itself is reached only through [`GpuBackend`]. [`HeadlessGpu`]
//! implements it in memory for tests and offscreen use.

pub mod allocator;
pub mod atlas;
pub mod gpu;
pub mod headless;
pub mod item;
pub mod projection;
pub mod renderer;
pub mod shader;
pub mod slots;
pub mod surface;

mod error;

pub use allocator::{AllocatorStats, AtlasAllocator, Fit, ItemKind, Placement};
pub use atlas::{Atlas, AtlasId, AtlasPhase, AtlasRect};
pub use error::{Result, SlothError};
pub use gpu::{BindingLocation, GpuBackend, SamplerUnit, SurfaceHandle};
pub use headless::{GpuCall, HeadlessGpu};
pub use item::{ItemId, PlacedItem, Quad};
pub use projection::projection;
pub use renderer::{FrameStats, Renderer, Scene, DEFAULT_CLEAR_COLOR};
pub use shader::ShaderBindings;
pub use slots::{SlotIndex, SlotManager, SlotStats, MAX_SLOTS};
pub use surface::Surface;

/// Default atlas edge length in pixels
pub const DEFAULT_ATLAS_SIZE: u32 = 1024;
