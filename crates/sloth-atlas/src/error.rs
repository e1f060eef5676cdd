//! Error types

/// Errors raised at the GPU boundary and during setup.
///
/// Packing has no error kind: the allocator always succeeds by opening a
/// new atlas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlothError {
    #[error("GPU resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Shader binding not found: {0}")]
    BindingNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Draw failed: {0}")]
    Draw(String),
}

pub type Result<T> = std::result::Result<T, SlothError>;
