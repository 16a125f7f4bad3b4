//! Renderer error types

use super::shader::ProgramError;

/// Everything that can stop the renderer from producing a frame
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("drawing surface unavailable: {0}")]
    Context(String),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface has no supported formats for this adapter")]
    UnsupportedSurface,
    #[error("shader program is unusable: {0}")]
    ProgramUnusable(#[from] ProgramError),
    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),
}

impl RendererError {
    /// Errors after which the render loop must not continue
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RendererError::Frame(_))
    }
}
