//! WebGPU rendering module
//!
//! The whole image comes from one fragment stage raymarching the fireball SDF.

pub mod context;
pub mod error;
pub mod fireball_pipeline;
pub mod quad;
pub mod shader;

pub use context::GpuContext;
pub use error::RendererError;
pub use fireball_pipeline::{FireballRenderState, Globals};
pub use shader::{ProgramError, ProgramState, ShaderError, StageKind};
