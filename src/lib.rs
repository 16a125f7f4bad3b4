//! Fireball - a raymarched SDF explosion
//!
//! Core modules:
//! - `scene`: Shading model (SDF, raymarching, coloring) and CPU frame rendering
//! - `renderer`: WebGPU context, shader compile/link and the per-frame draw
//! - `clock`: Elapsed-time source for the `time` uniform
//! - `settings`: User preferences

pub mod clock;
pub mod renderer;
pub mod scene;
pub mod settings;

pub use clock::FrameClock;
pub use settings::{BackendPreference, QualityPreset, Settings};
