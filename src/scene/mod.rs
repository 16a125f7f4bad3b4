//! Fireball shading model
//!
//! A CPU implementation of exactly what the fragment stage computes. It is pure:
//! every result depends only on the inputs and the constants in `params`.
//! - Pixel to view-plane mapping and camera rays
//! - Sphere tracing against a noisy two-sphere SDF
//! - Heat, glow and shockwave coloring

pub mod march;
pub mod noise;
pub mod params;
pub mod preview;
pub mod sdf;
pub mod shade;

pub use march::{Hit, ray_direction, raymarch, view_plane};
pub use noise::gradient_noise;
pub use preview::{Frame, render_frame};
pub use sdf::{estimate_normal, fireball_radius, growth, scene_distance};
pub use shade::{heat_color, shade, shade_pixel};
