//! Shading constants shared by the CPU mirror and the WGSL fragment stage
//!
//! The fragment shader does not hardcode any of these: its `const` prelude is
//! generated from this module at startup (see `renderer::shader`).
//! Glow and shockwave values are tuned by eye, not derived from anything physical.

use glam::Vec3;

// ============================================================================
// CAMERA & MARCHING
// ============================================================================

/// Fixed camera position, looking down -Z
pub const CAMERA_POS: Vec3 = Vec3::new(0.0, 0.0, 4.0);
/// Distance from the camera to the view plane
pub const FOCAL_LENGTH: f32 = 1.5;
/// Step cap for the raymarch loop
pub const MAX_STEPS: u32 = 100;
/// Scene distance below which a ray counts as a hit
pub const HIT_EPSILON: f32 = 0.001;
/// Accumulated distance beyond which a ray counts as a miss
pub const MAX_DISTANCE: f32 = 20.0;
/// Value the GPU raymarcher returns for a miss
pub const MISS_DISTANCE: f32 = -1.0;
/// Offset for central-difference normals
pub const NORMAL_EPSILON: f32 = 0.001;

// ============================================================================
// SHAPE
// ============================================================================

/// Radius at t = 0
pub const BASE_RADIUS: f32 = 0.5;
/// Peak height of the radius pulse
pub const PULSE_AMPLITUDE: f32 = 0.05;
/// Angular frequency of the radius pulse (rad/s)
pub const PULSE_FREQUENCY: f32 = 3.0;
/// Linear radius growth per second
pub const GROWTH_RATE: f32 = 0.05;
/// Growth stops here so the cap never reaches the camera
pub const MAX_GROWTH: f32 = 1.5;
/// Stem radius relative to the cap radius
pub const STEM_SCALE: f32 = 0.6;
/// Height of the cap sphere center above the origin
pub const CAP_HEIGHT: f32 = 0.8;
/// Spatial frequency of the surface noise
pub const NOISE_SCALE: f32 = 3.0;
/// How fast the noise field scrolls with time
pub const NOISE_SPEED: f32 = 0.5;
/// Depth of the noise displacement
pub const NOISE_AMPLITUDE: f32 = 0.08;

// ============================================================================
// COLOR
// ============================================================================

/// Directional light (normalized at use)
pub const LIGHT_DIR: Vec3 = Vec3::new(0.6, 0.8, 0.4);
pub const AMBIENT: f32 = 0.25;
/// Heat falls to zero at this multiple of the current radius
pub const HEAT_SPREAD: f32 = 1.5;

pub const HEAT_RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
pub const HEAT_ORANGE: Vec3 = Vec3::new(1.0, 0.5, 0.0);
pub const HEAT_YELLOW: Vec3 = Vec3::new(1.0, 1.0, 0.0);
pub const HEAT_WHITE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

pub const GLOW_STRENGTH: f32 = 0.6;
pub const GLOW_FALLOFF: f32 = 1.5;
pub const GLOW_COLOR: Vec3 = Vec3::new(1.0, 0.45, 0.1);

/// Seconds between shockwave rings
pub const SHOCK_PERIOD: f32 = 4.0;
pub const SHOCK_MAX_RADIUS: f32 = 3.0;
pub const SHOCK_SHARPNESS: f32 = 40.0;
pub const SHOCK_STRENGTH: f32 = 0.8;
pub const SHOCK_COLOR: Vec3 = Vec3::new(1.0, 0.85, 0.6);
