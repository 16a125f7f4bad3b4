//! Camera rays and sphere tracing

use glam::{Vec2, Vec3};

use super::params::*;
use super::sdf::scene_distance;

/// Result of a successful raymarch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Distance along the ray (always >= 0)
    pub distance: f32,
    /// Steps taken before the hit
    pub steps: u32,
}

impl Hit {
    pub fn point(&self, origin: Vec3, dir: Vec3) -> Vec3 {
        origin + dir * self.distance
    }
}

/// Map a pixel position to the centered, aspect-corrected view plane.
///
/// `frag` is in framebuffer pixels with y pointing down, as `@builtin(position)`
/// delivers it. The result has +y up and spans [-1, 1] vertically.
pub fn view_plane(frag: Vec2, resolution: Vec2) -> Vec2 {
    let uv = (2.0 * frag - resolution) / resolution.y;
    Vec2::new(uv.x, -uv.y)
}

/// Direction from the camera through a view-plane coordinate
pub fn ray_direction(uv: Vec2) -> Vec3 {
    Vec3::new(uv.x, uv.y, -FOCAL_LENGTH).normalize()
}

/// March a ray through the scene at `time`.
///
/// Returns `None` when the ray leaves `MAX_DISTANCE` or runs out of steps.
/// The shader encodes the same outcome as `MISS_DISTANCE`.
pub fn raymarch(origin: Vec3, dir: Vec3, time: f32) -> Option<Hit> {
    let mut t = 0.0;
    for step in 0..MAX_STEPS {
        let d = scene_distance(origin + dir * t, time);
        if d < HIT_EPSILON {
            return Some(Hit {
                distance: t,
                steps: step + 1,
            });
        }
        t += d;
        if t > MAX_DISTANCE {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CENTRAL_RAY: Vec3 = Vec3::new(0.0, 0.0, -1.0);

    #[test]
    fn test_view_plane_center_and_edges() {
        let res = Vec2::new(200.0, 100.0);
        assert_eq!(view_plane(Vec2::new(100.0, 50.0), res), Vec2::ZERO);
        // Top-left pixel corner maps to (-aspect, +1)
        assert_eq!(view_plane(Vec2::ZERO, res), Vec2::new(-2.0, 1.0));
        assert_eq!(view_plane(res, res), Vec2::new(2.0, -1.0));
    }

    #[test]
    fn test_central_ray_hits_stem_at_start() {
        let hit = raymarch(CAMERA_POS, CENTRAL_RAY, 0.0).expect("central ray should hit");
        assert!(hit.distance >= 0.0);
        assert!(hit.steps <= MAX_STEPS);
        let p = hit.point(CAMERA_POS, CENTRAL_RAY);
        assert!(p.length() < 0.5, "hit at {p:?}");
        assert!(p.z > 0.0, "hit behind the origin at {p:?}");
    }

    #[test]
    fn test_central_ray_hits_farther_later() {
        let early = raymarch(CAMERA_POS, CENTRAL_RAY, 0.0).expect("hit at t=0");
        let late = raymarch(CAMERA_POS, CENTRAL_RAY, 20.0).expect("hit at t=20");
        let p0 = early.point(CAMERA_POS, CENTRAL_RAY);
        let p20 = late.point(CAMERA_POS, CENTRAL_RAY);
        assert!(p20.length() > p0.length() + 0.3, "{p0:?} vs {p20:?}");
        assert!(late.distance < early.distance);
    }

    #[test]
    fn test_ray_away_from_scene_misses() {
        assert_eq!(raymarch(CAMERA_POS, Vec3::Z, 0.0), None);
        assert_eq!(raymarch(CAMERA_POS, Vec3::Z, 20.0), None);
    }

    #[test]
    fn test_corner_ray_misses_at_start() {
        let dir = ray_direction(Vec2::new(-16.0 / 9.0, 1.0));
        assert_eq!(raymarch(CAMERA_POS, dir, 0.0), None);
    }

    proptest! {
        #[test]
        fn hits_are_bounded(
            x in -0.2f32..0.2,
            y in -0.2f32..0.2,
            t in 0.0f32..60.0,
        ) {
            let dir = ray_direction(Vec2::new(x, y));
            if let Some(hit) = raymarch(CAMERA_POS, dir, t) {
                prop_assert!(hit.distance >= 0.0);
                prop_assert!(hit.distance <= MAX_DISTANCE);
                prop_assert!(hit.steps <= MAX_STEPS);
            }
        }
    }
}
