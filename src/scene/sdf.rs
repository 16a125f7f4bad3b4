//! Fireball signed distance field
//!
//! Two spheres (cap above, stem at the origin) sharing a time-driven radius,
//! roughened by subtracting gradient noise.

use glam::Vec3;

use super::noise::gradient_noise;
use super::params::*;

/// Linear growth component of the radius, capped at `MAX_GROWTH`
#[inline]
pub fn growth(time: f32) -> f32 {
    (GROWTH_RATE * time.max(0.0)).min(MAX_GROWTH)
}

/// Non-negative radius pulse; zero at t = 0
#[inline]
pub fn pulse(time: f32) -> f32 {
    PULSE_AMPLITUDE * 0.5 * (1.0 - (PULSE_FREQUENCY * time).cos())
}

/// Fireball radius at `time` seconds
#[inline]
pub fn fireball_radius(time: f32) -> f32 {
    BASE_RADIUS + pulse(time) + growth(time)
}

/// Signed distance to a sphere
#[inline]
pub fn sd_sphere(p: Vec3, center: Vec3, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Scene distance: cap/stem union minus surface noise
pub fn scene_distance(p: Vec3, time: f32) -> f32 {
    let radius = fireball_radius(time);
    let cap = sd_sphere(p, Vec3::new(0.0, CAP_HEIGHT, 0.0), radius);
    let stem = sd_sphere(p, Vec3::ZERO, radius * STEM_SCALE);
    let noise = gradient_noise(p * NOISE_SCALE + Vec3::splat(time * NOISE_SPEED));
    cap.min(stem) - NOISE_AMPLITUDE * noise
}

/// Surface normal from central differences of the scene distance.
/// Returns zero where the gradient vanishes.
pub fn estimate_normal(p: Vec3, time: f32) -> Vec3 {
    let e = NORMAL_EPSILON;
    let dx = scene_distance(p + Vec3::X * e, time) - scene_distance(p - Vec3::X * e, time);
    let dy = scene_distance(p + Vec3::Y * e, time) - scene_distance(p - Vec3::Y * e, time);
    let dz = scene_distance(p + Vec3::Z * e, time) - scene_distance(p - Vec3::Z * e, time);
    Vec3::new(dx, dy, dz).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_radius_at_start_is_base() {
        assert_eq!(fireball_radius(0.0), BASE_RADIUS);
    }

    #[test]
    fn test_radius_grows_substantially_by_t20() {
        let r = fireball_radius(20.0);
        assert!(r >= BASE_RADIUS + 0.9, "radius {r}");
    }

    #[test]
    fn test_growth_caps() {
        assert_eq!(growth(1.0e6), MAX_GROWTH);
        assert_eq!(growth(-5.0), 0.0);
    }

    #[test]
    fn test_camera_is_outside_at_max_size() {
        // Worst case: full growth plus peak pulse
        let t = MAX_GROWTH / GROWTH_RATE + std::f32::consts::PI / PULSE_FREQUENCY;
        assert!(scene_distance(CAMERA_POS, t) > 1.0);
    }

    #[test]
    fn test_origin_is_inside() {
        assert!(scene_distance(Vec3::ZERO, 0.0) < 0.0);
        assert!(scene_distance(Vec3::ZERO, 20.0) < 0.0);
    }

    #[test]
    fn test_normal_points_outward_on_stem_front() {
        let p = Vec3::new(0.0, 0.0, BASE_RADIUS * STEM_SCALE);
        let n = estimate_normal(p, 0.0);
        assert!((n.length() - 1.0).abs() < 1e-3);
        assert!(n.z > 0.0, "normal {n:?}");
    }

    proptest! {
        #[test]
        fn growth_never_decreases(a in 0.0f32..1000.0, b in 0.0f32..1000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(growth(lo) <= growth(hi));
        }

        #[test]
        fn radius_never_below_base(t in 0.0f32..10_000.0) {
            prop_assert!(fireball_radius(t) >= BASE_RADIUS);
        }

        #[test]
        fn distance_is_finite(
            x in -10.0f32..10.0,
            y in -10.0f32..10.0,
            z in -10.0f32..10.0,
            t in 0.0f32..100.0,
        ) {
            prop_assert!(scene_distance(Vec3::new(x, y, z), t).is_finite());
            let n = estimate_normal(Vec3::new(x, y, z), t);
            prop_assert!(n.is_finite());
        }
    }
}
