//! Surface coloring: heat gradient, Lambert lighting, glow and shockwave ring

use glam::{Vec2, Vec3};

use super::march::{ray_direction, raymarch, view_plane};
use super::params::*;
use super::sdf::{estimate_normal, fireball_radius};

/// Heat ramp: 0 = red, then orange, yellow, 1 = white
pub fn heat_color(heat: f32) -> Vec3 {
    let h = heat.clamp(0.0, 1.0) * 3.0;
    if h < 1.0 {
        HEAT_RED.lerp(HEAT_ORANGE, h)
    } else if h < 2.0 {
        HEAT_ORANGE.lerp(HEAT_YELLOW, h - 1.0)
    } else {
        HEAT_YELLOW.lerp(HEAT_WHITE, h - 2.0)
    }
}

/// Expanding ring weight at distance `dist` from the origin
pub fn shockwave(dist: f32, time: f32) -> f32 {
    let cycles = time / SHOCK_PERIOD;
    let phase = cycles - cycles.floor();
    let ring = phase * SHOCK_MAX_RADIUS;
    let offset = dist - ring;
    SHOCK_STRENGTH * (1.0 - phase) * (-SHOCK_SHARPNESS * offset * offset).exp()
}

/// Color of the surface point `p` at `time`, clamped to [0, 1]
pub fn shade(p: Vec3, time: f32) -> Vec3 {
    let radius = fireball_radius(time);
    let normal = estimate_normal(p, time);
    let diffuse = normal.dot(LIGHT_DIR.normalize()).max(0.0);

    let dist = p.length();
    let heat = 1.0 - dist / (radius * HEAT_SPREAD);
    let base = heat_color(heat) * (AMBIENT + diffuse);

    let glow = GLOW_STRENGTH * (-GLOW_FALLOFF * dist).exp();
    let shock = shockwave(dist, time);

    (base + GLOW_COLOR * glow + SHOCK_COLOR * shock).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Full per-pixel evaluation, the CPU twin of `fs_main`
pub fn shade_pixel(frag: Vec2, resolution: Vec2, time: f32) -> Vec3 {
    let dir = ray_direction(view_plane(frag, resolution));
    match raymarch(CAMERA_POS, dir, time) {
        Some(hit) => shade(hit.point(CAMERA_POS, dir), time),
        None => Vec3::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_heat_ramp_endpoints() {
        assert_eq!(heat_color(0.0), HEAT_RED);
        assert_eq!(heat_color(1.0), HEAT_WHITE);
        assert_eq!(heat_color(-3.0), HEAT_RED);
        assert_eq!(heat_color(7.0), HEAT_WHITE);
    }

    #[test]
    fn test_heat_ramp_passes_orange_and_yellow() {
        let orange = heat_color(1.0 / 3.0);
        assert!((orange - HEAT_ORANGE).length() < 1e-5);
        let yellow = heat_color(2.0 / 3.0);
        assert!((yellow - HEAT_YELLOW).length() < 1e-5);
    }

    #[test]
    fn test_shockwave_fades_over_period() {
        // Ring sits on its radius, strength decays with phase
        let early = shockwave(0.25 * SHOCK_MAX_RADIUS, 0.25 * SHOCK_PERIOD);
        let late = shockwave(0.75 * SHOCK_MAX_RADIUS, 0.75 * SHOCK_PERIOD);
        assert!(early > late);
        assert!((early - SHOCK_STRENGTH * 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_center_pixel_is_lit_miss_is_black() {
        let res = Vec2::new(64.0, 36.0);
        let center = shade_pixel(res * 0.5, res, 0.0);
        assert!(center.max_element() > 0.0);
        let corner = shade_pixel(Vec2::new(0.5, 0.5), res, 0.0);
        assert_eq!(corner, Vec3::ZERO);
    }

    proptest! {
        #[test]
        fn output_is_displayable(
            fx in 0.0f32..64.0,
            fy in 0.0f32..36.0,
            t in 0.0f32..120.0,
        ) {
            let c = shade_pixel(Vec2::new(fx, fy), Vec2::new(64.0, 36.0), t);
            prop_assert!(c.is_finite());
            prop_assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
        }

        #[test]
        fn shade_is_clamped_anywhere(
            x in -5.0f32..5.0,
            y in -5.0f32..5.0,
            z in -5.0f32..5.0,
            t in 0.0f32..120.0,
        ) {
            let c = shade(Vec3::new(x, y, z), t);
            prop_assert!(c.is_finite());
            prop_assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
        }
    }
}
