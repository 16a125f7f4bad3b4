//! 3D gradient noise
//!
//! Integer-hashed so the CPU and the WGSL version (`fireball_frag.wgsl`)
//! agree up to float rounding. Lattice hashing is a pcg3d variant.

use glam::{IVec3, Vec3};

const LCG_MUL: u32 = 1664525;
const LCG_ADD: u32 = 1013904223;

#[inline]
fn pcg_mix(v: &mut [u32; 3]) {
    v[0] = v[0].wrapping_add(v[1].wrapping_mul(v[2]));
    v[1] = v[1].wrapping_add(v[2].wrapping_mul(v[0]));
    v[2] = v[2].wrapping_add(v[0].wrapping_mul(v[1]));
}

/// Pseudo-random gradient for a lattice cell, each component in [-1, 1]
pub fn lattice_gradient(cell: IVec3) -> Vec3 {
    let mut v = cell
        .to_array()
        .map(|c| (c as u32).wrapping_mul(LCG_MUL).wrapping_add(LCG_ADD));
    pcg_mix(&mut v);
    for c in &mut v {
        *c ^= *c >> 16;
    }
    pcg_mix(&mut v);

    let scale = 2.0 / u32::MAX as f32;
    Vec3::new(v[0] as f32, v[1] as f32, v[2] as f32) * scale - Vec3::ONE
}

/// Quintic fade curve
#[inline]
fn fade(t: Vec3) -> Vec3 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn corner(cell: IVec3, frac: Vec3, offset: IVec3) -> f32 {
    lattice_gradient(cell + offset).dot(frac - offset.as_vec3())
}

/// Smooth gradient noise, zero on every lattice point
pub fn gradient_noise(p: Vec3) -> f32 {
    let floor = p.floor();
    let cell = floor.as_ivec3();
    let f = p - floor;
    let u = fade(f);

    let n000 = corner(cell, f, IVec3::new(0, 0, 0));
    let n100 = corner(cell, f, IVec3::new(1, 0, 0));
    let n010 = corner(cell, f, IVec3::new(0, 1, 0));
    let n110 = corner(cell, f, IVec3::new(1, 1, 0));
    let n001 = corner(cell, f, IVec3::new(0, 0, 1));
    let n101 = corner(cell, f, IVec3::new(1, 0, 1));
    let n011 = corner(cell, f, IVec3::new(0, 1, 1));
    let n111 = corner(cell, f, IVec3::new(1, 1, 1));

    let x00 = lerp(n000, n100, u.x);
    let x10 = lerp(n010, n110, u.x);
    let x01 = lerp(n001, n101, u.x);
    let x11 = lerp(n011, n111, u.x);
    let y0 = lerp(x00, x10, u.y);
    let y1 = lerp(x01, x11, u.y);
    lerp(y0, y1, u.z)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
