//! CPU rendering of a whole frame
//!
//! Evaluates the shading function at every pixel center, the same points the
//! rasterizer hands to the fragment stage.

use glam::{Vec2, Vec3};

use super::shade::shade_pixel;

/// RGBA8 image of a single point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl Frame {
    /// Pixel at column `x`, row `y`; `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.pixels.get(index).copied()
    }

    /// Raw bytes, row-major, top row first
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

fn to_rgba8(color: Vec3) -> [u8; 4] {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

/// Render `width` x `height` pixels at `time` seconds
pub fn render_frame(width: u32, height: u32, time: f32) -> Frame {
    let width = width.max(1);
    let height = height.max(1);
    let resolution = Vec2::new(width as f32, height as f32);

    let pixels = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| {
            let frag = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            to_rgba8(shade_pixel(frag, resolution, time))
        })
        .collect();

    log::debug!("Rendered {}x{} preview at t={:.2}s", width, height, time);

    Frame {
        width,
        height,
        pixels,
    }
}
