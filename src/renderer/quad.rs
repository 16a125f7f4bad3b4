//! Static full-screen quad

use bytemuck::{Pod, Zeroable};

/// Vertex attribute slot of [`QuadVertex::position`]
pub const QUAD_POSITION_LOCATION: u32 = 0;

/// Clip-space position, bound to `@location(0)`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: QUAD_POSITION_LOCATION,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

/// Two counter-clockwise triangles spanning [-1, 1] x [-1, 1]
pub const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex::new(-1.0, -1.0),
    QuadVertex::new(1.0, -1.0),
    QuadVertex::new(1.0, 1.0),
    QuadVertex::new(-1.0, -1.0),
    QuadVertex::new(1.0, 1.0),
    QuadVertex::new(-1.0, 1.0),
];

pub const QUAD_VERTEX_COUNT: u32 = QUAD_VERTICES.len() as u32;
