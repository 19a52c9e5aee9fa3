//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// 0xRRGGBB to RGBA floats
pub fn rgb(hex: u32) -> [f32; 4] {
    rgba(hex, 1.0)
}

pub fn rgba(hex: u32, alpha: f32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
        alpha,
    ]
}

/// Colors for game elements
pub mod colors {
    pub const PADDLE: [f32; 4] = [0.0, 0.584, 0.867, 1.0]; // #0095DD
    pub const BALL: [f32; 4] = [0.0, 0.584, 0.867, 1.0];
    pub const BLASTER: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const LASER: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const BLOCK_OUTLINE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const CRACK: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const DEBRIS: [f32; 4] = [1.0, 1.0, 1.0, 0.7];
    pub const DAMAGE_SHADE: [f32; 4] = [0.0, 0.0, 0.0, 0.2];
    pub const POWERUP_BLASTERS: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const POWERUP_SMALL: [f32; 4] = [1.0, 0.6, 0.0, 1.0];
    pub const POWERUP_BIG: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const POWERUP_OUTLINE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    /// Dims the playfield once a run has ended
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
    pub const BACKGROUND: [f32; 4] = [0.933, 0.933, 0.933, 1.0];
}
