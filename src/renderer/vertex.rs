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

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.13, 0.36, 0.2, 1.0];
    pub const GRASS: [[f32; 4]; 6] = [
        [0.42, 0.72, 0.31, 1.0],
        [0.38, 0.68, 0.29, 1.0],
        [0.45, 0.75, 0.34, 1.0],
        [0.40, 0.70, 0.27, 1.0],
        [0.36, 0.66, 0.30, 1.0],
        [0.44, 0.73, 0.36, 1.0],
    ];
    pub const ROAD: [[f32; 4]; 2] = [[0.25, 0.25, 0.28, 1.0], [0.3, 0.3, 0.32, 1.0]];
    pub const ROAD_MARKING: [f32; 4] = [0.9, 0.9, 0.8, 1.0];
    pub const RIVER: [[f32; 4]; 2] = [[0.2, 0.45, 0.85, 1.0], [0.18, 0.5, 0.9, 1.0]];
    pub const CARS: [[f32; 4]; 8] = [
        [0.9, 0.2, 0.2, 1.0],
        [0.2, 0.5, 0.95, 1.0],
        [0.95, 0.8, 0.2, 1.0],
        [0.6, 0.3, 0.8, 1.0],
        [0.95, 0.55, 0.15, 1.0],
        [0.15, 0.75, 0.7, 1.0],
        [0.85, 0.85, 0.9, 1.0],
        [0.2, 0.2, 0.2, 1.0],
    ];
    pub const HEADLIGHT: [f32; 4] = [1.0, 1.0, 0.7, 1.0];
    pub const LOG: [f32; 4] = [0.5, 0.32, 0.16, 1.0];
    pub const LOG_END: [f32; 4] = [0.7, 0.5, 0.3, 1.0];
    pub const CRAB: [f32; 4] = [1.0, 0.42, 0.42, 1.0];
    pub const CRAB_EYE: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.55];
    pub const RETRY_FILL: [f32; 4] = [1.0, 0.71, 0.76, 1.0];
    pub const RETRY_BORDER: [f32; 4] = [1.0, 0.08, 0.58, 1.0];
}
