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

    /// Byte stride of one vertex in an upload buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Raw bytes of a vertex slice, ready for a GPU upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.53, 0.75, 0.92, 1.0];
    pub const PLAYER: [f32; 4] = [0.95, 0.35, 0.25, 1.0];
    pub const PLAYER_DEAD: [f32; 4] = [0.4, 0.4, 0.45, 1.0];
    pub const GRASS: [f32; 4] = [0.3, 0.7, 0.3, 1.0];
    pub const STONE: [f32; 4] = [0.5, 0.5, 0.55, 1.0];
    pub const WOOD: [f32; 4] = [0.6, 0.4, 0.2, 1.0];
    pub const METAL: [f32; 4] = [0.7, 0.72, 0.78, 1.0];
    pub const ICE: [f32; 4] = [0.7, 0.9, 1.0, 1.0];
    pub const SPIKE: [f32; 4] = [0.8, 0.8, 0.85, 1.0];
    pub const BOMB: [f32; 4] = [0.1, 0.1, 0.12, 1.0];
    pub const EXPLOSION: [f32; 4] = [1.0, 0.55, 0.1, 1.0];
    pub const STAR: [f32; 4] = [1.0, 0.85, 0.2, 1.0];
    pub const CHECKPOINT: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
    pub const CHECKPOINT_ACTIVE: [f32; 4] = [0.2, 0.9, 0.4, 1.0];
    pub const DOOR_CLOSED: [f32; 4] = [0.45, 0.25, 0.15, 1.0];
    pub const DOOR_OPEN: [f32; 4] = [0.95, 0.9, 0.6, 1.0];
    pub const DUST: [f32; 4] = [0.85, 0.8, 0.7, 1.0];
    pub const SPARKLE: [f32; 4] = [1.0, 1.0, 0.6, 1.0];
    pub const DEBRIS: [f32; 4] = [0.35, 0.3, 0.3, 1.0];
    pub const HITBOX: [f32; 4] = [1.0, 0.0, 1.0, 0.8];
}
