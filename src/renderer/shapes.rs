//! Shape generation for 2D primitives
//!
//! Every shape is emitted as a triangle list in world coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::{Rect, SpikeFacing};

/// Generate vertices for a filled rectangle
pub fn quad(rect: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    vec![
        Vertex::new(l, t, color),
        Vertex::new(r, t, color),
        Vertex::new(l, b, color),
        Vertex::new(l, b, color),
        Vertex::new(r, t, color),
        Vertex::new(r, b, color),
    ]
}

/// Generate vertices for a hollow rectangle with edges `thickness` wide
pub fn rect_outline(rect: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(rect.width / 2.0).min(rect.height / 2.0);
    let edges = [
        Rect::new(rect.x, rect.y, rect.width, t),
        Rect::new(rect.x, rect.bottom() - t, rect.width, t),
        Rect::new(rect.x, rect.y + t, t, rect.height - 2.0 * t),
        Rect::new(rect.right() - t, rect.y + t, t, rect.height - 2.0 * t),
    ];
    edges.iter().flat_map(|edge| quad(edge, color)).collect()
}

/// Generate vertices for a row of spike teeth filling `rect`
///
/// Teeth point in the facing direction; tooth count follows the long edge.
pub fn spikes(rect: &Rect, facing: SpikeFacing, color: [f32; 4]) -> Vec<Vertex> {
    let horizontal = matches!(facing, SpikeFacing::Up | SpikeFacing::Down);
    let (along, across) = if horizontal {
        (rect.width, rect.height)
    } else {
        (rect.height, rect.width)
    };
    let teeth = ((along / across.max(1.0)).round() as usize).max(1);
    let step = along / teeth as f32;

    let mut vertices = Vec::with_capacity(teeth * 3);
    for i in 0..teeth {
        let a = i as f32 * step;
        let b = a + step;
        let mid = a + step / 2.0;
        let corners = match facing {
            SpikeFacing::Up => [
                (rect.x + a, rect.bottom()),
                (rect.x + b, rect.bottom()),
                (rect.x + mid, rect.top()),
            ],
            SpikeFacing::Down => [
                (rect.x + a, rect.top()),
                (rect.x + b, rect.top()),
                (rect.x + mid, rect.bottom()),
            ],
            SpikeFacing::Left => [
                (rect.right(), rect.y + a),
                (rect.right(), rect.y + b),
                (rect.left(), rect.y + mid),
            ],
            SpikeFacing::Right => [
                (rect.left(), rect.y + a),
                (rect.left(), rect.y + b),
                (rect.right(), rect.y + mid),
            ],
        };
        for (x, y) in corners {
            vertices.push(Vertex::new(x, y, color));
        }
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a five-pointed star
pub fn star(center: Vec2, outer_radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let inner_radius = outer_radius * 0.45;
    let point = |i: usize| {
        let r = if i % 2 == 0 { outer_radius } else { inner_radius };
        // Start pointing up (+y is down)
        let theta = -PI / 2.0 + i as f32 * PI / 5.0;
        center + Vec2::new(r * theta.cos(), r * theta.sin())
    };

    let mut vertices = Vec::with_capacity(30);
    for i in 0..10 {
        let a = point(i);
        let b = point(i + 1);
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}
