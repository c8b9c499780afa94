//! Static and moving platforms
//!
//! Platforms are one-way: a body only collides with the top edge, and only
//! while falling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::error::GeometryError;

/// Surface look of a platform (no physical effect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformMaterial {
    #[default]
    Grass,
    Stone,
    Wood,
    Metal,
    Ice,
}

/// A platform that never moves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub rect: Rect,
    #[serde(default)]
    pub material: PlatformMaterial,
}

impl Platform {
    pub fn new(rect: Rect, material: PlatformMaterial) -> Self {
        Self { rect, material }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.rect.top()
    }
}

/// A platform shuttling back and forth between two points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingPlatform {
    pub size: Vec2,
    pub start: Vec2,
    pub end: Vec2,
    /// Distance covered per tick
    pub speed: f32,
    pub material: PlatformMaterial,
    /// Current top-left corner, always on the start..end segment
    pos: Vec2,
    /// Heading toward `end` when true
    forward: bool,
    /// Displacement applied by the last `update`
    last_delta: Vec2,
}

impl MovingPlatform {
    pub fn new(
        size: Vec2,
        start: Vec2,
        end: Vec2,
        speed: f32,
        material: PlatformMaterial,
    ) -> Result<Self, GeometryError> {
        Rect::from_pos_size(start, size).validated()?;
        if !end.is_finite() {
            return Err(GeometryError::NonFinitePosition { x: end.x, y: end.y });
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(GeometryError::InvalidSpeed(speed));
        }
        Ok(Self {
            size,
            start,
            end,
            speed,
            material,
            pos: start,
            forward: true,
            last_delta: Vec2::ZERO,
        })
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn is_moving_forward(&self) -> bool {
        self.forward
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    /// Top edge before the last `update`
    pub fn previous_top(&self) -> f32 {
        self.pos.y - self.last_delta.y
    }

    /// Where the next `update` will leave the platform, and whether it arrives
    fn next_step(&self) -> (Vec2, bool) {
        let target = if self.forward { self.end } else { self.start };
        let to_target = target - self.pos;
        let distance = to_target.length();
        if distance <= self.speed {
            (target, true)
        } else {
            (self.pos + to_target / distance * self.speed, false)
        }
    }

    /// Displacement the platform applies this tick
    ///
    /// Resolution runs before `update`, so a body landing this tick is carried
    /// by exactly the amount the platform is about to move.
    pub fn displacement(&self) -> Vec2 {
        self.next_step().0 - self.pos
    }

    /// Advance one tick toward the current endpoint, reversing on arrival
    pub fn update(&mut self) {
        let (next, arrived) = self.next_step();
        self.last_delta = next - self.pos;
        self.pos = next;
        if arrived {
            self.forward = !self.forward;
        }
    }

    /// Restore the initial phase
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.forward = true;
        self.last_delta = Vec2::ZERO;
    }
}
