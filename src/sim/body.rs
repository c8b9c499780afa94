//! The player's kinematic body
//!
//! Velocities are per tick. Horizontal speed has no acceleration curve: it is
//! always one of `-MOVE_SPEED`, `0` or `MOVE_SPEED`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Position/velocity state of the player avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    alive: bool,
    /// Ticks elapsed since the last death
    death_ticks: u32,
    /// Lifetime death statistic, survives `reset`
    death_count: u32,
    health: u32,
    /// Position before the last `integrate`
    start: Vec2,
}

impl KinematicBody {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            grounded: false,
            alive: true,
            death_ticks: 0,
            death_count: 0,
            health: MAX_HEALTH,
            start: Vec2::new(x, y),
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn death_count(&self) -> u32 {
        self.death_count
    }

    pub fn death_ticks(&self) -> u32 {
        self.death_ticks
    }

    /// Net displacement this tick, including clamping, landing and carry
    pub fn last_step(&self) -> Vec2 {
        self.pos - self.start
    }

    pub fn apply_gravity(&mut self) {
        if !self.alive {
            return;
        }
        self.vel.y = (self.vel.y + GRAVITY).min(MAX_FALL_SPEED);
    }

    pub fn move_left(&mut self) {
        if self.alive {
            self.vel.x = -MOVE_SPEED;
        }
    }

    pub fn move_right(&mut self) {
        if self.alive {
            self.vel.x = MOVE_SPEED;
        }
    }

    pub fn stop_moving(&mut self) {
        if self.alive {
            self.vel.x = 0.0;
        }
    }

    /// Start a jump from the ground. Returns true if the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.grounded || !self.alive {
            return false;
        }
        self.vel.y = -JUMP_STRENGTH;
        self.grounded = false;
        true
    }

    /// Apply velocity to position
    pub fn integrate(&mut self) {
        self.start = self.pos;
        self.pos += self.vel;
    }

    /// Push the body back out of a solid it moved into this tick
    ///
    /// Only the axis whose motion caused the overlap is undone. Coming down
    /// onto the solid stands the body on it; coming up stops the rise. A body
    /// that started the tick inside the solid is left free to walk out.
    pub fn block_against(&mut self, solid: &Rect) {
        let start = Rect::from_pos_size(self.start, self.size);
        if !self.rect().intersects(solid) || start.intersects(solid) {
            return;
        }

        if start.overlaps_y(solid) {
            self.pos.x = if self.pos.x > self.start.x {
                solid.left() - self.size.x
            } else {
                solid.right()
            };
        } else if self.pos.y > self.start.y {
            self.pos.y = solid.top() - self.size.y;
            self.vel.y = 0.0;
            self.grounded = true;
        } else {
            self.pos.y = solid.bottom();
            self.vel.y = 0.0;
        }
    }

    /// Lose health; reaching zero kills the body once
    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.die();
        }
    }

    /// Kill the body. Returns true only on the alive -> dead transition.
    pub fn die(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.death_count += 1;
        self.death_ticks = 0;
        self.vel = Vec2::ZERO;
        self.grounded = false;
        true
    }

    /// Advance the time-since-death counter (no-op while alive)
    pub fn tick_death_timer(&mut self) {
        if !self.alive {
            self.death_ticks = self.death_ticks.saturating_add(1);
        }
    }

    /// Full revival at a new position. The death count is kept.
    pub fn reset(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
        self.vel = Vec2::ZERO;
        self.grounded = false;
        self.alive = true;
        self.death_ticks = 0;
        self.health = MAX_HEALTH;
        self.start = self.pos;
    }
}
