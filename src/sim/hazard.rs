//! Lethal level elements: spikes, bombs and the explosions bombs leave behind

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;

/// Which way a spike strip points (render only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpikeFacing {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Permanently lethal
    Spike { facing: SpikeFacing },
    /// Lethal once, then detonates and disappears
    Bomb,
}

/// A spike strip or bomb placed in a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub rect: Rect,
    /// Bombs only: detonated and removed from play until the level resets
    #[serde(default)]
    pub triggered: bool,
}

impl Hazard {
    pub fn spike(rect: Rect, facing: SpikeFacing) -> Self {
        Self {
            kind: HazardKind::Spike { facing },
            rect,
            triggered: false,
        }
    }

    pub fn bomb(rect: Rect) -> Self {
        Self {
            kind: HazardKind::Bomb,
            rect,
            triggered: false,
        }
    }

    /// Whether this hazard still takes part in collision
    pub fn is_active(&self) -> bool {
        !self.triggered
    }

    /// Collision box; spikes are a little forgiving
    pub fn hitbox(&self) -> Rect {
        match self.kind {
            HazardKind::Spike { .. } => self.rect.inset(SPIKE_HITBOX_INSET),
            HazardKind::Bomb => self.rect,
        }
    }

    /// Detonate a bomb. Returns the explosion it spawns, or None if this is a
    /// spike or the bomb already went off.
    pub fn trigger(&mut self) -> Option<Explosion> {
        if self.kind != HazardKind::Bomb || self.triggered {
            return None;
        }
        self.triggered = true;
        Some(Explosion::at(self.rect.center()))
    }

    pub fn reset(&mut self) {
        self.triggered = false;
    }
}

/// Short-lived lethal blast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub rect: Rect,
    pub ticks_left: u32,
}

impl Explosion {
    pub fn at(center: Vec2) -> Self {
        Self {
            rect: Rect::centered_on(center, Vec2::splat(EXPLOSION_SIZE)),
            ticks_left: EXPLOSION_TICKS,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.ticks_left == 0
    }

    /// 1.0 when fresh, 0.0 when finished
    pub fn intensity(&self) -> f32 {
        self.ticks_left as f32 / EXPLOSION_TICKS as f32
    }

    pub fn update(&mut self) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
    }
}
