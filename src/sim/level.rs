//! Level geometry and per-attempt level state

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::hazard::{Explosion, Hazard};
use super::platform::{MovingPlatform, Platform};
use super::rect::Rect;
use crate::consts::STAR_SIZE;

/// A collectible star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub rect: Rect,
    pub collected: bool,
}

impl Star {
    /// Star whose top-left corner is at `pos`
    pub fn at(pos: Vec2) -> Self {
        Self {
            rect: Rect::from_pos_size(pos, Vec2::splat(STAR_SIZE)),
            collected: false,
        }
    }

    /// Mark collected. Returns true on the first pickup only.
    pub fn collect(&mut self) -> bool {
        !std::mem::replace(&mut self.collected, true)
    }
}

/// A flag that moves the respawn point once touched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub rect: Rect,
    /// Top-left corner the body respawns at after activation
    pub spawn: Vec2,
    pub activated: bool,
}

impl Checkpoint {
    pub fn new(rect: Rect, spawn: Vec2) -> Self {
        Self {
            rect,
            spawn,
            activated: false,
        }
    }

    /// Returns true on the first activation only
    pub fn activate(&mut self) -> bool {
        !std::mem::replace(&mut self.activated, true)
    }
}

/// The level exit, open once enough stars are collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Door {
    pub rect: Rect,
    open: bool,
}

impl Door {
    pub fn new(rect: Rect) -> Self {
        Self { rect, open: false }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Recompute the open state. Returns the new state if it changed.
    pub fn refresh(&mut self, collected: usize, required: usize) -> Option<bool> {
        let open = collected >= required;
        if open == self.open {
            return None;
        }
        self.open = open;
        Some(open)
    }
}

/// One level: geometry plus the state of the current attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// World width and height; falling past the bottom kills
    pub world: Vec2,
    /// Default spawn (top-left corner of the body)
    pub spawn: Vec2,
    pub required_stars: usize,
    pub platforms: Vec<Platform>,
    pub moving_platforms: Vec<MovingPlatform>,
    pub hazards: Vec<Hazard>,
    pub explosions: Vec<Explosion>,
    pub stars: Vec<Star>,
    pub checkpoints: Vec<Checkpoint>,
    pub door: Door,
    /// Body overlapped the open door on the last resolved tick
    pub completed: bool,
    /// Respawn point, overridden by the most recent checkpoint
    effective_spawn: Vec2,
}

impl Level {
    /// Empty level with no star requirement, so the door starts open
    pub fn new(name: impl Into<String>, world: Vec2, spawn: Vec2, mut door: Door) -> Self {
        door.refresh(0, 0);
        Self {
            name: name.into(),
            world,
            spawn,
            required_stars: 0,
            platforms: Vec::new(),
            moving_platforms: Vec::new(),
            hazards: Vec::new(),
            explosions: Vec::new(),
            stars: Vec::new(),
            checkpoints: Vec::new(),
            door,
            completed: false,
            effective_spawn: spawn,
        }
    }

    /// Change the star requirement, bringing the door in line without an event
    pub fn set_required_stars(&mut self, required: usize) {
        self.required_stars = required;
        self.door.refresh(self.collected_stars(), required);
    }

    /// Where a retry puts the body
    pub fn effective_spawn(&self) -> Vec2 {
        self.effective_spawn
    }

    pub fn collected_stars(&self) -> usize {
        self.stars.iter().filter(|s| s.collected).count()
    }

    /// Activate checkpoint `index`, moving the respawn point.
    /// Returns true on the first activation only.
    pub fn activate_checkpoint(&mut self, index: usize) -> bool {
        let Some(checkpoint) = self.checkpoints.get_mut(index) else {
            return false;
        };
        if !checkpoint.activate() {
            return false;
        }
        self.effective_spawn = checkpoint.spawn;
        true
    }

    /// Advance moving platforms and age explosions
    pub fn update_geometry(&mut self) {
        for platform in &mut self.moving_platforms {
            platform.update();
        }
        for explosion in &mut self.explosions {
            explosion.update();
        }
        self.explosions.retain(|e| !e.is_finished());
    }

    /// Start the level over: stars, checkpoints, bombs, door and platform phase
    pub fn reset(&mut self) {
        for star in &mut self.stars {
            star.collected = false;
        }
        for checkpoint in &mut self.checkpoints {
            checkpoint.activated = false;
        }
        for hazard in &mut self.hazards {
            hazard.reset();
        }
        for platform in &mut self.moving_platforms {
            platform.reset();
        }
        self.explosions.clear();
        self.door.refresh(0, self.required_stars);
        self.completed = false;
        self.effective_spawn = self.spawn;
    }
}
