//! Game state and core simulation types

use serde::{Deserialize, Serialize};

use super::effects::Effects;
use super::level::Level;
use super::progression::LevelProgression;
use crate::consts::DEATH_SCREEN_DELAY_TICKS;
use crate::error::LevelError;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Body died; waiting for a retry or reset
    Dead,
    /// Body reached the open door; waiting for the next level
    LevelComplete,
}

/// Discrete things that happened during a tick, in order
///
/// Levels are 1-based; star, checkpoint and bomb numbers index into the
/// level's collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    Landed,
    StarCollected { level: usize, star: usize },
    CheckpointActivated { level: usize, checkpoint: usize },
    BombTriggered { level: usize, bomb: usize },
    DoorOpened { level: usize },
    DoorClosed { level: usize },
    PlayerDied { level: usize },
    LevelCompleted { level: usize },
}

/// Per-attempt statistics for the live level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptStats {
    /// Ticks spent playing since the level was entered or reset
    pub ticks: u64,
    /// Deaths since the level was entered or reset
    pub deaths: u32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub progression: LevelProgression,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub attempt: AttemptStats,
    /// Visual particles and shake (not gameplay-affecting)
    pub effects: Effects,
    /// Events raised since the last drain
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(levels: Vec<Level>, seed: u64, max_particles: usize) -> Result<Self, LevelError> {
        Ok(Self {
            progression: LevelProgression::new(levels)?,
            phase: GamePhase::Playing,
            time_ticks: 0,
            attempt: AttemptStats::default(),
            effects: Effects::new(seed, max_particles),
            events: Vec::new(),
        })
    }

    /// 1-based index of the live level
    pub fn level_index(&self) -> usize {
        self.progression.current_index()
    }

    pub fn level(&self) -> &Level {
        self.progression.current_level()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every event raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The death screen may be shown once the body has been dead long enough
    pub fn death_screen_ready(&self) -> bool {
        self.phase == GamePhase::Dead
            && self.progression.body.death_ticks() >= DEATH_SCREEN_DELAY_TICKS
    }

    fn enter_level(&mut self) {
        self.phase = GamePhase::Playing;
        self.attempt = AttemptStats::default();
        self.effects.clear();
    }

    /// Retry after death: body back at the respawn point, progress kept
    pub fn retry(&mut self) {
        self.progression.repeat_level();
        self.phase = GamePhase::Playing;
    }

    /// Start the live level over from scratch
    pub fn reset_level(&mut self) {
        self.progression.reset_current_level();
        self.enter_level();
    }

    pub fn next_level(&mut self) {
        self.progression.next_level();
        self.enter_level();
    }

    pub fn select_level(&mut self, index: usize) -> Result<(), LevelError> {
        self.progression.select_level(index)?;
        self.enter_level();
        Ok(())
    }
}
