//! Ledge Runner - a ten-level arcade platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (body kinematics, collisions, level state)
//! - `levels`: Declarative level tables
//! - `scheduler`: Fixed-timestep loop decoupling logic ticks from rendering
//! - `renderer`: Projection of simulation state into a drawable scene
//! - `input`: Thread-safe held-key set sampled once per tick
//! - `settings`, `progress`: JSON-persisted preferences and best results

pub mod assets;
pub mod audio;
pub mod error;
pub mod input;
pub mod levels;
pub mod progress;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use error::{GeometryError, LevelError, PersistError, SchedulerError};
pub use progress::Progress;
pub use settings::Settings;

/// Game configuration constants
///
/// Kinematic values are expressed per tick, not per second.
pub mod consts {
    /// Logical simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum logic ticks per scheduler iteration to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real time a single scheduler iteration may account for (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Downward acceleration added to vy every tick
    pub const GRAVITY: f32 = 0.6;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = 15.0;
    /// Initial upward speed of a jump
    pub const JUMP_STRENGTH: f32 = 12.0;
    /// Horizontal speed while a direction is held
    pub const MOVE_SPEED: f32 = 5.0;

    /// Player bounding box
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const MAX_HEALTH: u32 = 3;

    /// Tolerance for the swept landing test (float drift while riding platforms)
    pub const LANDING_EPSILON: f32 = 1e-3;
    /// How far below the world a body may fall before it counts as lost
    pub const FALL_MARGIN: f32 = 100.0;

    /// Collectible star size
    pub const STAR_SIZE: f32 = 24.0;
    /// Spike hitboxes are shrunk by this much on every side
    pub const SPIKE_HITBOX_INSET: f32 = 4.0;
    /// Square explosion spawned by a triggered bomb
    pub const EXPLOSION_SIZE: f32 = 96.0;
    /// Explosion lifetime
    pub const EXPLOSION_TICKS: u32 = 30;

    /// Ticks after death before the death screen may be shown
    pub const DEATH_SCREEN_DELAY_TICKS: u32 = 45;
}
