//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (and only for effects)
//! - Stable iteration order (collection order decides collision ties)
//! - No rendering, platform or I/O dependencies

pub mod body;
pub mod collision;
pub mod effects;
pub mod hazard;
pub mod level;
pub mod platform;
pub mod progression;
pub mod rect;
pub mod state;
pub mod tick;

pub use body::KinematicBody;
pub use collision::{Landing, ResolveReport, resolve};
pub use effects::{Effects, Particle, ParticleKind};
pub use hazard::{Explosion, Hazard, HazardKind, SpikeFacing};
pub use level::{Checkpoint, Door, Level, Star};
pub use platform::{MovingPlatform, Platform, PlatformMaterial};
pub use progression::LevelProgression;
pub use rect::Rect;
pub use state::{AttemptStats, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
