//! Sound cues derived from simulation events
//!
//! The core only decides *which* cue plays and how loud. Playback goes
//! through a [`SoundBackend`]; a cue whose sound was never loaded is skipped.

use crate::assets::{AssetProvider, SoundHandle};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Jump,
    Land,
    /// Star picked up
    Star,
    Checkpoint,
    /// Bomb went off
    Explosion,
    DoorOpen,
    DoorClose,
    Death,
    LevelComplete,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 9] = [
        SoundEffect::Jump,
        SoundEffect::Land,
        SoundEffect::Star,
        SoundEffect::Checkpoint,
        SoundEffect::Explosion,
        SoundEffect::DoorOpen,
        SoundEffect::DoorClose,
        SoundEffect::Death,
        SoundEffect::LevelComplete,
    ];

    /// Asset name used to look the sound up
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Jump => "jump",
            SoundEffect::Land => "land",
            SoundEffect::Star => "star",
            SoundEffect::Checkpoint => "checkpoint",
            SoundEffect::Explosion => "explosion",
            SoundEffect::DoorOpen => "door_open",
            SoundEffect::DoorClose => "door_close",
            SoundEffect::Death => "death",
            SoundEffect::LevelComplete => "level_complete",
        }
    }

    /// Relative loudness of the cue
    fn gain(&self) -> f32 {
        match self {
            SoundEffect::Land => 0.5,
            SoundEffect::Jump | SoundEffect::DoorClose => 0.7,
            SoundEffect::Explosion | SoundEffect::LevelComplete => 1.0,
            _ => 0.85,
        }
    }

    pub fn for_event(event: &GameEvent) -> Option<Self> {
        Some(match event {
            GameEvent::Jumped => SoundEffect::Jump,
            GameEvent::Landed => SoundEffect::Land,
            GameEvent::StarCollected { .. } => SoundEffect::Star,
            GameEvent::CheckpointActivated { .. } => SoundEffect::Checkpoint,
            GameEvent::BombTriggered { .. } => SoundEffect::Explosion,
            GameEvent::DoorOpened { .. } => SoundEffect::DoorOpen,
            GameEvent::DoorClosed { .. } => SoundEffect::DoorClose,
            GameEvent::PlayerDied { .. } => SoundEffect::Death,
            GameEvent::LevelCompleted { .. } => SoundEffect::LevelComplete,
        })
    }
}

/// Something that can actually make noise
pub trait SoundBackend {
    fn play(&mut self, sound: SoundHandle, volume: f32);
}

/// Backend that only logs what it would have played
#[derive(Debug, Default)]
pub struct LogBackend;

impl SoundBackend for LogBackend {
    fn play(&mut self, sound: SoundHandle, volume: f32) {
        log::debug!("play sound {:?} at {:.2}", sound, volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<B: SoundBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: SoundBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect; returns false if nothing was played
    pub fn play(&mut self, effect: SoundEffect, assets: &dyn AssetProvider) -> bool {
        let vol = self.effective_volume() * effect.gain();
        if vol <= 0.0 {
            return false;
        }
        let Some(handle) = assets.sound(effect.asset_name()) else {
            return false;
        };
        self.backend.play(handle, vol);
        true
    }

    /// Play the cue for each event that has one
    pub fn handle_events(&mut self, events: &[GameEvent], assets: &dyn AssetProvider) {
        for event in events {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.play(effect, assets);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetCatalog, NullAssets};

    #[derive(Default)]
    struct Recorder {
        played: Vec<(SoundHandle, f32)>,
    }

    impl SoundBackend for Recorder {
        fn play(&mut self, sound: SoundHandle, volume: f32) {
            self.played.push((sound, volume));
        }
    }

    fn catalog() -> AssetCatalog {
        let mut catalog = AssetCatalog::new();
        for effect in SoundEffect::ALL {
            catalog.register_sound(effect.asset_name());
        }
        catalog
    }

    #[test]
    fn test_every_event_has_a_cue() {
        let events = [
            GameEvent::Jumped,
            GameEvent::Landed,
            GameEvent::StarCollected { level: 1, star: 0 },
            GameEvent::CheckpointActivated { level: 1, checkpoint: 0 },
            GameEvent::BombTriggered { level: 1, bomb: 0 },
            GameEvent::DoorOpened { level: 1 },
            GameEvent::DoorClosed { level: 1 },
            GameEvent::PlayerDied { level: 1 },
            GameEvent::LevelCompleted { level: 1 },
        ];
        let mut audio = AudioManager::new(Recorder::default());
        audio.handle_events(&events, &catalog());
        assert_eq!(audio.backend().played.len(), events.len());
    }

    #[test]
    fn test_missing_sound_is_silent() {
        let mut audio = AudioManager::new(Recorder::default());
        assert!(!audio.play(SoundEffect::Jump, &NullAssets));
        assert!(audio.backend().played.is_empty());
    }

    #[test]
    fn test_mute_and_volume() {
        let assets = catalog();
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(0.5);
        assert!(audio.play(SoundEffect::Explosion, &assets));
        assert!((audio.backend().played[0].1 - 0.5).abs() < 1e-6);

        audio.apply_settings(&Settings {
            muted: true,
            ..Default::default()
        });
        assert!(!audio.play(SoundEffect::Explosion, &assets));
        assert_eq!(audio.backend().played.len(), 1);
    }
}
