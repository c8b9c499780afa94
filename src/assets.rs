//! Asset handles looked up by name
//!
//! The core never loads files. A presentation layer registers whatever it
//! managed to load; anything missing comes back as `None` and the renderer
//! and audio fall back to placeholder shapes or silence.

use std::collections::HashMap;

/// Opaque handle to a loaded sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub u32);

/// Opaque handle to a loaded sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Source of sprite and sound handles
pub trait AssetProvider {
    fn sprite(&self, name: &str) -> Option<SpriteHandle>;
    fn sound(&self, name: &str) -> Option<SoundHandle>;
}

/// Provider with nothing loaded
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAssets;

impl AssetProvider for NullAssets {
    fn sprite(&self, _name: &str) -> Option<SpriteHandle> {
        None
    }

    fn sound(&self, _name: &str) -> Option<SoundHandle> {
        None
    }
}

/// Name to handle tables filled in by the presentation layer
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    sprites: HashMap<String, SpriteHandle>,
    sounds: HashMap<String, SoundHandle>,
    next_id: u32,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Register a sprite; re-registering a name keeps its handle
    pub fn register_sprite(&mut self, name: &str) -> SpriteHandle {
        if let Some(&handle) = self.sprites.get(name) {
            return handle;
        }
        let handle = SpriteHandle(self.allocate());
        self.sprites.insert(name.to_string(), handle);
        handle
    }

    /// Register a sound; re-registering a name keeps its handle
    pub fn register_sound(&mut self, name: &str) -> SoundHandle {
        if let Some(&handle) = self.sounds.get(name) {
            return handle;
        }
        let handle = SoundHandle(self.allocate());
        self.sounds.insert(name.to_string(), handle);
        handle
    }

    pub fn len(&self) -> usize {
        self.sprites.len() + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetProvider for AssetCatalog {
    fn sprite(&self, name: &str) -> Option<SpriteHandle> {
        let handle = self.sprites.get(name).copied();
        if handle.is_none() {
            log::trace!("Missing sprite `{}`", name);
        }
        handle
    }

    fn sound(&self, name: &str) -> Option<SoundHandle> {
        let handle = self.sounds.get(name).copied();
        if handle.is_none() {
            log::trace!("Missing sound `{}`", name);
        }
        handle
    }
}
