//! Declarative level tables
//!
//! Each level is a JSON record of platforms, moving platforms, hazards,
//! stars, checkpoints and a door. The ten built-in levels are embedded at
//! compile time; a directory of `*.json` files can replace them at runtime.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::error::{GeometryError, LevelError};
use crate::sim::{
    Checkpoint, Door, Hazard, Level, MovingPlatform, Platform, PlatformMaterial, Rect,
    SpikeFacing, Star,
};

/// Built-in level tables, in play order
const BUILTIN: [(&str, &str); 10] = [
    ("level01", include_str!("../../assets/levels/level01.json")),
    ("level02", include_str!("../../assets/levels/level02.json")),
    ("level03", include_str!("../../assets/levels/level03.json")),
    ("level04", include_str!("../../assets/levels/level04.json")),
    ("level05", include_str!("../../assets/levels/level05.json")),
    ("level06", include_str!("../../assets/levels/level06.json")),
    ("level07", include_str!("../../assets/levels/level07.json")),
    ("level08", include_str!("../../assets/levels/level08.json")),
    ("level09", include_str!("../../assets/levels/level09.json")),
    ("level10", include_str!("../../assets/levels/level10.json")),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformDef {
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub material: PlatformMaterial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovingPlatformDef {
    #[serde(rename = "w")]
    pub width: f32,
    #[serde(rename = "h")]
    pub height: f32,
    pub from: Vec2,
    pub to: Vec2,
    pub speed: f32,
    #[serde(default)]
    pub material: PlatformMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardType {
    Spike,
    Bomb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardDef {
    pub kind: HazardType,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(default)]
    pub facing: SpikeFacing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointDef {
    #[serde(flatten)]
    pub rect: Rect,
    pub spawn: Vec2,
}

/// One level as written in its table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    pub world: Vec2,
    pub spawn: Vec2,
    pub required_stars: usize,
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
    #[serde(default)]
    pub moving_platforms: Vec<MovingPlatformDef>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    /// Top-left corners of the stars
    #[serde(default)]
    pub stars: Vec<Vec2>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointDef>,
    pub door: Rect,
}

fn spawn_in_world(spawn: Vec2, world: Vec2) -> bool {
    spawn.is_finite()
        && (0.0..=world.x - PLAYER_WIDTH).contains(&spawn.x)
        && (0.0..=world.y - PLAYER_HEIGHT).contains(&spawn.y)
}

impl LevelDef {
    fn build_geometry(&self) -> Result<Level, GeometryError> {
        Rect::new(0.0, 0.0, self.world.x, self.world.y).validated()?;

        let mut level = Level::new(
            self.name.clone(),
            self.world,
            self.spawn,
            Door::new(self.door.validated()?),
        );
        level.set_required_stars(self.required_stars);

        for def in &self.platforms {
            level
                .platforms
                .push(Platform::new(def.rect.validated()?, def.material));
        }
        for def in &self.moving_platforms {
            level.moving_platforms.push(MovingPlatform::new(
                Vec2::new(def.width, def.height),
                def.from,
                def.to,
                def.speed,
                def.material,
            )?);
        }
        for def in &self.hazards {
            let rect = def.rect.validated()?;
            level.hazards.push(match def.kind {
                HazardType::Spike => Hazard::spike(rect, def.facing),
                HazardType::Bomb => Hazard::bomb(rect),
            });
        }
        for &pos in &self.stars {
            let star = Star::at(pos);
            star.rect.validated()?;
            level.stars.push(star);
        }
        for def in &self.checkpoints {
            level
                .checkpoints
                .push(Checkpoint::new(def.rect.validated()?, def.spawn));
        }
        Ok(level)
    }

    /// Validate and turn the table into a playable level
    pub fn build(&self) -> Result<Level, LevelError> {
        let level = self.build_geometry().map_err(|source| LevelError::Geometry {
            name: self.name.clone(),
            source,
        })?;

        if self.required_stars > self.stars.len() {
            return Err(LevelError::UnreachableDoor {
                name: self.name.clone(),
                required: self.required_stars,
                available: self.stars.len(),
            });
        }
        let spawns_ok = spawn_in_world(self.spawn, self.world)
            && self
                .checkpoints
                .iter()
                .all(|c| spawn_in_world(c.spawn, self.world));
        if !spawns_ok {
            return Err(LevelError::SpawnOutOfBounds {
                name: self.name.clone(),
            });
        }

        Ok(level)
    }
}

/// Parse and build a single level table
pub fn parse_level(name: &str, json: &str) -> Result<Level, LevelError> {
    let def: LevelDef = serde_json::from_str(json).map_err(|source| LevelError::Parse {
        name: name.to_string(),
        source,
    })?;
    def.build()
}

/// The ten built-in levels
pub fn builtin_levels() -> Result<Vec<Level>, LevelError> {
    BUILTIN
        .iter()
        .map(|(name, json)| parse_level(name, json))
        .collect()
}

/// Load every `*.json` table in a directory, ordered by file name
pub fn load_dir(dir: &Path) -> Result<Vec<Level>, LevelError> {
    let io_err = |source| LevelError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut levels = Vec::with_capacity(paths.len());
    for path in paths {
        let json = std::fs::read_to_string(&path).map_err(|source| LevelError::Io {
            path: path.clone(),
            source,
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        levels.push(parse_level(&name, &json)?);
    }

    if levels.is_empty() {
        return Err(LevelError::Empty);
    }
    log::info!("Loaded {} levels from {}", levels.len(), dir.display());
    Ok(levels)
}
