//! Per-level best results
//!
//! Shown on the victory screen and persisted as JSON between sessions.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::sim::AttemptStats;

/// Best results for one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Fewest ticks taken to finish
    pub best_ticks: Option<u64>,
    /// Most stars held when finishing
    pub most_stars: usize,
    /// Fewest deaths in a finishing attempt
    pub fewest_deaths: Option<u32>,
    pub completions: u32,
}

/// What a completion improved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Improvement {
    pub first_clear: bool,
    pub faster: bool,
    pub more_stars: bool,
}

/// Records keyed by 1-based level index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub levels: BTreeMap<usize, LevelRecord>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, level: usize) -> Option<&LevelRecord> {
        self.levels.get(&level)
    }

    /// Number of distinct levels finished at least once
    pub fn cleared(&self) -> usize {
        self.levels.values().filter(|r| r.completions > 0).count()
    }

    /// Fold one finished attempt into the level's record
    pub fn record_completion(
        &mut self,
        level: usize,
        attempt: AttemptStats,
        stars: usize,
    ) -> Improvement {
        let record = self.levels.entry(level).or_default();
        let improvement = Improvement {
            first_clear: record.completions == 0,
            faster: record.best_ticks.is_none_or(|best| attempt.ticks < best),
            more_stars: stars > record.most_stars,
        };

        record.completions += 1;
        if improvement.faster {
            record.best_ticks = Some(attempt.ticks);
        }
        record.most_stars = record.most_stars.max(stars);
        record.fewest_deaths = Some(
            record
                .fewest_deaths
                .map_or(attempt.deaths, |d| d.min(attempt.deaths)),
        );

        improvement
    }

    pub fn try_load_from(path: &Path) -> Result<Self, PersistError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Read progress from `path`, starting fresh if it is missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(progress) => {
                log::info!("Loaded progress for {} levels", progress.levels.len());
                progress
            }
            Err(PersistError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No progress found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable progress {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Progress saved ({} levels)", self.levels.len());
        Ok(())
    }
}
