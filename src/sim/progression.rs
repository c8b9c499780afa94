//! Level progression: which level is live and where the body respawns
//!
//! Levels are numbered from 1. Advancing past the last level wraps to the
//! first. Each level keeps its own attempt state when left behind.

use super::body::KinematicBody;
use super::level::Level;
use crate::error::LevelError;

/// Owns every level and the single player body
#[derive(Debug, Clone)]
pub struct LevelProgression {
    levels: Vec<Level>,
    /// 1-based index of the live level
    current: usize,
    pub body: KinematicBody,
}

impl LevelProgression {
    /// Start at level 1 with the body at its spawn
    pub fn new(levels: Vec<Level>) -> Result<Self, LevelError> {
        let first = levels.first().ok_or(LevelError::Empty)?;
        let spawn = first.effective_spawn();
        Ok(Self {
            levels,
            current: 1,
            body: KinematicBody::new(spawn.x, spawn.y),
        })
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// 1-based index of the live level
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn current_level(&self) -> &Level {
        &self.levels[self.current - 1]
    }

    pub fn current_level_mut(&mut self) -> &mut Level {
        &mut self.levels[self.current - 1]
    }

    /// Borrow the body and the live level together for resolution
    pub fn split_mut(&mut self) -> (&mut KinematicBody, &mut Level) {
        (&mut self.body, &mut self.levels[self.current - 1])
    }

    fn respawn_at_effective_spawn(&mut self) {
        let spawn = self.current_level().effective_spawn();
        self.body.reset(spawn.x, spawn.y);
    }

    /// Advance to the next level, wrapping after the last
    pub fn next_level(&mut self) {
        let left = self.current;
        self.current = if self.current >= self.levels.len() {
            1
        } else {
            self.current + 1
        };
        self.respawn_at_effective_spawn();
        log::info!("Level {} -> {}", left, self.current);
    }

    /// Jump straight to a level (level select)
    pub fn select_level(&mut self, index: usize) -> Result<(), LevelError> {
        if index == 0 || index > self.levels.len() {
            return Err(LevelError::NoSuchLevel {
                index,
                count: self.levels.len(),
            });
        }
        self.current = index;
        self.respawn_at_effective_spawn();
        log::info!("Selected level {}", index);
        Ok(())
    }

    /// Start the live level over and put the body at its original spawn
    pub fn reset_current_level(&mut self) {
        self.current_level_mut().reset();
        let spawn = self.current_level().spawn;
        self.body.reset(spawn.x, spawn.y);
        log::info!("Level {} reset", self.current);
    }

    /// Revive the body at the respawn point, keeping stars and checkpoints
    pub fn repeat_level(&mut self) {
        self.respawn_at_effective_spawn();
        log::debug!("Retrying level {}", self.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{Checkpoint, Door, Star};
    use crate::sim::rect::Rect;
    use glam::Vec2;

    fn level(name: &str, spawn_x: f32) -> Level {
        let mut level = Level::new(
            name,
            Vec2::new(800.0, 600.0),
            Vec2::new(spawn_x, 450.0),
            Door::new(Rect::new(740.0, 490.0, 40.0, 60.0)),
        );
        level.stars.push(Star::at(Vec2::new(300.0, 300.0)));
        level.checkpoints.push(Checkpoint::new(
            Rect::new(400.0, 450.0, 20.0, 50.0),
            Vec2::new(400.0, 400.0),
        ));
        level
    }

    fn progression(count: usize) -> LevelProgression {
        let levels = (0..count)
            .map(|i| level(&format!("L{}", i + 1), 10.0 * (i + 1) as f32))
            .collect();
        LevelProgression::new(levels).unwrap()
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(matches!(
            LevelProgression::new(Vec::new()),
            Err(LevelError::Empty)
        ));
    }

    #[test]
    fn test_starts_at_first_spawn() {
        let p = progression(3);
        assert_eq!(p.current_index(), 1);
        assert_eq!(p.body.pos, Vec2::new(10.0, 450.0));
    }

    #[test]
    fn test_next_level_wraps() {
        let mut p = progression(10);
        for expected in 2..=10 {
            p.next_level();
            assert_eq!(p.current_index(), expected);
        }
        p.next_level();
        assert_eq!(p.current_index(), 1);
        assert_eq!(p.body.pos, Vec2::new(10.0, 450.0));
    }

    #[test]
    fn test_next_level_uses_checkpoint_spawn() {
        let mut p = progression(2);
        p.levels[1].activate_checkpoint(0);
        p.next_level();
        assert_eq!(p.body.pos, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_left_level_keeps_state() {
        let mut p = progression(2);
        p.current_level_mut().stars[0].collect();
        p.next_level();
        p.next_level();
        assert_eq!(p.current_index(), 1);
        assert_eq!(p.current_level().collected_stars(), 1);
    }

    #[test]
    fn test_select_level_bounds() {
        let mut p = progression(10);
        assert!(p.select_level(7).is_ok());
        assert_eq!(p.current_index(), 7);
        assert!(matches!(
            p.select_level(0),
            Err(LevelError::NoSuchLevel { index: 0, count: 10 })
        ));
        assert!(p.select_level(11).is_err());
        assert_eq!(p.current_index(), 7);
    }

    #[test]
    fn test_repeat_level_keeps_progress() {
        let mut p = progression(1);
        p.current_level_mut().stars[0].collect();
        p.current_level_mut().activate_checkpoint(0);
        p.body.die();

        p.repeat_level();

        assert!(p.body.is_alive());
        assert_eq!(p.body.pos, Vec2::new(400.0, 400.0));
        assert_eq!(p.current_level().collected_stars(), 1);
        assert!(p.current_level().checkpoints[0].activated);
        assert_eq!(p.body.death_count(), 1);
    }

    #[test]
    fn test_reset_current_level_clears_progress() {
        let mut p = progression(1);
        p.current_level_mut().stars[0].collect();
        p.current_level_mut().activate_checkpoint(0);
        p.body.die();

        p.reset_current_level();

        assert!(p.body.is_alive());
        assert_eq!(p.body.pos, Vec2::new(10.0, 450.0));
        assert_eq!(p.current_level().collected_stars(), 0);
        assert!(!p.current_level().checkpoints[0].activated);
        assert_eq!(p.current_level().effective_spawn(), Vec2::new(10.0, 450.0));
    }
}
