//! Fixed timestep simulation tick
//!
//! Advances the live level by one step: controls, gravity, integration,
//! collision resolution, moving geometry, effects. Then turns the resolver's
//! report into events and phase changes.

use glam::Vec2;

use super::collision::{ResolveReport, clamp_to_world, resolve};
use super::effects::ParticleKind;
use super::state::{GameEvent, GamePhase, GameState};

/// Held controls for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Playing => play(state, input),
        GamePhase::Dead => {
            state.progression.body.tick_death_timer();
            state.progression.current_level_mut().update_geometry();
        }
        GamePhase::LevelComplete => {
            state.progression.current_level_mut().update_geometry();
        }
    }

    state.effects.update();
}

fn play(state: &mut GameState, input: &TickInput) {
    let level_index = state.level_index();
    let (body, level) = state.progression.split_mut();
    let was_grounded = body.grounded;

    match (input.left, input.right) {
        (true, false) => body.move_left(),
        (false, true) => body.move_right(),
        _ => body.stop_moving(),
    }
    let jumped = input.jump && body.jump();

    body.apply_gravity();
    body.integrate();
    clamp_to_world(body, level);

    let report = resolve(body, level);
    level.update_geometry();

    let feet = Vec2::new(body.pos.x + body.size.x / 2.0, body.bottom());
    let center = body.rect().center();
    let alive = body.is_alive();
    let bomb_centers: Vec<Vec2> = report
        .bombs
        .iter()
        .map(|&i| level.hazards[i].rect.center())
        .collect();

    state.attempt.ticks += 1;

    if jumped {
        state.push_event(GameEvent::Jumped);
        state.effects.burst(feet, ParticleKind::Dust, 6);
    }
    if report.landing.is_some() && !was_grounded {
        state.push_event(GameEvent::Landed);
        state.effects.burst(feet, ParticleKind::Dust, 4);
    }

    apply_report(state, level_index, &report, center, &bomb_centers, alive);
}

/// Turn a resolution report into events, effects and phase changes
fn apply_report(
    state: &mut GameState,
    level: usize,
    report: &ResolveReport,
    center: Vec2,
    bomb_centers: &[Vec2],
    alive: bool,
) {
    for &star in &report.stars {
        state.push_event(GameEvent::StarCollected { level, star });
        state.effects.burst(center, ParticleKind::Sparkle, 10);
    }
    for (&bomb, &at) in report.bombs.iter().zip(bomb_centers) {
        state.push_event(GameEvent::BombTriggered { level, bomb });
        state.effects.burst(at, ParticleKind::Debris, 24);
        state.effects.shake(10.0);
    }
    match report.door_changed {
        Some(true) => state.push_event(GameEvent::DoorOpened { level }),
        Some(false) => state.push_event(GameEvent::DoorClosed { level }),
        None => {}
    }
    for &checkpoint in &report.checkpoints {
        state.push_event(GameEvent::CheckpointActivated { level, checkpoint });
        log::debug!("Checkpoint {} activated on level {}", checkpoint, level);
    }

    if report.died {
        state.attempt.deaths += 1;
        state.phase = GamePhase::Dead;
        state.effects.burst(center, ParticleKind::Debris, 16);
        state.effects.shake(6.0);
        state.push_event(GameEvent::PlayerDied { level });
        log::info!(
            "Player died on level {} ({})",
            level,
            if report.fell_out { "fell" } else { "hazard" }
        );
    } else if report.completed && alive {
        state.phase = GamePhase::LevelComplete;
        state.push_event(GameEvent::LevelCompleted { level });
        log::info!(
            "Level {} complete in {} ticks",
            level,
            state.attempt.ticks
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::hazard::{Hazard, SpikeFacing};
    use crate::sim::level::{Checkpoint, Door, Level, Star};
    use crate::sim::platform::{Platform, PlatformMaterial};
    use crate::sim::rect::Rect;

    /// Flat floor at y=550, star at x=300, door at x=700
    fn corridor() -> Level {
        let mut level = Level::new(
            "corridor",
            Vec2::new(800.0, 600.0),
            Vec2::new(50.0, 450.0),
            Door::new(Rect::new(700.0, 490.0, 40.0, 60.0)),
        );
        level.set_required_stars(1);
        level.platforms.push(Platform::new(
            Rect::new(0.0, 550.0, 800.0, 50.0),
            PlatformMaterial::Grass,
        ));
        level.stars.push(Star::at(Vec2::new(300.0, 520.0)));
        level
    }

    fn state_with(level: Level) -> GameState {
        GameState::new(vec![level, corridor()], 9, 128).unwrap()
    }

    fn run(state: &mut GameState, input: TickInput, ticks: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            tick(state, &input);
            events.extend(state.drain_events());
        }
        events
    }

    const RIGHT: TickInput = TickInput {
        left: false,
        right: true,
        jump: false,
    };

    #[test]
    fn test_settles_on_floor() {
        let mut state = state_with(corridor());
        let events = run(&mut state, TickInput::default(), 60);
        let body = &state.progression.body;
        assert!(body.grounded);
        assert_eq!(body.bottom(), 550.0);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Landed).count(), 1);
    }

    #[test]
    fn test_jump_event_and_velocity() {
        let mut state = state_with(corridor());
        run(&mut state, TickInput::default(), 60);
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump);
        assert_eq!(state.drain_events(), vec![GameEvent::Jumped]);
        // Gravity already applied once after the jump impulse
        assert!((state.progression.body.vel.y - (-JUMP_STRENGTH + GRAVITY)).abs() < 1e-5);
        assert!(!state.progression.body.grounded);

        // Holding jump in the air does nothing more
        tick(&mut state, &jump);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_collect_star_and_finish() {
        let mut state = state_with(corridor());
        let events = run(&mut state, RIGHT, 200);
        assert!(events.contains(&GameEvent::StarCollected { level: 1, star: 0 }));
        assert!(events.contains(&GameEvent::DoorOpened { level: 1 }));
        assert_eq!(events.last(), Some(&GameEvent::LevelCompleted { level: 1 }));
        assert_eq!(state.phase, GamePhase::LevelComplete);

        // Frozen until the next level is requested
        let x = state.progression.body.pos.x;
        run(&mut state, RIGHT, 10);
        assert_eq!(state.progression.body.pos.x, x);

        state.next_level();
        assert_eq!(state.level_index(), 2);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_locked_door_blocks() {
        let mut level = corridor();
        level.stars[0] = Star::at(Vec2::new(300.0, 100.0));
        let mut state = state_with(level);
        let events = run(&mut state, RIGHT, 200);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelCompleted { .. })));
        let body = &state.progression.body;
        assert!(body.rect().right() <= 700.0 + MOVE_SPEED);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_body_can_leave_locked_door_top() {
        let mut level = corridor();
        level.stars[0] = Star::at(Vec2::new(300.0, 100.0));
        let mut state = state_with(level);
        state.progression.body.pos = Vec2::new(705.0, 380.0);

        // Falls onto the closed door and stands on it
        run(&mut state, TickInput::default(), 30);
        let body = &state.progression.body;
        assert!(body.grounded);
        assert_eq!(body.bottom(), 490.0);
        assert!(!state.level().door.is_open());

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        let events = run(&mut state, jump, 1);
        assert_eq!(events, vec![GameEvent::Jumped]);
        run(&mut state, TickInput::default(), 60);
        assert_eq!(state.progression.body.bottom(), 490.0);

        let left = TickInput {
            left: true,
            ..Default::default()
        };
        run(&mut state, left, 60);
        let body = &state.progression.body;
        assert!(body.grounded);
        assert_eq!(body.bottom(), 550.0);
        assert!(body.rect().right() < 700.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_death_then_retry_keeps_progress() {
        let mut level = corridor();
        level.checkpoints.push(Checkpoint::new(
            Rect::new(200.0, 500.0, 20.0, 50.0),
            Vec2::new(200.0, 450.0),
        ));
        level
            .hazards
            .push(Hazard::spike(Rect::new(400.0, 530.0, 40.0, 20.0), SpikeFacing::Up));
        let mut state = state_with(level);

        let events = run(&mut state, RIGHT, 120);
        assert!(events.contains(&GameEvent::CheckpointActivated { level: 1, checkpoint: 0 }));
        assert!(events.contains(&GameEvent::StarCollected { level: 1, star: 0 }));
        assert!(events.contains(&GameEvent::PlayerDied { level: 1 }));
        assert_eq!(state.phase, GamePhase::Dead);
        assert_eq!(state.attempt.deaths, 1);

        run(&mut state, TickInput::default(), DEATH_SCREEN_DELAY_TICKS as usize);
        assert!(state.death_screen_ready());

        state.retry();
        assert_eq!(state.progression.body.pos, Vec2::new(200.0, 450.0));
        assert_eq!(state.level().collected_stars(), 1);

        state.reset_level();
        assert_eq!(state.progression.body.pos, Vec2::new(50.0, 450.0));
        assert_eq!(state.level().collected_stars(), 0);
        assert_eq!(state.attempt.deaths, 0);
    }

    #[test]
    fn test_fall_into_pit() {
        let mut level = corridor();
        level.platforms[0] = Platform::new(
            Rect::new(0.0, 550.0, 150.0, 50.0),
            PlatformMaterial::Stone,
        );
        let mut state = state_with(level);
        let events = run(&mut state, RIGHT, 200);
        assert!(events.contains(&GameEvent::PlayerDied { level: 1 }));
        assert_eq!(state.progression.body.death_count(), 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = state_with(corridor());
        let mut b = state_with(corridor());
        let script = [
            TickInput::default(),
            RIGHT,
            TickInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            TickInput {
                left: true,
                ..Default::default()
            },
        ];
        for input in script.iter().cycle().take(400) {
            tick(&mut a, input);
            tick(&mut b, input);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.progression.body.pos, b.progression.body.pos);
        assert_eq!(a.effects.camera_offset, b.effects.camera_offset);
        assert_eq!(a.drain_events(), b.drain_events());
    }
}
