//! Per-tick collision resolution between the body and level geometry
//!
//! Runs once per tick, after integration, in a fixed order:
//! 1. landing on static then moving platforms (swept, first hit wins)
//! 2. hazards
//! 3. star pickup
//! 4. door gating
//! 5. bottomless-pit check
//! 6. checkpoints
//!
//! Nothing here fails or blocks. Repeated deaths, pickups and activations
//! are no-ops.

use super::body::KinematicBody;
use super::level::Level;
use super::rect::Rect;
use crate::consts::{FALL_MARGIN, LANDING_EPSILON};

/// Which platform the body landed on this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Static(usize),
    Moving(usize),
}

/// Everything that happened during one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolveReport {
    pub landing: Option<Landing>,
    /// The body went from alive to dead during this pass
    pub died: bool,
    /// The death came from falling out of the world
    pub fell_out: bool,
    /// Indices of bombs detonated this tick
    pub bombs: Vec<usize>,
    /// Indices of stars picked up this tick
    pub stars: Vec<usize>,
    /// New door state if it changed this tick
    pub door_changed: Option<bool>,
    /// Body overlaps the open door. Only meaningful while alive.
    pub completed: bool,
    /// Indices of checkpoints activated this tick
    pub checkpoints: Vec<usize>,
}

/// Swept test: did the body's bottom edge cross the surface top this tick?
///
/// `previous_top` is where the top was one tick ago. For a rising platform
/// the earlier, lower edge is the one the body was above.
fn crosses_top(body: &KinematicBody, surface: &Rect, previous_top: f32) -> bool {
    let new_bottom = body.bottom();
    let prev_bottom = new_bottom - body.vel.y;
    let top = surface.top();
    body.rect().overlaps_x(surface)
        && prev_bottom <= top.max(previous_top) + LANDING_EPSILON
        && top <= new_bottom
}

fn land(body: &mut KinematicBody, top: f32) {
    body.pos.y = top - body.size.y;
    body.vel.y = 0.0;
    body.grounded = true;
}

/// Keep the body inside the horizontal extent of the world
pub fn clamp_to_world(body: &mut KinematicBody, level: &Level) {
    let max_x = (level.world.x - body.size.x).max(0.0);
    body.pos.x = body.pos.x.clamp(0.0, max_x);
}

/// Step 1: one-way platform landing
fn resolve_landing(body: &mut KinematicBody, level: &Level) -> Option<Landing> {
    // A body that is not falling never lands, so it is airborne until proven otherwise
    body.grounded = false;
    if body.vel.y <= 0.0 {
        return None;
    }

    for (i, platform) in level.platforms.iter().enumerate() {
        if crosses_top(body, &platform.rect, platform.top()) {
            land(body, platform.top());
            return Some(Landing::Static(i));
        }
    }

    for (i, platform) in level.moving_platforms.iter().enumerate() {
        if crosses_top(body, &platform.rect(), platform.previous_top()) {
            land(body, platform.top());
            // Carry: move with the platform by what it travels this tick
            body.pos += platform.displacement();
            return Some(Landing::Moving(i));
        }
    }

    None
}

/// Step 2: spikes, bombs and live explosions
fn resolve_hazards(body: &mut KinematicBody, level: &mut Level, report: &mut ResolveReport) {
    let body_rect = body.rect();

    for (i, hazard) in level.hazards.iter_mut().enumerate() {
        if !hazard.is_active() || !body_rect.intersects(&hazard.hitbox()) {
            continue;
        }
        report.died |= body.die();
        if let Some(explosion) = hazard.trigger() {
            log::debug!("bomb {} detonated at {:?}", i, explosion.rect.center());
            level.explosions.push(explosion);
            report.bombs.push(i);
        }
    }

    if level
        .explosions
        .iter()
        .any(|e| !e.is_finished() && body_rect.intersects(&e.rect))
    {
        report.died |= body.die();
    }
}

/// Step 3: star pickup
fn resolve_stars(body: &KinematicBody, level: &mut Level, report: &mut ResolveReport) {
    let body_rect = body.rect();
    for (i, star) in level.stars.iter_mut().enumerate() {
        if !star.collected && body_rect.intersects(&star.rect) && star.collect() {
            report.stars.push(i);
        }
    }
}

/// Step 4: door state and gating
fn resolve_door(body: &mut KinematicBody, level: &mut Level, report: &mut ResolveReport) {
    report.door_changed = level
        .door
        .refresh(level.collected_stars(), level.required_stars);

    level.completed = false;
    if !body.rect().intersects(&level.door.rect) {
        return;
    }
    if level.door.is_open() {
        level.completed = true;
        report.completed = true;
    } else {
        body.block_against(&level.door.rect);
    }
}

/// Step 6: checkpoints
fn resolve_checkpoints(body: &KinematicBody, level: &mut Level, report: &mut ResolveReport) {
    let body_rect = body.rect();
    let touched: Vec<usize> = level
        .checkpoints
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.activated && body_rect.intersects(&c.rect))
        .map(|(i, _)| i)
        .collect();
    for i in touched {
        if level.activate_checkpoint(i) {
            report.checkpoints.push(i);
        }
    }
}

/// Reconcile the body against the level after `integrate`
pub fn resolve(body: &mut KinematicBody, level: &mut Level) -> ResolveReport {
    let mut report = ResolveReport {
        landing: resolve_landing(body, level),
        ..Default::default()
    };

    resolve_hazards(body, level, &mut report);

    if body.is_alive() {
        resolve_stars(body, level, &mut report);
    }

    resolve_door(body, level, &mut report);

    if body.pos.y > level.world.y + FALL_MARGIN && body.die() {
        report.died = true;
        report.fell_out = true;
    }

    if body.is_alive() {
        resolve_checkpoints(body, level, &mut report);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::hazard::{Hazard, SpikeFacing};
    use crate::sim::level::{Checkpoint, Door, Star};
    use crate::sim::platform::{MovingPlatform, Platform, PlatformMaterial};
    use glam::Vec2;

    fn empty_level() -> Level {
        Level::new(
            "test",
            Vec2::new(800.0, 600.0),
            Vec2::new(50.0, 450.0),
            Door::new(Rect::new(740.0, 490.0, 40.0, 60.0)),
        )
    }

    fn step(body: &mut KinematicBody, level: &mut Level) -> ResolveReport {
        body.apply_gravity();
        body.integrate();
        let report = resolve(body, level);
        level.update_geometry();
        report
    }

    #[test]
    fn test_spawn_falls_then_lands() {
        let mut level = empty_level();
        let mut body = KinematicBody::new(50.0, 450.0);

        for _ in 0..3 {
            let before = body.pos.y;
            step(&mut body, &mut level);
            assert!(body.pos.y > before);
        }
        assert!((body.vel.y - 1.8).abs() < 1e-5);

        // Bottom is at 493.6 with vy about to become 2.4: put a top inside the next sweep
        let top = body.bottom() + 1.0;
        level
            .platforms
            .push(Platform::new(Rect::new(0.0, top, 200.0, 20.0), PlatformMaterial::Grass));

        let report = step(&mut body, &mut level);
        assert_eq!(report.landing, Some(Landing::Static(0)));
        assert_eq!(body.pos.y, top - PLAYER_HEIGHT);
        assert_eq!(body.vel.y, 0.0);
        assert!(body.grounded);
    }

    #[test]
    fn test_swept_landing_catches_thin_platform() {
        let mut level = empty_level();
        level
            .platforms
            .push(Platform::new(Rect::new(0.0, 300.0, 200.0, 2.0), PlatformMaterial::Stone));
        let mut body = KinematicBody::new(50.0, 240.0);
        body.vel.y = MAX_FALL_SPEED - GRAVITY;

        // Bottom goes 280 -> 295 -> 310, passing the 2px platform between samples
        step(&mut body, &mut level);
        let report = step(&mut body, &mut level);
        assert_eq!(report.landing, Some(Landing::Static(0)));
        assert_eq!(body.bottom(), 300.0);
    }

    #[test]
    fn test_rising_body_passes_through() {
        let mut level = empty_level();
        level
            .platforms
            .push(Platform::new(Rect::new(0.0, 300.0, 200.0, 20.0), PlatformMaterial::Wood));
        let mut body = KinematicBody::new(50.0, 310.0);
        body.vel.y = -10.0;
        let report = step(&mut body, &mut level);
        assert_eq!(report.landing, None);
        assert!(!body.grounded);
    }

    #[test]
    fn test_first_platform_in_order_wins() {
        let mut level = empty_level();
        // Both tops lie inside one sweep; the deeper one is listed first
        level
            .platforms
            .push(Platform::new(Rect::new(0.0, 308.0, 200.0, 10.0), PlatformMaterial::Stone));
        level
            .platforms
            .push(Platform::new(Rect::new(0.0, 302.0, 200.0, 10.0), PlatformMaterial::Stone));
        let mut body = KinematicBody::new(50.0, 260.0);
        body.vel.y = 10.0 - GRAVITY;
        let report = step(&mut body, &mut level);
        assert_eq!(report.landing, Some(Landing::Static(0)));
        assert_eq!(body.bottom(), 308.0);
    }

    #[test]
    fn test_moving_platform_carries_body() {
        let mut level = empty_level();
        level.moving_platforms.push(
            MovingPlatform::new(
                Vec2::new(120.0, 16.0),
                Vec2::new(100.0, 400.0),
                Vec2::new(400.0, 400.0),
                3.0,
                PlatformMaterial::Metal,
            )
            .unwrap(),
        );
        let mut body = KinematicBody::new(120.0, 360.0);
        // Settle onto the platform
        step(&mut body, &mut level);
        assert!(body.grounded);

        for _ in 0..10 {
            let before = body.pos;
            let delta = level.moving_platforms[0].displacement();
            body.move_right();
            let report = step(&mut body, &mut level);
            assert_eq!(report.landing, Some(Landing::Moving(0)));
            assert!((body.pos.x - (before.x + MOVE_SPEED + delta.x)).abs() < 1e-4);
            assert!((body.bottom() - level.moving_platforms[0].top()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_vertical_platform_keeps_rider() {
        let mut level = empty_level();
        level.moving_platforms.push(
            MovingPlatform::new(
                Vec2::new(120.0, 16.0),
                Vec2::new(100.0, 450.0),
                Vec2::new(100.0, 250.0),
                2.5,
                PlatformMaterial::Metal,
            )
            .unwrap(),
        );
        let mut body = KinematicBody::new(120.0, 400.0);
        for _ in 0..200 {
            step(&mut body, &mut level);
        }
        assert!(body.grounded);
        assert!((body.bottom() - level.moving_platforms[0].top()).abs() < 1e-2);
    }

    #[test]
    fn test_spike_kills_once() {
        let mut level = empty_level();
        level.hazards.push(Hazard::spike(
            Rect::new(40.0, 440.0, 60.0, 60.0),
            SpikeFacing::Up,
        ));
        let mut body = KinematicBody::new(50.0, 450.0);
        let report = step(&mut body, &mut level);
        assert!(report.died);
        assert!(!body.is_alive());

        let report = resolve(&mut body, &mut level);
        assert!(!report.died);
        assert_eq!(body.death_count(), 1);
    }

    #[test]
    fn test_spike_edge_is_forgiving() {
        let mut level = empty_level();
        // Grazes the drawn spike by 2px, inside the hitbox inset
        level.hazards.push(Hazard::spike(
            Rect::new(78.0, 440.0, 40.0, 40.0),
            SpikeFacing::Up,
        ));
        let mut body = KinematicBody::new(50.0, 450.0);
        let report = resolve(&mut body, &mut level);
        assert!(!report.died);
        assert!(body.is_alive());
    }

    #[test]
    fn test_bomb_detonates_and_spawns_explosion() {
        let mut level = empty_level();
        level.hazards.push(Hazard::bomb(Rect::new(60.0, 460.0, 20.0, 20.0)));
        let mut body = KinematicBody::new(50.0, 450.0);
        let report = resolve(&mut body, &mut level);
        assert!(report.died);
        assert_eq!(report.bombs, vec![0]);
        assert_eq!(level.explosions.len(), 1);
        assert!(!level.hazards[0].is_active());

        // A revived body standing in the blast dies again
        body.reset(50.0, 450.0);
        let report = resolve(&mut body, &mut level);
        assert!(report.died);
        assert!(report.bombs.is_empty());
    }

    #[test]
    fn test_landing_and_death_same_tick() {
        let mut level = empty_level();
        level
            .platforms
            .push(Platform::new(Rect::new(0.0, 500.0, 200.0, 20.0), PlatformMaterial::Grass));
        level.hazards.push(Hazard::spike(
            Rect::new(40.0, 470.0, 60.0, 30.0),
            SpikeFacing::Up,
        ));
        let mut body = KinematicBody::new(50.0, 455.0);
        body.vel.y = 8.0;
        body.integrate();
        let report = resolve(&mut body, &mut level);
        assert_eq!(report.landing, Some(Landing::Static(0)));
        assert!(report.died);
    }

    #[test]
    fn test_star_pickup() {
        let mut level = empty_level();
        level.stars.push(Star::at(Vec2::new(60.0, 460.0)));
        level.stars.push(Star::at(Vec2::new(600.0, 100.0)));
        let mut body = KinematicBody::new(50.0, 450.0);
        let report = resolve(&mut body, &mut level);
        assert_eq!(report.stars, vec![0]);
        let report = resolve(&mut body, &mut level);
        assert!(report.stars.is_empty());
        assert_eq!(level.collected_stars(), 1);
    }

    #[test]
    fn test_closed_door_pushes_back() {
        let mut level = empty_level();
        level.set_required_stars(1);
        level.stars.push(Star::at(Vec2::new(10.0, 10.0)));
        let mut body = KinematicBody::new(710.0, 500.0);
        body.move_right();
        body.integrate();
        assert!(body.rect().intersects(&level.door.rect));

        let report = resolve(&mut body, &mut level);
        assert!(!report.completed);
        assert_eq!(body.pos, Vec2::new(710.0, 500.0));
    }

    #[test]
    fn test_closed_door_blocks_platform_carry() {
        let mut level = empty_level();
        level.door = Door::new(Rect::new(500.0, 300.0, 40.0, 80.0));
        level.set_required_stars(1);
        level.stars.push(Star::at(Vec2::new(10.0, 10.0)));
        level.moving_platforms.push(
            MovingPlatform::new(
                Vec2::new(120.0, 16.0),
                Vec2::new(300.0, 360.0),
                Vec2::new(600.0, 360.0),
                3.0,
                PlatformMaterial::Metal,
            )
            .unwrap(),
        );
        let mut body = KinematicBody::new(400.0, 320.0);

        // The rider stands still while the platform slides toward the door
        for _ in 0..60 {
            step(&mut body, &mut level);
            assert!(!body.rect().intersects(&level.door.rect));
        }
        assert!(body.grounded);
        assert_eq!(body.rect().right(), 500.0);
    }

    #[test]
    fn test_open_door_completes() {
        let mut level = empty_level();
        level.set_required_stars(1);
        level.stars.push(Star::at(Vec2::new(720.0, 500.0)));
        let mut body = KinematicBody::new(715.0, 500.0);
        let report = resolve(&mut body, &mut level);
        assert_eq!(report.stars, vec![0]);
        assert_eq!(report.door_changed, Some(true));
        assert!(report.completed);
        assert!(level.completed);

        // Completion is per tick, not latched
        body.pos = Vec2::new(50.0, 450.0);
        let report = resolve(&mut body, &mut level);
        assert!(!report.completed);
        assert!(!level.completed);
    }

    #[test]
    fn test_door_recloses_when_stars_lost() {
        let mut level = empty_level();
        level.set_required_stars(1);
        level.stars.push(Star::at(Vec2::new(60.0, 460.0)));
        let mut body = KinematicBody::new(50.0, 450.0);
        resolve(&mut body, &mut level);
        assert!(level.door.is_open());

        level.stars[0].collected = false;
        body.pos = Vec2::new(300.0, 100.0);
        let report = resolve(&mut body, &mut level);
        assert_eq!(report.door_changed, Some(false));
        assert!(!level.door.is_open());
    }

    #[test]
    fn test_dead_body_still_reports_completion() {
        let mut level = empty_level();
        level.hazards.push(Hazard::bomb(Rect::new(745.0, 495.0, 20.0, 20.0)));
        let mut body = KinematicBody::new(740.0, 490.0);
        let report = resolve(&mut body, &mut level);
        assert!(report.died);
        assert!(report.completed);
    }

    #[test]
    fn test_bottomless_pit() {
        let mut level = empty_level();
        let mut body = KinematicBody::new(50.0, 600.0 + FALL_MARGIN - 1.0);
        let report = resolve(&mut body, &mut level);
        assert!(!report.died);

        body.pos.y = 600.0 + FALL_MARGIN + 1.0;
        let report = resolve(&mut body, &mut level);
        assert!(report.died);
        assert!(report.fell_out);
    }

    #[test]
    fn test_checkpoint_moves_spawn() {
        let mut level = empty_level();
        level.checkpoints.push(Checkpoint::new(
            Rect::new(60.0, 450.0, 20.0, 50.0),
            Vec2::new(60.0, 400.0),
        ));
        let mut body = KinematicBody::new(50.0, 450.0);
        let report = resolve(&mut body, &mut level);
        assert_eq!(report.checkpoints, vec![0]);
        assert_eq!(level.effective_spawn(), Vec2::new(60.0, 400.0));
        let report = resolve(&mut body, &mut level);
        assert!(report.checkpoints.is_empty());
    }

    #[test]
    fn test_clamp_to_world() {
        let level = empty_level();
        let mut body = KinematicBody::new(-20.0, 0.0);
        clamp_to_world(&mut body, &level);
        assert_eq!(body.pos.x, 0.0);
        body.pos.x = 900.0;
        clamp_to_world(&mut body, &level);
        assert_eq!(body.pos.x, 800.0 - PLAYER_WIDTH);
    }
}
