//! Visual effects: particles and camera shake
//!
//! Not gameplay-affecting. Uses a seeded RNG so a replay of the same inputs
//! produces the same frames.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// What a particle looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Kicked up by jumps and landings
    Dust,
    /// Star pickup
    Sparkle,
    /// Explosions and deaths
    Debris,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ParticleKind,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Particle pool and screen shake state
#[derive(Debug, Clone)]
pub struct Effects {
    pub particles: Vec<Particle>,
    /// Shake intensity in pixels, decays every tick
    pub screen_shake: f32,
    /// Offset chosen for the current tick
    pub camera_offset: Vec2,
    max_particles: usize,
    rng: Pcg32,
}

impl Effects {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            particles: Vec::new(),
            screen_shake: 0.0,
            camera_offset: Vec2::ZERO,
            max_particles,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        self.particles.truncate(max);
    }

    /// Spray `count` particles from `origin`
    pub fn burst(&mut self, origin: Vec2, kind: ParticleKind, count: usize) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let (speed, spread_up) = match kind {
                ParticleKind::Dust => (1.5, 0.5),
                ParticleKind::Sparkle => (2.5, 1.0),
                ParticleKind::Debris => (5.0, 1.0),
            };
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let magnitude = self.rng.random_range(0.3..1.0) * speed;
            let mut vel = Vec2::new(angle.cos(), angle.sin()) * magnitude;
            vel.y -= spread_up;
            let size = self.rng.random_range(2.0..5.0);
            self.particles.push(Particle {
                pos: origin,
                vel,
                kind,
                life: 1.0,
                size,
            });
        }
    }

    /// Kick the camera; stronger shakes override weaker ones
    pub fn shake(&mut self, intensity: f32) {
        self.screen_shake = self.screen_shake.max(intensity);
    }

    /// Advance one tick
    pub fn update(&mut self) {
        for particle in &mut self.particles {
            particle.pos += particle.vel;
            particle.vel.y += 0.15;
            particle.vel *= 0.97;
            particle.life -= 1.0 / 40.0;
        }
        self.particles.retain(|p| p.life > 0.0);

        self.screen_shake *= 0.9;
        if self.screen_shake < 0.1 {
            self.screen_shake = 0.0;
        }
        self.camera_offset = if self.screen_shake > 0.0 {
            let s = self.screen_shake;
            Vec2::new(
                self.rng.random_range(-s..=s),
                self.rng.random_range(-s..=s),
            )
        } else {
            Vec2::ZERO
        };
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.screen_shake = 0.0;
        self.camera_offset = Vec2::ZERO;
    }
}
