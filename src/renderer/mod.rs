//! Render projection
//!
//! Turns a [`GameState`] into a [`RenderScene`]: sprite draws where the asset
//! provider has a sprite, coloured placeholder triangles where it does not,
//! plus camera offset and an optional debug overlay. The presentation layer
//! owns the actual drawing.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::assets::{AssetProvider, SpriteHandle};
use crate::settings::Settings;
use crate::sim::{
    GamePhase, GameState, HazardKind, ParticleKind, PlatformMaterial, Rect, SpikeFacing,
};
pub use vertex::{Vertex, colors};

/// How one kind of element is drawn: sprite name and fallback color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub sprite: &'static str,
    pub color: [f32; 4],
}

impl Style {
    const fn new(sprite: &'static str, color: [f32; 4]) -> Self {
        Self { sprite, color }
    }
}

pub fn platform_style(material: PlatformMaterial) -> Style {
    match material {
        PlatformMaterial::Grass => Style::new("platform_grass", colors::GRASS),
        PlatformMaterial::Stone => Style::new("platform_stone", colors::STONE),
        PlatformMaterial::Wood => Style::new("platform_wood", colors::WOOD),
        PlatformMaterial::Metal => Style::new("platform_metal", colors::METAL),
        PlatformMaterial::Ice => Style::new("platform_ice", colors::ICE),
    }
}

pub fn hazard_style(kind: HazardKind) -> Style {
    match kind {
        HazardKind::Spike { facing } => match facing {
            SpikeFacing::Up => Style::new("spike_up", colors::SPIKE),
            SpikeFacing::Down => Style::new("spike_down", colors::SPIKE),
            SpikeFacing::Left => Style::new("spike_left", colors::SPIKE),
            SpikeFacing::Right => Style::new("spike_right", colors::SPIKE),
        },
        HazardKind::Bomb => Style::new("bomb", colors::BOMB),
    }
}

/// A sprite placed over a world rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub handle: SpriteHandle,
    pub rect: Rect,
    /// Opacity multiplier
    pub alpha: f32,
}

/// Numbers shown by the debug overlay
#[derive(Debug, Clone, PartialEq)]
pub struct DebugInfo {
    pub tick: u64,
    pub body_pos: Vec2,
    pub body_vel: Vec2,
    pub grounded: bool,
    pub particles: usize,
    /// Hitbox outlines for the body and every active hazard
    pub hitboxes: Vec<Vertex>,
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub level: usize,
    pub level_name: String,
    pub stars: usize,
    pub required_stars: usize,
    pub health: u32,
    pub deaths: u32,
    pub phase: GamePhase,
    pub death_screen: bool,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderScene {
    pub world: Vec2,
    /// Shake offset to add to every world position
    pub camera_offset: Vec2,
    /// Sprites, in draw order
    pub sprites: Vec<SpriteDraw>,
    /// Placeholder and particle triangles, in draw order
    pub vertices: Vec<Vertex>,
    pub hud: Hud,
    pub debug: Option<DebugInfo>,
}

struct SceneBuilder<'a> {
    assets: &'a dyn AssetProvider,
    sprites: Vec<SpriteDraw>,
    vertices: Vec<Vertex>,
}

impl SceneBuilder<'_> {
    /// Sprite if loaded, otherwise the fallback geometry
    fn draw(
        &mut self,
        style: Style,
        rect: Rect,
        fallback: impl FnOnce(&Rect, [f32; 4]) -> Vec<Vertex>,
    ) {
        match self.assets.sprite(style.sprite) {
            Some(handle) => self.sprites.push(SpriteDraw {
                handle,
                rect,
                alpha: 1.0,
            }),
            None => self.vertices.extend(fallback(&rect, style.color)),
        }
    }
}

fn particle_color(kind: ParticleKind, life: f32) -> [f32; 4] {
    let [r, g, b, _] = match kind {
        ParticleKind::Dust => colors::DUST,
        ParticleKind::Sparkle => colors::SPARKLE,
        ParticleKind::Debris => colors::DEBRIS,
    };
    [r, g, b, life.clamp(0.0, 1.0)]
}

/// Project the live level into a drawable scene
pub fn project(
    state: &GameState,
    settings: &Settings,
    assets: &dyn AssetProvider,
) -> RenderScene {
    let level = state.level();
    let body = &state.progression.body;
    let mut scene = SceneBuilder {
        assets,
        sprites: Vec::new(),
        vertices: Vec::new(),
    };

    for platform in &level.platforms {
        scene.draw(platform_style(platform.material), platform.rect, shapes::quad);
    }
    for platform in &level.moving_platforms {
        scene.draw(platform_style(platform.material), platform.rect(), shapes::quad);
    }
    for hazard in level.hazards.iter().filter(|h| h.is_active()) {
        let style = hazard_style(hazard.kind);
        match hazard.kind {
            HazardKind::Spike { facing } => {
                scene.draw(style, hazard.rect, |r, c| shapes::spikes(r, facing, c))
            }
            HazardKind::Bomb => scene.draw(style, hazard.rect, |r, c| {
                shapes::circle(r.center(), r.width.min(r.height) / 2.0, c, 16)
            }),
        }
    }
    for explosion in &level.explosions {
        let alpha = explosion.intensity();
        match assets.sprite("explosion") {
            Some(handle) => scene.sprites.push(SpriteDraw {
                handle,
                rect: explosion.rect,
                alpha,
            }),
            None => {
                let [r, g, b, _] = colors::EXPLOSION;
                let rect = explosion.rect;
                scene.vertices.extend(shapes::circle(
                    rect.center(),
                    rect.width / 2.0,
                    [r, g, b, alpha],
                    24,
                ));
            }
        }
    }
    for star in level.stars.iter().filter(|s| !s.collected) {
        scene.draw(Style::new("star", colors::STAR), star.rect, |r, c| {
            shapes::star(r.center(), r.width / 2.0, c)
        });
    }
    for checkpoint in &level.checkpoints {
        let style = if checkpoint.activated {
            Style::new("checkpoint_active", colors::CHECKPOINT_ACTIVE)
        } else {
            Style::new("checkpoint", colors::CHECKPOINT)
        };
        scene.draw(style, checkpoint.rect, shapes::quad);
    }
    let door_style = if level.door.is_open() {
        Style::new("door_open", colors::DOOR_OPEN)
    } else {
        Style::new("door_closed", colors::DOOR_CLOSED)
    };
    scene.draw(door_style, level.door.rect, shapes::quad);

    let player_style = if body.is_alive() {
        Style::new("player", colors::PLAYER)
    } else {
        Style::new("player_dead", colors::PLAYER_DEAD)
    };
    scene.draw(player_style, body.rect(), shapes::quad);

    if settings.particles {
        for particle in &state.effects.particles {
            let rect = Rect::centered_on(particle.pos, Vec2::splat(particle.size));
            scene
                .vertices
                .extend(shapes::quad(&rect, particle_color(particle.kind, particle.life)));
        }
    }

    let debug = settings.debug_overlay.then(|| {
        let mut hitboxes = shapes::rect_outline(&body.rect(), 1.0, colors::HITBOX);
        for hazard in level.hazards.iter().filter(|h| h.is_active()) {
            hitboxes.extend(shapes::rect_outline(&hazard.hitbox(), 1.0, colors::HITBOX));
        }
        for explosion in &level.explosions {
            hitboxes.extend(shapes::rect_outline(&explosion.rect, 1.0, colors::HITBOX));
        }
        DebugInfo {
            tick: state.time_ticks,
            body_pos: body.pos,
            body_vel: body.vel,
            grounded: body.grounded,
            particles: state.effects.particles.len(),
            hitboxes,
        }
    });

    let camera_offset = if settings.effective_screen_shake() {
        state.effects.camera_offset
    } else {
        Vec2::ZERO
    };

    RenderScene {
        world: level.world,
        camera_offset,
        sprites: scene.sprites,
        vertices: scene.vertices,
        hud: Hud {
            level: state.level_index(),
            level_name: level.name.clone(),
            stars: level.collected_stars(),
            required_stars: level.required_stars,
            health: body.health(),
            deaths: body.death_count(),
            phase: state.phase,
            death_screen: state.death_screen_ready(),
        },
        debug,
    }
}
