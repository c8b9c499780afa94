//! Ledge Runner headless runner
//!
//! Starts the simulation thread, drives it with a scripted input pattern and
//! logs frames, events and sound cues. Useful for soak-testing the loop
//! without a window.
//!
//! Environment:
//! - `LEDGE_RUNNER_SETTINGS`: settings JSON path
//! - `LEDGE_RUNNER_PROGRESS`: progress JSON path (saved on exit)
//! - `LEDGE_RUNNER_LEVELS`: directory of level tables replacing the built-in ones
//! - `LEDGE_RUNNER_SECONDS`: how long to run (default 20)

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ledge_runner::assets::AssetCatalog;
use ledge_runner::audio::{AudioManager, LogBackend, SoundEffect};
use ledge_runner::input::Key;
use ledge_runner::scheduler::{self, ChannelSink, Command, Simulation};
use ledge_runner::sim::{GameEvent, GameState};
use ledge_runner::{Progress, Settings, levels};

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name).map(PathBuf::from)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Ledge Runner (headless) starting...");

    let settings = env_path("LEDGE_RUNNER_SETTINGS")
        .map(|path| Settings::load_from(&path))
        .unwrap_or_default();
    let progress_path = env_path("LEDGE_RUNNER_PROGRESS");
    let progress = progress_path
        .as_deref()
        .map(Progress::load_from)
        .unwrap_or_default();
    let levels = match env_path("LEDGE_RUNNER_LEVELS") {
        Some(dir) => levels::load_dir(&dir)?,
        None => levels::builtin_levels()?,
    };
    let run_for = std::env::var("LEDGE_RUNNER_SECONDS")
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(20.0);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    log::info!("Seed {}, {} levels", seed, levels.len());

    let mut catalog = AssetCatalog::new();
    for effect in SoundEffect::ALL {
        catalog.register_sound(effect.asset_name());
    }
    let mut audio = AudioManager::new(LogBackend);
    audio.apply_settings(&settings);

    let state = GameState::new(levels, seed, settings.max_particles())?;
    let sim = Simulation::new(state, settings, progress);
    let (sink, feed) = ChannelSink::channel();
    let handle = scheduler::spawn(sim, catalog.clone(), sink)?;

    let started = Instant::now();
    let mut frames = 0u64;
    let mut died_at: Option<Instant> = None;
    handle.input().press(Key::Right);

    while started.elapsed().as_secs_f32() < run_for && handle.is_running() {
        // Hop every ~0.7 s
        let phase = started.elapsed().as_millis() % 700;
        if phase < 100 {
            handle.input().press(Key::Jump);
        } else {
            handle.input().release(Key::Jump);
        }

        if let Some(scene) = feed.latest_frame() {
            frames += 1;
            if frames % 120 == 0 {
                log::debug!(
                    "frame {}: level {} stars {}/{}",
                    frames,
                    scene.hud.level,
                    scene.hud.stars,
                    scene.hud.required_stars
                );
            }
        }

        for event in feed.events.try_iter() {
            log::info!("{:?}", event);
            audio.handle_events(&[event], &catalog);
            match event {
                GameEvent::PlayerDied { .. } => died_at = Some(Instant::now()),
                GameEvent::LevelCompleted { .. } => handle.send(Command::NextLevel),
                _ => {}
            }
        }

        // Stand in for the death screen's retry button
        if died_at.is_some_and(|t| t.elapsed() > Duration::from_secs(1)) {
            died_at = None;
            handle.send(Command::Retry);
        }

        std::thread::sleep(Duration::from_millis(16));
    }

    handle.input().release_all();
    let sim = handle.stop()?;
    log::info!(
        "Ran {} ticks, {} frames shown, {} deaths, {} levels cleared",
        sim.state.time_ticks,
        frames,
        sim.state.progression.body.death_count(),
        sim.progress.cleared()
    );

    if let Some(path) = progress_path {
        sim.progress.save_to(&path)?;
    }
    Ok(())
}
