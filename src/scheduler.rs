//! Fixed-timestep scheduler
//!
//! Real elapsed time goes into an accumulator; every whole tick in it runs one
//! simulation step. Rendering happens once per iteration no matter how many
//! ticks ran, so the logic rate and the frame rate are independent.
//!
//! Commands from the presentation layer (retry, level changes, pause) arrive
//! over a channel and are applied only between ticks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::assets::AssetProvider;
use crate::consts::{MAX_FRAME_DELTA, MAX_SUBSTEPS, SIM_DT};
use crate::error::SchedulerError;
use crate::input::InputState;
use crate::progress::Progress;
use crate::renderer::{self, RenderScene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};

/// Time accumulator that hands out whole ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    max_substeps: u32,
    max_frame_delta: f32,
    accumulator: f32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS, MAX_FRAME_DELTA)
    }
}

impl FixedTimestep {
    pub fn new(dt: f32, max_substeps: u32, max_frame_delta: f32) -> Self {
        Self {
            dt,
            max_substeps: max_substeps.max(1),
            max_frame_delta,
            accumulator: 0.0,
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Add elapsed real time and return how many ticks are due now
    ///
    /// Elapsed time is clamped to the frame delta limit and at most
    /// `max_substeps` ticks are returned; any remainder stays accumulated.
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, self.max_frame_delta);

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_substeps {
            self.accumulator -= self.dt;
            ticks += 1;
        }
        ticks
    }

    /// Fraction of a tick already accumulated (for interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.dt).clamp(0.0, 1.0)
    }

    /// Real time until the next tick is due
    pub fn time_until_next_tick(&self) -> f32 {
        (self.dt - self.accumulator).max(0.0)
    }

    /// Drop accumulated time (used while paused)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Requests from the presentation layer, applied between ticks
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Respawn at the effective spawn, keeping stars and checkpoints
    Retry,
    /// Start the live level over
    ResetLevel,
    NextLevel,
    /// Jump to a 1-based level
    SelectLevel(usize),
    SetPaused(bool),
    TogglePause,
    ToggleDebug,
    ApplySettings(Settings),
}

/// Receives frames and discrete events from the simulation
pub trait PresentationSink {
    fn render(&mut self, scene: &RenderScene);
    fn on_event(&mut self, event: &GameEvent);
}

/// Receiving end of a [`ChannelSink`]
#[derive(Debug, Clone)]
pub struct PresentationFeed {
    /// Holds at most the newest unread frame
    pub frames: flume::Receiver<RenderScene>,
    pub events: flume::Receiver<GameEvent>,
}

impl PresentationFeed {
    /// Newest frame since the last call, if any
    pub fn latest_frame(&self) -> Option<RenderScene> {
        self.frames.try_iter().last()
    }
}

/// Sink that forwards everything to another thread
///
/// Events are queued in full. Frames are a snapshot: an unread frame is
/// replaced by the next one, so a slow reader never builds a backlog.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    frames: flume::Sender<RenderScene>,
    stale: flume::Receiver<RenderScene>,
    events: flume::Sender<GameEvent>,
}

impl ChannelSink {
    pub fn channel() -> (Self, PresentationFeed) {
        let (frames, frame_rx) = flume::bounded(1);
        let (events, event_rx) = flume::unbounded();
        let sink = Self {
            frames,
            stale: frame_rx.clone(),
            events,
        };
        let feed = PresentationFeed {
            frames: frame_rx,
            events: event_rx,
        };
        (sink, feed)
    }
}

impl PresentationSink for ChannelSink {
    fn render(&mut self, scene: &RenderScene) {
        let mut frame = scene.clone();
        loop {
            match self.frames.try_send(frame) {
                Ok(()) => return,
                Err(flume::TrySendError::Full(back)) => {
                    let _ = self.stale.try_recv();
                    frame = back;
                }
                // Receiver gone means nobody is watching; keep simulating
                Err(flume::TrySendError::Disconnected(_)) => return,
            }
        }
    }

    fn on_event(&mut self, event: &GameEvent) {
        let _ = self.events.send(*event);
    }
}

/// Game state plus everything the loop needs between ticks
#[derive(Debug, Clone)]
pub struct Simulation {
    pub state: GameState,
    pub settings: Settings,
    pub progress: Progress,
    pub timestep: FixedTimestep,
    paused: bool,
}

impl Simulation {
    pub fn new(mut state: GameState, settings: Settings, progress: Progress) -> Self {
        state.effects.set_max_particles(settings.max_particles());
        Self {
            state,
            settings,
            progress,
            timestep: FixedTimestep::default(),
            paused: false,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Apply one command; never called mid-tick
    pub fn apply(&mut self, command: Command) {
        log::debug!("Command: {:?}", command);
        match command {
            Command::Retry => self.state.retry(),
            Command::ResetLevel => self.state.reset_level(),
            Command::NextLevel => self.state.next_level(),
            Command::SelectLevel(index) => {
                if let Err(e) = self.state.select_level(index) {
                    log::warn!("Level select ignored: {}", e);
                }
            }
            Command::SetPaused(paused) => self.paused = paused,
            Command::TogglePause => self.paused = !self.paused,
            Command::ToggleDebug => self.settings.debug_overlay = !self.settings.debug_overlay,
            Command::ApplySettings(settings) => {
                self.state.effects.set_max_particles(settings.max_particles());
                self.settings = settings;
            }
        }
    }

    /// One scheduler iteration: run due ticks, forward events, render once
    ///
    /// Returns the number of ticks that ran.
    pub fn run_iteration(
        &mut self,
        elapsed: f32,
        input: &InputState,
        assets: &dyn AssetProvider,
        sink: &mut dyn PresentationSink,
    ) -> u32 {
        let ticks = if self.paused {
            self.timestep.reset();
            0
        } else {
            self.timestep.accumulate(elapsed)
        };

        for _ in 0..ticks {
            let input = input.snapshot();
            tick(&mut self.state, &input);
        }

        for event in self.state.drain_events() {
            if let GameEvent::LevelCompleted { level } = event {
                let improvement = self.progress.record_completion(
                    level,
                    self.state.attempt,
                    self.state.level().collected_stars(),
                );
                if improvement.faster && !improvement.first_clear {
                    log::info!("New best time on level {}", level);
                }
            }
            sink.on_event(&event);
        }

        sink.render(&renderer::project(&self.state, &self.settings, assets));
        ticks
    }
}

/// Handle to a simulation running on its own thread
pub struct LoopHandle {
    running: Arc<AtomicBool>,
    input: InputState,
    commands: flume::Sender<Command>,
    thread: JoinHandle<Simulation>,
}

impl LoopHandle {
    /// Held-key set shared with the simulation thread
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Queue a command for the next iteration
    pub fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            log::warn!("Simulation thread is gone; command dropped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && !self.thread.is_finished()
    }

    /// Ask the loop to stop and wait for the in-flight iteration to finish
    pub fn stop(self) -> Result<Simulation, SchedulerError> {
        self.running.store(false, Ordering::Release);
        self.thread.join().map_err(|_| SchedulerError::Panicked)
    }
}

/// Run the simulation on a dedicated thread until [`LoopHandle::stop`]
pub fn spawn<A, S>(
    mut sim: Simulation,
    assets: A,
    mut sink: S,
) -> Result<LoopHandle, SchedulerError>
where
    A: AssetProvider + Send + 'static,
    S: PresentationSink + Send + 'static,
{
    let running = Arc::new(AtomicBool::new(true));
    let input = InputState::new();
    let (commands, command_rx) = flume::unbounded::<Command>();

    let thread = {
        let running = Arc::clone(&running);
        let input = input.clone();
        std::thread::Builder::new()
            .name("simulation".to_string())
            .spawn(move || {
                log::info!("Simulation loop started");
                let mut last = Instant::now();
                while running.load(Ordering::Acquire) {
                    for command in command_rx.try_iter() {
                        sim.apply(command);
                    }

                    let now = Instant::now();
                    let elapsed = now.duration_since(last).as_secs_f32();
                    last = now;
                    sim.run_iteration(elapsed, &input, &assets, &mut sink);

                    let wait = sim.timestep.time_until_next_tick();
                    if wait > 0.0 {
                        std::thread::sleep(Duration::from_secs_f32(wait));
                    }
                }
                log::info!("Simulation loop stopped after {} ticks", sim.state.time_ticks);
                sim
            })?
    };

    Ok(LoopHandle {
        running,
        input,
        commands,
        thread,
    })
}
