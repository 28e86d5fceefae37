//! The `Controller`: a state machine over one interactive engine.

use std::time::Duration;

use fleet_core::{FleetConfig, Tick};
use fleet_grid::GridWorld;
use fleet_sim::{Engine, EngineBuilder, EngineSnapshot, LiveFrame};
use fleet_stats::Report;
use tracing::info;

use crate::{analyze, Command, ControlError, ControlResult, Response};

enum RunState {
    /// No run; holds the final snapshot of the last stopped one.
    Idle { last: Option<Box<EngineSnapshot>> },
    Running(Box<Engine>),
    /// Timeline halted; the snapshot is the whole run.
    Paused(Box<EngineSnapshot>),
}

/// Executes [`Command`]s against at most one interactive run.
///
/// ```text
///            Start                 Pause
///   IDLE ───────────▶ RUNNING ───────────▶ PAUSED
///    ▲                 │   ▲     Resume      │
///    │      Stop       │   └─────────────────┘
///    └─────────────────┴──────────── Stop ───┘
/// ```
///
/// A refused command returns a [`ControlError`] and leaves the state exactly
/// as it was.
pub struct Controller {
    config: FleetConfig,
    /// Overrides the configured map for every run.
    grid:   Option<GridWorld>,
    state:  RunState,
}

impl Controller {
    pub fn new(config: FleetConfig) -> Self {
        Self { config, grid: None, state: RunState::Idle { last: None } }
    }

    /// Run every engine on `grid` instead of the configured map.
    pub fn with_grid(mut self, grid: GridWorld) -> Self {
        self.grid = Some(grid);
        self
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Execute one command.
    pub fn handle(&mut self, command: Command) -> ControlResult<Response> {
        match command {
            Command::Start { agent_count, initial_duration, speed_factor } => {
                self.start(agent_count, initial_duration, speed_factor)
            }
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::SetSpeed(factor) => self.set_speed(factor),
            Command::Analyze { agent_count, duration, repetitions } => {
                self.analyze(agent_count, duration, repetitions)
            }
            Command::Stop => self.stop(),
        }
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Advance a running engine by one tick.  Returns the new time, or `None`
    /// when nothing is running.
    pub fn step(&mut self) -> Option<Tick> {
        match &mut self.state {
            RunState::Running(engine) => {
                engine.tick();
                Some(engine.now())
            }
            _ => None,
        }
    }

    /// Wall-clock pause between ticks of the active run.
    pub fn wall_per_tick(&self) -> Option<Duration> {
        match &self.state {
            RunState::Running(engine) => Some(engine.clock.wall_per_tick()),
            _ => None,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running(_))
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, RunState::Paused(_))
    }

    /// The live engine, if a run is in progress and not paused.
    pub fn engine(&self) -> Option<&Engine> {
        match &self.state {
            RunState::Running(engine) => Some(&**engine),
            _ => None,
        }
    }

    /// The pause snapshot while paused, else the final snapshot of the last
    /// stopped run.
    pub fn last_snapshot(&self) -> Option<&EngineSnapshot> {
        match &self.state {
            RunState::Paused(snapshot) => Some(&**snapshot),
            RunState::Idle { last } => last.as_deref(),
            RunState::Running(_) => None,
        }
    }

    /// What telemetry publishes: the live frame, or the frozen one while
    /// paused.
    pub fn live_frame(&self) -> Option<LiveFrame> {
        match &self.state {
            RunState::Running(engine) => Some(engine.live_frame()),
            RunState::Paused(snapshot) => Some(snapshot.live_frame()),
            RunState::Idle { .. } => None,
        }
    }

    pub fn report(&self) -> Option<Report> {
        match &self.state {
            RunState::Running(engine) => Some(engine.report()),
            _ => self.last_snapshot().map(EngineSnapshot::report),
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────

    fn start(&mut self, agent_count: usize, duration: u64, speed: f64) -> ControlResult<Response> {
        if !matches!(self.state, RunState::Idle { .. }) {
            return Err(ControlError::AlreadyRunning);
        }
        check_speed(speed)?;

        let mut builder = EngineBuilder::new(self.config.clone())
            .agent_count(agent_count)
            .duration(duration)
            .speed(speed)
            .interactive(true);
        if let Some(grid) = &self.grid {
            builder = builder.grid(grid.clone());
        }
        let engine = builder.build()?;

        let end = engine.clock.end_tick;
        info!(agents = agent_count, %end, speed, "run started");
        self.state = RunState::Running(Box::new(engine));
        Ok(Response::Started { agents: agent_count, end })
    }

    fn pause(&mut self) -> ControlResult<Response> {
        match &self.state {
            RunState::Running(engine) => {
                let mut snapshot = engine.snapshot();
                snapshot.clock.paused = true;
                let response = Response::Paused { tick: snapshot.tick(), delivered: snapshot.delivered() };
                info!(tick = %snapshot.tick(), "run paused");
                self.state = RunState::Paused(Box::new(snapshot));
                Ok(response)
            }
            RunState::Paused(snapshot) => {
                Ok(Response::Paused { tick: snapshot.tick(), delivered: snapshot.delivered() })
            }
            RunState::Idle { .. } => Err(ControlError::NotRunning),
        }
    }

    fn resume(&mut self) -> ControlResult<Response> {
        match std::mem::replace(&mut self.state, RunState::Idle { last: None }) {
            RunState::Paused(mut snapshot) => {
                snapshot.clock.paused = false;
                let tick = snapshot.tick();
                info!(%tick, speed = snapshot.clock.speed_factor, "run resumed");
                self.state = RunState::Running(Box::new((*snapshot).into_engine()));
                Ok(Response::Resumed { tick })
            }
            RunState::Running(engine) => {
                let tick = engine.now();
                self.state = RunState::Running(engine);
                Ok(Response::Resumed { tick })
            }
            idle @ RunState::Idle { .. } => {
                self.state = idle;
                Err(ControlError::NotRunning)
            }
        }
    }

    fn set_speed(&mut self, factor: f64) -> ControlResult<Response> {
        check_speed(factor)?;
        match &mut self.state {
            RunState::Running(engine) => {
                // Pause and resume through a snapshot at this tick boundary.
                let mut snapshot = engine.snapshot();
                snapshot.clock.speed_factor = factor;
                **engine = snapshot.into_engine();
            }
            RunState::Paused(snapshot) => snapshot.clock.speed_factor = factor,
            RunState::Idle { .. } => return Err(ControlError::NotRunning),
        }
        info!(speed = factor, "speed changed");
        Ok(Response::SpeedSet { speed_factor: factor })
    }

    fn analyze(&self, agent_count: usize, duration: u64, repetitions: u32) -> ControlResult<Response> {
        if !matches!(self.state, RunState::Idle { .. }) {
            return Err(ControlError::Busy);
        }
        if repetitions == 0 {
            return Err(ControlError::InvalidRepetitions);
        }
        let summary = analyze::run_batch(&self.config, self.grid.as_ref(), agent_count, duration, repetitions)?;
        Ok(Response::Analysis(summary))
    }

    fn stop(&mut self) -> ControlResult<Response> {
        let snapshot = match &self.state {
            RunState::Running(engine) => engine.snapshot(),
            RunState::Paused(snapshot) => (**snapshot).clone(),
            RunState::Idle { .. } => return Err(ControlError::NotRunning),
        };
        let report = snapshot.report();
        info!(tick = %snapshot.tick(), delivered = report.delivered, "run stopped");
        self.state = RunState::Idle { last: Some(Box::new(snapshot)) };
        Ok(Response::Stopped(report))
    }
}

fn check_speed(factor: f64) -> ControlResult<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(ControlError::InvalidSpeed(factor))
    }
}
