//! The `Agent` type and its per-tick `step`.
//!
//! One call to [`Agent::step`] runs, in order:
//!
//! 1. the handling timer (completing a pick/drop flips cargo and frees the
//!    destination),
//! 2. a seek if the agent is idle and its retry delay has passed; an idle
//!    agent asked to yield steps aside to a free neighbour,
//! 3. movement: at a cell boundary, check the destination claim and reserve
//!    the next cell; then interpolate `cells_per_tick` over `substeps`
//!    increments,
//! 4. progress tracking (wait/travel accounting and stuck detection).
//!
//! A hop is at most one cell per tick.  Arriving at the target cell starts
//! handling in the same tick.
//!
//! An agent with no destination never parks on a pickup or dropoff, and
//! never holds a corridor for long: a yield request from a blocked mover,
//! or `stuck_limit` ticks without displacement, sends it one cell aside.

use fleet_core::{AgentId, AgentRng, Cargo, Cell, CellKind, Position, Tick};
use fleet_dispatch::DispatchRequest;
use fleet_grid::{GridResult, Path, PathQuery};

use crate::{AgentEvent, HandlingOp, Motion, Phase, StepContext, StepOutcome};

const ARRIVAL_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id:    AgentId,
    pub pos:   Position,
    pub cargo: Cargo,
    /// Remaining route; the front is always the current cell.
    pub path:  Path,
    /// The destination this agent believes it holds.  `None` while idle and
    /// while stepping aside.
    pub target: Option<Cell>,
    pub phase:  Phase,
    pub motion: Option<Motion>,
    /// Tick of the last pickup, cleared on delivery.
    pub pickup_tick: Option<Tick>,
    /// Consecutive ticks without displacement outside handling.
    pub stuck_ticks: u32,
    /// Consecutive failures to reserve the next cell.
    pub reserve_failures: u32,
    /// Earliest tick at which an idle agent seeks again.
    pub retry_at: Tick,
    /// Ticks without displacement since the last delivery.
    pub cycle_wait: u64,
    /// Ticks with displacement since the last delivery.
    pub cycle_travel: u64,
}

impl Agent {
    pub fn new(id: AgentId, start: Cell) -> Self {
        Self {
            id,
            pos: Position::from(start),
            cargo: Cargo::Empty,
            path: Path::stay(start),
            target: None,
            phase: Phase::Seeking,
            motion: None,
            pickup_tick: None,
            stuck_ticks: 0,
            reserve_failures: 0,
            retry_at: Tick::ZERO,
            cycle_wait: 0,
            cycle_travel: 0,
        }
    }

    /// Canonical integer cell (the rounded position).
    #[inline]
    pub fn cell(&self) -> Cell {
        self.pos.cell()
    }

    /// Advance this agent by one tick.
    pub fn step(&mut self, ctx: &mut StepContext<'_>, rng: &mut AgentRng) -> StepOutcome {
        let mut events = Vec::new();
        let before = self.pos;
        let asked_to_yield = ctx.ledger.take_yield_request(self.id);

        if let Phase::Handling { op, remaining } = self.phase {
            if remaining > 1 {
                self.phase = Phase::Handling { op, remaining: remaining - 1 };
            } else {
                self.finish_handling(op, ctx, rng, &mut events);
            }
        }

        if self.phase == Phase::Seeking && ctx.now >= self.retry_at {
            self.seek(ctx, rng, None, &mut events);
        }
        if asked_to_yield && self.is_idle() {
            self.step_aside(ctx, rng);
        }

        if self.phase == Phase::Moving {
            self.drive(ctx, rng, &mut events);
        }

        let moved = self.pos != before;
        let handling = self.phase.is_handling();
        self.track_progress(moved, handling, ctx, rng, &mut events);

        StepOutcome { events, moved, busy: moved || handling }
    }

    // ── Seeking ───────────────────────────────────────────────────────────

    /// Ask the dispatcher for a destination, nearest first, and take the
    /// first one there is a route to.  Candidates without a route are
    /// reported and excluded from the next ask.
    fn seek(
        &mut self,
        ctx: &mut StepContext<'_>,
        rng: &mut AgentRng,
        lost: Option<Cell>,
        events: &mut Vec<AgentEvent>,
    ) {
        let cell = self.cell();
        let mut skipped: Vec<Cell> = lost.into_iter().collect();
        loop {
            let req = DispatchRequest::new(self.id, cell, self.cargo, ctx.grid).excluding(&skipped);
            let Some(candidate) = ctx.dispatcher.choose(&req, ctx.ledger) else { break };

            let route = if candidate == cell { Ok(Path::stay(cell)) } else { self.plan(ctx, candidate) };
            let Ok(route) = route else {
                events.push(AgentEvent::PathNotFound { target: candidate });
                skipped.push(candidate);
                continue;
            };
            if !ctx.ledger.claim_destination(candidate, self.id, cell.manhattan(candidate)).is_held() {
                skipped.push(candidate);
                continue;
            }

            self.target = Some(candidate);
            if candidate == cell {
                self.begin_handling(ctx, events);
            } else {
                self.path = route;
                self.phase = Phase::Moving;
                self.reserve_failures = 0;
            }
            return;
        }

        ctx.ledger.release_destinations_of(self.id);
        self.target = None;
        self.path = Path::stay(cell);
        self.phase = Phase::Seeking;
        self.schedule_retry(ctx.now, ctx.settings.retry_delay_ticks, rng);
        if ctx.grid.kind_of(cell).is_some_and(CellKind::is_dock) {
            self.step_aside(ctx, rng);
        }
    }

    fn plan(&self, ctx: &StepContext<'_>, target: Cell) -> GridResult<Path> {
        let query = PathQuery::new(self.cell(), target, self.id)
            .at(ctx.now)
            .with_blocks(&*ctx.blocked_until)
            .with_congestion(&*ctx.congestion, ctx.settings.congestion_weight)
            .with_occupancy(&*ctx.ledger);
        ctx.finder.find(ctx.grid, &query)
    }

    /// No route to the claimed target: drop the claim and retry later.
    fn give_up_target(
        &mut self,
        ctx: &mut StepContext<'_>,
        rng: &mut AgentRng,
        events: &mut Vec<AgentEvent>,
    ) {
        if let Some(target) = self.target.take() {
            ctx.ledger.release_destination(target, self.id);
            events.push(AgentEvent::PathNotFound { target });
        }
        self.path = Path::stay(self.cell());
        self.phase = Phase::Seeking;
        self.schedule_retry(ctx.now, ctx.settings.retry_delay_ticks, rng);
    }

    fn schedule_retry(&mut self, now: Tick, max_delay: u64, rng: &mut AgentRng) {
        self.retry_at = now + rng.gen_range(1..=max_delay.max(1));
    }

    #[inline]
    fn is_idle(&self) -> bool {
        self.phase == Phase::Seeking && self.target.is_none()
    }

    /// Start a one-hop move, without a destination, to a random neighbour
    /// that is free, unreserved and not under handling.  Plain floor is
    /// preferred over docks.  Stays put if there is nowhere to go.
    fn step_aside(&mut self, ctx: &StepContext<'_>, rng: &mut AgentRng) {
        let cell = self.cell();
        let mut options: Vec<Cell> = cell
            .neighbors()
            .into_iter()
            .filter(|&n| {
                ctx.grid.is_traversable(n)
                    && ctx.ledger.holder(n).is_none()
                    && !ctx.blocked_until.get(&n).is_some_and(|&until| until > ctx.now)
            })
            .collect();
        if options.iter().any(|&n| ctx.grid.kind_of(n) == Some(CellKind::Free)) {
            options.retain(|&n| ctx.grid.kind_of(n) == Some(CellKind::Free));
        }
        if options.is_empty() {
            return;
        }
        let next = options[rng.gen_range(0..options.len())];
        self.path = Path::new([cell, next]);
        self.phase = Phase::Moving;
        self.reserve_failures = 0;
    }

    // ── Moving ────────────────────────────────────────────────────────────

    fn drive(&mut self, ctx: &mut StepContext<'_>, rng: &mut AgentRng, events: &mut Vec<AgentEvent>) {
        if self.motion.is_none() && !self.start_hop(ctx, rng, events) {
            return;
        }
        self.interpolate(ctx, events);

        if self.motion.is_none() && self.path.hops() == 0 {
            match self.target {
                Some(target) if target == self.cell() => self.begin_handling(ctx, events),
                Some(_) => {}
                None => self.phase = Phase::Seeking,
            }
        }
    }

    /// At a cell boundary: confirm the destination, then reserve the next
    /// cell.  Returns `true` if a hop is now in progress.
    fn start_hop(
        &mut self,
        ctx: &mut StepContext<'_>,
        rng: &mut AgentRng,
        events: &mut Vec<AgentEvent>,
    ) -> bool {
        let cell = self.cell();
        if let Some(target) = self.target {
            if ctx.ledger.destination_holder(target) != Some(self.id) {
                events.push(AgentEvent::Retargeted { lost: target });
                self.target = None;
                self.seek(ctx, rng, Some(target), events);
                if self.phase != Phase::Moving {
                    return false;
                }
            }
        }
        if let Some(target) = self.target {
            ctx.ledger.refresh_claim(target, self.id, cell.manhattan(target));
        }

        let Some(next) = self.path.next() else {
            match self.target {
                Some(target) if target == cell => self.begin_handling(ctx, events),
                Some(_) => {
                    self.phase = Phase::Seeking;
                    self.seek(ctx, rng, None, events);
                }
                None => self.phase = Phase::Seeking,
            }
            return false;
        };

        if !ctx.ledger.try_reserve(next, self.id) {
            if self.target.is_none() {
                // Sidestep cell taken by an earlier agent this tick.
                self.path = Path::stay(cell);
                self.phase = Phase::Seeking;
                return false;
            }
            if let Some(holder) = ctx.ledger.holder(next) {
                ctx.ledger.request_yield(holder);
            }
            self.reserve_failures += 1;
            if self.reserve_failures >= ctx.settings.reservation_retry_limit {
                self.reserve_failures = 0;
                events.push(AgentEvent::ReservationTimeout { blocked: next });
                self.reroute(ctx, rng, events);
            }
            return false;
        }

        self.reserve_failures = 0;
        self.motion = Some(Motion { from: cell, to: next, progress: 0.0 });
        true
    }

    /// Re-plan to the current target around cells now held by others.
    fn reroute(&mut self, ctx: &mut StepContext<'_>, rng: &mut AgentRng, events: &mut Vec<AgentEvent>) {
        let Some(target) = self.target else { return };
        match self.plan(ctx, target) {
            Ok(path) => self.path = path,
            Err(_) => self.give_up_target(ctx, rng, events),
        }
    }

    fn interpolate(&mut self, ctx: &mut StepContext<'_>, events: &mut Vec<AgentEvent>) {
        let Some(mut m) = self.motion else { return };
        let substeps = ctx.settings.substeps.max(1);
        let increment = ctx.settings.cells_per_tick / substeps as f64;

        for _ in 0..substeps {
            m.progress = (m.progress + increment).min(1.0);
            self.pos = Position::lerp(m.from, m.to, m.progress);

            if self.path.current() == Some(m.from) && self.pos.cell() == m.to {
                self.path.advance();
                *ctx.congestion.entry(m.to).or_insert(0) += 1;
                events.push(AgentEvent::EnteredCell { from: m.from, cell: m.to });
            }

            if m.progress >= 1.0 - ARRIVAL_EPSILON {
                self.pos = Position::from(m.to);
                ctx.ledger.release(m.from, self.id);
                self.motion = None;
                return;
            }
        }
        self.motion = Some(m);
    }

    // ── Handling ──────────────────────────────────────────────────────────

    fn begin_handling(&mut self, ctx: &mut StepContext<'_>, events: &mut Vec<AgentEvent>) {
        let cell = self.cell();
        let op = match self.cargo {
            Cargo::Empty => HandlingOp::Pick,
            Cargo::Loaded => HandlingOp::Drop,
        };
        let ticks = ctx.settings.handling_ticks.max(1);
        ctx.blocked_until.insert(cell, ctx.now + ticks);
        self.path = Path::stay(cell);
        self.phase = Phase::Handling { op, remaining: ticks };
        events.push(AgentEvent::HandlingStarted { op, cell });
    }

    fn finish_handling(
        &mut self,
        op: HandlingOp,
        ctx: &mut StepContext<'_>,
        rng: &mut AgentRng,
        events: &mut Vec<AgentEvent>,
    ) {
        let cell = self.cell();
        ctx.blocked_until.remove(&cell);

        match op {
            HandlingOp::Pick => {
                self.cargo = Cargo::Loaded;
                self.pickup_tick = Some(ctx.now);
                events.push(AgentEvent::PickedUp { cell });
            }
            HandlingOp::Drop => {
                self.cargo = Cargo::Empty;
                let cycle = self
                    .pickup_tick
                    .take()
                    .filter(|picked| picked.0 >= ctx.warmup_ticks)
                    .map(|picked| ctx.now.since(picked));
                events.push(AgentEvent::Delivered {
                    cell,
                    cycle,
                    wait: self.cycle_wait,
                    travel: self.cycle_travel,
                });
                self.cycle_wait = 0;
                self.cycle_travel = 0;
            }
        }

        if let Some(target) = self.target.take() {
            ctx.ledger.release_destination(target, self.id);
        }
        self.phase = Phase::Seeking;
        self.retry_at = ctx.now + rng.jitter(ctx.settings.cooldown_max_ticks);
    }

    // ── Progress tracking ─────────────────────────────────────────────────

    fn track_progress(
        &mut self,
        moved: bool,
        handling: bool,
        ctx: &mut StepContext<'_>,
        rng: &mut AgentRng,
        events: &mut Vec<AgentEvent>,
    ) {
        if moved {
            self.cycle_travel += 1;
            self.stuck_ticks = 0;
            return;
        }
        if handling {
            self.stuck_ticks = 0;
            return;
        }
        self.cycle_wait += 1;
        self.stuck_ticks += 1;
        if self.stuck_ticks >= ctx.settings.stuck_limit {
            let idle = self.target.is_none();
            self.reset_stuck(ctx, rng, events);
            if idle {
                self.step_aside(ctx, rng);
            }
        }
    }

    /// Abandon the path and any claims, keep only the current cell.
    fn reset_stuck(&mut self, ctx: &mut StepContext<'_>, rng: &mut AgentRng, events: &mut Vec<AgentEvent>) {
        let cell = self.cell();
        if self.motion.take().is_some() {
            self.pos = Position::from(cell);
        }
        ctx.ledger.release_all_except(self.id, cell);
        if let Some(target) = self.target.take() {
            ctx.ledger.release_destination(target, self.id);
        }
        self.path = Path::stay(cell);
        self.phase = Phase::Seeking;
        self.stuck_ticks = 0;
        self.reserve_failures = 0;
        self.schedule_retry(ctx.now, ctx.settings.retry_delay_ticks, rng);
        events.push(AgentEvent::StuckReset { cell });
    }
}
