//! warehouse: end-to-end tour of the AGV fleet simulator.
//!
//! 1. A fixed-horizon run on the configured layout, exported to CSV.
//! 2. An interactive session on background threads: telemetry, a speed
//!    change, pause and resume, stop.
//! 3. A batch analysis over independent seeds.
//!
//! Usage: `warehouse [config.toml]`.  Log verbosity follows `RUST_LOG`.

use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use fleet_control::{Command, Controller, Response, Runner, TelemetryFrame};
use fleet_core::FleetConfig;
use fleet_output::{CsvWriter, OutputWriter, SimOutputObserver};
use fleet_sim::{EngineBuilder, LiveFrame, SimObserver};
use fleet_stats::Report;

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:       usize = 6;
const RUN_TICKS:         u64   = 3_600; // one virtual hour at 1 s/tick
const POSITION_INTERVAL: u64   = 10;
const OUTPUT_DIR:        &str  = "output/warehouse";

// Interactive session: fast enough to watch a few hundred ticks go by.
const LIVE_SPEED:        f64   = 0.002;
const LIVE_SPEED_FAST:   f64   = 0.0005;
const LIVE_PHASE:        Duration = Duration::from_millis(400);

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:  SimOutputObserver<W>,
    frames: usize,
}

impl<W: OutputWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, frame: &LiveFrame) {
        self.frames += 1;
        self.inner.on_tick_end(frame);
    }

    fn on_sim_end(&mut self, final_tick: fleet_core::Tick, report: &Report) {
        self.inner.on_sim_end(final_tick, report);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("warehouse=info".parse()?),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("loading configuration from {path}");
            FleetConfig::load(&path)?
        }
        None => FleetConfig::default(),
    };

    println!("=== warehouse: AGV fleet simulator ===");
    println!(
        "Layout: {}  |  Agents: {AGENT_COUNT}  |  Seed: {}",
        config.sim.map.as_deref().map_or(config.sim.layout.as_str(), |_| "inline map"),
        config.sim.seed
    );
    println!();

    fixed_run(&config)?;
    interactive_session(&config)?;
    batch_analysis(&config)?;
    Ok(())
}

// ── 1. Fixed-horizon run ──────────────────────────────────────────────────────

fn fixed_run(config: &FleetConfig) -> Result<()> {
    let mut engine = EngineBuilder::new(config.clone())
        .agent_count(AGENT_COUNT)
        .duration(RUN_TICKS)
        .build()?;
    println!("{}", engine.grid.render());

    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver {
        inner:  SimOutputObserver::new(writer, POSITION_INTERVAL),
        frames: 0,
    };

    let t0 = Instant::now();
    let report = engine.run(&mut obs);
    let elapsed = t0.elapsed();
    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    println!("Run of {RUN_TICKS} ticks complete in {:.3} s", elapsed.as_secs_f64());
    println!("  tick_summaries.csv : {} rows", obs.frames);
    println!("  output directory   : {OUTPUT_DIR}");
    println!(
        "  recovery           : {} no-path, {} timeouts, {} stuck resets, {} retargets",
        engine.recovery.path_not_found,
        engine.recovery.reservation_timeouts,
        engine.recovery.stuck_resets,
        engine.recovery.retargets,
    );
    println!("  collisions         : {}", engine.collisions);
    println!();
    print_report(&report);
    Ok(())
}

fn print_report(report: &Report) {
    println!(
        "Delivered {} in {} ticks: {:.1}/h, {:.2} per agent, utilization {:.1} %",
        report.delivered,
        report.elapsed_ticks,
        report.throughput_per_hour,
        report.deliveries_per_agent,
        report.utilization * 100.0,
    );
    println!(
        "Average cycle {:.1}  |  wait {:.1}  |  travel {:.1} ticks",
        report.avg_cycle_ticks, report.avg_wait_ticks, report.avg_travel_ticks
    );
    println!("{:<8} {:>8} {:>11} {:>10} {:>8}", "Agent", "Pickups", "Deliveries", "Cycle", "Util");
    println!("{}", "-".repeat(49));
    for a in &report.per_agent {
        println!(
            "{:<8} {:>8} {:>11} {:>10.1} {:>7.1}%",
            a.agent.0,
            a.pickups,
            a.deliveries,
            a.avg_cycle_ticks,
            a.utilization * 100.0
        );
    }
    println!();
}

// ── 2. Interactive session ────────────────────────────────────────────────────

fn interactive_session(config: &FleetConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel::<TelemetryFrame>();
    let interval = Duration::from_millis(config.control.telemetry_interval_ms);
    let mut runner = Runner::spawn(Controller::new(config.clone()), tx, interval)?;

    runner.send(Command::Start {
        agent_count:      AGENT_COUNT,
        initial_duration: config.sim.initial_duration_ticks,
        speed_factor:     LIVE_SPEED,
    })?;
    thread::sleep(LIVE_PHASE);

    runner.send(Command::SetSpeed(LIVE_SPEED_FAST))?;
    thread::sleep(LIVE_PHASE);

    if let Response::Paused { tick, delivered } = runner.send(Command::Pause)? {
        println!("Paused at {tick} with {delivered} delivered");
    }
    thread::sleep(LIVE_PHASE / 2);
    runner.send(Command::Resume)?;
    thread::sleep(LIVE_PHASE);

    let stopped = runner.send(Command::Stop)?;
    runner.shutdown();

    let frames: Vec<TelemetryFrame> = rx.try_iter().collect();
    println!("Telemetry: {} frames", frames.len());
    if let Some(last) = frames.last() {
        println!("Last frame: {}", serde_json::to_string(last)?);
    }
    if let Response::Stopped(report) = stopped {
        print_report(&report);
    }
    Ok(())
}

// ── 3. Batch analysis ─────────────────────────────────────────────────────────

fn batch_analysis(config: &FleetConfig) -> Result<()> {
    let mut controller = Controller::new(config.clone());
    let repetitions = config.control.analysis_repetitions;

    let t0 = Instant::now();
    let response = controller.handle(Command::Analyze {
        agent_count: AGENT_COUNT,
        duration:    RUN_TICKS,
        repetitions,
    })?;
    let elapsed = t0.elapsed();

    if let Response::Analysis(summary) = response {
        println!(
            "Batch of {repetitions} runs in {:.3} s: throughput {:.1} ± {:.1} per hour",
            elapsed.as_secs_f64(),
            summary.throughput_per_hour.mean,
            summary.throughput_per_hour.std,
        );
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
