//! Batch analysis: independent fixed-horizon repetitions with fresh seeds.

use fleet_core::{FleetConfig, SimRng};
use fleet_grid::GridWorld;
use fleet_sim::{EngineBuilder, NoopObserver, SimResult};
use fleet_stats::{BatchSummary, Report};
use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-repetition seeds derived from `base`.  Same base, same seeds.
pub fn repetition_seeds(base: u64, repetitions: u32) -> Vec<u64> {
    let mut rng = SimRng::new(base);
    (0..repetitions as u64).map(|i| rng.child_seed(i)).collect()
}

/// Run `repetitions` independent engines for `duration` ticks each and
/// summarize their reports.
///
/// Every repetition owns its own grid copy, ledger and agents; nothing
/// mutable is shared, so with the `parallel` feature they run on Rayon's
/// pool.  Results come back in seed order either way.
pub fn run_batch(
    config:      &FleetConfig,
    grid:        Option<&GridWorld>,
    agent_count: usize,
    duration:    u64,
    repetitions: u32,
) -> SimResult<BatchSummary> {
    let seeds = repetition_seeds(config.sim.seed, repetitions);
    info!(agents = agent_count, duration, repetitions, "batch analysis started");

    let run_one = |seed: u64| -> SimResult<Report> {
        let mut builder = EngineBuilder::new(config.clone())
            .agent_count(agent_count)
            .duration(duration)
            .seed(seed);
        if let Some(g) = grid {
            builder = builder.grid(g.clone());
        }
        let mut engine = builder.build()?;
        Ok(engine.run(&mut NoopObserver))
    };

    #[cfg(feature = "parallel")]
    let reports: SimResult<Vec<Report>> = seeds.par_iter().map(|&s| run_one(s)).collect();
    #[cfg(not(feature = "parallel"))]
    let reports: SimResult<Vec<Report>> = seeds.iter().map(|&s| run_one(s)).collect();

    let summary = BatchSummary::from_reports(&reports?);
    info!(
        throughput = summary.throughput_per_hour.mean,
        std = summary.throughput_per_hour.std,
        "batch analysis finished"
    );
    Ok(summary)
}
