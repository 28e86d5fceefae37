//! Mean and spread across independent repetitions.

use crate::Report;

/// Mean and sample standard deviation of one metric.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Spread {
    pub mean: f64,
    /// Sample (n − 1) standard deviation; 0 for fewer than two samples.
    pub std:  f64,
}

impl Spread {
    pub fn of(xs: &[f64]) -> Self {
        let n = xs.len();
        if n == 0 {
            return Self::default();
        }
        let mean = xs.iter().sum::<f64>() / n as f64;
        let std = if n < 2 {
            0.0
        } else {
            let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        };
        Self { mean, std }
    }
}

/// Summary of a batch analysis.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BatchSummary {
    pub repetitions:          usize,
    pub agent_count:          usize,
    pub throughput_per_hour:  Spread,
    pub deliveries_per_agent: Spread,
    pub avg_cycle_ticks:      Spread,
    pub avg_wait_ticks:       Spread,
    pub avg_travel_ticks:     Spread,
    pub utilization:          Spread,
}

impl BatchSummary {
    pub fn from_reports(reports: &[Report]) -> Self {
        Self {
            repetitions:          reports.len(),
            agent_count:          reports.first().map(|r| r.agent_count).unwrap_or(0),
            throughput_per_hour:  column(reports, |r| r.throughput_per_hour),
            deliveries_per_agent: column(reports, |r| r.deliveries_per_agent),
            avg_cycle_ticks:      column(reports, |r| r.avg_cycle_ticks),
            avg_wait_ticks:       column(reports, |r| r.avg_wait_ticks),
            avg_travel_ticks:     column(reports, |r| r.avg_travel_ticks),
            utilization:          column(reports, |r| r.utilization),
        }
    }
}

fn column(reports: &[Report], metric: impl Fn(&Report) -> f64) -> Spread {
    Spread::of(&reports.iter().map(metric).collect::<Vec<_>>())
}
