//! Unit tests for fleet-stats.

#[cfg(test)]
mod collector {
    use crate::StatsCollector;
    use fleet_core::{AgentId, Cell, Tick};

    #[test]
    fn delivery_counts_and_histories() {
        let mut s = StatsCollector::new(2, 100, 8);
        s.record_pickup(AgentId(0));
        s.record_delivery(AgentId(0), Some(40), 3, 20);
        s.record_delivery(AgentId(1), None, 5, 10);
        assert_eq!(s.delivered(), 2);
        let a0 = s.agent(AgentId(0)).unwrap();
        assert_eq!((a0.pickups, a0.deliveries), (1, 1));
        assert_eq!(a0.cycle_times, vec![40]);
        assert!(s.agent(AgentId(1)).unwrap().cycle_times.is_empty());
        // Unknown agents are ignored rather than panicking.
        s.record_delivery(AgentId(9), None, 0, 0);
        assert_eq!(s.delivered(), 2);
    }

    #[test]
    fn trace_is_capped_to_most_recent() {
        let mut s = StatsCollector::new(1, 100, 3);
        for t in 0..5 {
            s.record_position(AgentId(0), Tick(t), Cell::new(0, t as i32));
        }
        let trace = &s.agent(AgentId(0)).unwrap().trace;
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.front().map(|p| p.tick), Some(Tick(2)));
    }

    #[test]
    fn history_sampled_on_interval_only() {
        let mut s = StatsCollector::new(1, 10, 0);
        assert!(!s.sample(Tick(0)));
        assert!(!s.sample(Tick(5)));
        s.record_delivery(AgentId(0), None, 0, 0);
        assert!(s.sample(Tick(10)));
        assert!(!s.sample(Tick(10)));
        assert!(s.sample(Tick(20)));
        assert_eq!(s.history(), &[(Tick(10), 1), (Tick(20), 1)]);
    }

    #[test]
    fn report_rates() {
        let mut s = StatsCollector::new(2, 100, 0);
        s.record_delivery(AgentId(0), Some(30), 4, 16);
        s.record_delivery(AgentId(0), Some(50), 6, 24);
        s.record_delivery(AgentId(1), Some(40), 2, 8);
        for _ in 0..90 {
            s.record_activity(AgentId(0), true);
        }
        for _ in 0..45 {
            s.record_activity(AgentId(1), true);
            s.record_activity(AgentId(1), false);
        }

        let r = s.report(180, 1);
        assert_eq!(r.delivered, 3);
        assert!((r.throughput_per_hour - 60.0).abs() < 1e-9);
        assert!((r.deliveries_per_agent - 1.5).abs() < 1e-9);
        assert!((r.avg_cycle_ticks - 40.0).abs() < 1e-9);
        // Per-agent means (5, 2) and (20, 8), not the pooled 4 and 16.
        assert!((r.avg_wait_ticks - 3.5).abs() < 1e-9);
        assert!((r.avg_travel_ticks - 14.0).abs() < 1e-9);
        assert!((r.per_agent[0].utilization - 0.5).abs() < 1e-9);
        assert!((r.per_agent[1].utilization - 0.25).abs() < 1e-9);
        assert!((r.utilization - 0.375).abs() < 1e-9);
    }

    #[test]
    fn agents_without_cycles_count_as_zero() {
        let mut s = StatsCollector::new(3, 100, 0);
        s.record_delivery(AgentId(0), Some(30), 6, 12);
        s.record_delivery(AgentId(2), None, 3, 9);

        let r = s.report(100, 1);
        assert!((r.avg_cycle_ticks - 10.0).abs() < 1e-9);
        assert!((r.avg_wait_ticks - 3.0).abs() < 1e-9);
        assert!((r.avg_travel_ticks - 7.0).abs() < 1e-9);
        assert_eq!(r.per_agent[1].avg_cycle_ticks, 0.0);
    }

    #[test]
    fn empty_report_is_all_zero() {
        let r = StatsCollector::new(0, 1, 0).report(0, 1);
        assert_eq!(r.throughput_per_hour, 0.0);
        assert_eq!(r.deliveries_per_agent, 0.0);
        assert_eq!(r.utilization, 0.0);
    }
}

#[cfg(test)]
mod batch {
    use crate::{BatchSummary, Spread, StatsCollector};
    use fleet_core::AgentId;

    #[test]
    fn spread_uses_sample_std() {
        let s = Spread::of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(Spread::of(&[3.0]), Spread { mean: 3.0, std: 0.0 });
        assert_eq!(Spread::of(&[]), Spread::default());
    }

    #[test]
    fn summary_over_reports() {
        let reports: Vec<_> = [2u64, 4]
            .iter()
            .map(|&n| {
                let mut s = StatsCollector::new(2, 100, 0);
                for _ in 0..n {
                    s.record_delivery(AgentId(0), Some(10), 0, 5);
                }
                s.report(3_600, 1)
            })
            .collect();
        let b = BatchSummary::from_reports(&reports);
        assert_eq!(b.repetitions, 2);
        assert_eq!(b.agent_count, 2);
        assert!((b.throughput_per_hour.mean - 3.0).abs() < 1e-9);
        assert!((b.throughput_per_hour.std - 2f64.sqrt()).abs() < 1e-9);
        assert!((b.avg_cycle_ticks.mean - 10.0).abs() < 1e-9);
        assert_eq!(b.avg_cycle_ticks.std, 0.0);
    }
}
