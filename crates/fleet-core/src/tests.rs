//! Unit tests for fleet-core primitives.

#[cfg(test)]
mod ids {
    use crate::AgentId;

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering_and_sentinel() {
        assert!(AgentId(0) < AgentId(1));
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(AgentId::default(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod cell {
    use crate::{Cargo, Cell, CellKind, Position};

    #[test]
    fn manhattan_distance() {
        assert_eq!(Cell::new(8, 0).manhattan(Cell::new(2, 2)), 8);
        assert_eq!(Cell::new(3, 3).manhattan(Cell::new(3, 3)), 0);
    }

    #[test]
    fn neighbor_order_is_up_down_left_right() {
        let n = Cell::new(4, 4).neighbors();
        assert_eq!(n, [Cell::new(3, 4), Cell::new(5, 4), Cell::new(4, 3), Cell::new(4, 5)]);
    }

    #[test]
    fn codes() {
        assert_eq!(CellKind::from_code('#'), Some(CellKind::Blocked));
        assert_eq!(CellKind::from_code('P'), Some(CellKind::Pickup));
        assert_eq!(CellKind::from_code('x'), None);
        assert_eq!(CellKind::Dropoff.code(), 'D');
        assert!(!CellKind::Blocked.is_traversable());
    }

    #[test]
    fn cargo_wants_matching_zone() {
        assert_eq!(Cargo::Empty.wanted_zone(), CellKind::Pickup);
        assert_eq!(Cargo::Loaded.wanted_zone(), CellKind::Dropoff);
    }

    #[test]
    fn lerp_and_round() {
        let a = Cell::new(5, 2);
        let b = Cell::new(4, 2);
        let quarter = Position::lerp(a, b, 0.25);
        assert!((quarter.x - 4.75).abs() < 1e-12);
        assert_eq!(quarter.cell(), a);
        assert_eq!(Position::lerp(a, b, 0.75).cell(), b);
        assert_eq!(Position::lerp(a, b, 2.0), Position::from(b));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};
    use std::time::Duration;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(Tick(15).since(Tick(10)), 5);
        assert_eq!(Tick(3).since(Tick(10)), 0);
        assert_eq!(Tick(12).to_string(), "T12");
    }

    #[test]
    fn fixed_horizon_finishes() {
        let mut clock = SimClock::new(1, 2, 1.0);
        assert!(!clock.is_finished());
        clock.advance();
        assert_eq!(clock.extend_if_needed(), None);
        clock.advance();
        assert!(clock.is_finished());
    }

    #[test]
    fn auto_extend_near_end() {
        let mut clock = SimClock::new(1, 3, 1.0).with_auto_extend(3_000);
        clock.advance();
        assert_eq!(clock.extend_if_needed(), None);
        clock.advance();
        assert_eq!(clock.extend_if_needed(), Some(Tick(3_003)));
        assert!(!clock.is_finished());
    }

    #[test]
    fn wall_pacing() {
        let clock = SimClock::new(1, 10, 0.25);
        assert_eq!(clock.wall_per_tick(), Duration::from_millis(250));
        let mut slow = SimClock::new(2, 10, 1.0);
        slow.advance();
        assert_eq!(slow.elapsed_ticks(), 1);
        assert_eq!(SimClock::new(1, 10, 0.0).wall_per_tick(), Duration::ZERO);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng, SimRng};

    #[test]
    fn agent_rng_is_deterministic() {
        let mut a = AgentRng::new(42, AgentId(3));
        let mut b = AgentRng::new(42, AgentId(3));
        let xs: Vec<u64> = (0..8).map(|_| a.jitter(100)).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.jitter(100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn cloned_rng_continues_identically() {
        let mut a = AgentRng::new(7, AgentId(0));
        a.jitter(10);
        let mut b = a.clone();
        assert_eq!(a.gen_range(0..1_000u32), b.gen_range(0..1_000u32));
    }

    #[test]
    fn zero_jitter_is_zero() {
        let mut a = AgentRng::new(1, AgentId(1));
        assert_eq!(a.jitter(0), 0);
    }

    #[test]
    fn child_seeds_differ() {
        let mut root = SimRng::new(42);
        assert_ne!(root.child_seed(0), root.child_seed(1));
    }
}

#[cfg(test)]
mod config {
    use crate::{FleetConfig, FleetError};

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = FleetConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, FleetConfig::default());
        assert_eq!(cfg.agent.handling_ticks, 10);
        assert_eq!(cfg.sim.warmup_ticks, 30);
        assert_eq!(cfg.control.analysis_repetitions, 15);
    }

    #[test]
    fn partial_sections_override() {
        let cfg = FleetConfig::from_toml_str(
            "[sim]\nseed = 7\nlayout = \"warehouse_12x15\"\n[control]\nspeed_factor = 0.5\n",
        )
        .unwrap();
        assert_eq!(cfg.sim.seed, 7);
        assert_eq!(cfg.sim.layout, "warehouse_12x15");
        assert_eq!(cfg.sim.extension_ticks, 3_000);
        assert_eq!(cfg.control.speed_factor, 0.5);
    }

    #[test]
    fn invalid_speed_rejected() {
        let err = FleetConfig::from_toml_str("[control]\nspeed_factor = 0.0\n").unwrap_err();
        assert!(matches!(err, FleetError::Config(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = FleetConfig::from_toml_str("[sim\nseed = ").unwrap_err();
        assert!(matches!(err, FleetError::Toml(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("fleet.toml");
        std::fs::write(&path, "[agent]\nstuck_limit = 9\n").unwrap();
        let cfg = FleetConfig::load(&path).unwrap();
        assert_eq!(cfg.agent.stuck_limit, 9);
        assert!(matches!(
            FleetConfig::load(dir.path().join("missing.toml")),
            Err(FleetError::Io(_))
        ));
    }
}
