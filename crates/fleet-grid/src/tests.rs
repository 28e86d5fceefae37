//! Unit tests for fleet-grid.

#[cfg(test)]
mod world {
    use crate::{GridError, GridWorld, GridWorldBuilder};
    use fleet_core::{Cell, CellKind};

    #[test]
    fn parse_and_lookup() {
        let g = GridWorld::parse("D.D\n.#.\n.P.\n").unwrap();
        assert_eq!((g.rows(), g.cols()), (3, 3));
        assert_eq!(g.kind_of(Cell::new(1, 1)), Some(CellKind::Blocked));
        assert_eq!(g.kind_of(Cell::new(2, 1)), Some(CellKind::Pickup));
        assert_eq!(g.dropoffs(), &[Cell::new(0, 0), Cell::new(0, 2)]);
        assert_eq!(g.pickups(), &[Cell::new(2, 1)]);
        assert_eq!(g.render(), "D.D\n.#.\n.P.\n");
    }

    #[test]
    fn out_of_bounds_is_not_traversable() {
        let g = GridWorld::parse("..\n..").unwrap();
        assert_eq!(g.kind_of(Cell::new(-1, 0)), None);
        assert!(!g.is_traversable(Cell::new(0, 2)));
        assert_eq!(
            g.check_traversable(Cell::new(5, 5)),
            Err(GridError::NotTraversable(Cell::new(5, 5)))
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(GridWorld::parse("\n\n"), Err(GridError::Empty));
        assert!(matches!(
            GridWorld::parse("...\n..\n"),
            Err(GridError::RaggedRows { row: 1, expected: 3, found: 2 })
        ));
        assert!(matches!(
            GridWorld::parse("..x\n"),
            Err(GridError::UnknownCellCode { code: 'x', row: 0, col: 2 })
        ));
    }

    #[test]
    fn nearest_ties_break_row_major() {
        let g = GridWorld::parse("D...D\n.....\n..P..\n").unwrap();
        // (2,2) is 4 from both docks; (0,0) comes first.
        assert_eq!(g.nearest(CellKind::Dropoff, Cell::new(2, 2)), Some(Cell::new(0, 0)));
        assert_eq!(g.nearest(CellKind::Dropoff, Cell::new(1, 4)), Some(Cell::new(0, 4)));
        assert_eq!(
            g.nearest_where(CellKind::Dropoff, Cell::new(2, 2), |c| c != Cell::new(0, 0)),
            Some(Cell::new(0, 4))
        );
        assert_eq!(g.nearest_where(CellKind::Pickup, Cell::new(0, 0), |_| false), None);
    }

    #[test]
    fn builder_marks_and_rejects_outside() {
        let g = GridWorldBuilder::new(3, 4)
            .row_of(0, CellKind::Dropoff)
            .block((1, 1))
            .pickup((2, 3))
            .build()
            .unwrap();
        assert_eq!(g.dropoffs().len(), 4);
        assert_eq!(g.cells_of(CellKind::Blocked), vec![Cell::new(1, 1)]);
        let err = GridWorldBuilder::new(2, 2).block((2, 0)).build().unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { .. }));
    }
}

#[cfg(test)]
mod layouts {
    use crate::layouts::{by_name, from_settings, warehouse_12x15, warehouse_9x7};
    use crate::GridError;
    use fleet_core::{Cell, CellKind, SimSettings};

    #[test]
    fn presets_have_expected_zones() {
        let small = warehouse_9x7().unwrap();
        assert_eq!((small.rows(), small.cols()), (9, 7));
        assert_eq!(small.pickups().len(), 6);
        assert_eq!(small.dropoffs().len(), 7);
        assert_eq!(small.kind_of(Cell::new(2, 1)), Some(CellKind::Blocked));

        let large = warehouse_12x15().unwrap();
        assert_eq!((large.rows(), large.cols()), (12, 15));
        assert_eq!(
            large.pickups(),
            &[Cell::new(3, 3), Cell::new(3, 12), Cell::new(5, 4), Cell::new(8, 6), Cell::new(9, 12)]
        );
    }

    #[test]
    fn lookup_by_name_and_settings() {
        assert!(by_name("warehouse_12x15").is_ok());
        assert_eq!(by_name("nope"), Err(GridError::UnknownLayout("nope".into())));
        let settings = SimSettings { map: Some("DP\n..".into()), ..SimSettings::default() };
        assert_eq!(from_settings(&settings).unwrap().len(), 4);
    }
}

#[cfg(test)]
mod finder {
    use std::collections::BTreeMap;

    use crate::{AStarPathFinder, GridError, GridWorld, Occupancy, PathFinder, PathQuery};
    use fleet_core::{AgentId, Cell, Tick};

    fn open(rows: usize, cols: usize) -> GridWorld {
        let line = ".".repeat(cols);
        GridWorld::parse(&vec![line; rows].join("\n")).unwrap()
    }

    #[test]
    fn straight_line_includes_both_ends() {
        let g = open(5, 5);
        let q = PathQuery::new(Cell::new(4, 0), Cell::new(0, 0), AgentId(0));
        let p = AStarPathFinder.find(&g, &q).unwrap();
        assert_eq!(p.len(), 5);
        assert_eq!(p.current(), Some(Cell::new(4, 0)));
        assert_eq!(p.destination(), Some(Cell::new(0, 0)));
    }

    #[test]
    fn same_cell_is_one_cell_path() {
        let g = open(3, 3);
        let q = PathQuery::new(Cell::new(1, 1), Cell::new(1, 1), AgentId(0));
        assert_eq!(AStarPathFinder.find(&g, &q).unwrap().len(), 1);
    }

    #[test]
    fn path_never_touches_blocked_cells() {
        let g = GridWorld::parse(".....\n.###.\n.....\n").unwrap();
        let q = PathQuery::new(Cell::new(2, 2), Cell::new(0, 2), AgentId(0));
        let p = AStarPathFinder.find(&g, &q).unwrap();
        assert_eq!(p.hops(), 6);
        assert!(p.iter().all(|c| g.is_traversable(c)));
        assert!(p.iter().zip(p.iter().skip(1)).all(|(a, b)| a.is_adjacent(b)));
    }

    #[test]
    fn enclosed_goal_is_no_path() {
        let g = GridWorld::parse(".....\n.###.\n.#.#.\n.###.\n.....\n").unwrap();
        let q = PathQuery::new(Cell::new(0, 0), Cell::new(2, 2), AgentId(0));
        assert_eq!(
            AStarPathFinder.find(&g, &q),
            Err(GridError::NoPath { from: Cell::new(0, 0), to: Cell::new(2, 2) })
        );
    }

    #[test]
    fn blocked_goal_is_not_traversable() {
        let g = GridWorld::parse("..#\n").unwrap();
        let q = PathQuery::new(Cell::new(0, 0), Cell::new(0, 2), AgentId(0));
        assert_eq!(
            AStarPathFinder.find(&g, &q),
            Err(GridError::NotTraversable(Cell::new(0, 2)))
        );
    }

    #[test]
    fn handling_block_excluded_until_expiry() {
        let g = GridWorld::parse("...\n").unwrap();
        let mut blocks = BTreeMap::new();
        blocks.insert(Cell::new(0, 1), Tick(10));
        let q = PathQuery::new(Cell::new(0, 0), Cell::new(0, 2), AgentId(0)).with_blocks(&blocks);
        assert!(AStarPathFinder.find(&g, &q.at(Tick(9))).is_err());
        assert_eq!(AStarPathFinder.find(&g, &q.at(Tick(10))).unwrap().hops(), 2);
    }

    struct Held(Cell, AgentId);

    impl Occupancy for Held {
        fn is_held_by_other(&self, cell: Cell, agent: AgentId) -> bool {
            cell == self.0 && agent != self.1
        }
    }

    #[test]
    fn routes_around_cells_held_by_others() {
        let g = open(3, 3);
        let held = Held(Cell::new(1, 1), AgentId(1));
        let q = PathQuery::new(Cell::new(1, 0), Cell::new(1, 2), AgentId(0)).with_occupancy(&held);
        let p = AStarPathFinder.find(&g, &q).unwrap();
        assert!(!p.contains(Cell::new(1, 1)));
        assert_eq!(p.hops(), 4);
        // The holder itself may pass through.
        let own = PathQuery::new(Cell::new(1, 0), Cell::new(1, 2), AgentId(1)).with_occupancy(&held);
        assert_eq!(AStarPathFinder.find(&g, &own).unwrap().hops(), 2);
    }

    #[test]
    fn congestion_diverts_equal_length_route() {
        let g = open(2, 3);
        let start = Cell::new(0, 0);
        let goal = Cell::new(1, 2);
        let plain = AStarPathFinder.find(&g, &PathQuery::new(start, goal, AgentId(0))).unwrap();
        let mut counts = BTreeMap::new();
        for c in plain.iter().skip(1).take(plain.hops() - 1) {
            counts.insert(c, 5u32);
        }
        let q = PathQuery::new(start, goal, AgentId(0)).with_congestion(&counts, 1);
        let diverted = AStarPathFinder.find(&g, &q).unwrap();
        assert_eq!(diverted.hops(), plain.hops());
        assert_ne!(diverted, plain);
    }

    #[test]
    fn deterministic_across_calls() {
        let g = open(6, 6);
        let q = PathQuery::new(Cell::new(5, 0), Cell::new(0, 5), AgentId(0));
        assert_eq!(AStarPathFinder.find(&g, &q), AStarPathFinder.find(&g, &q));
    }
}
