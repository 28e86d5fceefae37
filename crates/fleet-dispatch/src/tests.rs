//! Unit tests for fleet-dispatch.

#[cfg(test)]
mod nearest {
    use crate::{DispatchRequest, Dispatcher, NearestDispatcher};
    use fleet_core::{AgentId, Cargo, Cell};
    use fleet_grid::GridWorld;
    use fleet_reserve::ReservationLedger;

    fn grid() -> GridWorld {
        GridWorld::parse(
            "DDDDDDD
             .......
             .#P#P#.
             .#.#.#.
             .......
             .......",
        )
        .unwrap()
    }

    /// Choose, then claim the way an agent does once it has a route.
    fn assign(req: &DispatchRequest<'_>, l: &mut ReservationLedger) -> Option<Cell> {
        let target = NearestDispatcher.choose(req, l)?;
        assert!(l.claim_destination(target, req.agent, req.from.manhattan(target)).is_held());
        Some(target)
    }

    #[test]
    fn empty_goes_to_pickup_loaded_to_dropoff() {
        let g = grid();
        let l = ReservationLedger::new();
        let pick = NearestDispatcher
            .choose(&DispatchRequest::new(AgentId(0), Cell::new(5, 2), Cargo::Empty, &g), &l);
        assert_eq!(pick, Some(Cell::new(2, 2)));
        let drop = NearestDispatcher
            .choose(&DispatchRequest::new(AgentId(0), Cell::new(2, 4), Cargo::Loaded, &g), &l);
        assert_eq!(drop, Some(Cell::new(0, 4)));
        // Choosing never writes a claim.
        assert_eq!(l.destinations().count(), 0);
    }

    #[test]
    fn contested_pickup_goes_to_one_agent_only() {
        let g = grid();
        let mut l = ReservationLedger::new();
        // Both are 4 away from (2,2); the lower id wins it.
        let a = DispatchRequest::new(AgentId(0), Cell::new(5, 1), Cargo::Empty, &g);
        let b = DispatchRequest::new(AgentId(1), Cell::new(5, 3), Cargo::Empty, &g);
        let ta = assign(&a, &mut l);
        let tb = assign(&b, &mut l);
        assert_eq!(ta, Some(Cell::new(2, 2)));
        assert_eq!(tb, Some(Cell::new(2, 4)));
        assert_ne!(ta, tb);
    }

    #[test]
    fn strictly_closer_agent_steals_and_loser_moves_on() {
        let g = grid();
        let mut l = ReservationLedger::new();
        let far = DispatchRequest::new(AgentId(0), Cell::new(5, 0), Cargo::Empty, &g);
        let near = DispatchRequest::new(AgentId(1), Cell::new(5, 2), Cargo::Empty, &g);
        assert_eq!(assign(&far, &mut l), Some(Cell::new(2, 2)));
        assert_eq!(assign(&near, &mut l), Some(Cell::new(2, 2)));
        let lost = [Cell::new(2, 2)];
        assert_eq!(assign(&far.excluding(&lost), &mut l), Some(Cell::new(2, 4)));
        // The new claim replaced nothing of the winner's.
        assert_eq!(l.destination_holder(Cell::new(2, 2)), Some(AgentId(1)));
    }

    #[test]
    fn excluded_candidates_fall_through_by_distance() {
        let g = grid();
        let l = ReservationLedger::new();
        let req = DispatchRequest::new(AgentId(0), Cell::new(1, 3), Cargo::Loaded, &g);
        assert_eq!(NearestDispatcher.choose(&req, &l), Some(Cell::new(0, 3)));

        // Equal distances resolve row-major, so (0,2) comes before (0,4).
        let unreachable = [Cell::new(0, 3)];
        assert_eq!(NearestDispatcher.choose(&req.excluding(&unreachable), &l), Some(Cell::new(0, 2)));
        let unreachable = [Cell::new(0, 3), Cell::new(0, 2)];
        assert_eq!(NearestDispatcher.choose(&req.excluding(&unreachable), &l), Some(Cell::new(0, 4)));

        let everything: Vec<Cell> = g.dropoffs().to_vec();
        assert_eq!(NearestDispatcher.choose(&req.excluding(&everything), &l), None);
    }

    #[test]
    fn occupied_dock_is_skipped() {
        let g = grid();
        let mut l = ReservationLedger::new();
        l.try_reserve(Cell::new(0, 2), AgentId(5));
        let req = DispatchRequest::new(AgentId(0), Cell::new(1, 2), Cargo::Loaded, &g);
        assert_eq!(NearestDispatcher.choose(&req, &l), Some(Cell::new(0, 1)));
    }

    #[test]
    fn nothing_claimable_yields_none() {
        let g = GridWorld::parse("P.D\n...").unwrap();
        let mut l = ReservationLedger::new();
        l.claim_destination(Cell::new(0, 0), AgentId(1), 0);
        let req = DispatchRequest::new(AgentId(0), Cell::new(1, 2), Cargo::Empty, &g);
        assert_eq!(NearestDispatcher.choose(&req, &l), None);
        assert_eq!(l.destination_holder(Cell::new(0, 0)), Some(AgentId(1)));
    }
}
