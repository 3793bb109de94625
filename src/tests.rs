#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::num::NonZero;

    use itertools::Itertools;
    use strum::VariantArray;
    use unordered_pair::UnorderedPair;

    use crate::builder::{BuilderInvalidReason, TraceBoardBuilder};
    use crate::location::{Dimension, Location};
    use crate::maze::{Maze, MazeError};
    use crate::shape::{BoardShape, SquareStep, Step};
    use crate::solver::SolverFailure;
    use crate::zip::{TraceBoard, TraceStep};

    fn dims(x: usize, y: usize) -> (Dimension, Dimension) {
        (NonZero::new(x).unwrap(), NonZero::new(y).unwrap())
    }

    // waypoint 1 in the top left corner, waypoint 2 in the bottom right
    fn board_2x2() -> TraceBoard<SquareStep> {
        TraceBoardBuilder::with_dims(dims(2, 2))
            .add_waypoint(Location(0, 0))
            .add_waypoint(Location(1, 1))
            .build()
            .unwrap()
    }

    fn reachable_cells(maze: &Maze<SquareStep>) -> usize {
        let mut seen = HashSet::from([Location(0, 0)]);
        let mut stack = vec![Location(0, 0)];
        while let Some(current) = stack.pop() {
            for neighbor in maze.graph.neighbors(current) {
                if seen.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        seen.len()
    }

    #[test]
    fn carved_mazes_are_spanning_trees() {
        for (dims, seed) in [
            ((1, 1), 0),
            ((8, 1), 1),
            ((1, 8), 2),
            ((4, 4), 3),
            ((7, 5), 99),
            ((12, 9), 12345),
        ] {
            let maze = Maze::<SquareStep>::generate_seeded(dims, seed).unwrap();
            assert_eq!(maze.graph.node_count(), maze.cell_count());
            // spanning tree edge count; with full reachability below this rules out cycles
            assert_eq!(maze.graph.edge_count(), maze.cell_count() - 1);
            assert_eq!(reachable_cells(&maze), maze.cell_count());
        }
    }

    #[test]
    fn walls_agree_between_neighbors() {
        let maze = Maze::<SquareStep>::generate_seeded((6, 4), 7).unwrap();
        let cells = maze.to_cells();

        for ((row, column), cell) in cells.indexed_iter() {
            let here = Location(column, row);
            for direction in SquareStep::VARIANTS {
                let there = direction.attempt_from(here);
                if there.0 < maze.columns() && there.1 < maze.rows() {
                    let neighbor = cells.get(there.as_index()).unwrap();
                    assert_eq!(cell.is_open(*direction), neighbor.is_open(direction.invert()));
                    assert_eq!(
                        cell.is_open(*direction),
                        maze.is_open(UnorderedPair::from((here, there)))
                    );
                } else {
                    assert!(cell.has_wall(*direction));
                }
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let first = Maze::<SquareStep>::generate_seeded((10, 10), 42).unwrap();
        let second = Maze::<SquareStep>::generate_seeded((10, 10), 42).unwrap();

        assert_eq!(format!("{}", first), format!("{}", second));
    }

    #[test]
    fn zero_dimensions_fail_fast() {
        assert!(matches!(
            Maze::<SquareStep>::generate((0, 5)),
            Err(MazeError::InvalidDimension)
        ));
        assert!(matches!(
            Maze::<SquareStep>::generate((5, 0)),
            Err(MazeError::InvalidDimension)
        ));
    }

    #[test]
    fn single_cell_maze() {
        let maze = Maze::<SquareStep>::generate((1, 1)).unwrap();

        assert_eq!(format!("{}", maze), "+--+
|  |
+--+
");
        assert_eq!(maze.solve(Location(0, 0), Location(0, 0)), Some(vec![Location(0, 0)]));
    }

    #[test]
    fn corridors_carve_to_the_only_possible_maze() {
        // a 1-cell-thick grid admits exactly one spanning tree, whatever the rng does
        let across = Maze::<SquareStep>::generate((3, 1)).unwrap();
        assert_eq!(format!("{}", across), "+--+--+--+
|        |
+--+--+--+
");

        let down = Maze::<SquareStep>::generate((1, 3)).unwrap();
        assert_eq!(format!("{}", down), "+--+
|  |
+  +
|  |
+  +
|  |
+--+
");
    }

    #[test]
    fn maze_path_query_walks_open_passages() {
        let maze = Maze::<SquareStep>::generate_seeded((7, 5), 21).unwrap();
        let goal = Location(6, 4);

        let path = maze.solve(Location(0, 0), goal).unwrap();
        assert_eq!(path.first().copied(), Some(Location(0, 0)));
        assert_eq!(path.last().copied(), Some(goal));
        for (a, b) in path.iter().tuple_windows() {
            assert!(maze.is_open(UnorderedPair::from((*a, *b))));
        }

        assert_eq!(maze.solve(Location(0, 0), Location(7, 0)), None);
    }

    #[test]
    fn flat_index_round_trips() {
        let columns = 7;
        for y in 0..4 {
            for x in 0..columns {
                let location = Location(x, y);
                assert_eq!(Location::from_flat(location.flatten(columns), columns), location);
            }
        }

        assert_eq!(Location(2, 1).flatten(7), 9);
    }

    #[test]
    fn trace_opens_only_on_waypoint_one() {
        let board = board_2x2();
        let trace = board.new_trace();

        assert!(board.can_extend(&trace, Location(0, 0)));
        assert!(!board.can_extend(&trace, Location(1, 0)));
        assert!(!board.can_extend(&trace, Location(0, 1)));
        // waypoint 2 is not a start either
        assert!(!board.can_extend(&trace, Location(1, 1)));
    }

    #[test]
    fn extensions_require_shared_edges() {
        let board = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3))
            .add_waypoint(Location(0, 0))
            .add_waypoint(Location(2, 2))
            .build()
            .unwrap();
        let mut trace = board.new_trace();
        assert!(board.extend(&mut trace, Location(0, 0)));

        // diagonal, distant, and off-board candidates all miss, even the required waypoint
        assert!(!board.can_extend(&trace, Location(1, 1)));
        assert!(!board.can_extend(&trace, Location(2, 0)));
        assert!(!board.can_extend(&trace, Location(2, 2)));
        assert!(!board.can_extend(&trace, Location(3, 0)));

        assert!(board.can_extend(&trace, Location(1, 0)));
        assert!(board.can_extend(&trace, Location(0, 1)));
    }

    #[test]
    fn waypoints_must_be_hit_in_order() {
        let board = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3))
            .add_waypoint(Location(0, 0))
            .add_waypoint(Location(1, 0))
            .add_waypoint(Location(0, 1))
            .add_waypoint(Location(2, 0))
            .build()
            .unwrap();
        let mut trace = board.new_trace();

        assert_eq!(board.next_required(&trace), 1);
        assert!(board.extend(&mut trace, Location(0, 0)));
        assert!(board.extend(&mut trace, Location(1, 0)));
        assert_eq!(board.next_required(&trace), 3);

        // waypoint 4 may not jump the queue, adjacency notwithstanding
        assert!(!board.can_extend(&trace, Location(2, 0)));
        // unnumbered cells stay free to cross
        assert!(board.can_extend(&trace, Location(1, 1)));
    }

    #[test]
    fn backtrack_truncates_through_target() {
        let board = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3))
            .add_waypoint(Location(0, 0))
            .add_waypoint(Location(2, 2))
            .build()
            .unwrap();
        let mut trace = board.new_trace();
        for flat in [0, 1, 2, 5, 8] {
            assert!(board.extend(&mut trace, Location::from_flat(flat, 3)));
        }

        assert!(board.backtrack(&mut trace, Location::from_flat(2, 3)));
        assert_eq!(
            trace.cells(),
            [Location(0, 0), Location(1, 0), Location(2, 0)].as_slice()
        );

        // touching the head is a no-op
        assert!(!board.backtrack(&mut trace, Location(2, 0)));
        // as is a cell that was never traced
        assert!(!board.backtrack(&mut trace, Location(0, 2)));
        assert_eq!(trace.len(), 3);
    }

    #[test]
    fn apply_dispatches_like_a_touch_stream() {
        let board = board_2x2();
        let mut trace = board.new_trace();

        assert_eq!(board.apply(&mut trace, Location(1, 0)), TraceStep::Rejected);
        assert_eq!(board.apply(&mut trace, Location(0, 0)), TraceStep::Extended);
        assert_eq!(board.apply(&mut trace, Location(1, 0)), TraceStep::Extended);
        assert_eq!(board.apply(&mut trace, Location(1, 1)), TraceStep::Extended);
        assert_eq!(
            board.apply(&mut trace, Location(0, 0)),
            TraceStep::Backtracked { dropped: 2 }
        );
        // the head rejects a second touch rather than backtracking to itself
        assert_eq!(board.apply(&mut trace, Location(0, 0)), TraceStep::Rejected);
        assert_eq!(trace.cells(), [Location(0, 0)].as_slice());
    }

    #[test]
    fn full_coverage_with_ordered_waypoints_wins() {
        let board = board_2x2();

        // both full-coverage traces from the corner pass 1 before 2
        for flats in [[0, 1, 3, 2], [0, 2, 3, 1]] {
            let mut trace = board.new_trace();
            for flat in flats {
                assert!(board.extend(&mut trace, Location::from_flat(flat, 2)));
            }
            assert!(board.is_won(&trace));
        }
    }

    #[test]
    fn ordered_waypoints_without_coverage_do_not_win() {
        let board = board_2x2();
        let mut trace = board.new_trace();
        for flat in [0, 1, 3] {
            assert!(board.extend(&mut trace, Location::from_flat(flat, 2)));
        }

        // waypoints 1 and 2 both collected, one cell short of coverage
        assert_eq!(board.next_required(&trace), 3);
        assert!(!board.is_won(&trace));
    }

    #[test]
    fn single_cell_level_wins_immediately() {
        let board = TraceBoardBuilder::<SquareStep>::with_dims(dims(1, 1))
            .add_waypoint(Location(0, 0))
            .build()
            .unwrap();
        let mut trace = board.new_trace();

        assert!(board.extend(&mut trace, Location(0, 0)));
        assert!(board.is_won(&trace));
    }

    #[test]
    fn dead_ends_recover_by_backtracking() {
        let board = TraceBoardBuilder::<SquareStep>::with_dims(dims(2, 2))
            .add_waypoints([Location(0, 0), Location(0, 1), Location(1, 1)])
            .build()
            .unwrap();
        let mut trace = board.new_trace();
        assert!(board.has_legal_moves(&trace));

        assert!(board.extend(&mut trace, Location(0, 0)));
        assert!(board.extend(&mut trace, Location(1, 0)));
        // from (1, 0): (0, 0) is already traced and (1, 1) holds waypoint 3, not the required 2
        assert!(!board.has_legal_moves(&trace));

        assert!(board.backtrack(&mut trace, Location(0, 0)));
        assert!(board.has_legal_moves(&trace));
        assert!(board.extend(&mut trace, Location(0, 1)));
        assert!(board.extend(&mut trace, Location(1, 1)));
        assert!(board.extend(&mut trace, Location(1, 0)));
        assert!(board.is_won(&trace));
    }

    #[test]
    fn frozen_trace_cells_carry_waypoints() {
        let board = board_2x2();
        let cells = board.to_cells();

        assert_eq!(cells.get((0, 0)).unwrap().waypoint().map(NonZero::get), Some(1));
        assert_eq!(cells.get((1, 1)).unwrap().waypoint().map(NonZero::get), Some(2));
        assert!(cells.get((0, 1)).unwrap().waypoint().is_none());
    }

    #[test]
    fn trace_board_displays_waypoint_digits() {
        let board = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3))
            .add_waypoints([Location(0, 0), Location(2, 1), Location(1, 2)])
            .build()
            .unwrap();

        assert_eq!(format!("{}", board), "1..
..2
.3.
");
    }

    #[test]
    fn builder_rejects_out_of_bounds_waypoints() {
        let mut builder = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3));
        builder.add_waypoint(Location(3, 0));

        assert!(matches!(
            builder.is_valid(),
            Some(reasons) if reasons.contains(&BuilderInvalidReason::WaypointOutOfBounds)
        ));
        assert!(builder.build().is_err());
    }

    #[test]
    fn builder_rejects_doubled_cells() {
        let mut builder = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3));
        let result = builder
            .add_waypoint(Location(0, 0))
            .add_waypoint(Location(0, 0))
            .build();

        assert!(matches!(
            result,
            Err(reasons) if reasons.contains(&BuilderInvalidReason::DuplicateWaypointCell)
        ));
    }

    #[test]
    fn builder_rejects_gapped_numbering() {
        let mut builder = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3));
        let result = builder
            .add_waypoint_numbered(NonZero::new(1).unwrap(), Location(0, 0))
            .add_waypoint_numbered(NonZero::new(3).unwrap(), Location(2, 2))
            .build();

        assert!(matches!(
            result,
            Err(reasons) if reasons.contains(&BuilderInvalidReason::NonContiguousWaypoints)
        ));
    }

    #[test]
    fn builder_rejects_doubled_numbers() {
        let mut builder = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3));
        let result = builder
            .add_waypoint_numbered(NonZero::new(1).unwrap(), Location(0, 0))
            .add_waypoint_numbered(NonZero::new(1).unwrap(), Location(1, 1))
            .build();

        assert!(matches!(
            result,
            Err(reasons) if reasons.contains(&BuilderInvalidReason::DuplicateWaypointNumber)
        ));
    }

    #[test]
    fn builder_requires_a_waypoint() {
        let mut builder = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3));
        let result = builder.build();

        assert!(matches!(
            result,
            Err(reasons) if reasons.contains(&BuilderInvalidReason::NoWaypoints)
        ));
    }

    #[test]
    fn pop_waypoint_reverts_the_last_add() {
        let board = TraceBoardBuilder::<SquareStep>::with_dims(dims(2, 2))
            .add_waypoint(Location(0, 0))
            .add_waypoint(Location(1, 0))
            .pop_waypoint()
            .add_waypoint(Location(1, 1))
            .build()
            .unwrap();

        assert_eq!(board.waypoint_at(Location(1, 0)), None);
        assert_eq!(board.waypoint_at(Location(1, 1)).map(NonZero::get), Some(2));
    }

    #[test]
    fn solver_finds_a_winning_trace() {
        let board = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3))
            .add_waypoints([Location(0, 0), Location(2, 2)])
            .build()
            .unwrap();

        let trace = board.solve().unwrap();
        assert!(board.is_won(&trace));
        for (a, b) in trace.cells().iter().tuple_windows() {
            assert!(SquareStep::direction_to(*a, *b).is_some());
        }
    }

    #[test]
    fn solver_reports_unsolvable_layouts() {
        // a full-coverage trace on 3x3 must open on a corner or the center; (1, 0) cannot
        let board = TraceBoardBuilder::<SquareStep>::with_dims(dims(3, 3))
            .add_waypoints([Location(1, 0), Location(2, 2)])
            .build()
            .unwrap();

        assert!(matches!(board.solve(), Err(SolverFailure::Unsolvable)));
    }

    #[test]
    fn solver_honors_waypoint_order() {
        // the only full-coverage trace of a corridor runs left to right, passing 3 before 2
        let blocked = TraceBoardBuilder::<SquareStep>::with_dims(dims(4, 1))
            .add_waypoints([Location(0, 0), Location(3, 0), Location(2, 0)])
            .build()
            .unwrap();
        assert!(matches!(blocked.solve(), Err(SolverFailure::Unsolvable)));

        let ordered = TraceBoardBuilder::<SquareStep>::with_dims(dims(4, 1))
            .add_waypoints([Location(0, 0), Location(2, 0), Location(3, 0)])
            .build()
            .unwrap();
        let trace = ordered.solve().unwrap();
        assert_eq!(
            trace.cells(),
            [Location(0, 0), Location(1, 0), Location(2, 0), Location(3, 0)].as_slice()
        );
    }
}
