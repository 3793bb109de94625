//! SAT-backed search for winning traces.

use std::convert::identity;

use itertools::Itertools;
use log::debug;
use varisat::{CnfFormula, Lit, Solver, Var};

use crate::logic::{exactly_one, implies_any};
use crate::location::Location;
use crate::shape::BoardShape;
use crate::zip::{Trace, TraceBoard};

/// Reasons a [`TraceSolver`] may fail.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SolverFailure {
    /// The SAT solver detected a logical inconsistency, i.e. the board as laid out has no winning
    /// trace.
    Unsolvable,
    /// The SAT solver could not assign a cell to at least one trace position.
    /// This should probably never happen.
    NoAssignment,
}

/// Searches a [`TraceBoard`] for a winning trace by expressing the board as a Boolean
/// satisfiability problem, solving it, and reading the trace back out of the model.
/// Use [`Self::solve`] to attempt the search.
///
/// # Logical setup
/// Let the board have N cells. The variable `x(c, p)` states that cell `c` is the `p`-th cell of
/// the trace.
///
/// ## Positions and cells
/// Every position holds exactly one cell, and every cell occupies exactly one position.
/// Together these make any model a full-coverage visit with no revisits.
///
/// ## Steps
/// A cell at position `p` forces one of its edge-sharing neighbors at position `p + 1`, so
/// consecutive trace cells are always adjacent.
///
/// ## Waypoints
/// Waypoint 1 is assumed at position 0, and for every consecutive pair of waypoint numbers the
/// lower number is banned from sitting at or after the higher number's position. With the
/// contiguity the builder guarantees, the numbered cells of any model then read `1..=max` along
/// the trace, which is exactly the win condition.
pub struct TraceSolver<'a, Sh: BoardShape> {
    board: &'a TraceBoard<Sh>,
}

impl<'a, Sh: BoardShape> From<&'a TraceBoard<Sh>> for TraceSolver<'a, Sh> {
    fn from(board: &'a TraceBoard<Sh>) -> Self {
        Self { board }
    }
}

impl<Sh: BoardShape> TraceSolver<'_, Sh> {
    #[inline]
    fn cell_count(&self) -> usize {
        self.board.cell_count()
    }

    // x(c, p): the cell with flat index `cell` sits at trace position `position`
    #[inline]
    fn position_var(&self, cell: usize, position: usize) -> Var {
        Var::from_index(position * self.cell_count() + cell)
    }

    fn flat_neighbors(&self, cell: usize) -> Vec<usize> {
        let columns = self.board.columns();
        Sh::neighbors_of(Location::from_flat(cell, columns)).into_iter()
            .filter(|(_, neighbor)| neighbor.0 < columns && neighbor.1 < self.board.rows())
            .map(|(_, neighbor)| neighbor.flatten(columns))
            .collect_vec()
    }

    /// Solve, returning [`Ok`] with a winning [`Trace`] or [`Err`] with a [`SolverFailure`]
    /// reason. A returned trace always satisfies [`TraceBoard::is_won`].
    pub fn solve(&self) -> Result<Trace, SolverFailure> {
        let n = self.cell_count();
        let columns = self.board.columns();
        let mut assumptions: Vec<Lit> = Vec::new();
        let mut formulae: Vec<CnfFormula> = Vec::new();

        for position in 0..n {
            // every position holds exactly one cell
            formulae.push(CnfFormula::from(exactly_one(
                &(0..n).map(|cell| self.position_var(cell, position)).collect_vec(),
            )));
        }

        for cell in 0..n {
            // every cell occupies exactly one position
            formulae.push(CnfFormula::from(exactly_one(
                &(0..n).map(|position| self.position_var(cell, position)).collect_vec(),
            )));
        }

        for position in 0..n.saturating_sub(1) {
            for cell in 0..n {
                // a cell here forces one of its neighbors next
                formulae.push(CnfFormula::from(vec![implies_any(
                    self.position_var(cell, position),
                    self.flat_neighbors(cell).into_iter()
                        .map(|neighbor| self.position_var(neighbor, position + 1)),
                )]));
            }
        }

        // the trace opens on waypoint 1; the builder guarantees it exists
        let opener = self.board.cell_of(1).unwrap().flatten(columns);
        assumptions.push(self.position_var(opener, 0).positive());

        // consecutive waypoint numbers appear in order: the lower may never sit at or after the
        // position of the higher
        for (lower, higher) in self.board.cells_by_number.iter().tuple_windows() {
            let (lower, higher) = (lower.flatten(columns), higher.flatten(columns));
            for late in 0..n {
                for early in 0..=late {
                    formulae.push(CnfFormula::from(vec![vec![
                        self.position_var(lower, late).negative(),
                        self.position_var(higher, early).negative(),
                    ]]));
                }
            }
        }

        debug!("encoded {} formulae over {} cells", formulae.len(), n);

        let mut solver = Solver::new();
        formulae.into_iter().for_each(|formula| solver.add_formula(&formula));
        solver.assume(&assumptions);
        if !solver.solve().is_ok_and(identity) {
            return Err(SolverFailure::Unsolvable);
        }
        let model = solver.model().unwrap();

        let mut trace = self.board.new_trace();
        for position in 0..n {
            let held = (0..n)
                .find(|cell| model.get(self.position_var(*cell, position).index()).unwrap().is_positive());
            match held {
                None => return Err(SolverFailure::NoAssignment),
                Some(cell) => trace.cells.push(Location::from_flat(cell, columns)),
            }
        }

        debug!("found a winning trace of {} cells", trace.len());

        Ok(trace)
    }
}
