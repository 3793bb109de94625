use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::num::NonZero;

use ndarray::Array2;

use crate::cell::TraceCell;
use crate::location::{Dimension, Location};
use crate::shape::{BoardShape, SquareStep};
use crate::solver::{SolverFailure, TraceSolver};

/// Outcome of feeding one touched cell to [`TraceBoard::apply`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TraceStep {
    /// The cell was appended to the trace.
    Extended,
    /// The trace was cut back to the touched cell.
    Backtracked {
        /// Number of cells removed from the tail of the trace.
        dropped: usize,
    },
    /// The touch was ignored. An everyday interaction outcome, not an error.
    Rejected,
}

/// The player's current path: an ordered, duplicate-free run of edge-adjacent cells.
///
/// A trace is owned by the caller and mutated only through [`TraceBoard`] operations, which
/// uphold the adjacency and no-revisit invariants. One trace corresponds to one attempt at a
/// level; [`clear`](Self::clear) it on restart.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Trace {
    pub(crate) cells: Vec<Location>,
}

impl Trace {
    /// Number of cells visited so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the trace has no cells yet.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `location` is on the trace.
    pub fn contains(&self, location: Location) -> bool {
        self.cells.contains(&location)
    }

    /// The most recently visited cell.
    pub fn last(&self) -> Option<Location> {
        self.cells.last().copied()
    }

    /// The visited cells, oldest first.
    pub fn cells(&self) -> &[Location] {
        &self.cells
    }

    /// Drop every cell, as when the level restarts.
    pub fn clear(&mut self) {
        self.cells.clear()
    }
}

/// A static trace-puzzle definition: grid dimensions plus numbered waypoint cells.
///
/// The rules are those of the "connect the numbers while filling every cell" puzzles: a trace
/// opens on waypoint 1, grows one adjacent unvisited cell at a time, must collect the numbered
/// cells in increasing order, and wins once every cell on the board has been covered.
///
/// [`TraceBoard`]s should be built using a [`TraceBoardBuilder`](crate::builder::TraceBoardBuilder),
/// which guarantees the waypoint numbers form the contiguous sequence `1..=max_waypoint`.
pub struct TraceBoard<Sh: BoardShape> {
    pub(crate) dims: (Dimension, Dimension),
    // cell -> number and number - 1 -> cell: two views of the same contiguous sequence
    pub(crate) numbers: HashMap<Location, NonZero<u16>>,
    pub(crate) cells_by_number: Vec<Location>,
    pub(crate) shape: PhantomData<Sh>,
}

impl<Sh: BoardShape> TraceBoard<Sh> {
    /// Width of the board in cells.
    pub fn columns(&self) -> usize {
        self.dims.0.get()
    }

    /// Height of the board in cells.
    pub fn rows(&self) -> usize {
        self.dims.1.get()
    }

    /// Total number of cells; a winning trace is exactly this long.
    pub fn cell_count(&self) -> usize {
        self.columns() * self.rows()
    }

    pub(crate) fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.columns() && location.1 < self.rows()
    }

    /// The waypoint number on `location`, if any.
    pub fn waypoint_at(&self, location: Location) -> Option<NonZero<u16>> {
        self.numbers.get(&location).copied()
    }

    /// The highest waypoint number on the board.
    pub fn max_waypoint(&self) -> u16 {
        self.cells_by_number.len() as u16
    }

    /// The cell holding waypoint `number`, if the board goes that high.
    pub fn cell_of(&self, number: u16) -> Option<Location> {
        self.cells_by_number.get(number.checked_sub(1)? as usize).copied()
    }

    /// A fresh, empty trace for this board.
    pub fn new_trace(&self) -> Trace {
        Trace::default()
    }

    /// The next waypoint number `trace` must collect: one past the highest already on it.
    ///
    /// Exposed so a UI can highlight the next target.
    pub fn next_required(&self, trace: &Trace) -> u16 {
        trace.cells.iter()
            .filter_map(|cell| self.waypoint_at(*cell))
            .map(NonZero::get)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Whether appending `candidate` to `trace` is a legal forward extension.
    ///
    /// An empty trace accepts only the waypoint-1 cell. A non-empty trace accepts a cell that is
    /// not yet visited, shares an edge with the trace head, and, if numbered, carries exactly
    /// [`next_required`](Self::next_required). Unnumbered cells may be crossed freely.
    pub fn can_extend(&self, trace: &Trace, candidate: Location) -> bool {
        if !self.in_bounds(candidate) {
            return false;
        }

        let Some(head) = trace.last() else {
            // the trace may only open on waypoint 1
            return self.waypoint_at(candidate).is_some_and(|number| number.get() == 1);
        };

        if trace.contains(candidate) {
            // a revisit is backtracking territory, never an extension
            return false;
        }

        if Sh::direction_to(head, candidate).is_none() {
            return false;
        }

        match self.waypoint_at(candidate) {
            Some(number) => number.get() == self.next_required(trace),
            None => true,
        }
    }

    /// Append `candidate` to `trace` if legal. Returns whether the trace grew.
    pub fn extend(&self, trace: &mut Trace, candidate: Location) -> bool {
        let legal = self.can_extend(trace, candidate);
        if legal {
            trace.cells.push(candidate);
        }
        legal
    }

    /// Cut `trace` back through `target`, dropping everything drawn after it.
    ///
    /// Touching the head is a no-op, as is touching a cell that was never traced.
    /// Returns whether the trace shrank.
    pub fn backtrack(&self, trace: &mut Trace, target: Location) -> bool {
        match trace.cells.iter().position(|visited| *visited == target) {
            Some(index) if index + 1 < trace.cells.len() => {
                trace.cells.truncate(index + 1);
                true
            }
            _ => false,
        }
    }

    /// Feed one touched cell to the board, the way an input layer does per tap: try a forward
    /// extension first, fall back to backtracking, otherwise ignore the touch.
    pub fn apply(&self, trace: &mut Trace, touched: Location) -> TraceStep {
        if self.extend(trace, touched) {
            return TraceStep::Extended;
        }

        let before = trace.len();
        if self.backtrack(trace, touched) {
            return TraceStep::Backtracked { dropped: before - trace.len() };
        }

        TraceStep::Rejected
    }

    /// Whether `trace` wins the level: every cell covered, and the numbered cells along the trace
    /// reading exactly `1..=max_waypoint`.
    pub fn is_won(&self, trace: &Trace) -> bool {
        if trace.len() != self.cell_count() {
            return false;
        }

        trace.cells.iter()
            .filter_map(|cell| self.waypoint_at(*cell))
            .map(NonZero::get)
            .eq(1..=self.max_waypoint())
    }

    /// Whether any legal forward extension exists from the current head.
    ///
    /// The board never polices dead ends on its own; a trace can paint itself into a corner and
    /// recover through [`backtrack`](Self::backtrack). This query lets a UI hint that backtracking
    /// is the only way forward.
    pub fn has_legal_moves(&self, trace: &Trace) -> bool {
        match trace.last() {
            // waypoint 1 always exists
            None => true,
            Some(head) => Sh::neighbors_of(head).into_iter()
                .any(|(_, neighbor)| self.can_extend(trace, neighbor)),
        }
    }

    /// Freeze the board into an array of per-cell waypoint data, indexed in `(row, column)` order.
    pub fn to_cells(&self) -> Array2<TraceCell> {
        Array2::from_shape_fn((self.rows(), self.columns()), |index| TraceCell {
            waypoint: self.waypoint_at(Location::from(index)),
        })
    }

    /// Search for a winning trace, deferring to a [`TraceSolver`].
    ///
    /// Level authors run this to confirm a layout is beatable before shipping it.
    /// Returns according to the result of [`TraceSolver::solve`].
    pub fn solve(&self) -> Result<Trace, SolverFailure> {
        TraceSolver::from(self).solve()
    }
}

impl Display for TraceBoard<SquareStep> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.rows() {
            for x in 0..self.columns() {
                let glyph = match self.waypoint_at(Location(x, y)) {
                    Some(number) => char::from_digit(number.get() as u32, 36).unwrap_or('#'),
                    None => '.',
                };
                write!(f, "{}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
