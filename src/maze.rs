use std::fmt::{Display, Formatter};
use std::num::NonZero;

use itertools::Itertools;
use log::debug;
use ndarray::Array2;
use petgraph::algo::astar;
use petgraph::graphmap::UnGraphMap;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use unordered_pair::UnorderedPair;

use crate::cell::MazeCell;
use crate::location::{Dimension, Location};
use crate::shape::{BoardShape, SquareStep};

/// Reasons maze generation may refuse to run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MazeError {
    /// A requested dimension was zero. Checked before any allocation.
    InvalidDimension,
}

#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub(crate) struct Passage<Sh> {
    // direction from the lower indexed cell, always "forward"
    pub(crate) direction: Sh,
}

/// A carved maze of cells organized as specified by `Sh`.
///
/// The maze is an undirected graph whose vertices are cells; an edge between two adjacent cells is
/// an open passage, so a wall's absence is seen identically from both of its sides by
/// construction. Carving yields a spanning tree over the grid: every cell is reachable from every
/// other by exactly one open-walled path, with no loops.
///
/// The structure is immutable once [`generate`](Self::generate) returns. Renderers usually want
/// the frozen form from [`to_cells`](Self::to_cells).
pub struct Maze<Sh: BoardShape> {
    pub(crate) graph: UnGraphMap<Location, Passage<Sh>>,
    pub(crate) dims: (Dimension, Dimension),
}

impl<Sh: BoardShape> Maze<Sh> {
    /// Carve a maze of the given `(columns, rows)` dimensions with ambient randomness.
    ///
    /// # Errors
    ///
    /// [`MazeError::InvalidDimension`] if either dimension is zero.
    pub fn generate(dims: (usize, usize)) -> Result<Self, MazeError> {
        Self::generate_with(dims, &mut rand::rng())
    }

    /// Carve the maze that `seed` always carves, for reproducible levels.
    ///
    /// # Errors
    ///
    /// [`MazeError::InvalidDimension`] if either dimension is zero.
    pub fn generate_seeded(dims: (usize, usize), seed: u64) -> Result<Self, MazeError> {
        Self::generate_with(dims, &mut StdRng::seed_from_u64(seed))
    }

    /// Carve a maze, drawing all randomness from `rng`.
    ///
    /// This is the recursive backtracker: starting from the top left cell, repeatedly open the
    /// wall to a uniformly chosen unvisited neighbor of the cell on top of the stack, retreating
    /// whenever no unvisited neighbor remains. Every cell is visited exactly once, so the open
    /// passages number one fewer than the cells.
    ///
    /// # Errors
    ///
    /// [`MazeError::InvalidDimension`] if either dimension is zero.
    pub fn generate_with<R: Rng>(dims: (usize, usize), rng: &mut R) -> Result<Self, MazeError> {
        let (Some(width), Some(height)) = (NonZero::new(dims.0), NonZero::new(dims.1)) else {
            return Err(MazeError::InvalidDimension);
        };

        let mut graph = UnGraphMap::with_capacity(dims.0 * dims.1, dims.0 * dims.1 - 1);
        for y in 0..dims.1 {
            for x in 0..dims.0 {
                graph.add_node(Location(x, y));
            }
        }

        // carving scratch state; the returned structure never sees it
        let mut visited = Array2::from_elem((dims.1, dims.0), false);
        let mut stack = Vec::with_capacity(dims.0 * dims.1);

        visited[Location(0, 0).as_index()] = true;
        stack.push(Location(0, 0));

        while let Some(&current) = stack.last() {
            let candidates = Sh::neighbors_of(current).into_iter()
                .filter(|(_, neighbor)| neighbor.0 < dims.0 && neighbor.1 < dims.1)
                .filter(|(_, neighbor)| !visited[neighbor.as_index()])
                .collect_vec();

            match candidates.choose(rng) {
                Some(&(direction, next)) => {
                    visited[next.as_index()] = true;
                    graph.add_edge(current, next, Passage { direction: direction.ensure_forward() });
                    stack.push(next);
                }
                None => {
                    stack.pop();
                }
            }
        }

        debug!("carved {} passages over {} cells", graph.edge_count(), graph.node_count());

        Ok(Self {
            graph,
            dims: (width, height),
        })
    }

    /// Width of the maze in cells.
    pub fn columns(&self) -> usize {
        self.dims.0.get()
    }

    /// Height of the maze in cells.
    pub fn rows(&self) -> usize {
        self.dims.1.get()
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.columns() * self.rows()
    }

    pub(crate) fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.columns() && location.1 < self.rows()
    }

    /// Whether the passage between the two cells of `pair` is open.
    ///
    /// `false` for pairs that are not adjacent or not on the board.
    pub fn is_open(&self, pair: UnorderedPair<Location>) -> bool {
        self.graph.contains_edge(pair.0, pair.1)
    }

    /// Freeze the maze into an array of per-cell open-exit sets, indexed in `(row, column)` order.
    pub fn to_cells(&self) -> Array2<MazeCell<Sh>> {
        let mut ret = Array2::from_shape_simple_fn((self.rows(), self.columns()), MazeCell::default);

        for (index, cell) in ret.indexed_iter_mut() {
            let this = Location::from(index);
            for (n1, n2, passage) in self.graph.edges(this) {
                let neighbor = if n1 == this { n2 } else { n1 };
                // the stored direction reads from the lower indexed endpoint
                cell.exits.insert(match this < neighbor {
                    true => passage.direction,
                    false => passage.direction.invert(),
                });
            }
        }

        ret
    }

    /// The open-walled path from `from` to `to`, endpoints included.
    ///
    /// A carved maze connects every pair of in-bounds cells, so this returns [`None`] only when an
    /// endpoint is off the board. Which cells act as entrance and exit is the level definition's
    /// business, not the maze's; both endpoints are always explicit here.
    pub fn solve(&self, from: Location, to: Location) -> Option<Vec<Location>> {
        if !self.in_bounds(from) || !self.in_bounds(to) {
            return None;
        }

        astar(
            &self.graph,
            from,
            |node| node == to,
            |_| 1usize,
            |node| node.0.abs_diff(to.0) + node.1.abs_diff(to.1),
        )
        .map(|(_, path)| path)
    }
}

impl Display for Maze<SquareStep> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let cells = self.to_cells();

        for row in cells.rows() {
            for cell in row.iter() {
                write!(f, "+{}", if cell.has_wall(SquareStep::Up) { "--" } else { "  " })?;
            }
            writeln!(f, "+")?;
            for cell in row.iter() {
                write!(f, "{}  ", if cell.has_wall(SquareStep::Left) { "|" } else { " " })?;
            }
            writeln!(f, "|")?;
        }
        for _ in 0..self.columns() {
            write!(f, "+--")?;
        }
        writeln!(f, "+")
    }
}
