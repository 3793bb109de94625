#![warn(missing_docs)]

//! # `daedal`
//!
//! The algorithmic core of a family of casual grid mini-games: perfect-maze carving and
//! sequence-trace ("connect the numbers while filling every cell") puzzle validation.
//! The crate traffics in plain grid data only; rendering, gestures, timers, haptics, and scores
//! live in a presentation layer on the other side of this API.
//!
//! Carve a maze with [`Maze::generate`] (or [`Maze::generate_seeded`] for reproducible levels)
//! and hand the frozen cells from [`Maze::to_cells`] to a renderer. Build a trace level through a
//! [`TraceBoardBuilder`](builder::TraceBoardBuilder), then feed each touched cell to
//! [`TraceBoard::apply`] and poll [`TraceBoard::is_won`].
//!
//! `daedal` can operate on generic board shapes, as encoded by the `Sh` type parameter.
//! These shapes must implement [`Step`](shape::Step) and will automatically have
//! [`BoardShape`](shape::BoardShape) `impl`'d as well; [`SquareStep`](shape::SquareStep) is the
//! shape every shipped game uses.
//!
//! # Internals
//! A maze is an undirected [`petgraph`] graph whose vertices are grid cells and whose edges are
//! open passages, so wall agreement between neighbors holds by construction, and the
//! recursive-backtracker carve leaves a spanning tree: every pair of cells is joined by exactly
//! one open-walled path.
//!
//! Winning-trace search for authored levels is driven by expressing the board as a Boolean
//! satisfiability problem over cell-by-position variables and extracting the trace from the
//! model; see [`TraceSolver`](solver::TraceSolver).

pub use location::Location;
pub use maze::{Maze, MazeError};
pub use zip::{Trace, TraceBoard, TraceStep};
pub use cell::{MazeCell, TraceCell};

pub mod builder;
pub(crate) mod cell;
pub(crate) mod location;
pub(crate) mod logic;
pub(crate) mod maze;
pub mod shape;
pub mod solver;
mod tests;
#[cfg(feature = "wasm")]
pub mod wasm;
pub(crate) mod zip;
