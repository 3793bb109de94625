//! Flat-data bindings for JavaScript hosts.
//!
//! The presentation layer owns rendering, gestures, and timing; these entry points traffic only
//! in flat cell indices and per-cell bitmasks.

use std::num::NonZero;

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;

use crate::builder::TraceBoardBuilder;
use crate::location::Location;
use crate::maze::Maze;
use crate::shape::SquareStep;
use crate::zip::{Trace, TraceBoard, TraceStep};

// Exit bits of one cell's bitmask.
const EXIT_UP: u8 = 1 << 0;
const EXIT_DOWN: u8 = 1 << 1;
const EXIT_LEFT: u8 = 1 << 2;
const EXIT_RIGHT: u8 = 1 << 3;

fn exit_bit(direction: SquareStep) -> u8 {
    match direction {
        SquareStep::Up => EXIT_UP,
        SquareStep::Down => EXIT_DOWN,
        SquareStep::Left => EXIT_LEFT,
        SquareStep::Right => EXIT_RIGHT,
    }
}

fn exit_masks(maze: &Maze<SquareStep>) -> Uint8Array {
    let masks = maze.to_cells().iter()
        .map(|cell| cell.exits().iter().fold(0u8, |mask, dir| mask | exit_bit(*dir)))
        .collect::<Vec<_>>();

    Uint8Array::from(masks.as_slice())
}

/// Carve a maze and return one open-exit bitmask per cell, row-major.
///
/// Bits: 1 = up, 2 = down, 4 = left, 8 = right.
#[wasm_bindgen]
pub fn carve_maze(columns: u32, rows: u32) -> Result<Uint8Array, JsError> {
    Maze::<SquareStep>::generate((columns as usize, rows as usize))
        .map(|maze| exit_masks(&maze))
        .map_err(|error| JsError::new(&format!("{error:?}")))
}

/// Carve the maze `seed` always carves; bitmask layout as in [`carve_maze`].
#[wasm_bindgen]
pub fn carve_maze_seeded(columns: u32, rows: u32, seed: u64) -> Result<Uint8Array, JsError> {
    Maze::<SquareStep>::generate_seeded((columns as usize, rows as usize), seed)
        .map(|maze| exit_masks(&maze))
        .map_err(|error| JsError::new(&format!("{error:?}")))
}

/// One play-through of a trace level, holding the board and the current path for a JS host.
#[wasm_bindgen]
pub struct TraceSession {
    board: TraceBoard<SquareStep>,
    trace: Trace,
}

#[wasm_bindgen]
impl TraceSession {
    /// Build a session from grid dimensions and waypoint cells as flat indices, waypoint 1 first.
    #[wasm_bindgen(constructor)]
    pub fn new(columns: u32, rows: u32, waypoints: Vec<u32>) -> Result<TraceSession, JsError> {
        let (Some(width), Some(height)) =
            (NonZero::new(columns as usize), NonZero::new(rows as usize))
        else {
            return Err(JsError::new("dimensions must be nonzero"));
        };

        let mut builder = TraceBoardBuilder::<SquareStep>::with_dims((width, height));
        builder.add_waypoints(
            waypoints.iter().map(|flat| Location::from_flat(*flat as usize, columns as usize)),
        );
        let board = builder
            .build()
            .map_err(|reasons| JsError::new(&format!("{reasons:?}")))?;

        Ok(Self {
            trace: board.new_trace(),
            board,
        })
    }

    /// Feed one touched cell by flat index. Returns 0 = rejected, 1 = extended, 2 = backtracked.
    pub fn step(&mut self, index: u32) -> u8 {
        let touched = Location::from_flat(index as usize, self.board.columns());
        match self.board.apply(&mut self.trace, touched) {
            TraceStep::Rejected => 0,
            TraceStep::Extended => 1,
            TraceStep::Backtracked { .. } => 2,
        }
    }

    /// Whether the current trace wins the level.
    pub fn is_won(&self) -> bool {
        self.board.is_won(&self.trace)
    }

    /// The next waypoint number to collect.
    pub fn next_required(&self) -> u16 {
        self.board.next_required(&self.trace)
    }

    /// The cells traced so far, as flat indices in trace order.
    pub fn trace_cells(&self) -> Vec<u32> {
        self.trace.cells().iter()
            .map(|cell| cell.flatten(self.board.columns()) as u32)
            .collect()
    }

    /// Drop the trace, as when the level restarts.
    pub fn reset(&mut self) {
        self.trace.clear();
    }
}
