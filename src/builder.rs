//! Validating builders for trace boards.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::num::NonZero;

use itertools::Itertools;

use crate::location::{Dimension, Location};
use crate::shape::BoardShape;
use crate::zip::TraceBoard;

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A waypoint was placed outside the bounds specified by `dims` on a builder.
    WaypointOutOfBounds,
    /// Two waypoints were placed on the same cell.
    DuplicateWaypointCell,
    /// The same waypoint number was given to two cells.
    DuplicateWaypointNumber,
    /// Explicitly numbered waypoints do not form the contiguous sequence `1..=max`.
    NonContiguousWaypoints,
    /// A board without a single waypoint has no cell a trace may open on.
    NoWaypoints,
}

/// A builder for [`TraceBoard`]s over the grid shape `Sh`.
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some
/// point. The usual path is [`add_waypoint`](Self::add_waypoint), which numbers cells in call
/// order so the contiguous-sequence invariant holds by construction; level formats that carry
/// explicit numbers go through [`add_waypoint_numbered`](Self::add_waypoint_numbered) instead and
/// are checked at [`build`](Self::build) time.
#[derive(Clone)]
pub struct TraceBoardBuilder<Sh: BoardShape> {
    // width, height
    dims: (Dimension, Dimension),
    // (cell, number) in insertion order
    waypoints: Vec<(Location, NonZero<u16>)>,
    invalid_reasons: Vec<BuilderInvalidReason>,
    shape: PhantomData<Sh>,
}

impl<Sh: BoardShape> Default for TraceBoardBuilder<Sh> {
    fn default() -> Self {
        Self::with_dims((NonZero::new(6).unwrap(), NonZero::new(6).unwrap()))
    }
}

impl<Sh: BoardShape> TraceBoardBuilder<Sh> {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(x, y)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            waypoints: Default::default(),
            invalid_reasons: Default::default(),
            shape: PhantomData,
        }
    }

    /// Add the next waypoint in sequence at `location`; the first call places waypoint 1.
    ///
    /// May cause the builder to enter a
    /// [`WaypointOutOfBounds`](BuilderInvalidReason::WaypointOutOfBounds) invalid state if
    /// `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_waypoint(&mut self, location: Location) -> &mut Self {
        let next = NonZero::new(self.waypoints.len() as u16 + 1).unwrap();
        self.add_waypoint_numbered(next, location)
    }

    /// Add waypoint `number` at `location`.
    ///
    /// The numbers given over all calls must ultimately form `1..=max`; that is checked once by
    /// [`build`](Self::build), since it cannot be judged one call at a time.
    ///
    /// May cause the builder to enter a
    /// [`WaypointOutOfBounds`](BuilderInvalidReason::WaypointOutOfBounds) invalid state if
    /// `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn add_waypoint_numbered(&mut self, number: NonZero<u16>, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if location.0 >= self.dims.0.get() || location.1 >= self.dims.1.get() {
            self.invalid_reasons.push(BuilderInvalidReason::WaypointOutOfBounds);
            return self;
        }

        self.waypoints.push((location, number));
        self
    }

    /// Shorthand for repeated [`add_waypoint`](Self::add_waypoint) calls in iteration order, with
    /// the same conditions.
    pub fn add_waypoints(&mut self, locations: impl IntoIterator<Item = Location>) -> &mut Self {
        for location in locations {
            self.add_waypoint(location);
        }

        self
    }

    /// Remove the most recently added waypoint.
    ///
    /// If the builder is in an invalid state or no waypoints are present, this function does
    /// nothing.
    pub fn pop_waypoint(&mut self) -> &mut Self {
        if self.invalid_reasons.is_empty() {
            self.waypoints.pop();
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has
    /// arisen.
    ///
    /// Returns `None` if the builder is valid so far, `Some(&Vec<BuilderInvalidReason>)`
    /// otherwise. [`build`](Self::build) performs whole-board checks this cannot.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`TraceBoard`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of
    /// [`BuilderInvalidReason`] will indicate why.
    pub fn build(&mut self) -> Result<TraceBoard<Sh>, &Vec<BuilderInvalidReason>> {
        if self.waypoints.is_empty() {
            self.note(BuilderInvalidReason::NoWaypoints);
        }

        if !self.waypoints.iter().map(|(location, _)| location).all_unique() {
            self.note(BuilderInvalidReason::DuplicateWaypointCell);
        }

        let mut numbers = self.waypoints.iter().map(|(_, number)| number.get()).collect_vec();
        numbers.sort_unstable();
        if !numbers.iter().copied().eq(1..=self.waypoints.len() as u16) {
            match numbers.iter().all_unique() {
                false => self.note(BuilderInvalidReason::DuplicateWaypointNumber),
                true => self.note(BuilderInvalidReason::NonContiguousWaypoints),
            }
        }

        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let mut by_cell = HashMap::with_capacity(self.waypoints.len());
        let mut cells_by_number = vec![Location(0, 0); self.waypoints.len()];
        for (location, number) in &self.waypoints {
            by_cell.insert(*location, *number);
            cells_by_number[number.get() as usize - 1] = *location;
        }

        Ok(TraceBoard {
            dims: self.dims,
            numbers: by_cell,
            cells_by_number,
            shape: PhantomData,
        })
    }

    // build() may run more than once; don't report the same reason twice
    fn note(&mut self, reason: BuilderInvalidReason) {
        if !self.invalid_reasons.contains(&reason) {
            self.invalid_reasons.push(reason);
        }
    }
}
