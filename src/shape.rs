//! Board geometry: step directions and the adjacency rules they induce.

use std::hash::Hash;

use itertools::Itertools;
use strum::VariantArray;

use crate::location::Location;

/// Functionality that must be implemented on a case-by-case basis for any board shape.
///
/// [`SquareStep`] is the built-in implementation.
pub trait Step: Sized + Copy + VariantArray + PartialEq + Eq + Hash + Ord + PartialOrd {
    /// Attempt the step from `location` in the direction specified by `self` and return the
    /// resultant [`Location`].
    ///
    /// The result is not bounds-checked; callers filter against their own dimensions.
    fn attempt_from(&self, location: Location) -> Location;
    /// The static array of all "forward" directions.
    ///
    /// Forward directions should be those which, upon stepping from one location to another, cause
    /// the destination location to be indexed higher than the origin location.
    /// For [`SquareStep`] and given the row-major ordering of the cell array,
    /// [`Down`](SquareStep::Down) and [`Right`](SquareStep::Right) are forward directions.
    const FORWARD_VARIANTS: &'static [Self];
    /// Invert the direction specified by `self`.
    fn invert(&self) -> Self;
}

/// The square cell type and rectangular board shape used by every shipped mini-game.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum SquareStep {
    Up,
    Down,
    Left,
    Right,
}

impl Step for SquareStep {
    fn attempt_from(&self, location: Location) -> Location {
        match self {
            Self::Up => location.offset_by((0, -1)),
            Self::Down => location.offset_by((0, 1)),
            Self::Left => location.offset_by((-1, 0)),
            Self::Right => location.offset_by((1, 0)),
        }
    }

    const FORWARD_VARIANTS: &'static [Self] = &[Self::Right, Self::Down];

    fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Functionality on top of [`Step`] with identical implementation across all `Sh`.
pub trait BoardShape: Step {
    /// Get all neighbors of a [`Location`] in "theory", by attempting every step direction in
    /// `Self::VARIANTS`.
    fn neighbors_of(location: Location) -> Vec<(Self, Location)>;
    /// Determine the direction from `a` to `b` by calling [`attempt_from`](Step::attempt_from)
    /// until one works.
    ///
    /// Returns [`Some`] if and only if the two locations share a full cell edge; diagonal or
    /// distant pairs return [`None`].
    fn direction_to(a: Location, b: Location) -> Option<Self>;
    /// Convert this [`Self`] to a "forward" direction, if it is not already such a direction.
    ///
    /// For the definition of forward directions, see [`Step::FORWARD_VARIANTS`].
    fn ensure_forward(&self) -> Self;
}

impl<Sh> BoardShape for Sh
where
    Sh: Step,
{
    fn neighbors_of(location: Location) -> Vec<(Self, Location)> {
        Self::VARIANTS.iter()
            .map(|dir| (*dir, dir.attempt_from(location)))
            .collect_vec()
    }

    fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }

    fn ensure_forward(&self) -> Self {
        match Self::FORWARD_VARIANTS.contains(self) {
            true => *self,
            false => self.invert(),
        }
    }
}
