use std::num::NonZero;

use ndarray::Ix;

type Coord = usize;
pub(crate) type Dimension = NonZero<Coord>;

/// A location `(x, y)` on a board. The top left corner is `Location(0, 0)`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
pub struct Location(pub Coord, pub Coord);

impl Location {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// The flat row-major index of this location on a board `columns` cells wide.
    ///
    /// Input layers and level definitions often address cells this way; see [`Self::from_flat`]
    /// for the inverse.
    pub fn flatten(&self, columns: usize) -> usize {
        self.1 * columns + self.0
    }

    /// Recover the location a flat row-major index addresses on a board `columns` cells wide.
    pub fn from_flat(index: usize, columns: usize) -> Self {
        Self(index % columns, index / columns)
    }
}

impl From<(Ix, Ix)> for Location {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}
