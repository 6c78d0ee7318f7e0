//! Grid-line vertices and wall segments
//!
//! Two vertex spaces are in play and are kept as distinct types so they can
//! never be mixed up silently:
//! - [`RowCol`]: the generator's and the text format's `(row, col)` space
//! - [`Xy`]: the environment's `(x, y) = (col, row)` space

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// A grid-line intersection
pub trait Vertex: Copy + Ord + Hash + Debug {
    /// Coordinates in the vertex type's own order
    fn coords(&self) -> (usize, usize);
}

/// Vertex in `(row, col)` order, `0 <= row <= rows`, `0 <= col <= cols`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowCol {
    /// Horizontal grid line index
    pub row: usize,
    /// Vertical grid line index
    pub col: usize,
}

impl RowCol {
    /// Create a new vertex
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The same intersection in environment space
    #[must_use]
    pub fn to_xy(self) -> Xy {
        Xy {
            x: self.col,
            y: self.row,
        }
    }
}

impl Vertex for RowCol {
    fn coords(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

/// Vertex in `(x, y)` order where `x` is the column line and `y` the row line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Xy {
    /// Vertical grid line index
    pub x: usize,
    /// Horizontal grid line index
    pub y: usize,
}

impl Xy {
    /// Create a new vertex
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The same intersection in generator space
    #[must_use]
    pub fn to_row_col(self) -> RowCol {
        RowCol {
            row: self.y,
            col: self.x,
        }
    }
}

impl Vertex for Xy {
    fn coords(&self) -> (usize, usize) {
        (self.x, self.y)
    }
}

/// Undirected unit segment between two grid-line intersections
///
/// Always stored in canonical form, the smaller vertex first, so derived
/// equality, hashing and ordering compare segments rather than endpoint
/// orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Segment<V> {
    a: V,
    b: V,
}

impl<V: Vertex> Segment<V> {
    /// Segment between `p` and `q`, in either order
    #[must_use]
    pub fn new(p: V, q: V) -> Self {
        if p <= q {
            Self { a: p, b: q }
        } else {
            Self { a: q, b: p }
        }
    }

    /// The smaller endpoint
    #[must_use]
    pub fn first(&self) -> V {
        self.a
    }

    /// The larger endpoint
    #[must_use]
    pub fn second(&self) -> V {
        self.b
    }

    /// Whether the endpoints differ by exactly 1 in exactly one coordinate
    #[must_use]
    pub fn is_unit(&self) -> bool {
        let (a0, a1) = self.a.coords();
        let (b0, b1) = self.b.coords();
        a0.abs_diff(b0) + a1.abs_diff(b1) == 1
    }
}

impl Segment<RowCol> {
    /// Whether both endpoints share a row line
    #[must_use]
    pub fn is_horizontal(&self) -> bool {
        self.a.row == self.b.row
    }

    /// The same segment in environment space
    #[must_use]
    pub fn to_xy(self) -> Segment<Xy> {
        Segment::new(self.a.to_xy(), self.b.to_xy())
    }
}

impl Segment<Xy> {
    /// The same segment in generator space
    #[must_use]
    pub fn to_row_col(self) -> Segment<RowCol> {
        Segment::new(self.a.to_row_col(), self.b.to_row_col())
    }
}

impl Display for Segment<RowCol> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.a.row, self.a.col, self.b.row, self.b.col)
    }
}
