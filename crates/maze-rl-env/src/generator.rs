//! Randomized Kruskal maze generation
//!
//! Every unit segment of the `(rows+1) x (cols+1)` vertex grid starts as a
//! wall. Internal segments are visited in a uniformly shuffled order and
//! knocked down whenever they separate two cells that are not yet connected,
//! which leaves a spanning tree of passages. One opening is then cut into the
//! left border and one into the right border.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use maze_rl_core::{Cell, RLError, Result};

use crate::geometry::{RowCol, Segment};
use crate::{DisjointSet, MazeDescription};

/// A perfect maze
///
/// Immutable once generated. Walls are kept sorted by first vertex, then
/// second vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    rows: usize,
    cols: usize,
    walls: Vec<Segment<RowCol>>,
    entrance_row: usize,
    exit_row: usize,
}

impl Maze {
    /// Row count
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Retained walls in canonical order
    #[must_use]
    pub fn walls(&self) -> &[Segment<RowCol>] {
        &self.walls
    }

    /// Row of the opening in the left border
    #[must_use]
    pub fn entrance_row(&self) -> usize {
        self.entrance_row
    }

    /// Row of the opening in the right border
    #[must_use]
    pub fn exit_row(&self) -> usize {
        self.exit_row
    }

    /// Cell behind the left opening
    #[must_use]
    pub fn entrance(&self) -> Cell {
        Cell::new(self.entrance_row, 0)
    }

    /// Cell behind the right opening
    #[must_use]
    pub fn exit(&self) -> Cell {
        Cell::new(self.exit_row, self.cols - 1)
    }

    /// Whether `segment` is a retained wall
    #[must_use]
    pub fn has_wall(&self, segment: &Segment<RowCol>) -> bool {
        self.walls.binary_search(segment).is_ok()
    }

    /// The text-format description of this maze
    #[must_use]
    pub fn to_description(&self) -> MazeDescription {
        MazeDescription {
            rows: self.rows,
            cols: self.cols,
            walls: self.walls.clone(),
        }
    }
}

/// An internal segment and the two cells it separates
struct InternalWall {
    segment: Segment<RowCol>,
    cells: (usize, usize),
}

/// Perfect maze generator
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    rng: StdRng,
}

impl MazeGenerator {
    /// Generator seeded from system entropy
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a `cols` wide, `rows` high perfect maze
    ///
    /// # Errors
    ///
    /// [`RLError::InvalidDimensions`] when either dimension is zero.
    pub fn generate(&mut self, cols: usize, rows: usize) -> Result<Maze> {
        if cols == 0 || rows == 0 {
            return Err(RLError::InvalidDimensions { rows, cols });
        }

        let (mut internal, boundary) = classify(cols, rows);
        internal.shuffle(&mut self.rng);

        let mut sets = DisjointSet::new(rows * cols);
        let mut walls = boundary;
        let mut removed = 0;
        for wall in internal {
            if sets.union(wall.cells.0, wall.cells.1) {
                removed += 1;
            } else {
                walls.push(wall.segment);
            }
        }
        walls.sort_unstable();

        let entrance_row = self.rng.gen_range(0..rows);
        let exit_row = self.rng.gen_range(0..rows);
        let entrance = Segment::new(RowCol::new(entrance_row, 0), RowCol::new(entrance_row + 1, 0));
        let exit = Segment::new(RowCol::new(exit_row, cols), RowCol::new(exit_row + 1, cols));

        let before = walls.len();
        walls.retain(|w| *w != entrance && *w != exit);
        debug_assert_eq!(before - walls.len(), 2, "border openings must be boundary walls");

        debug!(
            rows,
            cols,
            walls = walls.len(),
            removed,
            entrance_row,
            exit_row,
            "generated maze"
        );

        Ok(Maze {
            rows,
            cols,
            walls,
            entrance_row,
            exit_row,
        })
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Split every unit segment of the grid into internal and boundary walls
fn classify(cols: usize, rows: usize) -> (Vec<InternalWall>, Vec<Segment<RowCol>>) {
    let mut internal = Vec::with_capacity(2 * cols * rows);
    let mut boundary = Vec::with_capacity(2 * (cols + rows));

    // Horizontal segments lie on row line r and separate cells above and below
    for r in 0..=rows {
        for c in 0..cols {
            let segment = Segment::new(RowCol::new(r, c), RowCol::new(r, c + 1));
            if r > 0 && r < rows {
                internal.push(InternalWall {
                    segment,
                    cells: ((r - 1) * cols + c, r * cols + c),
                });
            } else {
                boundary.push(segment);
            }
        }
    }

    // Vertical segments lie on column line c and separate cells left and right
    for c in 0..=cols {
        for r in 0..rows {
            let segment = Segment::new(RowCol::new(r, c), RowCol::new(r + 1, c));
            if c > 0 && c < cols {
                internal.push(InternalWall {
                    segment,
                    cells: (r * cols + c - 1, r * cols + c),
                });
            } else {
                boundary.push(segment);
            }
        }
    }

    (internal, boundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_counts() {
        let (internal, boundary) = classify(4, 3);
        assert_eq!(internal.len() + boundary.len(), 2 * 4 * 3 + 4 + 3);
        assert_eq!(boundary.len(), 2 * (4 + 3));
        assert_eq!(internal.len(), 2 * 4 * 3 - 4 - 3);
    }

    #[test]
    fn internal_walls_separate_adjacent_cells() {
        let cols = 5;
        let (internal, _) = classify(cols, 4);
        for wall in internal {
            let (a, b) = wall.cells;
            let (ra, ca) = (a / cols, a % cols);
            let (rb, cb) = (b / cols, b % cols);
            assert_eq!(ra.abs_diff(rb) + ca.abs_diff(cb), 1);
        }
    }

    #[test]
    fn rejects_empty_grids() {
        let mut generator = MazeGenerator::with_seed(7);
        assert!(matches!(
            generator.generate(0, 3),
            Err(RLError::InvalidDimensions { rows: 3, cols: 0 })
        ));
        assert!(generator.generate(3, 0).is_err());
    }

    #[test]
    fn wall_count_matches_spanning_tree() {
        let mut generator = MazeGenerator::with_seed(42);
        let (cols, rows) = (7, 5);
        let maze = generator.generate(cols, rows).unwrap();

        let internal_total = 2 * cols * rows - cols - rows;
        let retained_internal = internal_total - (cols * rows - 1);
        let boundary_kept = 2 * (cols + rows) - 2;
        assert_eq!(maze.walls().len(), boundary_kept + retained_internal);
    }

    #[test]
    fn walls_are_sorted_and_unique() {
        let maze = MazeGenerator::with_seed(3).generate(6, 6).unwrap();
        assert!(maze.walls().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn same_seed_same_maze() {
        let a = MazeGenerator::with_seed(99).generate(8, 6).unwrap();
        let b = MazeGenerator::with_seed(99).generate(8, 6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_row_is_a_corridor() {
        let maze = MazeGenerator::with_seed(1).generate(6, 1).unwrap();
        // Every vertical internal wall must be knocked down to connect the row
        assert!(maze
            .walls()
            .iter()
            .all(|w| w.is_horizontal() || w.first().col == 0 || w.first().col == 6));
        assert_eq!(maze.entrance_row(), 0);
        assert_eq!(maze.exit_row(), 0);
    }

    #[test]
    fn single_cell_has_both_openings() {
        let maze = MazeGenerator::with_seed(5).generate(1, 1).unwrap();
        assert_eq!(maze.walls().len(), 2);
        assert!(maze.walls().iter().all(|w| w.is_horizontal()));
    }
}
