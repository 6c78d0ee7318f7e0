//! Maze description text format
//!
//! ```text
//! <rows> <cols>
//! <k>
//! <r1> <c1> <r2> <c2>      (k lines, one per wall segment)
//! ```
//!
//! Endpoints are written in `(row, col)` vertex space. Blank lines and
//! surrounding whitespace are ignored when parsing; lines after the declared
//! `k` walls are ignored too.

use std::fmt::{self, Display};
use std::str::FromStr;

use maze_rl_core::{RLError, Result};
use tracing::debug;

use crate::geometry::{RowCol, Segment};

/// Dimensions and wall list of a maze, as exchanged in text form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeDescription {
    /// Row count
    pub rows: usize,
    /// Column count
    pub cols: usize,
    /// Wall segments in `(row, col)` space
    pub walls: Vec<Segment<RowCol>>,
}

impl MazeDescription {
    /// Parse the text format
    ///
    /// # Errors
    ///
    /// [`RLError::MalformedMaze`] for a missing or non-numeric header, a wall
    /// line that is not four non-negative integers, a segment that is not
    /// unit length, or fewer wall lines than declared.
    /// [`RLError::InvalidDimensions`] for a zero row or column count.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| (i + 1, line));

        let (_, header) = lines
            .next()
            .ok_or_else(|| RLError::malformed(1, "missing dimensions line"))?;
        let [rows, cols] = parse_numbers::<2>(1, header, "dimensions")?;
        if rows == 0 || cols == 0 {
            return Err(RLError::InvalidDimensions { rows, cols });
        }

        let (_, count) = lines
            .next()
            .ok_or_else(|| RLError::malformed(2, "missing wall count line"))?;
        let [k] = parse_numbers::<1>(2, count, "wall count")?;

        let mut walls = Vec::with_capacity(k);
        for i in 0..k {
            let (line_no, line) = lines.next().ok_or_else(|| {
                RLError::malformed(3 + i, format!("expected {k} wall lines, found {i}"))
            })?;
            let [r1, c1, r2, c2] = parse_numbers::<4>(line_no, line, "wall segment")?;
            let segment = Segment::new(RowCol::new(r1, c1), RowCol::new(r2, c2));
            if !segment.is_unit() {
                return Err(RLError::malformed(
                    line_no,
                    format!("segment {line:?} does not join adjacent vertices"),
                ));
            }
            walls.push(segment);
        }

        let trailing = lines.count();
        if trailing > 0 {
            debug!(trailing, "ignoring lines after the declared walls");
        }

        Ok(Self { rows, cols, walls })
    }
}

impl FromStr for MazeDescription {
    type Err = RLError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Display for MazeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.rows, self.cols)?;
        writeln!(f, "{}", self.walls.len())?;
        for wall in &self.walls {
            writeln!(f, "{wall}")?;
        }
        Ok(())
    }
}

/// Exactly `N` whitespace-separated non-negative integers
fn parse_numbers<const N: usize>(line_no: usize, line: &str, what: &str) -> Result<[usize; N]> {
    let mut out = [0; N];
    let mut tokens = line.split_whitespace();
    for slot in &mut out {
        let token = tokens
            .next()
            .ok_or_else(|| RLError::malformed(line_no, format!("{what}: expected {N} numbers")))?;
        *slot = token.parse().map_err(|_| {
            RLError::malformed(line_no, format!("{what}: {token:?} is not a non-negative integer"))
        })?;
    }
    if tokens.next().is_some() {
        return Err(RLError::malformed(
            line_no,
            format!("{what}: expected {N} numbers"),
        ));
    }
    Ok(out)
}
