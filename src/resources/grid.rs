//! Occupancy grid used by the path planner.
//!
//! A grid is a rectangular map of [`Cell`]s indexed by [`Node`] `(row, col)`,
//! both zero-based with rows increasing downward. Grids are validated on
//! construction and never change afterwards; a scene builds one and hands
//! it to [`plan`](crate::systems::pathplanner::plan).
//!
//! Grids can be written as text, one string per row:
//!
//! ```text
//! ..#
//! .##
//! ...
//! ```
//!
//! where `.` or `0` is open and `#` or `1` is blocked.

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::error::GridFault;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Open,
    Blocked,
}

impl Cell {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' | '0' => Some(Cell::Open),
            '#' | '1' => Some(Cell::Blocked),
            _ => None,
        }
    }
}

/// A grid coordinate. Equality and hashing are by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Node {
    pub row: usize,
    pub col: usize,
}

impl Node {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True when `other` is one of the four orthogonal neighbours.
    pub fn is_adjacent(&self, other: &Node) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl From<(usize, usize)> for Node {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Neighbour offsets in expansion order: right, left, down, up.
const NEIGHBOUR_OFFSETS: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Immutable rectangular map of open and blocked cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl OccupancyGrid {
    /// Build a grid from row vectors. Rejects empty and ragged input.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, GridFault> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || expected == 0 {
            return Err(GridFault::Empty);
        }
        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (row, line) in rows.iter().enumerate() {
            if line.len() != expected {
                return Err(GridFault::Ragged {
                    row,
                    expected,
                    found: line.len(),
                });
            }
            cells.extend_from_slice(line);
        }
        Ok(Self {
            rows: rows.len(),
            cols: expected,
            cells,
        })
    }

    /// Parse the text form described in the module docs.
    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self, GridFault> {
        let mut rows = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let mut cells = Vec::new();
            for (col, glyph) in line.as_ref().chars().enumerate() {
                let cell = Cell::from_glyph(glyph).ok_or(GridFault::BadGlyph {
                    glyph,
                    node: Node::new(row, col),
                })?;
                cells.push(cell);
            }
            rows.push(cells);
        }
        Self::from_rows(rows)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, node: Node) -> bool {
        node.row < self.rows && node.col < self.cols
    }

    /// Cell at `node`, or `None` when out of bounds.
    pub fn cell(&self, node: Node) -> Option<Cell> {
        if self.contains(node) {
            Some(self.cells[node.row * self.cols + node.col])
        } else {
            None
        }
    }

    pub fn is_open(&self, node: Node) -> bool {
        self.cell(node) == Some(Cell::Open)
    }

    /// Validate a planning endpoint: in bounds and open.
    pub fn check_endpoint(&self, node: Node) -> Result<(), GridFault> {
        match self.cell(node) {
            None => Err(GridFault::OutOfBounds {
                node,
                rows: self.rows,
                cols: self.cols,
            }),
            Some(Cell::Blocked) => Err(GridFault::Blocked(node)),
            Some(Cell::Open) => Ok(()),
        }
    }

    /// Open orthogonal neighbours of `node` in right, left, down, up order.
    pub fn open_neighbours(&self, node: Node) -> ArrayVec<Node, 4> {
        let mut out = ArrayVec::new();
        for (dr, dc) in NEIGHBOUR_OFFSETS {
            let (Some(row), Some(col)) = (
                node.row.checked_add_signed(dr),
                node.col.checked_add_signed(dc),
            ) else {
                continue;
            };
            let next = Node::new(row, col);
            if self.is_open(next) {
                out.push(next);
            }
        }
        out
    }

    /// Iterate every blocked cell, row-major.
    pub fn blocked_cells(&self) -> impl Iterator<Item = Node> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Blocked)
            .map(|(i, _)| Node::new(i / self.cols, i % self.cols))
    }
}

/// Serialized planning request, as read by the `--plan` command line option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSpec {
    pub rows: Vec<String>,
    pub start: Node,
    pub goal: Node,
}

impl GridSpec {
    pub fn grid(&self) -> Result<OccupancyGrid, GridFault> {
        OccupancyGrid::parse(&self.rows)
    }
}
