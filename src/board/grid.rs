//! Square chess board of boolean cells

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board coordinate (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// An N×N board where each cell is either marked or not.
///
/// Used both for queen placements and for attacked-cell maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub size: usize,
    pub cells: Vec<bool>,
}

impl Board {
    /// Create an empty board
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Create a board with the given cells marked
    pub fn from_cells<I: IntoIterator<Item = Cell>>(size: usize, marked: I) -> Result<Self> {
        let mut board = Self::new(size);
        for cell in marked {
            board.set(cell.row, cell.col, true)?;
        }
        Ok(board)
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Get cell value; out-of-bounds cells read as unmarked
    pub fn get(&self, row: usize, col: usize) -> bool {
        if row < self.size && col < self.size {
            self.cells[self.index(row, col)]
        } else {
            false
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: bool) -> Result<()> {
        if row >= self.size || col >= self.size {
            anyhow::bail!("Coordinates ({}, {}) out of bounds for {}x{} board", row, col, self.size, self.size);
        }
        let idx = self.index(row, col);
        self.cells[idx] = value;
        Ok(())
    }

    /// All marked cells in row-major order
    pub fn marked_cells(&self) -> Vec<Cell> {
        let mut marked = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.get(row, col) {
                    marked.push(Cell::new(row, col));
                }
            }
        }
        marked
    }

    pub fn marked_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    pub fn total_cells(&self) -> usize {
        self.size * self.size
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                write!(f, "{}", if self.get(row, col) { '█' } else { '·' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
