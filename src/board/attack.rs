//! Queen attack geometry: attacker sets and attacked-cell maps

use super::{Board, Cell};
use serde::{Deserialize, Serialize};

/// Convention for which cells attack a given cell.
///
/// A queen always attacks every cell sharing its row, column or a diagonal.
/// `include_self` decides whether an occupied cell also counts as attacked by
/// the queen standing on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttackRule {
    pub include_self: bool,
}

impl AttackRule {
    pub fn new(include_self: bool) -> Self {
        Self { include_self }
    }

    /// Whether a queen on `attacker` attacks `target`
    pub fn attacks(&self, attacker: Cell, target: Cell) -> bool {
        if attacker == target {
            return self.include_self;
        }
        shares_line(attacker, target)
    }

    /// All cells whose occupancy forces `target` to be attacked, row-major.
    ///
    /// `|A(i, j)|` is the big-M coefficient of the disjunctive encoding.
    pub fn attacker_set(&self, size: usize, target: Cell) -> Vec<Cell> {
        let mut attackers = Vec::new();
        for row in 0..size {
            for col in 0..size {
                let cell = Cell::new(row, col);
                if self.attacks(cell, target) {
                    attackers.push(cell);
                }
            }
        }
        attackers
    }

    /// `|A(i, j)|` computed in closed form
    pub fn attacker_set_size(&self, size: usize, target: Cell) -> usize {
        let own = usize::from(self.include_self);
        own + 2 * (size - 1) + diagonal_count(size, target)
    }

    /// Map of every cell attacked by the queens in `placement`
    pub fn attacked_map(&self, placement: &Board) -> Board {
        let size = placement.size;
        let queens = placement.marked_cells();
        let mut attacked = Board::new(size);
        for row in 0..size {
            for col in 0..size {
                let target = Cell::new(row, col);
                let idx = attacked.index(row, col);
                attacked.cells[idx] = queens.iter().any(|&q| self.attacks(q, target));
            }
        }
        attacked
    }

    /// Number of attacked cells for a placement
    pub fn attacked_count(&self, placement: &Board) -> usize {
        self.attacked_map(placement).marked_count()
    }
}

/// Same row, same column, or same diagonal (either direction), excluding identity
pub fn shares_line(a: Cell, b: Cell) -> bool {
    if a == b {
        return false;
    }
    let dr = b.row as isize - a.row as isize;
    let dc = b.col as isize - a.col as isize;
    dr == 0 || dc == 0 || dr == dc || dr == -dc
}

/// Cells on both diagonals through `target`, excluding `target`
fn diagonal_count(size: usize, target: Cell) -> usize {
    let (r, c) = (target.row, target.col);
    let up = r;
    let down = size - 1 - r;
    let left = c;
    let right = size - 1 - c;
    up.min(left) + up.min(right) + down.min(left) + down.min(right)
}
