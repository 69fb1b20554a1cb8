//! Exhaustive search over all placements, for small boards

use crate::board::{AttackRule, Board, Cell};
use anyhow::Result;
use itertools::Itertools;
use rayon::prelude::*;

/// Default largest board searched exhaustively
pub const DEFAULT_MAX_EXHAUSTIVE_SIZE: usize = 5;

/// Largest board whose cells fit in a `u64` attack mask
const MASK_LIMIT: usize = 8;

/// Minimum found by enumerating every placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustiveResult {
    pub size: usize,
    pub min_attacked: usize,
    /// Lexicographically first placement reaching the minimum
    pub witness: Board,
    pub placements_checked: u64,
}

/// Enumerate all C(N², N) placements and return the minimum attacked count.
///
/// Refuses boards larger than `max_size`.
pub fn minimum_attack(size: usize, rule: &AttackRule, max_size: usize) -> Result<ExhaustiveResult> {
    if size == 0 {
        anyhow::bail!("Board size must be at least 1");
    }
    if size > max_size.min(MASK_LIMIT) {
        anyhow::bail!(
            "Exhaustive search is limited to N <= {} (requested N = {})",
            max_size.min(MASK_LIMIT),
            size
        );
    }

    let cells = size * size;
    let masks = attack_masks(size, rule);

    log::debug!("enumerating {} placements for N = {}", binomial(cells, size), size);

    let best = (0..cells)
        .combinations(size)
        .par_bridge()
        .map(|queens| {
            let attacked = queens.iter().fold(0u64, |acc, &q| acc | masks[q]);
            (attacked.count_ones() as usize, queens)
        })
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let (min_attacked, queens) = match best {
        Some(best) => best,
        None => anyhow::bail!("No placement enumerated for N = {}", size),
    };
    let witness = Board::from_cells(size, queens.iter().map(|&q| Cell::new(q / size, q % size)))?;

    Ok(ExhaustiveResult {
        size,
        min_attacked,
        witness,
        placements_checked: binomial(cells, size),
    })
}

/// For each cell, the bitmask of cells a queen standing there attacks
fn attack_masks(size: usize, rule: &AttackRule) -> Vec<u64> {
    let cells: Vec<Cell> = (0..size)
        .flat_map(|r| (0..size).map(move |c| Cell::new(r, c)))
        .collect();

    cells
        .iter()
        .map(|&queen| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, target)| rule.attacks(queen, **target))
                .fold(0u64, |mask, (idx, _)| mask | (1u64 << idx))
        })
        .collect()
}

fn binomial(n: usize, k: usize) -> u64 {
    let k = k.min(n - k);
    (0..k).fold(1u64, |acc, i| acc * (n - i) as u64 / (i + 1) as u64)
}
