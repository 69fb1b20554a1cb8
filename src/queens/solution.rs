//! Solution representation for minimum-attack queens problems

use crate::bip::{AttackEncoding, SolveStatus};
use crate::board::Board;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Outcome of solving one board size with one encoding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueensSolution {
    pub size: usize,
    pub encoding: AttackEncoding,
    pub include_self: bool,
    pub status: SolveStatus,
    /// Attacked cells of the returned placement
    pub objective: Option<usize>,
    /// Relative optimality gap when stopped by the time limit
    pub gap: Option<f64>,
    pub placement: Option<Board>,
    pub attacked: Option<Board>,
    /// Wall-clock time of the solver call
    #[serde(skip)]
    pub solve_time: Duration,
    pub runtime_ms: f64,
}

impl QueensSolution {
    pub fn total_cells(&self) -> usize {
        self.size * self.size
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn has_assignment(&self) -> bool {
        self.placement.is_some() && self.attacked.is_some()
    }

    /// Save solution as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize solution")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(path, json).with_context(|| format!("Failed to write solution: {}", path.display()))?;
        Ok(())
    }

    /// Load a solution saved by [`QueensSolution::save_to_file`]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read solution: {}", path.display()))?;
        let mut solution: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse solution: {}", path.display()))?;
        solution.solve_time = Duration::try_from_secs_f64(solution.runtime_ms / 1000.0)
            .with_context(|| format!("Invalid runtime_ms {} in {}", solution.runtime_ms, path.display()))?;
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{AttackRule, Cell};
    use tempfile::tempdir;

    fn sample_solution() -> QueensSolution {
        let placement = Board::from_cells(2, [Cell::new(0, 0), Cell::new(1, 1)]).unwrap();
        let attacked = AttackRule::default().attacked_map(&placement);
        QueensSolution {
            size: 2,
            encoding: AttackEncoding::Disjunctive,
            include_self: false,
            status: SolveStatus::Optimal,
            objective: Some(4),
            gap: None,
            placement: Some(placement),
            attacked: Some(attacked),
            solve_time: Duration::from_millis(15),
            runtime_ms: 15.0,
        }
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/queens_2.json");
        let solution = sample_solution();
        solution.save_to_file(&path).unwrap();

        let loaded = QueensSolution::load_from_file(&path).unwrap();
        assert_eq!(loaded.size, 2);
        assert_eq!(loaded.encoding, AttackEncoding::Disjunctive);
        assert_eq!(loaded.objective, Some(4));
        assert_eq!(loaded.placement, solution.placement);
        assert!((loaded.solve_time.as_secs_f64() - 0.015).abs() < 1e-6);
        assert!(loaded.is_optimal());
    }

    #[test]
    fn test_negative_runtime_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queens_2.json");
        let mut solution = sample_solution();
        solution.runtime_ms = -5.0;
        solution.save_to_file(&path).unwrap();

        assert!(QueensSolution::load_from_file(&path).is_err());
    }

    #[test]
    fn test_status_serialized_as_snake_case() {
        let mut solution = sample_solution();
        solution.status = SolveStatus::TimeLimitReached;
        let json = serde_json::to_string(&solution).unwrap();
        assert!(json.contains("\"status\":\"time_limit_reached\""));
        assert!(json.contains("\"encoding\":\"disjunctive\""));
        assert!(!json.contains("solve_time"));
    }
}
