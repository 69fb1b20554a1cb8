//! Display and output formatting utilities

use crate::board::Board;
use crate::bip::{EncodingStatistics, SolveStatus};
use crate::config::OutputFormat;
use crate::queens::exhaustive::ExhaustiveResult;
use crate::queens::QueensSolution;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Full console report: header, status line and both grids
    pub fn format_report(solution: &QueensSolution) -> String {
        let mut output = String::new();

        let objective = solution
            .objective
            .map(|c| c.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        output.push_str(&format!(
            "Solved NQueens BIP (N = {}) in {:.3} ms, objective: {} attackable cells out of {}.\n",
            solution.size,
            solution.runtime_ms,
            objective,
            solution.total_cells()
        ));
        output.push_str(&Self::status_line(solution));
        output.push('\n');

        if let (Some(placement), Some(attacked)) = (&solution.placement, &solution.attacked) {
            output.push_str("\nPlacement (0 = queen placed):\n");
            output.push_str(&Self::format_grid(placement, '0', 'X'));
            output.push_str("\nAttackable (0 = safe, X = attackable):\n");
            output.push_str(&Self::format_grid(attacked, 'X', '0'));
        }

        output
    }

    fn status_line(solution: &QueensSolution) -> String {
        match solution.status {
            SolveStatus::Optimal => "Solution is optimal.".to_string(),
            SolveStatus::TimeLimitReached | SolveStatus::GapLimitReached if solution.has_assignment() => {
                match solution.gap {
                    Some(gap) => format!("Optimality gap: {}", gap),
                    None => "Optimality gap: unknown".to_string(),
                }
            }
            _ => "No solution found.".to_string(),
        }
    }

    /// One line per row, cells separated by two spaces
    pub fn format_grid(board: &Board, marked: char, unmarked: char) -> String {
        let mut output = String::new();
        for row in 0..board.size {
            let line: Vec<String> = (0..board.size)
                .map(|col| if board.get(row, col) { marked } else { unmarked }.to_string())
                .collect();
            output.push_str(&line.join("  "));
            output.push('\n');
        }
        output
    }

    /// Side-by-side table of encoding statistics
    pub fn format_statistics_table(stats: &[EncodingStatistics]) -> String {
        let mut output = String::new();

        output.push_str("Encoding     | Self | Vars   | Rows     | Nonzeros  | Max row\n");
        output.push_str("-------------|------|--------|----------|-----------|--------\n");

        for s in stats {
            output.push_str(&format!(
                "{:12} | {:4} | {:6} | {:8} | {:9} | {}\n",
                s.encoding.to_string(),
                if s.include_self { "yes" } else { "no" },
                s.variables,
                s.constraints,
                s.nonzeros,
                s.max_row_len
            ));
        }

        output
    }

    /// Comparison of a solver run against exhaustive search
    pub fn format_verification(solution: &QueensSolution, exact: &ExhaustiveResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Exhaustive minimum for N = {}: {} ({} placements checked)\n",
            exact.size, exact.min_attacked, exact.placements_checked
        ));
        match solution.objective {
            Some(objective) if objective == exact.min_attacked && solution.is_optimal() => {
                output.push_str(&format!("{} encoding agrees: {}\n", solution.encoding, objective));
            }
            Some(objective) => {
                output.push_str(&format!(
                    "{} encoding MISMATCH: {} (status: {})\n",
                    solution.encoding, objective, solution.status
                ));
            }
            None => {
                output.push_str(&format!("{} encoding returned no objective ({})\n", solution.encoding, solution.status));
            }
        }
        output.push_str("\nWitness:\n");
        output.push_str(&Self::format_grid(&exact.witness, '0', 'X'));

        output
    }

    /// Save a solution per the output format; returns the written path
    pub fn save_solution<P: AsRef<Path>>(
        solution: &QueensSolution,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<Option<PathBuf>> {
        match format {
            OutputFormat::Text => Ok(None),
            OutputFormat::Json => {
                let path = output_dir.as_ref().join(format!("queens_{}.json", solution.size));
                solution
                    .save_to_file(&path)
                    .with_context(|| format!("Failed to save solution for N = {}", solution.size))?;
                Ok(Some(path))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bip::AttackEncoding;
    use crate::board::{AttackRule, Cell};
    use std::time::Duration;
    use tempfile::tempdir;

    fn four_queens_solution() -> QueensSolution {
        let placement = Board::from_cells(
            4,
            [Cell::new(0, 1), Cell::new(1, 3), Cell::new(2, 0), Cell::new(3, 2)],
        )
        .unwrap();
        let attacked = AttackRule::default().attacked_map(&placement);
        QueensSolution {
            size: 4,
            encoding: AttackEncoding::PerAttacker,
            include_self: false,
            status: SolveStatus::Optimal,
            objective: Some(12),
            gap: None,
            placement: Some(placement),
            attacked: Some(attacked),
            solve_time: Duration::from_micros(12_345),
            runtime_ms: 12.345,
        }
    }

    #[test]
    fn test_report_layout() {
        let report = SolutionFormatter::format_report(&four_queens_solution());
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(
            lines[0],
            "Solved NQueens BIP (N = 4) in 12.345 ms, objective: 12 attackable cells out of 16."
        );
        assert_eq!(lines[1], "Solution is optimal.");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Placement (0 = queen placed):");
        assert_eq!(lines[4], "X  0  X  X");
        assert_eq!(lines[5], "X  X  X  0");
        assert_eq!(lines[8], "");
        assert_eq!(lines[9], "Attackable (0 = safe, X = attackable):");
        // queens sit on the only safe cells
        assert_eq!(lines[10], "X  0  X  X");
        assert_eq!(lines[13], "X  X  0  X");
    }

    #[test]
    fn test_no_solution_omits_grids() {
        let mut solution = four_queens_solution();
        solution.status = SolveStatus::Infeasible;
        solution.objective = None;
        solution.placement = None;
        solution.attacked = None;

        let report = SolutionFormatter::format_report(&solution);
        assert!(report.contains("No solution found."));
        assert!(report.contains("objective: n/a"));
        assert!(!report.contains("Placement"));
    }

    #[test]
    fn test_time_limit_reports_gap() {
        let mut solution = four_queens_solution();
        solution.status = SolveStatus::TimeLimitReached;
        solution.gap = Some(0.25);

        let report = SolutionFormatter::format_report(&solution);
        assert!(report.contains("Optimality gap: 0.25"));
        assert!(report.contains("Attackable"));
    }

    #[test]
    fn test_time_limit_without_incumbent() {
        let mut solution = four_queens_solution();
        solution.status = SolveStatus::TimeLimitReached;
        solution.objective = None;
        solution.placement = None;
        solution.attacked = None;

        let report = SolutionFormatter::format_report(&solution);
        assert_eq!(report.lines().nth(1), Some("No solution found."));
        assert!(!report.contains("Optimality gap"));
        assert!(!report.contains("Placement"));
    }

    #[test]
    fn test_gap_limit_is_not_optimal() {
        let mut solution = four_queens_solution();
        solution.status = SolveStatus::GapLimitReached;
        solution.objective = Some(14);
        solution.gap = Some(0.5);

        let report = SolutionFormatter::format_report(&solution);
        assert!(report.contains("Optimality gap: 0.5"));
        assert!(!report.contains("Solution is optimal."));
    }

    #[test]
    fn test_statistics_table() {
        let stats = vec![EncodingStatistics {
            size: 4,
            encoding: AttackEncoding::Disjunctive,
            include_self: false,
            variables: 32,
            constraints: 17,
            nonzeros: 208,
            max_row_len: 14,
        }];
        let table = SolutionFormatter::format_statistics_table(&stats);
        assert!(table.lines().nth(2).unwrap().starts_with("disjunctive"));
        assert!(table.contains("208"));
    }

    #[test]
    fn test_json_saved_only_for_json_format() {
        let dir = tempdir().unwrap();
        let solution = four_queens_solution();

        let none = SolutionFormatter::save_solution(&solution, dir.path(), OutputFormat::Text).unwrap();
        assert!(none.is_none());

        let path = SolutionFormatter::save_solution(&solution, dir.path(), OutputFormat::Json)
            .unwrap()
            .unwrap();
        assert!(path.ends_with("queens_4.json"));
        let loaded = QueensSolution::load_from_file(&path).unwrap();
        assert_eq!(loaded.objective, Some(12));
    }
}
