//! Validation of solved placements against the model invariants

use crate::board::{AttackRule, Board, Cell};
use anyhow::Result;

/// Checks a placement and attacked map returned by a solver
pub struct SolutionValidator {
    size: usize,
    rule: AttackRule,
}

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub queen_count: usize,
    /// Attacked count recomputed from the placement
    pub attacked_count: usize,
    pub linkage_violations: Vec<LinkageViolation>,
    /// Cells marked attacked although no queen reaches them
    pub slack_cells: Vec<Cell>,
    pub error_message: Option<String>,
}

/// An attacked cell the solver left unmarked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkageViolation {
    pub cell: Cell,
    pub attacker: Cell,
}

impl SolutionValidator {
    pub fn new(size: usize, rule: AttackRule) -> Self {
        Self { size, rule }
    }

    /// Check cardinality and attack linkage
    pub fn validate(&self, placement: &Board, attacked: &Board) -> Result<ValidationResult> {
        if placement.size != self.size || attacked.size != self.size {
            anyhow::bail!(
                "Board size mismatch: placement {}x{}, attacked {}x{}, expected {}x{}",
                placement.size,
                placement.size,
                attacked.size,
                attacked.size,
                self.size,
                self.size
            );
        }

        let queens = placement.marked_cells();
        let recomputed = self.rule.attacked_map(placement);

        let mut linkage_violations = Vec::new();
        let mut slack_cells = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let cell = Cell::new(row, col);
                let marked = attacked.get(row, col);
                if recomputed.get(row, col) && !marked {
                    if let Some(&attacker) = queens.iter().find(|&&q| self.rule.attacks(q, cell)) {
                        linkage_violations.push(LinkageViolation { cell, attacker });
                    }
                } else if marked && !recomputed.get(row, col) {
                    slack_cells.push(cell);
                }
            }
        }

        let cardinality_ok = queens.len() == self.size;
        let is_valid = cardinality_ok && linkage_violations.is_empty();

        let error_message = if is_valid {
            None
        } else {
            let mut parts = Vec::new();
            if !cardinality_ok {
                parts.push(format!("expected {} queens, found {}", self.size, queens.len()));
            }
            if let Some(first) = linkage_violations.first() {
                parts.push(format!(
                    "{} attacked cell(s) left unmarked, e.g. ({}, {}) attacked from ({}, {})",
                    linkage_violations.len(),
                    first.cell.row,
                    first.cell.col,
                    first.attacker.row,
                    first.attacker.col
                ));
            }
            Some(parts.join("; "))
        };

        Ok(ValidationResult {
            is_valid,
            queen_count: queens.len(),
            attacked_count: recomputed.marked_count(),
            linkage_violations,
            slack_cells,
            error_message,
        })
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Validation Result:")?;
        writeln!(f, "  Valid: {}", self.is_valid)?;
        writeln!(f, "  Queens: {}", self.queen_count)?;
        writeln!(f, "  Attacked cells: {}", self.attacked_count)?;
        writeln!(f, "  Linkage violations: {}", self.linkage_violations.len())?;
        writeln!(f, "  Slack cells: {}", self.slack_cells.len())?;
        if let Some(error) = &self.error_message {
            writeln!(f, "  Error: {}", error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_placement() -> Board {
        Board::from_cells(3, [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)]).unwrap()
    }

    #[test]
    fn test_valid_solution() {
        let rule = AttackRule::new(false);
        let placement = corner_placement();
        let attacked = rule.attacked_map(&placement);

        let result = SolutionValidator::new(3, rule).validate(&placement, &attacked).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.queen_count, 3);
        assert_eq!(result.attacked_count, attacked.marked_count());
        assert!(result.slack_cells.is_empty());
    }

    #[test]
    fn test_missing_attack_detected() {
        let rule = AttackRule::new(false);
        let placement = corner_placement();
        let mut attacked = rule.attacked_map(&placement);
        attacked.set(2, 0, false).unwrap();

        let result = SolutionValidator::new(3, rule).validate(&placement, &attacked).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.linkage_violations.len(), 1);
        assert_eq!(result.linkage_violations[0].cell, Cell::new(2, 0));
        assert!(result.error_message.is_some());
    }

    #[test]
    fn test_wrong_queen_count() {
        let rule = AttackRule::new(true);
        let placement = Board::from_cells(3, [Cell::new(1, 1)]).unwrap();
        let attacked = rule.attacked_map(&placement);

        let result = SolutionValidator::new(3, rule).validate(&placement, &attacked).unwrap();
        assert!(!result.is_valid);
        assert_eq!(result.queen_count, 1);
    }

    #[test]
    fn test_slack_cells_allowed() {
        // non-attacking queens: only their own cells stay safe
        let rule = AttackRule::new(false);
        let queens = [Cell::new(0, 1), Cell::new(1, 3), Cell::new(2, 0), Cell::new(3, 2)];
        let placement = Board::from_cells(4, queens).unwrap();
        let mut attacked = Board::new(4);
        attacked.cells.iter_mut().for_each(|c| *c = true);

        let result = SolutionValidator::new(4, rule).validate(&placement, &attacked).unwrap();
        assert!(result.is_valid);
        assert_eq!(result.attacked_count, 12);
        assert_eq!(result.slack_cells, queens.to_vec());
    }

    #[test]
    fn test_size_mismatch() {
        let validator = SolutionValidator::new(3, AttackRule::default());
        assert!(validator.validate(&Board::new(2), &Board::new(3)).is_err());
    }
}
