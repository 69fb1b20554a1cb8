//! BIP encoder for the minimum-attack queens problem

use super::constraints::{add_attack_constraints, add_placement_cardinality_constraint, AttackEncoding};
use super::error::ModelError;
use super::model::BipModel;
use super::objective::build_objective;
use super::variables::{declare_variables, BoardVariables};
use crate::board::{AttackRule, Board};

/// Builds complete queens models for a fixed board size and encoding
#[derive(Debug, Clone)]
pub struct QueensEncoder {
    size: usize,
    encoding: AttackEncoding,
    rule: AttackRule,
}

/// A built model together with the handle to its board variables
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedModel {
    pub model: BipModel,
    pub variables: BoardVariables,
}

impl EncodedModel {
    /// Placement and attacked boards read from a solver assignment
    pub fn extract_boards(&self, assignment: &[f64]) -> (Board, Board) {
        (
            self.variables.placement_board(assignment),
            self.variables.attacked_board(assignment),
        )
    }
}

impl QueensEncoder {
    pub fn new(size: usize, encoding: AttackEncoding, rule: AttackRule) -> Self {
        Self { size, encoding, rule }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn encoding(&self) -> AttackEncoding {
        self.encoding
    }

    pub fn rule(&self) -> AttackRule {
        self.rule
    }

    /// Variables, cardinality, attack linkage, then objective
    pub fn build(&self) -> Result<EncodedModel, ModelError> {
        let mut model = BipModel::new(format!("NQueensBIP_{}", self.size));

        let variables = declare_variables(&mut model, self.size)?;
        add_placement_cardinality_constraint(&mut model, &variables)?;
        add_attack_constraints(&mut model, &variables, self.encoding, &self.rule)?;
        build_objective(&mut model, &variables)?;

        log::debug!(
            "built {} model for N = {}: {} variables, {} constraints, {} nonzeros",
            self.encoding,
            self.size,
            model.num_variables(),
            model.num_constraints(),
            model.num_nonzeros()
        );

        Ok(EncodedModel { model, variables })
    }

    /// Statistics of an already built model
    pub fn statistics(&self, encoded: &EncodedModel) -> EncodingStatistics {
        let model = &encoded.model;
        EncodingStatistics {
            size: self.size,
            encoding: self.encoding,
            include_self: self.rule.include_self,
            variables: model.num_variables(),
            constraints: model.num_constraints(),
            nonzeros: model.num_nonzeros(),
            max_row_len: model.constraints().iter().map(|c| c.expr.len()).max().unwrap_or(0),
        }
    }

    /// Closed-form size estimate, without building the model
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        let n = self.size;
        let attacker_total: usize = (0..n)
            .flat_map(|r| (0..n).map(move |c| crate::board::Cell::new(r, c)))
            .map(|cell| self.rule.attacker_set_size(n, cell))
            .sum();

        let (linkage_rows, linkage_nonzeros) = match self.encoding {
            AttackEncoding::PerAttacker => (attacker_total, 2 * attacker_total),
            AttackEncoding::Disjunctive => {
                let non_empty = if attacker_total == 0 { 0 } else { n * n };
                (non_empty, attacker_total + non_empty)
            }
        };

        let estimated_variables = 2 * n * n;
        let complexity_level = match n {
            0..=6 => ComplexityLevel::Low,
            7..=10 => ComplexityLevel::Medium,
            11..=16 => ComplexityLevel::High,
            _ => ComplexityLevel::VeryHigh,
        };

        ComplexityEstimate {
            complexity_level,
            estimated_variables,
            estimated_constraints: 1 + linkage_rows,
            estimated_nonzeros: n * n + linkage_nonzeros,
        }
    }
}

/// Statistics about a built encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingStatistics {
    pub size: usize,
    pub encoding: AttackEncoding,
    pub include_self: bool,
    pub variables: usize,
    pub constraints: usize,
    pub nonzeros: usize,
    pub max_row_len: usize,
}

/// Size estimate for a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub estimated_variables: usize,
    pub estimated_constraints: usize,
    pub estimated_nonzeros: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl std::fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "BIP Encoding Statistics ({}):", self.encoding)?;
        writeln!(f, "  Board: {}x{}", self.size, self.size)?;
        writeln!(f, "  Queen attacks own cell: {}", self.include_self)?;
        writeln!(f, "  Variables: {}", self.variables)?;
        writeln!(f, "  Constraints: {}", self.constraints)?;
        writeln!(f, "  Nonzeros: {}", self.nonzeros)?;
        writeln!(f, "  Longest row: {} terms", self.max_row_len)?;
        Ok(())
    }
}

impl std::fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Problem Complexity Estimate:")?;
        writeln!(f, "  Complexity level: {:?}", self.complexity_level)?;
        writeln!(f, "  Estimated variables: {}", self.estimated_variables)?;
        writeln!(f, "  Estimated constraints: {}", self.estimated_constraints)?;
        writeln!(f, "  Estimated nonzeros: {}", self.estimated_nonzeros)?;

        let recommendation = match self.complexity_level {
            ComplexityLevel::Low => "Should solve quickly",
            ComplexityLevel::Medium => "May take some time to prove optimality",
            ComplexityLevel::High => "Likely to hit the time limit, expect a gap",
            ComplexityLevel::VeryHigh => "Expect a time-limited incumbent with a large gap",
        };
        writeln!(f, "  Recommendation: {}", recommendation)?;
        Ok(())
    }
}
