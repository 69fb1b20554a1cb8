//! Minimum-attack queens problem definition

use super::exhaustive::{minimum_attack, ExhaustiveResult};
use super::{QueensSolution, SolutionValidator, ValidationResult};
use crate::bip::encoder::ComplexityEstimate;
use crate::bip::{lp_format, EncodedModel, EncodingStatistics, HighsSolver, MipSolver, QueensEncoder};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::time::Instant;

/// Represents one minimum-attack queens instance
pub struct QueensProblem {
    settings: Settings,
    encoder: QueensEncoder,
    validator: SolutionValidator,
}

impl QueensProblem {
    /// Create a problem for board size `size`
    pub fn new(settings: Settings, size: usize) -> Result<Self> {
        if size == 0 {
            anyhow::bail!("Board size must be at least 1");
        }

        let rule = settings.attack_rule();
        let encoder = QueensEncoder::new(size, settings.encoding.strategy, rule);
        let validator = SolutionValidator::new(size, rule);

        Ok(Self {
            settings,
            encoder,
            validator,
        })
    }

    /// Create a problem using `board.size` from the settings
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let size = settings
            .board
            .size
            .context("Board size is not set in the configuration")?;
        Self::new(settings, size)
    }

    pub fn size(&self) -> usize {
        self.encoder.size()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the complete model for the configured encoding
    pub fn build_model(&self) -> Result<EncodedModel> {
        self.encoder.build().context("Failed to build BIP model")
    }

    /// Solve with HiGHS
    pub fn solve(&self) -> Result<QueensSolution> {
        self.solve_with(&HighsSolver::new())
    }

    /// Build, optimize and read back the placement using `solver`
    pub fn solve_with(&self, solver: &dyn MipSolver) -> Result<QueensSolution> {
        let encoded = self.build_model()?;

        if let Some(lp_path) = &self.settings.output.write_lp {
            lp_format::save_lp(&encoded.model, lp_path)
                .with_context(|| format!("Failed to write LP model to {}", lp_path.display()))?;
            log::info!("wrote LP model to {}", lp_path.display());
        }

        let start_time = Instant::now();
        let outcome = solver
            .optimize(&encoded.model, &self.settings.solver_options())
            .with_context(|| format!("{} failed on N = {}", solver.name(), self.size()))?;
        let solve_time = start_time.elapsed();

        let (placement, attacked) = match &outcome.assignment {
            Some(assignment) => {
                let (placement, attacked) = encoded.extract_boards(assignment);
                let validation = self.validator.validate(&placement, &attacked)?;
                if !validation.is_valid {
                    anyhow::bail!(
                        "{} returned an invalid placement: {}",
                        solver.name(),
                        validation.error_message.unwrap_or_else(|| "unknown error".to_string())
                    );
                }
                if !validation.slack_cells.is_empty() {
                    log::debug!("{} cells marked attacked without an attacker", validation.slack_cells.len());
                }
                (Some(placement), Some(attacked))
            }
            None => {
                log::warn!("no placement available (status: {})", outcome.status);
                (None, None)
            }
        };

        Ok(QueensSolution {
            size: self.size(),
            encoding: self.encoder.encoding(),
            include_self: self.encoder.rule().include_self,
            status: outcome.status,
            objective: outcome.objective_value.map(|v| v.round().max(0.0) as usize),
            gap: outcome.gap,
            placement,
            attacked,
            solve_time,
            runtime_ms: solve_time.as_secs_f64() * 1000.0,
        })
    }

    /// Re-check a solution's boards; `None` when it carries no assignment
    pub fn validate_solution(&self, solution: &QueensSolution) -> Result<Option<ValidationResult>> {
        match (&solution.placement, &solution.attacked) {
            (Some(placement), Some(attacked)) => Ok(Some(self.validator.validate(placement, attacked)?)),
            _ => Ok(None),
        }
    }

    /// Statistics of the model for the configured encoding
    pub fn encoding_statistics(&self) -> Result<EncodingStatistics> {
        let encoded = self.build_model()?;
        Ok(self.encoder.statistics(&encoded))
    }

    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        self.encoder.estimate_complexity()
    }

    /// Exact minimum by enumeration, for cross-checking small boards
    pub fn solve_exhaustive(&self) -> Result<ExhaustiveResult> {
        minimum_attack(
            self.size(),
            &self.encoder.rule(),
            self.settings.solver.max_exhaustive_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bip::{AttackEncoding, BipModel, SolveOutcome, SolveStatus, SolverError, SolverOptions};
    use crate::board::AttackRule;
    use std::time::Duration;
    use tempfile::tempdir;

    fn settings_for(encoding: AttackEncoding, include_self: bool, time_limit: u64) -> Settings {
        let mut settings = Settings::default();
        settings.encoding.strategy = encoding;
        settings.encoding.include_self = include_self;
        settings.solver.time_limit_seconds = time_limit;
        settings
    }

    /// Always reports the same status without an assignment
    struct FixedStatusSolver(SolveStatus);

    impl MipSolver for FixedStatusSolver {
        fn optimize(&self, _model: &BipModel, _options: &SolverOptions) -> Result<SolveOutcome, SolverError> {
            Ok(SolveOutcome::without_solution(self.0, Duration::from_millis(1)))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Returns an all-zero point, violating the cardinality constraint
    struct BrokenSolver;

    impl MipSolver for BrokenSolver {
        fn optimize(&self, model: &BipModel, _options: &SolverOptions) -> Result<SolveOutcome, SolverError> {
            Ok(SolveOutcome {
                status: SolveStatus::Optimal,
                objective_value: Some(0.0),
                gap: None,
                assignment: Some(vec![0.0; model.num_variables()]),
                solve_time: Duration::from_millis(1),
            })
        }

        fn name(&self) -> &str {
            "broken"
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(QueensProblem::new(Settings::default(), 0).is_err());
        assert!(QueensProblem::from_settings(Settings::default()).is_err());
    }

    #[test]
    fn test_encodings_agree_with_exhaustive_search() {
        for include_self in [false, true] {
            for size in 1..=5 {
                let mut objectives = Vec::new();
                for encoding in AttackEncoding::ALL {
                    let problem = QueensProblem::new(settings_for(encoding, include_self, 60), size).unwrap();
                    let solution = problem.solve().unwrap();
                    assert_eq!(solution.status, SolveStatus::Optimal, "N = {} {}", size, encoding);
                    objectives.push(solution.objective.unwrap());
                }

                let exact = minimum_attack(size, &AttackRule::new(include_self), 5).unwrap();
                assert_eq!(objectives, vec![exact.min_attacked; 2], "N = {}, include_self = {}", size, include_self);
            }
        }
    }

    #[test]
    fn test_single_queen_boundary() {
        let problem = QueensProblem::new(settings_for(AttackEncoding::PerAttacker, false, 10), 1).unwrap();
        let solution = problem.solve().unwrap();
        assert_eq!(solution.objective, Some(0));
        assert_eq!(solution.placement.unwrap().marked_count(), 1);

        let problem = QueensProblem::new(settings_for(AttackEncoding::Disjunctive, true, 10), 1).unwrap();
        assert_eq!(problem.solve().unwrap().objective, Some(1));
    }

    #[test]
    fn test_four_queens_per_attacker() {
        let problem = QueensProblem::new(settings_for(AttackEncoding::PerAttacker, false, 120), 4).unwrap();
        let solution = problem.solve().unwrap();

        assert_eq!(solution.status, SolveStatus::Optimal);
        assert!(solution.gap.is_none());
        assert_eq!(solution.objective, Some(problem.solve_exhaustive().unwrap().min_attacked));
        assert_eq!(solution.objective, Some(12));

        let placement = solution.placement.unwrap();
        let attacked = solution.attacked.unwrap();
        assert_eq!(placement.marked_count(), 4);
        assert_eq!(attacked.marked_count(), 12);
    }

    #[test]
    fn test_eight_queens_disjunctive() {
        let problem = QueensProblem::new(settings_for(AttackEncoding::Disjunctive, false, 120), 8).unwrap();
        let solution = problem.solve().unwrap();

        assert!(matches!(
            solution.status,
            SolveStatus::Optimal | SolveStatus::TimeLimitReached
        ));
        if let Some(gap) = solution.gap {
            assert!(gap >= 0.0);
        }
        if let (Some(placement), Some(attacked)) = (&solution.placement, &solution.attacked) {
            let rule = AttackRule::new(false);
            assert_eq!(placement.marked_count(), 8);
            let validation = SolutionValidator::new(8, rule).validate(placement, attacked).unwrap();
            assert!(validation.is_valid);
            assert!(solution.objective.unwrap() >= validation.attacked_count);
        }
    }

    #[test]
    fn test_relative_gap_never_claims_optimality_falsely() {
        let mut settings = settings_for(AttackEncoding::Disjunctive, false, 120);
        settings.solver.mip_rel_gap = Some(0.99);
        settings.solver.max_exhaustive_size = 6;
        let problem = QueensProblem::new(settings, 6).unwrap();

        let exact = problem.solve_exhaustive().unwrap().min_attacked;
        let solution = problem.solve().unwrap();
        let objective = solution.objective.unwrap();

        match solution.status {
            SolveStatus::Optimal => {
                assert_eq!(objective, exact);
                assert!(solution.gap.is_none());
            }
            SolveStatus::GapLimitReached => assert!(solution.gap.unwrap() > 0.0),
            status => panic!("unexpected status {}", status),
        }
        assert!(objective >= exact);
    }

    #[test]
    fn test_no_solution_statuses_are_reported() {
        let problem = QueensProblem::new(Settings::default(), 3).unwrap();
        for status in [
            SolveStatus::Infeasible,
            SolveStatus::NoSolutionFound,
            SolveStatus::TimeLimitReached,
        ] {
            let solution = problem.solve_with(&FixedStatusSolver(status)).unwrap();
            assert_eq!(solution.status, status);
            assert!(!solution.has_assignment());
            assert!(solution.objective.is_none());
        }
    }

    #[test]
    fn test_validate_solution() {
        let problem = QueensProblem::new(settings_for(AttackEncoding::PerAttacker, false, 10), 4).unwrap();
        let solution = problem.solve().unwrap();
        let validation = problem.validate_solution(&solution).unwrap().unwrap();
        assert!(validation.is_valid);
        assert_eq!(validation.queen_count, 4);
        assert_eq!(validation.attacked_count, 12);
        assert!(validation.to_string().contains("Attacked cells: 12"));

        let empty = problem
            .solve_with(&FixedStatusSolver(SolveStatus::Infeasible))
            .unwrap();
        assert!(problem.validate_solution(&empty).unwrap().is_none());
    }

    #[test]
    fn test_invalid_assignment_is_an_error() {
        let problem = QueensProblem::new(Settings::default(), 3).unwrap();
        assert!(problem.solve_with(&BrokenSolver).is_err());
    }

    #[test]
    fn test_lp_written_before_solving() {
        let dir = tempdir().unwrap();
        let lp_path = dir.path().join("model.lp");
        let mut settings = Settings::default();
        settings.output.write_lp = Some(lp_path.clone());

        let problem = QueensProblem::new(settings, 2).unwrap();
        problem
            .solve_with(&FixedStatusSolver(SolveStatus::NoSolutionFound))
            .unwrap();

        let lp = std::fs::read_to_string(&lp_path).unwrap();
        assert!(lp.contains("place_n_queens: x_0_0 + x_0_1 + x_1_0 + x_1_1 = 2"));
    }

    #[test]
    fn test_statistics_follow_encoding() {
        let problem = QueensProblem::new(settings_for(AttackEncoding::Disjunctive, true, 10), 4).unwrap();
        let stats = problem.encoding_statistics().unwrap();
        assert_eq!(stats.constraints, 17);
        assert_eq!(problem.estimate_complexity().estimated_constraints, 17);
    }
}
