//! MIP solver integration using HiGHS

use super::error::SolverError;
use super::model::{BipModel, Comparison, Sense, VariableDomain, FEASIBILITY_TOLERANCE};
use highs::{HighsModelStatus, RowProblem};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Termination status reported by a solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    /// Stopped once the incumbent was within the requested relative gap
    GapLimitReached,
    TimeLimitReached,
    Infeasible,
    NoSolutionFound,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::GapLimitReached => write!(f, "Gap Limit Reached"),
            SolveStatus::TimeLimitReached => write!(f, "Time Limit Reached"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::NoSolutionFound => write!(f, "No Solution Found"),
        }
    }
}

/// Result of a single `optimize` call
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// Objective of the returned assignment; absent when there is none
    pub objective_value: Option<f64>,
    /// Relative optimality gap, only reported when optimality is not proven
    pub gap: Option<f64>,
    /// Dense assignment indexed by `VarId`
    pub assignment: Option<Vec<f64>>,
    pub solve_time: Duration,
}

impl SolveOutcome {
    /// Outcome carrying no assignment
    pub fn without_solution(status: SolveStatus, solve_time: Duration) -> Self {
        Self {
            status,
            objective_value: None,
            gap: None,
            assignment: None,
            solve_time,
        }
    }

    pub fn has_solution(&self) -> bool {
        self.assignment.is_some()
    }
}

/// Configuration options for a solve
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Wall-clock cap for the search
    pub time_limit: Duration,
    /// Forward the solver's own log to the console
    pub verbose: bool,
    /// Stop once the relative gap falls below this value
    pub mip_rel_gap: Option<f64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(120),
            verbose: false,
            mip_rel_gap: None,
        }
    }
}

/// A mixed-integer optimization backend
pub trait MipSolver {
    /// Solve `model` within `options.time_limit`. Blocks until the solver
    /// stops; no retries.
    fn optimize(&self, model: &BipModel, options: &SolverOptions) -> Result<SolveOutcome, SolverError>;

    fn name(&self) -> &str;
}

/// HiGHS backend via the `highs` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }

    fn validate(model: &BipModel) -> Result<(), SolverError> {
        if model.objective().is_none() {
            return Err(SolverError::InvalidModel("model has no objective".to_string()));
        }
        for var in model.variables() {
            if var.lower_bound > var.upper_bound {
                return Err(SolverError::InvalidModel(format!(
                    "variable '{}' has lower bound {} > upper bound {}",
                    var.name, var.lower_bound, var.upper_bound
                )));
            }
        }
        Ok(())
    }

    /// Accept the point HiGHS returns only if it satisfies the model
    fn incumbent(model: &BipModel, columns: &[f64]) -> Option<Vec<f64>> {
        if model.is_feasible(columns) {
            Some(columns.to_vec())
        } else {
            None
        }
    }
}

impl MipSolver for HighsSolver {
    fn optimize(&self, model: &BipModel, options: &SolverOptions) -> Result<SolveOutcome, SolverError> {
        Self::validate(model)?;

        let start_time = Instant::now();
        let costs = model.objective_coefficients();
        let mut pb = RowProblem::default();

        let cols: Vec<_> = model
            .variables()
            .iter()
            .zip(&costs)
            .map(|(var, &cost)| match var.domain {
                VariableDomain::Binary | VariableDomain::Integer => {
                    pb.add_integer_column(cost, var.lower_bound..=var.upper_bound)
                }
                VariableDomain::Continuous => pb.add_column(cost, var.lower_bound..=var.upper_bound),
            })
            .collect();

        for constraint in model.constraints() {
            let terms: Vec<_> = constraint
                .expr
                .terms
                .iter()
                .map(|&(var, coeff)| (cols[var.0], coeff))
                .collect();
            match constraint.comparison {
                Comparison::LessEqual => pb.add_row(..=constraint.rhs, &terms),
                Comparison::Equal => pb.add_row(constraint.rhs..=constraint.rhs, &terms),
                Comparison::GreaterEqual => pb.add_row(constraint.rhs.., &terms),
            }
        }

        let sense = match model.objective().map(|o| o.sense) {
            Some(Sense::Maximize) => highs::Sense::Maximise,
            _ => highs::Sense::Minimise,
        };

        let mut highs_model = pb.optimise(sense);
        highs_model.set_option("output_flag", options.verbose);
        highs_model.set_option("time_limit", options.time_limit.as_secs_f64());
        if let Some(gap) = options.mip_rel_gap {
            highs_model.set_option("mip_rel_gap", gap);
        }

        log::info!(
            "optimizing '{}' with {}: {} variables, {} constraints, time limit {:.1}s",
            model.name(),
            self.name(),
            model.num_variables(),
            model.num_constraints(),
            options.time_limit.as_secs_f64()
        );

        let solved = highs_model
            .try_solve()
            .map_err(|status| SolverError::ExecutionFailed(format!("HiGHS returned {:?}", status)))?;
        let solve_time = start_time.elapsed();

        let outcome = match solved.status() {
            HighsModelStatus::Optimal => {
                let solution = solved.get_solution();
                let assignment = solution.columns().to_vec();
                // With a user gap, HiGHS reports Optimal for any incumbent inside it
                let gap = options
                    .mip_rel_gap
                    .map(|_| solved.mip_gap())
                    .filter(|g| g.is_finite() && *g > FEASIBILITY_TOLERANCE);
                SolveOutcome {
                    status: if gap.is_some() {
                        SolveStatus::GapLimitReached
                    } else {
                        SolveStatus::Optimal
                    },
                    objective_value: model.objective_value(&assignment),
                    gap,
                    assignment: Some(assignment),
                    solve_time,
                }
            }
            HighsModelStatus::ReachedTimeLimit => {
                let solution = solved.get_solution();
                match Self::incumbent(model, solution.columns()) {
                    Some(assignment) => SolveOutcome {
                        status: SolveStatus::TimeLimitReached,
                        objective_value: model.objective_value(&assignment),
                        gap: Some(solved.mip_gap()).filter(|g| g.is_finite()),
                        assignment: Some(assignment),
                        solve_time,
                    },
                    None => {
                        log::warn!("time limit reached before any feasible placement was found");
                        SolveOutcome::without_solution(SolveStatus::TimeLimitReached, solve_time)
                    }
                }
            }
            HighsModelStatus::Infeasible => SolveOutcome::without_solution(SolveStatus::Infeasible, solve_time),
            status => {
                log::warn!("HiGHS stopped with status {:?}", status);
                SolveOutcome::without_solution(SolveStatus::NoSolutionFound, solve_time)
            }
        };

        log::info!(
            "{} finished in {:.3}s with status {}",
            self.name(),
            outcome.solve_time.as_secs_f64(),
            outcome.status
        );

        Ok(outcome)
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
