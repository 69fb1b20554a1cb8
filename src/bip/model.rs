//! Caller-owned binary integer program: variables, linear constraints and one objective

use super::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Feasibility tolerance used when checking assignments against constraints
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Index of a variable inside a [`BipModel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

/// Domain of a decision variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableDomain {
    /// x ∈ {0, 1}
    Binary,
    /// x ∈ ℤ within bounds
    Integer,
    /// x ∈ ℝ within bounds
    Continuous,
}

/// Decision variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub domain: VariableDomain,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl Variable {
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: VariableDomain::Binary,
            lower_bound: 0.0,
            upper_bound: 1.0,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: VariableDomain::Integer,
            lower_bound: 0.0,
            upper_bound: f64::INFINITY,
        }
    }

    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: VariableDomain::Continuous,
            lower_bound: 0.0,
            upper_bound: f64::INFINITY,
        }
    }

    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    pub fn is_integral(&self) -> bool {
        !matches!(self.domain, VariableDomain::Continuous)
    }
}

/// Sparse linear expression Σ coefficient·variable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    pub terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables, each with coefficient 1
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    pub fn add_term(&mut self, var: VarId, coefficient: f64) -> &mut Self {
        self.terms.push((var, coefficient));
        self
    }

    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.terms.push((var, coefficient));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate the expression for a dense assignment indexed by [`VarId`]
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|&(var, coeff)| coeff * values.get(var.0).copied().unwrap_or(0.0))
            .sum()
    }
}

/// Comparison operator of a linear constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    LessEqual,
    Equal,
    GreaterEqual,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::LessEqual => write!(f, "<="),
            Comparison::Equal => write!(f, "="),
            Comparison::GreaterEqual => write!(f, ">="),
        }
    }
}

/// Linear constraint `expr (<=|=|>=) rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub comparison: Comparison,
    pub rhs: f64,
}

impl Constraint {
    pub fn new(name: impl Into<String>, expr: LinearExpr, comparison: Comparison, rhs: f64) -> Self {
        Self {
            name: name.into(),
            expr,
            comparison,
            rhs,
        }
    }

    /// Check the constraint against a dense assignment
    pub fn is_satisfied(&self, values: &[f64]) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.comparison {
            Comparison::LessEqual => lhs <= self.rhs + FEASIBILITY_TOLERANCE,
            Comparison::Equal => (lhs - self.rhs).abs() <= FEASIBILITY_TOLERANCE,
            Comparison::GreaterEqual => lhs >= self.rhs - FEASIBILITY_TOLERANCE,
        }
    }
}

/// Direction of optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Objective function
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub expr: LinearExpr,
    pub sense: Sense,
}

/// A binary integer program under construction.
///
/// Builder operations take `&mut BipModel`; the model is owned by the caller
/// and handed to a solver once complete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BipModel {
    name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
}

impl BipModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a variable and return its id
    pub fn add_variable(&mut self, variable: Variable) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(variable);
        id
    }

    /// Add a constraint, rejecting references to undeclared variables
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<usize, ModelError> {
        self.check_expr(&constraint.expr)?;
        log::trace!(
            "constraint {}: {} terms {} {}",
            constraint.name,
            constraint.expr.len(),
            constraint.comparison,
            constraint.rhs
        );
        self.constraints.push(constraint);
        Ok(self.constraints.len() - 1)
    }

    /// Attach the objective. A model carries exactly one.
    pub fn set_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        if self.objective.is_some() {
            return Err(ModelError::ObjectiveAlreadySet);
        }
        self.check_expr(&objective.expr)?;
        self.objective = Some(objective);
        Ok(())
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(id.0)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Total number of nonzero coefficients over all constraints
    pub fn num_nonzeros(&self) -> usize {
        self.constraints.iter().map(|c| c.expr.len()).sum()
    }

    /// Objective coefficient of every variable, dense and aggregated
    pub fn objective_coefficients(&self) -> Vec<f64> {
        let mut coefficients = vec![0.0; self.variables.len()];
        if let Some(objective) = &self.objective {
            for &(var, coeff) in &objective.expr.terms {
                coefficients[var.0] += coeff;
            }
        }
        coefficients
    }

    /// Objective value of an assignment, if an objective is set
    pub fn objective_value(&self, values: &[f64]) -> Option<f64> {
        self.objective.as_ref().map(|o| o.expr.evaluate(values))
    }

    /// Whether an assignment respects bounds, integrality and every constraint
    pub fn is_feasible(&self, values: &[f64]) -> bool {
        if values.len() != self.variables.len() {
            return false;
        }

        let within_domain = self.variables.iter().zip(values).all(|(var, &value)| {
            if !value.is_finite() {
                return false;
            }
            if value < var.lower_bound - FEASIBILITY_TOLERANCE
                || value > var.upper_bound + FEASIBILITY_TOLERANCE
            {
                return false;
            }
            !var.is_integral() || (value - value.round()).abs() <= FEASIBILITY_TOLERANCE
        });

        within_domain && self.constraints.iter().all(|c| c.is_satisfied(values))
    }

    fn check_expr(&self, expr: &LinearExpr) -> Result<(), ModelError> {
        match expr.terms.iter().find(|(var, _)| var.0 >= self.variables.len()) {
            Some(&(var, _)) => Err(ModelError::UnknownVariable(var, self.variables.len())),
            None => Ok(()),
        }
    }
}
