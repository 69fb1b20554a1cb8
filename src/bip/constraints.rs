//! Constraint generation for the minimum-attack queens model

use super::error::ModelError;
use super::model::{BipModel, Comparison, Constraint, LinearExpr};
use super::variables::BoardVariables;
use crate::board::{AttackRule, Cell};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signature shared by every attack-linkage generator. Returns the number of
/// constraints added.
pub type AttackGenerator = fn(&mut BipModel, &BoardVariables, &AttackRule) -> Result<usize, ModelError>;

/// How "cell is attacked" is linked to queen placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackEncoding {
    /// One two-term constraint `y[i][j] >= x[k][l]` per attacker
    #[default]
    PerAttacker,
    /// One big-M constraint `M·y[i][j] >= Σ x[k][l]` per cell
    Disjunctive,
}

impl AttackEncoding {
    pub const ALL: [AttackEncoding; 2] = [AttackEncoding::PerAttacker, AttackEncoding::Disjunctive];

    /// Generator function implementing this encoding
    pub fn generator(self) -> AttackGenerator {
        match self {
            AttackEncoding::PerAttacker => per_attacker_constraints,
            AttackEncoding::Disjunctive => disjunctive_constraints,
        }
    }
}

impl fmt::Display for AttackEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackEncoding::PerAttacker => write!(f, "per-attacker"),
            AttackEncoding::Disjunctive => write!(f, "disjunctive"),
        }
    }
}

/// Σ x[i][j] == N: the only constraint fixing the number of queens
pub fn add_placement_cardinality_constraint(
    model: &mut BipModel,
    vars: &BoardVariables,
) -> Result<(), ModelError> {
    log::debug!("adding place-n-queens constraint");
    let expr = LinearExpr::sum(vars.all_placement().iter().copied());
    model.add_constraint(Constraint::new(
        "place_n_queens",
        expr,
        Comparison::Equal,
        vars.size() as f64,
    ))?;
    Ok(())
}

/// Link every y to its attackers using the chosen encoding
pub fn add_attack_constraints(
    model: &mut BipModel,
    vars: &BoardVariables,
    encoding: AttackEncoding,
    rule: &AttackRule,
) -> Result<usize, ModelError> {
    log::debug!("adding {} attack constraints", encoding);
    let added = (encoding.generator())(model, vars, rule)?;
    log::debug!("added {} {} attack constraints", added, encoding);
    Ok(added)
}

/// `y[i][j] - x[k][l] >= 0` for every cell and every attacker of it
fn per_attacker_constraints(
    model: &mut BipModel,
    vars: &BoardVariables,
    rule: &AttackRule,
) -> Result<usize, ModelError> {
    let size = vars.size();
    let mut added = 0;

    for row in 0..size {
        for col in 0..size {
            let target = Cell::new(row, col);
            let y = vars.attacked(target);

            for attacker in rule.attacker_set(size, target) {
                let expr = LinearExpr::new()
                    .with_term(y, 1.0)
                    .with_term(vars.placement(attacker), -1.0);
                let name = format!("attack_{}_{}_by_{}_{}", row, col, attacker.row, attacker.col);
                model.add_constraint(Constraint::new(name, expr, Comparison::GreaterEqual, 0.0))?;
                added += 1;
            }
        }
    }

    Ok(added)
}

/// `M·y[i][j] - Σ_{A(i,j)} x[k][l] >= 0` with `M = |A(i,j)|`.
///
/// Any occupied attacker forces `y >= 1/M`, hence `y = 1`. Cells with an empty
/// attacker set get no row.
fn disjunctive_constraints(
    model: &mut BipModel,
    vars: &BoardVariables,
    rule: &AttackRule,
) -> Result<usize, ModelError> {
    let size = vars.size();
    let mut added = 0;

    for row in 0..size {
        for col in 0..size {
            let target = Cell::new(row, col);
            let attackers = rule.attacker_set(size, target);
            if attackers.is_empty() {
                continue;
            }

            let big_m = attackers.len() as f64;
            let mut expr = LinearExpr::new().with_term(vars.attacked(target), big_m);
            for attacker in &attackers {
                expr.add_term(vars.placement(*attacker), -1.0);
            }

            let name = format!("attack_{}_{}", row, col);
            model.add_constraint(Constraint::new(name, expr, Comparison::GreaterEqual, 0.0))?;
            added += 1;
        }
    }

    Ok(added)
}
