//! Objective of the minimum-attack model

use super::error::ModelError;
use super::model::{BipModel, LinearExpr, Objective, Sense};
use super::variables::BoardVariables;

/// Minimize Σ y[i][j], the number of attacked cells
pub fn build_objective(model: &mut BipModel, vars: &BoardVariables) -> Result<(), ModelError> {
    log::debug!("setting objective over {} attacked variables", vars.all_attacked().len());
    model.set_objective(Objective {
        expr: LinearExpr::sum(vars.all_attacked().iter().copied()),
        sense: Sense::Minimize,
    })
}
