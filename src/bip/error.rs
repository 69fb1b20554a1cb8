//! Error types for model construction and solving

use super::model::VarId;

/// Errors raised while building a BIP model
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ModelError {
    #[error("Board size must be at least 1")]
    EmptyBoard,

    #[error("Unknown variable {0:?} (model has {1} variables)")]
    UnknownVariable(VarId, usize),

    #[error("Model already has an objective")]
    ObjectiveAlreadySet,
}

/// Errors raised by a solver backend
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}
