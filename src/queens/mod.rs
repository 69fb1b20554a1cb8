//! Minimum-attack queens problem definition and solution handling

pub mod exhaustive;
pub mod problem;
pub mod solution;
pub mod validator;

pub use exhaustive::{minimum_attack, ExhaustiveResult};
pub use problem::QueensProblem;
pub use solution::QueensSolution;
pub use validator::{SolutionValidator, ValidationResult};
