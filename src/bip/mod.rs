//! Binary integer programming components for the queens model

pub mod constraints;
pub mod encoder;
pub mod error;
pub mod lp_format;
pub mod model;
pub mod objective;
pub mod solver;
pub mod variables;

pub use constraints::AttackEncoding;
pub use encoder::{EncodedModel, EncodingStatistics, QueensEncoder};
pub use error::{ModelError, SolverError};
pub use model::BipModel;
pub use solver::{HighsSolver, MipSolver, SolveOutcome, SolveStatus, SolverOptions};
pub use variables::BoardVariables;
