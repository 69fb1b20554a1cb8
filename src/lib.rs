//! Minimum-attack N-queens solver
//!
//! Places N queens on an N×N board so that as few cells as possible are
//! attacked, by building a binary integer program and handing it to a MIP
//! solver.

pub mod bip;
pub mod board;
pub mod config;
pub mod queens;
pub mod utils;

pub use config::Settings;
pub use queens::{QueensProblem, QueensSolution};
