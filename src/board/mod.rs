//! Board representation and queen attack geometry

pub mod attack;
pub mod grid;

pub use attack::{shares_line, AttackRule};
pub use grid::{Board, Cell};
