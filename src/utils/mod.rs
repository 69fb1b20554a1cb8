//! Output formatting

pub mod display;

pub use display::SolutionFormatter;
