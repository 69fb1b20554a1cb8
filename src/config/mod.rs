//! Configuration management for the minimum-attack queens solver

pub mod settings;

pub use settings::{
    BoardConfig, CliOverrides, EncodingConfig, LoggingConfig, OutputConfig, OutputFormat, Settings, SolverConfig,
};
