//! Configuration settings for the minimum-attack queens solver

use crate::bip::{AttackEncoding, SolverOptions};
use crate::board::AttackRule;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub encoding: EncodingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Board size N; prompted for when absent
    pub size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub time_limit_seconds: u64,
    pub mip_rel_gap: Option<f64>,
    /// Largest N the `verify` command searches exhaustively
    pub max_exhaustive_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub strategy: AttackEncoding,
    /// Whether a queen counts as attacking its own cell
    pub include_self: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
    /// Write the built model in LP format before solving
    pub write_lp: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 120,
            mip_rel_gap: None,
            max_exhaustive_size: crate::queens::exhaustive::DEFAULT_MAX_EXHAUSTIVE_SIZE,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            output_directory: PathBuf::from("output"),
            write_lp: None,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.board.size == Some(0) {
            anyhow::bail!("Board size must be positive");
        }

        if self.solver.time_limit_seconds == 0 {
            anyhow::bail!("Time limit must be positive");
        }

        if let Some(gap) = self.solver.mip_rel_gap {
            if !(0.0..1.0).contains(&gap) {
                anyhow::bail!("MIP relative gap must be in [0, 1), got {}", gap);
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(size) = cli_overrides.size {
            self.board.size = Some(size);
        }
        if let Some(time_limit) = cli_overrides.time_limit_seconds {
            self.solver.time_limit_seconds = time_limit;
        }
        if let Some(strategy) = cli_overrides.strategy {
            self.encoding.strategy = strategy;
        }
        if let Some(include_self) = cli_overrides.include_self {
            self.encoding.include_self = include_self;
        }
        if cli_overrides.verbose {
            self.logging.verbose = true;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
        if let Some(ref write_lp) = cli_overrides.write_lp {
            self.output.write_lp = Some(write_lp.clone());
        }
    }

    pub fn attack_rule(&self) -> AttackRule {
        AttackRule::new(self.encoding.include_self)
    }

    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            time_limit: Duration::from_secs(self.solver.time_limit_seconds),
            verbose: self.logging.verbose,
            mip_rel_gap: self.solver.mip_rel_gap,
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub size: Option<usize>,
    pub time_limit_seconds: Option<u64>,
    pub strategy: Option<AttackEncoding>,
    pub include_self: Option<bool>,
    pub verbose: bool,
    pub format: Option<OutputFormat>,
    pub output_dir: Option<PathBuf>,
    pub write_lp: Option<PathBuf>,
}
