//! Main CLI application for the minimum-attack queens solver

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use min_attack_queens::{
    bip::AttackEncoding,
    config::{CliOverrides, OutputFormat, Settings},
    queens::QueensProblem,
    utils::SolutionFormatter,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "min_attack_queens")]
#[command(about = "Place N queens so that the fewest cells are attacked")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the BIP model and solve it with HiGHS
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board size N; prompted for when neither this nor the config sets it
        #[arg(short = 'n', long)]
        size: Option<usize>,

        /// Attack-linkage encoding (overrides config)
        #[arg(short, long, value_enum)]
        encoding: Option<EncodingArg>,

        /// Solver time limit in seconds (overrides config)
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Whether a queen attacks its own cell (overrides config)
        #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
        include_self: Option<bool>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the model in LP format before solving
        #[arg(long)]
        write_lp: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check both encodings against exhaustive search on a small board
    Verify {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board size N
        #[arg(short = 'n', long)]
        size: usize,

        /// Whether a queen attacks its own cell (overrides config)
        #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
        include_self: Option<bool>,
    },

    /// Print model sizes of both encodings without solving
    Stats {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board size N
        #[arg(short = 'n', long)]
        size: usize,

        /// Whether a queen attacks its own cell (overrides config)
        #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
        include_self: Option<bool>,
    },

    /// Create example configuration files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncodingArg {
    /// One two-term row per (cell, attacker) pair
    PerAttacker,
    /// One big-M row per cell
    Disjunctive,
}

impl From<EncodingArg> for AttackEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::PerAttacker => AttackEncoding::PerAttacker,
            EncodingArg::Disjunctive => AttackEncoding::Disjunctive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            size,
            encoding,
            time_limit,
            include_self,
            format,
            output,
            write_lp,
            verbose,
        } => {
            let overrides = CliOverrides {
                size,
                time_limit_seconds: time_limit,
                strategy: encoding.map(Into::into),
                include_self,
                verbose,
                format: format.map(Into::into),
                output_dir: output,
                write_lp,
            };
            solve_command(config, overrides)
        }
        Commands::Verify {
            config,
            size,
            include_self,
        } => verify_command(config, size, include_self),
        Commands::Stats {
            config,
            size,
            include_self,
        } => stats_command(config, size, include_self),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    // A second init (tests, repeated commands) keeps the first logger
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        log::warn!("config file {} not found, using defaults", config_path.display());
        Ok(Settings::default())
    }
}

/// Read N until a positive integer is entered
fn prompt_size<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<usize> {
    let mut line = String::new();
    loop {
        write!(output, "N: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line).context("Failed to read board size")? == 0 {
            anyhow::bail!("No board size given");
        }

        match line.trim().parse::<usize>() {
            Ok(size) if size > 0 => return Ok(size),
            _ => writeln!(output, "Please enter a positive integer.")?,
        }
    }
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    init_logging(settings.logging.verbose);

    settings.validate().context("Configuration validation failed")?;

    let size = match settings.board.size {
        Some(size) => size,
        None => {
            let stdin = std::io::stdin();
            prompt_size(&mut stdin.lock(), &mut std::io::stdout())?
        }
    };

    let verbose = settings.logging.verbose;
    let output_dir = settings.output.output_directory.clone();
    let format = settings.output.format;

    let problem = QueensProblem::new(settings, size).context("Failed to create queens problem")?;

    if verbose {
        println!("{}", problem.estimate_complexity());
        println!("{}", problem.encoding_statistics()?);
    }

    let solution = problem.solve().context("Failed to solve queens problem")?;
    print!("{}", SolutionFormatter::format_report(&solution));

    if verbose {
        if let Some(validation) = problem.validate_solution(&solution)? {
            println!("\n{}", validation);
        }
    }

    if let Some(path) = SolutionFormatter::save_solution(&solution, &output_dir, format)? {
        println!("\nSolution saved to {}", path.display());
    }

    Ok(())
}

/// Settings for the read-only commands: config file plus the self-attack override
fn command_settings(config_path: &Path, include_self: Option<bool>) -> Result<Settings> {
    let mut settings = load_settings(config_path)?;
    settings.merge_with_cli(&CliOverrides {
        include_self,
        ..CliOverrides::default()
    });
    init_logging(settings.logging.verbose);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn verify_command(config_path: PathBuf, size: usize, include_self: Option<bool>) -> Result<()> {
    let settings = command_settings(&config_path, include_self)?;

    let exact = QueensProblem::new(settings.clone(), size)?
        .solve_exhaustive()
        .context("Exhaustive search failed")?;

    for encoding in AttackEncoding::ALL {
        let mut run_settings = settings.clone();
        run_settings.encoding.strategy = encoding;
        let solution = QueensProblem::new(run_settings, size)?
            .solve()
            .with_context(|| format!("Failed to solve with {} encoding", encoding))?;
        println!("{}", SolutionFormatter::format_verification(&solution, &exact));
    }

    Ok(())
}

fn stats_command(config_path: PathBuf, size: usize, include_self: Option<bool>) -> Result<()> {
    let settings = command_settings(&config_path, include_self)?;

    let mut stats = Vec::new();
    for encoding in AttackEncoding::ALL {
        let mut run_settings = settings.clone();
        run_settings.encoding.strategy = encoding;
        let problem = QueensProblem::new(run_settings, size)?;
        stats.push(problem.encoding_statistics()?);
    }

    println!("Model sizes for N = {}:\n", size);
    print!("{}", SolutionFormatter::format_statistics_table(&stats));
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    let config_dir = directory.join("config");
    let output_dir = directory.join("output");

    for dir in [&config_dir, &output_dir] {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    let variants_dir = config_dir.join("variants");
    std::fs::create_dir_all(&variants_dir)?;

    let mut small = Settings::default();
    small.board.size = Some(4);
    small.solver.time_limit_seconds = 10;
    small.to_file(variants_dir.join("small.yaml"))?;

    let mut disjunctive = Settings::default();
    disjunctive.board.size = Some(8);
    disjunctive.encoding.strategy = AttackEncoding::Disjunctive;
    disjunctive.output.format = OutputFormat::Json;
    disjunctive.to_file(variants_dir.join("disjunctive.yaml"))?;

    println!("Created example configurations in: {}", variants_dir.display());
    println!("\nRun: min_attack_queens solve --config {}", config_path.display());

    Ok(())
}
