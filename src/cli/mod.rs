//! Command-line interface.

pub mod check;
pub mod config;
pub mod diagnostic;
pub mod optimize;
pub mod output;
pub mod pool;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::domain::Mode;
use crate::error::Result;

/// Exhaustive showdown lineup optimizer
#[derive(Parser, Debug)]
#[command(name = "showdown")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search every lineup in a player table and print the best
    Optimize(Box<OptimizeArgs>),

    /// Run every rule against one lineup
    Check(CheckArgs),

    /// List the eligible player pool
    Pool(PoolArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `showdown config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a documented configuration file.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file.
    Validate(ConfigPathArg),
}

/// Optional configuration file shared by every command.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file (defaults apply when omitted).
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ConfigPathArg {
    /// Load the named file, or defaults when none was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(&self) -> Result<Config> {
        self.config
            .as_deref()
            .map_or_else(|| Ok(Config::default()), load_config)
    }
}

/// Load a config file, rendering TOML syntax errors with source context.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is invalid.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(crate::error::ConfigError::ReadFile)?;
    Config::parse_toml(&content).map_err(|err| {
        diagnostic::report_config_error(&err, &content);
        err
    })
}

/// Arguments for `config init`.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    #[arg(default_value = "showdown.toml")]
    pub path: PathBuf,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

/// Rule overrides accepted by every command that evaluates lineups.
#[derive(Parser, Debug, Default)]
pub struct RuleArgs {
    /// Rule mode: backtest (past) or forward (live).
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Override the lowest accepted lineup cost.
    #[arg(long)]
    pub min_cost: Option<u32>,

    /// Override the highest accepted lineup cost.
    #[arg(long)]
    pub max_cost: Option<u32>,

    /// Disable all stacking heuristics.
    #[arg(long)]
    pub no_heuristics: bool,

    /// Reject lineups containing a zero-point projection.
    #[arg(long)]
    pub require_points: bool,
}

/// Arguments for `optimize`.
#[derive(Parser, Debug)]
pub struct OptimizeArgs {
    /// Player table (CSV with name, team, position, salary, fpts).
    pub players: PathBuf,

    #[command(flatten)]
    pub config: ConfigPathArg,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Number of lineups to report.
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Worker threads.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Stop searching after this many seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Captain to exclude in forward mode (repeatable or comma-separated).
    #[arg(long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Write ranked lineups to this CSV file.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hide the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Override log level (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Arguments for `check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Player table (CSV).
    pub players: PathBuf,

    /// Captain name.
    #[arg(long)]
    pub captain: String,

    /// The five flex players, comma-separated.
    #[arg(long, value_delimiter = ',', num_args = 1.., required = true)]
    pub flex: Vec<String>,

    #[command(flatten)]
    pub config: ConfigPathArg,

    #[command(flatten)]
    pub rules: RuleArgs,
}

/// Arguments for `pool`.
#[derive(Parser, Debug)]
pub struct PoolArgs {
    /// Player table (CSV).
    pub players: PathBuf,

    /// Sort column: name, team, position, salary or fpts.
    #[arg(long, default_value = "salary")]
    pub sort: String,
}

impl RuleArgs {
    /// Apply overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.rules.mode = mode;
        }
        if let Some(min_cost) = self.min_cost {
            tracing::info!(min_cost, "cost floor overridden");
            config.rules.min_cost = i64::from(min_cost);
        }
        if let Some(max_cost) = self.max_cost {
            tracing::info!(max_cost, "cost ceiling overridden");
            config.rules.max_cost = i64::from(max_cost);
        }
        if self.no_heuristics {
            config.rules.heuristics = crate::domain::Heuristics::none();
        }
        if self.require_points {
            config.rules.require_points = true;
        }
    }
}

/// Dispatch a parsed command line.
///
/// # Errors
///
/// Returns whatever error the selected command reports.
pub fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Optimize(args) => optimize::execute(args),
        Commands::Check(args) => check::execute(args),
        Commands::Pool(args) => pool::execute(args),
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(args),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(args),
    }
}
