use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "XLINK++ CLI - Greedy spatial prediction of cross-link bonds and radicals in polymerizing structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict core and surface cross-links of a PDB structure and write pair/radical reports.
    Predict(PredictArgs),
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    // --- Inputs and Outputs ---
    /// Path to the input PDB structure.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Reactive atom specification for core bonding (`atom-name residue-name` per line).
    #[arg(long, value_name = "PATH")]
    pub core_reactive: Option<PathBuf>,

    /// Reactive atom specification for surface bonding.
    #[arg(long, value_name = "PATH")]
    pub surface_reactive: Option<PathBuf>,

    /// Directory for the report files. Defaults to the input file's directory.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Strategy Overrides ---
    /// Override the neighbor query radius of the core stage.
    #[arg(long, value_name = "FLOAT")]
    pub core_radius: Option<f64>,

    /// Override the isolatedness weight of the core stage.
    #[arg(long, value_name = "FLOAT")]
    pub core_weight: Option<f64>,

    /// Override the neighbor query radius of the surface stage.
    #[arg(long, value_name = "FLOAT")]
    pub surface_radius: Option<f64>,

    /// Override the isolatedness weight of the surface stage.
    #[arg(long, value_name = "FLOAT")]
    pub surface_weight: Option<f64>,

    /// Allow at most one surface bond per pair of chains.
    #[arg(long)]
    pub linker: bool,

    /// Custom linking table (TOML) for deriving surface partner atoms.
    #[arg(long, value_name = "PATH")]
    pub linking_table: Option<PathBuf>,

    /// Use an exhaustive neighbor scan instead of the kd-tree.
    #[arg(long)]
    pub brute_force: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S core.query-radius=5.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
