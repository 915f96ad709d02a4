use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "clientscore",
    version,
    about = "Score freelance clients from job posting markup"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score saved HTML files
    Score(ScoreCommand),
    /// Fetch job pages and score them
    Fetch(FetchCommand),
    /// Inspect or update stored settings
    Config(ConfigCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BackendArg {
    Text,
    Tree,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Page,
    Card,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Args)]
pub struct ScoreCommand {
    /// HTML file, directory of HTML files, or `-` for stdin
    pub path: PathBuf,
    #[arg(long, value_enum, default_value = "tree")]
    pub backend: BackendArg,
    #[arg(long, value_enum, default_value = "page")]
    pub mode: ModeArg,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,
}

#[derive(Args)]
pub struct FetchCommand {
    #[arg(required = true)]
    pub urls: Vec<String>,
    /// Per-request timeout, overriding retrieval.timeout_secs
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Search-result card markup scored when a page cannot be retrieved
    #[arg(long)]
    pub fallback_card: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "tree")]
    pub backend: BackendArg,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
    #[arg(long, default_value = ".", global = true)]
    pub config_dir: PathBuf,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the merged settings as TOML
    Show,
    /// Check the merged settings
    Validate,
    /// Write the built-in defaults to the project file
    Reset,
    Enable,
    Disable,
}
