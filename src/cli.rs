use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kubescore",
    version,
    about = "Kubernetes manifest static analysis against best-practice checks"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score manifests and print the report
    Score(ScoreCommand),
    /// List every registered check
    List,
}

#[derive(Args)]
pub struct ScoreCommand {
    /// Manifest files or directories; `-` reads stdin
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Config file to use instead of ./kubescore.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target Kubernetes version, e.g. 1.18
    #[arg(long)]
    pub kubernetes_version: Option<String>,

    /// Enable an optional check (repeatable)
    #[arg(long = "enable-optional-test", value_name = "CHECK")]
    pub enable_optional_test: Vec<String>,

    /// Skip a check entirely (repeatable)
    #[arg(long = "ignore-test", value_name = "CHECK")]
    pub ignore_test: Vec<String>,

    /// Exit with 1 when any warning is present
    #[arg(long)]
    pub exit_one_on_warning: bool,

    /// Evaluate on a single thread
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Human,
    Json,
    Sarif,
}
