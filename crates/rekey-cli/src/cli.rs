use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rekey_batch::ErrorPolicy;

#[derive(Parser)]
#[command(
    name = "rekey",
    about = "rekey -- prefix identifier fields across YAML configuration exports",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Prefix configured keys in every configured document
    Run(RunArgs),
    /// Show the structural diff between two YAML documents
    Diff(DiffArgs),
    /// List the configured documents and their prefixable keys
    Keys(KeysArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Prefix to prepend; prompted for when omitted
    #[arg(short, long)]
    pub prefix: Option<String>,
    /// Directory holding the documents
    #[arg(short = 'C', long)]
    pub dir: Option<PathBuf>,
    /// TOML file with the document table and run options
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
    /// Report changes without writing any file
    #[arg(long)]
    pub dry_run: bool,
    /// Do not retry unparseable documents after block scalar repair
    #[arg(long)]
    pub no_repair: bool,
    /// Skip re-parsing emitted documents before writing them
    #[arg(long)]
    pub no_verify: bool,
}

#[derive(Args)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    #[arg(long)]
    pub no_repair: bool,
}

#[derive(Args)]
pub struct KeysArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PolicyArg {
    /// Stop at the first document that fails
    Strict,
    /// Report failures and keep going
    Resilient,
}

impl From<PolicyArg> for ErrorPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Strict => ErrorPolicy::Strict,
            PolicyArg::Resilient => ErrorPolicy::Resilient,
        }
    }
}
