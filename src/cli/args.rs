//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// revhash cache-busting rewriter CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Show per-asset resolution and hashing details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: revhash.toml)
    #[arg(short = 'C', long, global = true, default_value = "revhash.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Default assets directory (overrides [assets].dir)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub assets_dir: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rewrite asset references in HTML documents under a directory
    #[command(visible_alias = "r")]
    Rewrite {
        #[command(flatten)]
        args: RewriteArgs,
    },

    /// Print the version digest of one file
    Hash {
        /// File to hash
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },
}

/// Arguments for the rewrite command
#[derive(clap::Args, Debug, Clone)]
pub struct RewriteArgs {
    /// Directory to scan for documents
    #[arg(default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Write rewritten documents here instead of in place
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,
}
