//! revhash - build-time cache-busting rewriter for HTML asset references.

#![allow(dead_code)]

mod cli;
mod config;
mod logger;
mod pipeline;
mod rev;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::RevConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = RevConfig::load(&cli)?;

    match &cli.command {
        Commands::Rewrite { args } => cli::rewrite::run(args, &config),
        Commands::Hash { file } => cli::hash::run(file),
    }
}
