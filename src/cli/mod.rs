//! Command-line interface.

pub mod args;
pub mod hash;
pub mod rewrite;

pub use args::{Cli, Commands, RewriteArgs};
