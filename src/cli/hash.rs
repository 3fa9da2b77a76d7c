//! Hash command: print the version digest of one file.
//!
//! Debugging aid; prints the same digest the rewriter embeds.

use anyhow::{Context, Result};
use std::path::Path;

use crate::rev::hash::digest_file;

pub fn run(file: &Path) -> Result<()> {
    let digest =
        digest_file(file).with_context(|| format!("failed to read {}", file.display()))?;
    println!("{digest}");
    Ok(())
}
