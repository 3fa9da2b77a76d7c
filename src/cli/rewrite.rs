//! Rewrite command: walk a directory and rewrite matching documents.
//!
//! Documents are processed one at a time, fully segmented, hashed, and
//! reassembled before the next is started. A failed document produces
//! no output and does not stop the run; the exit status reflects it.

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::RewriteArgs;
use crate::config::RevConfig;
use crate::pipeline::{FileContents, FileItem, RewriteStage};
use crate::{debug, log};

enum Outcome {
    Rewritten,
    Unchanged,
}

pub fn run(args: &RewriteArgs, config: &RevConfig) -> Result<()> {
    let stage = RewriteStage::new(config.transformer());

    let documents: Vec<PathBuf> = WalkDir::new(&args.dir)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| config.matches_extension(p))
        .collect();

    let scanned = documents.len();
    let mut rewritten = 0usize;
    let mut failed = 0usize;

    for path in documents {
        match process_document(&stage, &path, args) {
            Ok(Outcome::Rewritten) => rewritten += 1,
            Ok(Outcome::Unchanged) => {
                debug!("rewrite"; "unchanged: {}", path.display());
            }
            Err(e) => {
                log!("error"; "{}: {e:#}", path.display());
                failed += 1;
            }
        }
    }

    let action = if args.dry_run { "would update" } else { "updated" };
    log!("rewrite"; "{action} {rewritten} of {scanned} document(s)");

    if failed > 0 {
        bail!("{failed} document(s) failed");
    }
    Ok(())
}

/// Transform one document and write the result.
///
/// In-place runs skip unchanged documents entirely; with `--output`,
/// unchanged documents are still copied so the output tree is complete.
fn process_document(stage: &RewriteStage, path: &Path, args: &RewriteArgs) -> Result<Outcome> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    let item = stage.process(FileItem::text(path, bytes.clone()))?;
    let FileContents::Text(output) = item.contents else {
        return Ok(Outcome::Unchanged);
    };

    let changed = output != bytes;
    if changed {
        debug!("rewrite"; "{}", path.display());
    }

    if args.dry_run {
        return Ok(if changed {
            Outcome::Rewritten
        } else {
            Outcome::Unchanged
        });
    }

    match &args.output {
        Some(out_dir) => {
            let dest = dest_path(path, &args.dir, out_dir);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&dest, &output)
                .with_context(|| format!("failed to write {}", dest.display()))?;
        }
        None if changed => {
            fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => {}
    }

    Ok(if changed {
        Outcome::Rewritten
    } else {
        Outcome::Unchanged
    })
}

/// Map a scanned path into the output directory, keeping its position
/// relative to the scan root.
fn dest_path(path: &Path, scan_root: &Path, out_dir: &Path) -> PathBuf {
    match path.strip_prefix(scan_root) {
        Ok(rel) => out_dir.join(rel),
        // The walker is rooted at scan_root, so this only happens for
        // hand-fed paths; keep at least the file name.
        Err(_) => out_dir.join(path.file_name().map_or_else(|| path.as_os_str(), |n| n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dest_path_keeps_relative_layout() {
        assert_eq!(
            dest_path(
                Path::new("site/sub/index.html"),
                Path::new("site"),
                Path::new("dist"),
            ),
            PathBuf::from("dist/sub/index.html")
        );
    }

    #[test]
    fn test_dest_path_outside_scan_root_keeps_file_name() {
        assert_eq!(
            dest_path(
                Path::new("/elsewhere/index.html"),
                Path::new("site"),
                Path::new("dist"),
            ),
            PathBuf::from("dist/index.html")
        );
    }
}
