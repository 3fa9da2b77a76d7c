//! Streaming-pipeline adapter around the transformer.
//!
//! Models the host contract of item-by-item file delivery: each item is
//! a path plus contents that are either absent, a buffered text body,
//! or a stream. Empty items pass through untouched; streamed items are
//! rejected; buffered items are rewritten in one synchronous pass.
//!
//! The stage never yields mid-document and holds no mutable state, so
//! one stage instance serves an entire run.

use std::path::PathBuf;

use crate::rev::{RevError, Transformer};

/// Contents of one pipeline item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContents {
    /// No content; the item passes through as a no-op.
    Empty,
    /// Buffered text content, rewritten in place.
    Text(Vec<u8>),
    /// Streamed content. Not supported; the item is rejected.
    Stream,
}

/// One file flowing through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub path: PathBuf,
    pub contents: FileContents,
}

impl FileItem {
    pub fn text(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            contents: FileContents::Text(bytes),
        }
    }
}

/// The rewrite stage of the pipeline.
pub struct RewriteStage {
    transformer: Transformer,
}

impl RewriteStage {
    pub fn new(transformer: Transformer) -> Self {
        Self { transformer }
    }

    /// Process one item.
    ///
    /// Failure aborts this item only; the driver reports it and carries
    /// on with the next one. A failed item produces no output at all.
    pub fn process(&self, item: FileItem) -> Result<FileItem, RevError> {
        match item.contents {
            FileContents::Empty => Ok(item),
            FileContents::Stream => Err(RevError::UnsupportedInput),
            FileContents::Text(bytes) => {
                let content = std::str::from_utf8(&bytes).map_err(RevError::NonUtf8)?;
                let rewritten = self.transformer.transform(content)?;
                Ok(FileItem {
                    path: item.path,
                    contents: FileContents::Text(rewritten.into_bytes()),
                })
            }
        }
    }
}
