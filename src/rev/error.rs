//! Transformation error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while transforming one document.
///
/// There is no retry logic anywhere: every operation is a local,
/// deterministic file read.
#[derive(Debug, Error)]
pub enum RevError {
    /// Streamed contents cannot be rewritten; only buffered text is
    /// supported. Reported and the item is dropped, the pipeline moves on.
    #[error("streamed contents are not supported")]
    UnsupportedInput,

    /// Buffered contents are not valid UTF-8. Rejecting instead of a
    /// lossy decode keeps the byte-preservation guarantee: a document we
    /// cannot represent losslessly is never rewritten at all.
    #[error("document is not valid UTF-8")]
    NonUtf8(#[source] std::str::Utf8Error),

    /// A referenced asset could not be read while hashing. Aborts the
    /// whole document's output; nothing partial is ever emitted.
    #[error("failed to read asset `{url}` (resolved to {path})")]
    FileRead {
        url: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
