//! Content digest computation for version tokens.
//!
//! The digest is MD5 over the file's full byte content, rendered as
//! 32 lower-case hex chars. MD5 is fine here: the digest is a cache
//! key, not a security boundary, and it matches tokens produced by
//! existing rev-hash tooling so already-deployed URLs stay stable.

use md5::{Digest, Md5};
use std::io;
use std::path::Path;

/// Compute the version digest of a byte buffer.
pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Compute the version digest of a file's content.
///
/// Read errors are not recovered here; a missing asset aborts the whole
/// document's transformation.
pub fn digest_file(path: &Path) -> io::Result<String> {
    Ok(digest_bytes(&std::fs::read(path)?))
}
