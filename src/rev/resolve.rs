//! Asset URL to local path resolution.
//!
//! Assets are referenced in HTML by URL, often through a CDN domain in
//! production, but hashing happens at build time against the local copy.
//! Domain mappings translate `https://cdn.example.com/js/app.js` back to
//! the directory the CDN is populated from.
//!
//! Mapping order matters: the first domain whose string occurs anywhere
//! inside the asset URL wins. This is first-match, not longest-match, and
//! matches the reference tool's behavior for overlapping domain names.

use std::path::{Path, PathBuf};

/// One CDN-domain → local-directory translation.
#[derive(Debug, Clone)]
pub struct DomainMapping {
    pub domain: String,
    /// Pre-resolved absolute directory the domain serves from.
    pub local_dir: PathBuf,
}

/// Maps document-referenced asset URLs to readable local paths.
///
/// Immutable once built; resolution itself never fails. A wrong result
/// surfaces only when the hash computer tries to read the file.
#[derive(Debug, Clone)]
pub struct PathResolver {
    mappings: Vec<DomainMapping>,
    assets_dir: PathBuf,
}

impl PathResolver {
    pub fn new(mappings: Vec<DomainMapping>, assets_dir: PathBuf) -> Self {
        Self {
            mappings,
            assets_dir,
        }
    }

    /// Resolve an asset URL to a local filesystem path.
    ///
    /// The first configured domain found inside the URL wins; the URL
    /// tail after `domain/` is joined onto that mapping's directory.
    /// Without mappings, or when none matches, the URL is joined onto
    /// the default assets directory.
    pub fn resolve(&self, asset_url: &str) -> PathBuf {
        for mapping in &self.mappings {
            let domain = mapping.domain.trim_end_matches('/');
            if domain.is_empty() {
                continue;
            }
            if let Some(idx) = asset_url.find(domain) {
                // Skip the domain and the slash that follows it.
                let tail = asset_url.get(idx + domain.len() + 1..).unwrap_or("");
                return mapping.local_dir.join(tail);
            }
        }
        self.assets_dir.join(asset_url)
    }
}

/// Normalize a path to absolute form, tolerating non-existent paths.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}
