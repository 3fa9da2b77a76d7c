//! Tool configuration from `revhash.toml`.
//!
//! ```toml
//! [assets]
//! dir = "static"              # default local root for asset reads
//! project_path = "../"        # root for resolving remote mapping paths
//!
//! [[assets.remote]]           # ordered; first match wins
//! domain = "cdn.example.com"
//! path = "static/cdn"
//!
//! [rewrite]
//! prefer_css_over_js = true
//! extensions = ["html", "htm"]
//! ```
//!
//! Every section is optional; a missing config file runs on defaults.
//! CLI flags override file values. The loaded value is immutable for
//! the lifetime of the run.

mod error;

pub use error::ConfigError;

use crate::cli::Cli;
use crate::rev::{DomainMapping, PathResolver, Transformer, normalize_path};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure representing revhash.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory containing the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Asset location settings
    #[serde(default)]
    pub assets: AssetsConfig,

    /// Rewrite pass settings
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

/// `[assets]` section: where referenced files live on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Default local root joined onto asset URLs with no matching domain.
    pub dir: PathBuf,

    /// Root for resolving `remote[].path`, relative to the config file.
    pub project_path: PathBuf,

    /// Ordered CDN-domain → local-directory mappings.
    pub remote: Vec<RemoteMapping>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::new(),
            // The directory above the project by convention.
            project_path: PathBuf::from("../"),
            remote: Vec::new(),
        }
    }
}

/// One `[[assets.remote]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteMapping {
    pub domain: String,
    /// Local directory the domain serves from, relative to `project_path`.
    pub path: PathBuf,
}

/// `[rewrite]` section: pass behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// A region containing any CSS asset rewrites only CSS; JS tags in
    /// that region are dropped. Matches the reference tool. Set to
    /// `false` to rewrite both kinds in document order.
    pub prefer_css_over_js: bool,

    /// File extensions the walker feeds through the pipeline.
    pub extensions: Vec<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            prefer_css_over_js: true,
            extensions: vec!["html".to_string(), "htm".to_string()],
        }
    }
}

impl RevConfig {
    /// Load configuration, layering CLI overrides on top of the file.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = if cli.config.exists() {
            let raw = fs::read_to_string(&cli.config)
                .map_err(|e| ConfigError::Io(cli.config.clone(), e))?;
            toml::from_str::<Self>(&raw)?
        } else {
            Self::default()
        };

        config.config_path = normalize_path(&cli.config);
        config.root = config
            .config_path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        if let Some(dir) = &cli.assets_dir {
            config.assets.dir = dir.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (i, mapping) in self.assets.remote.iter().enumerate() {
            if mapping.domain.trim_end_matches('/').is_empty() {
                return Err(ConfigError::Validation(format!(
                    "assets.remote[{i}].domain must not be empty"
                )));
            }
            if mapping.path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "assets.remote[{i}].path must not be empty"
                )));
            }
        }
        if self.rewrite.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "rewrite.extensions must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute root for resolving remote mapping paths.
    pub fn project_root(&self) -> PathBuf {
        let p = &self.assets.project_path;
        if p.is_absolute() {
            p.clone()
        } else {
            normalize_path(&self.root.join(p))
        }
    }

    /// Build the immutable path resolver for this run.
    pub fn resolver(&self) -> PathResolver {
        let root = self.project_root();
        let mappings = self
            .assets
            .remote
            .iter()
            .map(|m| DomainMapping {
                domain: m.domain.clone(),
                local_dir: root.join(&m.path),
            })
            .collect();
        PathResolver::new(mappings, self.assets.dir.clone())
    }

    /// Build the fully-configured transformer for this run.
    pub fn transformer(&self) -> Transformer {
        Transformer::new(self.resolver(), self.rewrite.prefer_css_over_js)
    }

    /// Whether a path's extension selects it for rewriting.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.rewrite
                    .extensions
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(ext))
            })
    }
}
