//! Marker-scoped asset rewriting engine.
//!
//! Rewrites `<script src>` / `<link href>` URLs inside marker-delimited
//! regions of an HTML document so each carries a content-derived
//! `?v=<digest>` cache-busting token. Everything outside the markers is
//! preserved byte-for-byte.
//!
//! Control flow per document: [`segment`] splits on the markers, each
//! marked region is fed through [`extract`] → [`PathResolver::resolve`] →
//! [`hash::digest_file`] → [`rewrite_tag`], and the regions are
//! concatenated back in original order.

mod error;
pub mod hash;
mod resolve;
mod rewrite;
mod scan;
mod segment;

pub use error::RevError;
pub use resolve::{DomainMapping, PathResolver, normalize_path};
pub use rewrite::rewrite_tag;
pub use scan::{AssetKind, AssetRef, extract};
pub use segment::{CLOSE_MARKER, LineEnding, OPEN_MARKER, Region, segment};

use crate::log;

/// One fully-configured rewriting pass.
///
/// Immutable once built; safe to reuse across any number of documents.
#[derive(Debug, Clone)]
pub struct Transformer {
    resolver: PathResolver,
    prefer_css_over_js: bool,
}

impl Transformer {
    pub fn new(resolver: PathResolver, prefer_css_over_js: bool) -> Self {
        Self {
            resolver,
            prefer_css_over_js,
        }
    }

    /// Transform one document, all-or-nothing.
    ///
    /// A document without a marker pair comes back unchanged. An asset
    /// that cannot be read fails the whole document; no partial HTML is
    /// ever produced.
    pub fn transform(&self, content: &str) -> Result<String, RevError> {
        let eol = LineEnding::detect(content);
        let segmented = segment(content);

        if segmented.unterminated {
            log!("warning"; "unterminated {OPEN_MARKER} marker, leaving the remainder untouched");
        }

        let mut out = String::with_capacity(content.len());
        for region in &segmented.regions {
            match region {
                Region::Plain(text) => out.push_str(text),
                Region::Marked { indent, body } => {
                    self.render_region(&mut out, indent, body, eol)?;
                }
            }
        }
        Ok(out)
    }

    /// Replace one markerized region: canonical opening-marker line, one
    /// rewritten tag line per asset, indent + canonical closing marker.
    fn render_region(
        &self,
        out: &mut String,
        indent: &str,
        body: &str,
        eol: LineEnding,
    ) -> Result<(), RevError> {
        out.push_str(OPEN_MARKER);
        out.push_str(eol.as_str());

        for asset in self.select_assets(extract(body)) {
            let local = self.resolver.resolve(&asset.url);
            let digest = hash::digest_file(&local).map_err(|source| RevError::FileRead {
                url: asset.url.clone(),
                path: local,
                source,
            })?;
            out.push_str(indent);
            out.push_str(&rewrite_tag(&asset, &digest));
            out.push_str(eol.as_str());
        }

        out.push_str(indent);
        out.push_str(CLOSE_MARKER);
        Ok(())
    }

    /// Apply the CSS-over-JS priority policy to one region's assets.
    fn select_assets(&self, mut assets: Vec<AssetRef>) -> Vec<AssetRef> {
        if self.prefer_css_over_js && assets.iter().any(|a| a.kind == AssetKind::Css) {
            assets.retain(|a| a.kind == AssetKind::Css);
        }
        assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const BODY_CSS_HASH: &str = "aa676972bbd2b68e94ef8e91e81d20be"; // md5("body{}")

    fn transformer(assets_dir: &Path) -> Transformer {
        Transformer::new(PathResolver::new(Vec::new(), assets_dir.to_path_buf()), true)
    }

    #[test]
    fn test_no_markers_is_passthrough() {
        let dir = TempDir::new().unwrap();
        let doc = "<html>\n  <link href=\"a.css\">\n</html>\n";
        assert_eq!(transformer(dir.path()).transform(doc).unwrap(), doc);
    }

    #[test]
    fn test_css_scenario() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "body{}").unwrap();

        let doc = "  <!-- rev-hash -->\n  <link href=\"a.css\">\n  <!-- end -->";
        let out = transformer(dir.path()).transform(doc).unwrap();
        assert_eq!(
            out,
            format!(
                "  <!-- rev-hash -->\n  <link rel=\"stylesheet\" href=\"a.css?v={BODY_CSS_HASH}\">\n  <!-- end -->"
            )
        );
    }

    #[test]
    fn test_js_scenario_preserves_attributes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.js"), "alert(1)").unwrap();
        let hash = hash::digest_bytes(b"alert(1)");

        let doc = "<!-- rev-hash -->\n<script async src=\"app.js\"></script>\n<!-- end -->";
        let out = transformer(dir.path()).transform(doc).unwrap();
        assert_eq!(
            out,
            format!(
                "<!-- rev-hash -->\n<script async src=\"app.js?v={hash}\"></script>\n<!-- end -->"
            )
        );
    }

    #[test]
    fn test_bytes_outside_markers_preserved() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "body{}").unwrap();

        let doc = "<!-- keep this comment -->\n<p>  spaced  </p>\n  <!-- rev-hash -->\n  <link href=\"a.css\">\n  <!-- end -->\ntrailing\t text";
        let out = transformer(dir.path()).transform(doc).unwrap();
        assert!(out.starts_with("<!-- keep this comment -->\n<p>  spaced  </p>\n  <!-- rev-hash -->"));
        assert!(out.ends_with("<!-- end -->\ntrailing\t text"));
    }

    #[test]
    fn test_idempotent_when_assets_unchanged() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "body{}").unwrap();
        fs::write(dir.path().join("app.js"), "alert(1)").unwrap();

        let doc = "<!-- rev-hash -->\n<link href=\"a.css\">\n<!-- end -->\n<!-- rev-hash -->\n<script src=\"app.js\"></script>\n<!-- end -->\n";
        let t = transformer(dir.path());
        let once = t.transform(doc).unwrap();
        let twice = t.transform(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_changed_asset_changes_only_its_token() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), ".a{}").unwrap();
        fs::write(dir.path().join("b.css"), ".b{}").unwrap();

        let doc = "<!-- rev-hash -->\n<link href=\"a.css\">\n<link href=\"b.css\">\n<!-- end -->";
        let t = transformer(dir.path());
        let before = t.transform(doc).unwrap();

        fs::write(dir.path().join("a.css"), ".a{color:red}").unwrap();
        let after = t.transform(doc).unwrap();

        let line = |s: &str, url: &str| -> String {
            s.lines().find(|l| l.contains(url)).unwrap().to_string()
        };
        assert_ne!(line(&before, "a.css"), line(&after, "a.css"));
        assert_eq!(line(&before, "b.css"), line(&after, "b.css"));
    }

    #[test]
    fn test_css_priority_drops_js_in_same_region() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "body{}").unwrap();
        fs::write(dir.path().join("app.js"), "alert(1)").unwrap();

        let doc = "<!-- rev-hash -->\n<script src=\"app.js\"></script>\n<link href=\"a.css\">\n<!-- end -->";
        let out = transformer(dir.path()).transform(doc).unwrap();
        assert!(out.contains("a.css?v="));
        assert!(!out.contains("app.js"));
    }

    #[test]
    fn test_both_kinds_when_priority_disabled() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "body{}").unwrap();
        fs::write(dir.path().join("app.js"), "alert(1)").unwrap();

        let t = Transformer::new(
            PathResolver::new(Vec::new(), dir.path().to_path_buf()),
            false,
        );
        let doc = "<!-- rev-hash -->\n<script src=\"app.js\"></script>\n<link href=\"a.css\">\n<!-- end -->";
        let out = t.transform(doc).unwrap();

        // Both rewritten, in document order.
        let js_at = out.find("app.js?v=").unwrap();
        let css_at = out.find("a.css?v=").unwrap();
        assert!(js_at < css_at);
    }

    #[test]
    fn test_crlf_used_for_inserted_lines() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "body{}").unwrap();

        // Stray LF inside the markerized span must not leak into output.
        let doc = "<head>\r\n  <!-- rev-hash -->\n  <link href=\"a.css\">\n  <!-- end -->\r\n</head>\r\n";
        let out = transformer(dir.path()).transform(doc).unwrap();
        assert_eq!(
            out,
            format!(
                "<head>\r\n  <!-- rev-hash -->\r\n  <link rel=\"stylesheet\" href=\"a.css?v={BODY_CSS_HASH}\">\r\n  <!-- end -->\r\n</head>\r\n"
            )
        );
    }

    #[test]
    fn test_missing_asset_aborts_document() {
        let dir = TempDir::new().unwrap();
        let doc = "<!-- rev-hash -->\n<link href=\"missing.css\">\n<!-- end -->";
        let err = transformer(dir.path()).transform(doc).unwrap_err();
        assert!(matches!(err, RevError::FileRead { ref url, .. } if url == "missing.css"));
    }

    #[test]
    fn test_unterminated_marker_keeps_remainder_verbatim() {
        let dir = TempDir::new().unwrap();
        let doc = "<p>a</p>\n<!-- rev-hash -->\n<link href=\"a.css\">\n";
        assert_eq!(transformer(dir.path()).transform(doc).unwrap(), doc);
    }

    #[test]
    fn test_empty_region_emits_bare_markers() {
        let dir = TempDir::new().unwrap();
        let doc = "  <!-- rev-hash -->\n  <!-- end -->";
        let out = transformer(dir.path()).transform(doc).unwrap();
        assert_eq!(out, "  <!-- rev-hash -->\n  <!-- end -->");
    }

    #[test]
    fn test_case_varied_markers_and_comments() {
        // Exercises every compiled pattern in one pass: case-insensitive
        // marker matching, whitespace-tolerant marker spacing, and
        // multiline comment stripping inside the region.
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.css"), "body{}").unwrap();

        let doc = "<!--REV-HASH-->\n<!--\n<link href=\"old.css\">\n-->\n<link href=\"a.css\">\n<!--  End  -->";
        let out = transformer(dir.path()).transform(doc).unwrap();
        assert_eq!(
            out,
            format!(
                "<!-- rev-hash -->\n<link rel=\"stylesheet\" href=\"a.css?v={BODY_CSS_HASH}\">\n<!-- end -->"
            )
        );
    }

    #[test]
    fn test_domain_mapped_asset() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("cdn")).unwrap();
        fs::write(dir.path().join("cdn/app.js"), "alert(1)").unwrap();
        let hash = hash::digest_bytes(b"alert(1)");

        let t = Transformer::new(
            PathResolver::new(
                vec![DomainMapping {
                    domain: "cdn.xxxx.com".to_string(),
                    local_dir: dir.path().join("cdn"),
                }],
                std::path::PathBuf::new(),
            ),
            true,
        );
        let doc = "<!-- rev-hash -->\n<script src=\"https://cdn.xxxx.com/app.js\"></script>\n<!-- end -->";
        let out = t.transform(doc).unwrap();
        assert!(out.contains(&format!("src=\"https://cdn.xxxx.com/app.js?v={hash}\"")));
    }
}
