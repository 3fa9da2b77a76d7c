//! Rewriting matched tags with version tokens.
//!
//! The two kinds are deliberately asymmetric, matching the reference
//! tool's contract:
//!
//! - CSS: the original tag is discarded and a canonical
//!   `<link rel="stylesheet" href="URL?v=HASH">` is emitted. Other
//!   attributes on the original `<link>` are intentionally dropped.
//! - JS: the original tag is kept verbatim except for the `src`
//!   attribute, which is replaced by `src="URL?v=HASH"`. Everything
//!   else (`async`, `defer`, `type`, spacing, `</script>`) survives.

use super::scan::{AssetKind, AssetRef};

/// Render the replacement tag for one asset.
pub fn rewrite_tag(asset: &AssetRef, digest: &str) -> String {
    match asset.kind {
        AssetKind::Css => {
            format!(
                "<link rel=\"stylesheet\" href=\"{}?v={}\">",
                asset.url, digest
            )
        }
        AssetKind::Js => {
            let mut tag = String::with_capacity(asset.tag.len() + digest.len() + 4);
            tag.push_str(&asset.tag[..asset.attr_span.start]);
            tag.push_str(&format!("src=\"{}?v={}\"", asset.url, digest));
            tag.push_str(&asset.tag[asset.attr_span.end..]);
            tag
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rev::scan::extract;

    #[test]
    fn test_rewrite_css_canonical() {
        let refs = extract(r#"<link rel="stylesheet" media="print" href="a.css" data-x="1">"#);
        assert_eq!(
            rewrite_tag(&refs[0], "abcd1234"),
            r#"<link rel="stylesheet" href="a.css?v=abcd1234">"#
        );
    }

    #[test]
    fn test_rewrite_js_preserves_attributes() {
        let refs = extract(r#"<script async src="app.js"></script>"#);
        assert_eq!(
            rewrite_tag(&refs[0], "abcd1234"),
            r#"<script async src="app.js?v=abcd1234"></script>"#
        );
    }

    #[test]
    fn test_rewrite_js_normalizes_quotes_only_on_src() {
        let refs = extract("<script defer src='app.js' type='module'></script>");
        assert_eq!(
            rewrite_tag(&refs[0], "ff00"),
            "<script defer src=\"app.js?v=ff00\" type='module'></script>"
        );
    }

    #[test]
    fn test_rewrite_js_drops_stale_query() {
        let refs = extract(r#"<script src="app.js?v=stale"></script>"#);
        assert_eq!(
            rewrite_tag(&refs[0], "fresh00fresh00fresh00fresh00fe12"),
            r#"<script src="app.js?v=fresh00fresh00fresh00fresh00fe12"></script>"#
        );
    }
}
