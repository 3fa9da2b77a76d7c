//! Asset extraction from markerized fragments.
//!
//! HTML comments are stripped first so commented-out tags are never
//! hashed. Tags are then located by a small attribute-aware scanner
//! (tag name, ordered attribute list, raw span) rather than a DOM or a
//! bag of regexes, which keeps attribute-preserving rewrites robust to
//! attribute order and whitespace variance.
//!
//! Matched assets:
//! - CSS: `<link ... href="*.css">` (any trailing query/fragment ignored)
//! - JS: `<script ... src="*.js">` immediately followed by `</script>`
//!
//! Tag names, attribute names, and extensions are case-insensitive;
//! single quotes, double quotes, and unquoted values are accepted.

use regex::Regex;
use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Kind of referenced asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Css,
    Js,
}

/// One asset reference found in a fragment, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub kind: AssetKind,
    /// Raw path/URL from the `href`/`src` attribute, query string excluded.
    pub url: String,
    /// Full original tag text. For JS this spans `<script ...></script>`.
    pub tag: String,
    /// Byte range of the whole `href`/`src` attribute within `tag`.
    pub attr_span: Range<usize>,
}

/// Remove all HTML comment spans (non-greedy, multiline).
pub fn strip_comments(fragment: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(fragment, "")
}

/// Extract all asset references from a fragment, in document order.
///
/// Duplicated tags are each emitted separately.
pub fn extract(fragment: &str) -> Vec<AssetRef> {
    let clean = strip_comments(fragment);
    let s = clean.as_ref();

    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(off) = s[pos..].find('<') {
        let at = pos + off;
        let Some(tag) = parse_tag(s, at) else {
            pos = at + 1;
            continue;
        };
        match tag.name.as_str() {
            "link" => {
                if let Some(asset) = link_asset(s, &tag) {
                    out.push(asset);
                }
                pos = tag.span.end;
            }
            "script" => {
                if let Some((asset, end)) = script_asset(s, &tag) {
                    out.push(asset);
                    pos = end;
                } else {
                    pos = tag.span.end;
                }
            }
            _ => pos = tag.span.end,
        }
    }
    out
}

// =============================================================================
// Tag Scanner
// =============================================================================

/// A parsed attribute. `span` covers `name[=value]` within the fragment.
#[derive(Debug)]
struct Attr {
    /// Attribute name, lowercased.
    name: String,
    value: Option<String>,
    span: Range<usize>,
}

/// An opening tag with its ordered attributes and raw span.
#[derive(Debug)]
struct ScannedTag {
    /// Tag name, lowercased.
    name: String,
    attrs: Vec<Attr>,
    /// Byte range of `<name ...>` within the fragment.
    span: Range<usize>,
}

impl ScannedTag {
    fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == name)
    }
}

#[inline]
fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Parse one opening tag starting at `at` (which must point at `<`).
///
/// Returns `None` for anything that is not a well-formed tag (closing
/// tags, doctypes, stray `<` in text).
fn parse_tag(s: &str, at: usize) -> Option<ScannedTag> {
    let bytes = s.as_bytes();
    debug_assert_eq!(bytes[at], b'<');

    let mut i = skip_ws(bytes, at + 1);
    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name = s[name_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    loop {
        i = skip_ws(bytes, i);
        match bytes.get(i)? {
            b'>' => {
                return Some(ScannedTag {
                    name,
                    attrs,
                    span: at..i + 1,
                });
            }
            b'/' => {
                // Self-closing slash; anything else after it is malformed.
                i = skip_ws(bytes, i + 1);
                if *bytes.get(i)? == b'>' {
                    return Some(ScannedTag {
                        name,
                        attrs,
                        span: at..i + 1,
                    });
                }
                return None;
            }
            b'<' => return None,
            _ => {
                let attr = parse_attr(s, i)?;
                i = attr.span.end;
                attrs.push(attr);
            }
        }
    }
}

/// Parse one `name[=value]` attribute starting at `at`.
fn parse_attr(s: &str, at: usize) -> Option<Attr> {
    let bytes = s.as_bytes();

    let mut i = at;
    while i < bytes.len() && !matches!(bytes[i], b'=' | b'>' | b'/' | b'<') && !bytes[i].is_ascii_whitespace()
    {
        i += 1;
    }
    if i == at {
        return None;
    }
    let name = s[at..i].to_ascii_lowercase();

    let after_name = i;
    i = skip_ws(bytes, i);
    if bytes.get(i) != Some(&b'=') {
        // Boolean attribute (async, defer, ...).
        return Some(Attr {
            name,
            value: None,
            span: at..after_name,
        });
    }
    i = skip_ws(bytes, i + 1);

    match bytes.get(i)? {
        q @ (b'"' | b'\'') => {
            let val_start = i + 1;
            let rel = s[val_start..].find(*q as char)?;
            Some(Attr {
                name,
                value: Some(s[val_start..val_start + rel].to_string()),
                span: at..val_start + rel + 1,
            })
        }
        _ => {
            let val_start = i;
            while i < bytes.len() && bytes[i] != b'>' && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            Some(Attr {
                name,
                value: Some(s[val_start..i].to_string()),
                span: at..i,
            })
        }
    }
}

// =============================================================================
// Asset Matching
// =============================================================================

/// Strip query/fragment and require the given extension (case-insensitive).
fn asset_url(value: &str, ext: &str) -> Option<String> {
    let base = value.split(['?', '#']).next().unwrap_or(value);
    if base.len() > ext.len() && base.to_ascii_lowercase().ends_with(ext) {
        Some(base.to_string())
    } else {
        None
    }
}

fn link_asset(s: &str, tag: &ScannedTag) -> Option<AssetRef> {
    let attr = tag.attr("href")?;
    let url = asset_url(attr.value.as_deref()?, ".css")?;
    Some(AssetRef {
        kind: AssetKind::Css,
        url,
        tag: s[tag.span.clone()].to_string(),
        attr_span: attr.span.start - tag.span.start..attr.span.end - tag.span.start,
    })
}

/// Match a `<script src=...>` tag together with its closing `</script>`.
///
/// Only whitespace may separate the two; a script with inline content is
/// not an external asset reference. Returns the asset and the fragment
/// offset just past the closing tag.
fn script_asset(s: &str, tag: &ScannedTag) -> Option<(AssetRef, usize)> {
    let attr = tag.attr("src")?;
    let url = asset_url(attr.value.as_deref()?, ".js")?;
    let end = match_closing_script(s, tag.span.end)?;
    Some((
        AssetRef {
            kind: AssetKind::Js,
            url,
            tag: s[tag.span.start..end].to_string(),
            attr_span: attr.span.start - tag.span.start..attr.span.end - tag.span.start,
        },
        end,
    ))
}

/// Match `</script>` (whitespace-tolerant, case-insensitive) after `from`,
/// allowing only whitespace in between.
fn match_closing_script(s: &str, from: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = skip_ws(bytes, from);
    if *bytes.get(i)? != b'<' {
        return None;
    }
    i = skip_ws(bytes, i + 1);
    if *bytes.get(i)? != b'/' {
        return None;
    }
    i = skip_ws(bytes, i + 1);
    if !s.get(i..i + 6)?.eq_ignore_ascii_case("script") {
        return None;
    }
    i = skip_ws(bytes, i + 6);
    if *bytes.get(i)? != b'>' {
        return None;
    }
    Some(i + 1)
}
