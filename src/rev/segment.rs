//! Document segmentation on rev-hash markers.
//!
//! Splits a document into plain regions (copied byte-for-byte) and
//! markerized regions (subject to asset rewriting). Marker comments are
//! fixed and case-insensitive:
//!
//! ```html
//! <!-- rev-hash -->
//!   <link href="style.css">
//! <!-- end -->
//! ```
//!
//! Also detects the document's line-ending convention, which is applied
//! uniformly to every line inserted during reassembly.

use regex::Regex;
use std::sync::LazyLock;

/// Canonical opening marker text, emitted verbatim on rewrite.
pub const OPEN_MARKER: &str = "<!-- rev-hash -->";

/// Canonical closing marker text, emitted verbatim on rewrite.
pub const CLOSE_MARKER: &str = "<!-- end -->";

static OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!--\s*rev-hash\s*-->").unwrap());

static CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<!--\s*end\s*-->").unwrap());

// =============================================================================
// Line Endings
// =============================================================================

/// Line-ending convention of a document.
///
/// Detected once per document and immutable for the whole pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    CrLf,
    Lf,
    Cr,
}

impl LineEnding {
    /// Detect the convention from document content.
    ///
    /// Checks `\r\n` before `\n` so CRLF documents are not misread as LF.
    /// Documents without any newline default to LF.
    pub fn detect(content: &str) -> Self {
        if content.contains("\r\n") {
            Self::CrLf
        } else if content.contains('\n') {
            Self::Lf
        } else if content.contains('\r') {
            Self::Cr
        } else {
            Self::Lf
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CrLf => "\r\n",
            Self::Lf => "\n",
            Self::Cr => "\r",
        }
    }
}

// =============================================================================
// Regions
// =============================================================================

/// A contiguous slice of the document.
///
/// Concatenating all regions in order reconstructs the document exactly,
/// except that `Marked` bodies are replaced by rewritten tag lines.
#[derive(Debug, PartialEq, Eq)]
pub enum Region<'a> {
    /// Copied to the output verbatim.
    Plain(&'a str),
    /// Content between an opening and closing marker.
    Marked {
        /// Run of spaces/tabs immediately preceding the opening marker.
        /// Rewritten tag lines and the closing marker repeat it.
        indent: &'a str,
        /// Everything between the two marker comments.
        body: &'a str,
    },
}

/// Segmentation result.
#[derive(Debug)]
pub struct Segmented<'a> {
    pub regions: Vec<Region<'a>>,
    /// True when an opening marker had no matching closing marker.
    /// The remainder of the document is kept as a plain region.
    pub unterminated: bool,
}

/// Split a document into plain and markerized regions.
///
/// State machine: `Plain` until an opening marker, `InMarker` until the
/// next closing marker, back to `Plain`. A closing marker with no
/// preceding opening is ordinary text and stays in its plain region.
pub fn segment(content: &str) -> Segmented<'_> {
    let mut regions = Vec::new();
    let mut unterminated = false;
    let mut pos = 0;

    while let Some(open) = OPEN_RE.find_at(content, pos) {
        match CLOSE_RE.find_at(content, open.end()) {
            Some(close) => {
                let prefix = &content[pos..open.start()];
                regions.push(Region::Plain(prefix));
                regions.push(Region::Marked {
                    indent: trailing_indent(prefix),
                    body: &content[open.end()..close.start()],
                });
                pos = close.end();
            }
            None => {
                // Unterminated marker: leave the rest of the document alone.
                unterminated = true;
                break;
            }
        }
    }

    regions.push(Region::Plain(&content[pos..]));
    Segmented {
        regions,
        unterminated,
    }
}

/// Trailing run of spaces/tabs, used to indent inserted lines.
fn trailing_indent(s: &str) -> &str {
    &s[s.trim_end_matches([' ', '\t']).len()..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_line_ending() {
        assert_eq!(LineEnding::detect("a\r\nb"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a\rb"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("no newline"), LineEnding::Lf);
        // CRLF wins even when a stray LF appears first
        assert_eq!(LineEnding::detect("a\nb\r\nc"), LineEnding::CrLf);
    }

    #[test]
    fn test_segment_no_markers() {
        let seg = segment("<html><body></body></html>");
        assert!(!seg.unterminated);
        assert_eq!(seg.regions, vec![Region::Plain("<html><body></body></html>")]);
    }

    #[test]
    fn test_segment_single_region() {
        let doc = "<head>\n  <!-- rev-hash -->\n  <link href=\"a.css\">\n  <!-- end -->\n</head>";
        let seg = segment(doc);
        assert!(!seg.unterminated);
        assert_eq!(
            seg.regions,
            vec![
                Region::Plain("<head>\n  "),
                Region::Marked {
                    indent: "  ",
                    body: "\n  <link href=\"a.css\">\n  ",
                },
                Region::Plain("\n</head>"),
            ]
        );
    }

    #[test]
    fn test_segment_marker_spacing_and_case() {
        let doc = "<!--REV-HASH-->x<!--  End  -->";
        let seg = segment(doc);
        assert_eq!(
            seg.regions,
            vec![
                Region::Plain(""),
                Region::Marked {
                    indent: "",
                    body: "x"
                },
                Region::Plain(""),
            ]
        );
    }

    #[test]
    fn test_segment_multiple_regions() {
        let doc = "a<!-- rev-hash -->1<!-- end -->b<!-- rev-hash -->2<!-- end -->c";
        let seg = segment(doc);
        assert_eq!(seg.regions.len(), 5);
        assert_eq!(seg.regions[2], Region::Plain("b"));
        assert_eq!(seg.regions[4], Region::Plain("c"));
    }

    #[test]
    fn test_segment_unterminated() {
        let doc = "before<!-- rev-hash -->no closing marker";
        let seg = segment(doc);
        assert!(seg.unterminated);
        assert_eq!(
            seg.regions,
            vec![Region::Plain("before<!-- rev-hash -->no closing marker")]
        );
    }

    #[test]
    fn test_segment_stray_closing_marker() {
        // A closing marker without an opening is plain text.
        let doc = "a<!-- end -->b";
        let seg = segment(doc);
        assert!(!seg.unterminated);
        assert_eq!(seg.regions, vec![Region::Plain("a<!-- end -->b")]);
    }

    #[test]
    fn test_trailing_indent() {
        assert_eq!(trailing_indent("text\n    "), "    ");
        assert_eq!(trailing_indent("text\n\t\t"), "\t\t");
        assert_eq!(trailing_indent("text"), "");
        assert_eq!(trailing_indent(""), "");
        assert_eq!(trailing_indent("  "), "  ");
    }
}
