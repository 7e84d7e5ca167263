// Inline marker syntax
// `**bold**`, `*italic*`, `***bold italic***` and `__underline__`.
// All patterns are non-greedy, so each match spans the shortest run between
// a pair of markers. Markers never span a line break.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::LazyLock;

pub const BOLD_MARKER: &str = "**";
pub const ITALIC_MARKER: &str = "*";
pub const BOLD_ITALIC_MARKER: &str = "***";
pub const UNDERLINE_MARKER: &str = "__";

pub static BOLD: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*(.*?)\*\*"));
pub static BOLD_ITALIC: LazyLock<Regex> = LazyLock::new(|| compile(r"\*\*\*(.*?)\*\*\*"));
pub static ITALIC: LazyLock<Regex> = LazyLock::new(|| compile(r"\*(.*?)\*"));
pub static UNDERLINE: LazyLock<Regex> = LazyLock::new(|| compile(r"__(.*?)__"));

// Longest marker first, so `***x***` is one pair rather than a bold pair
// with stray asterisks
static ASTERISK_PAIR: LazyLock<Regex> =
    LazyLock::new(|| compile(r"\*\*\*(.*?)\*\*\*|\*\*(.*?)\*\*|\*(.*?)\*"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("marker pattern must compile")
}

/// Which inline styles apply to a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormatFlags {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FormatFlags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline
    }
}

/// Derive the format state of `text` from the markers it contains.
///
/// This is the one place format state is computed. Italic is tested on a
/// copy with bold pairs removed so the asterisks of `**x**` don't count as
/// an italic pair. A `***x***` run counts as both bold and italic.
pub fn derive_format_state(text: &str) -> FormatFlags {
    let bold_italic = BOLD_ITALIC.is_match(text);
    let without_bold = BOLD.replace_all(text, "");

    FormatFlags {
        bold: BOLD.is_match(text) || bold_italic,
        italic: ITALIC.is_match(&without_bold) || bold_italic,
        underline: UNDERLINE.is_match(text),
    }
}

/// Remove bold, italic and underline marker pairs, keeping the enclosed text
pub fn strip_markers(text: &str) -> String {
    let text = BOLD.replace_all(text, "${1}");
    let text = ITALIC.replace_all(&text, "${1}");
    UNDERLINE.replace_all(&text, "${1}").into_owned()
}

/// A complete marker pair inside some content, as byte ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
    /// The pair including both markers
    pub outer: Range<usize>,
    /// The text between the markers
    pub inner: Range<usize>,
    pub underline: bool,
}

/// Every bold, italic, bold italic and underline pair in `text`, ordered by
/// where it starts
pub fn marker_pairs(text: &str) -> Vec<MarkerPair> {
    let mut pairs = Vec::new();
    for caps in ASTERISK_PAIR.captures_iter(text) {
        let inner = caps.iter().skip(1).flatten().next();
        if let (Some(outer), Some(inner)) = (caps.get(0), inner) {
            pairs.push(MarkerPair {
                outer: outer.range(),
                inner: inner.range(),
                underline: false,
            });
        }
    }
    for caps in UNDERLINE.captures_iter(text) {
        if let (Some(outer), Some(inner)) = (caps.get(0), caps.get(1)) {
            pairs.push(MarkerPair {
                outer: outer.range(),
                inner: inner.range(),
                underline: true,
            });
        }
    }
    pairs.sort_by_key(|pair| pair.outer.start);
    pairs
}
