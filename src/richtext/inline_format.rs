// Inline Format Engine
// Detects and toggles bold/italic/underline markers on a selection of the raw
// note content. Stateless: content and selection are owned by the caller.

use super::markers::{self, BOLD, BOLD_ITALIC, FormatFlags, ITALIC, UNDERLINE};
use super::selection::{Selection, utf16_len};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// An inline style toggle requested by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
    /// Remove every inline marker from the selection
    Clear,
}

impl fmt::Display for InlineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InlineFormat::Bold => "bold",
            InlineFormat::Italic => "italic",
            InlineFormat::Underline => "underline",
            InlineFormat::Clear => "clear",
        };
        f.write_str(name)
    }
}

impl FromStr for InlineFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bold" | "b" => Ok(InlineFormat::Bold),
            "italic" | "i" => Ok(InlineFormat::Italic),
            "underline" | "u" => Ok(InlineFormat::Underline),
            "clear" | "clearFormat" => Ok(InlineFormat::Clear),
            other => Err(format!("Unknown format '{}'", other)),
        }
    }
}

/// Errors that can occur when applying a format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The selection is a bare caret. Callers show this to the user as a prompt.
    NothingSelected,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::NothingSelected => {
                f.write_str("Please select some text first to apply formatting.")
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// The outcome of a successful format toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    /// Full content with the selection reformatted
    pub content: String,
    /// Format state of the reformatted run
    pub formats: FormatFlags,
    /// The reformatted run, markers included
    pub selection: Selection,
}

pub type FormatResult = Result<Formatted, FormatError>;

/// Report which formats the selected part of `content` carries.
///
/// Only the selected substring is inspected; markers that start or end
/// outside the selection are not seen. An empty selection reports nothing.
pub fn detect_formats(content: &str, selection: Selection) -> FormatFlags {
    if selection.is_empty() {
        return FormatFlags::none();
    }
    let range = selection.to_byte_range(content);
    markers::derive_format_state(&content[range])
}

/// Toggle `format` on the selected part of `content`.
///
/// The returned selection covers the reformatted run so the caller can keep
/// it selected after markers were added or removed. For underline it may
/// start earlier or end later than `selection`: a selection that cuts
/// through a marker pair is widened to the whole pair first.
pub fn apply_format(content: &str, selection: Selection, format: InlineFormat) -> FormatResult {
    if selection.is_empty() {
        return Err(FormatError::NothingSelected);
    }

    let mut range = selection.to_byte_range(content);
    if format == InlineFormat::Underline {
        range = widen_to_marker_pairs(content, range);
    }
    let before = &content[..range.start];
    let selected = &content[range.clone()];
    let after = &content[range.end..];

    let formatted = match format {
        InlineFormat::Bold => toggle_bold(selected),
        InlineFormat::Italic => toggle_italic(selected),
        InlineFormat::Underline => toggle_underline(selected),
        InlineFormat::Clear => markers::strip_markers(selected),
    };

    let start = utf16_len(before);
    let new_selection = Selection::new(start, start + utf16_len(&formatted));
    let formats = markers::derive_format_state(&formatted);

    let mut new_content = String::with_capacity(before.len() + formatted.len() + after.len());
    new_content.push_str(before);
    new_content.push_str(&formatted);
    new_content.push_str(after);

    Ok(Formatted {
        content: new_content,
        formats,
        selection: new_selection,
    })
}

// Bold-only -> plain, bold+italic -> italic, italic -> bold+italic, plain -> bold
fn toggle_bold(selected: &str) -> String {
    if selected.contains(markers::BOLD_MARKER) && !selected.contains(markers::BOLD_ITALIC_MARKER) {
        BOLD.replace_all(selected, "${1}").into_owned()
    } else if selected.contains(markers::BOLD_ITALIC_MARKER) {
        BOLD_ITALIC.replace_all(selected, "*${1}*").into_owned()
    } else if selected.contains(markers::ITALIC_MARKER) && !selected.contains(markers::BOLD_MARKER)
    {
        ITALIC.replace_all(selected, "***${1}***").into_owned()
    } else {
        format!("**{}**", selected)
    }
}

// Bold+italic -> bold, italic -> plain, bold -> bold+italic, plain -> italic
fn toggle_italic(selected: &str) -> String {
    if selected.contains(markers::BOLD_ITALIC_MARKER) {
        BOLD_ITALIC.replace_all(selected, "**${1}**").into_owned()
    } else if selected.contains(markers::ITALIC_MARKER) && !selected.contains(markers::BOLD_MARKER)
    {
        ITALIC.replace_all(selected, "${1}").into_owned()
    } else if selected.contains(markers::BOLD_MARKER) {
        BOLD.replace_all(selected, "***${1}***").into_owned()
    } else {
        format!("*{}*", selected)
    }
}

// Grow `range` until no marker pair is cut by it. A range inside the text of
// a bold or italic pair may stay there; underline nests inside that pair.
fn widen_to_marker_pairs(content: &str, mut range: Range<usize>) -> Range<usize> {
    let pairs = markers::marker_pairs(content);
    loop {
        let mut widened = false;
        for pair in &pairs {
            let overlaps = range.start < pair.outer.end && pair.outer.start < range.end;
            let covers = range.start <= pair.outer.start && pair.outer.end <= range.end;
            let nested = !pair.underline
                && pair.inner.start <= range.start
                && range.end <= pair.inner.end;
            if overlaps && !covers && !nested {
                range.start = range.start.min(pair.outer.start);
                range.end = range.end.max(pair.outer.end);
                widened = true;
            }
        }
        if !widened {
            return range;
        }
    }
}

// Underline wraps the selection as-is, outside any bold/italic markers in it
fn toggle_underline(selected: &str) -> String {
    if selected.contains(markers::UNDERLINE_MARKER) {
        UNDERLINE.replace_all(selected, "${1}").into_owned()
    } else {
        format!("__{}__", selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(bold: bool, italic: bool, underline: bool) -> FormatFlags {
        FormatFlags {
            bold,
            italic,
            underline,
        }
    }

    #[test]
    fn test_detect_on_caret_is_all_false() {
        assert_eq!(
            detect_formats("**hello**", Selection::caret(3)),
            FormatFlags::none()
        );
    }

    #[test]
    fn test_detect_only_sees_selection() {
        let content = "**bold** plain";
        assert!(detect_formats(content, Selection::new(0, 8)).bold);
        // Inside the bold run, but the markers are outside the selection
        assert!(!detect_formats(content, Selection::new(2, 6)).bold);
    }

    #[test]
    fn test_bold_plain_text() {
        let result = apply_format("hello world", Selection::new(0, 5), InlineFormat::Bold).unwrap();
        assert_eq!(result.content, "**hello** world");
        assert_eq!(result.selection, Selection::new(0, 9));
        assert_eq!(result.formats, flags(true, false, false));
        assert_eq!(
            detect_formats(&result.content, result.selection),
            flags(true, false, false)
        );
    }

    #[test]
    fn test_bold_toggle_is_its_own_inverse() {
        let cases = [
            ("say hello world", Selection::new(4, 9)),
            ("hello", Selection::new(0, 5)),
            ("*hi*", Selection::new(0, 4)),
            ("**hi**", Selection::new(0, 6)),
            ("**hi**", Selection::new(2, 4)),
            ("**a** b", Selection::new(6, 7)),
            ("x *it* y", Selection::new(2, 6)),
            ("café au lait", Selection::new(0, 4)),
            ("\u{1F600} smile", Selection::new(0, 2)),
            ("naïve \u{1F600}", Selection::new(6, 8)),
        ];

        for (content, selection) in cases {
            let first = apply_format(content, selection, InlineFormat::Bold).unwrap();
            let second =
                apply_format(&first.content, first.selection, InlineFormat::Bold).unwrap();
            assert_eq!(second.content, content, "content of {:?}", content);
            assert_eq!(second.selection, selection, "selection of {:?}", content);
        }
    }

    #[test]
    fn test_bold_on_italic_promotes_to_bold_italic() {
        let result = apply_format("*hi*", Selection::new(0, 4), InlineFormat::Bold).unwrap();
        assert_eq!(result.content, "***hi***");
        assert_eq!(result.formats, flags(true, true, false));
    }

    #[test]
    fn test_bold_on_bold_italic_demotes_to_italic() {
        let result = apply_format("***hi***", Selection::new(0, 8), InlineFormat::Bold).unwrap();
        assert_eq!(result.content, "*hi*");
        assert_eq!(result.selection, Selection::new(0, 4));
        assert_eq!(result.formats, flags(false, true, false));
    }

    #[test]
    fn test_italic_on_bold_yields_triple_marker() {
        let result = apply_format("**hello**", Selection::new(0, 9), InlineFormat::Italic).unwrap();
        assert_eq!(result.content, "***hello***");
        assert_eq!(
            detect_formats(&result.content, result.selection),
            flags(true, true, false)
        );
    }

    #[test]
    fn test_italic_cycle() {
        let result = apply_format("hi", Selection::new(0, 2), InlineFormat::Italic).unwrap();
        assert_eq!(result.content, "*hi*");
        assert_eq!(result.formats, flags(false, true, false));

        let result = apply_format(&result.content, result.selection, InlineFormat::Italic).unwrap();
        assert_eq!(result.content, "hi");

        let result = apply_format("***hi***", Selection::new(0, 8), InlineFormat::Italic).unwrap();
        assert_eq!(result.content, "**hi**");
        assert_eq!(result.formats, flags(true, false, false));
    }

    #[test]
    fn test_underline_wraps_outside_other_markers() {
        let result = apply_format("**hi**", Selection::new(0, 6), InlineFormat::Underline).unwrap();
        assert_eq!(result.content, "__**hi**__");
        assert_eq!(result.formats, flags(true, false, true));

        let result =
            apply_format(&result.content, result.selection, InlineFormat::Underline).unwrap();
        assert_eq!(result.content, "**hi**");
        assert_eq!(result.formats, flags(true, false, false));
    }

    #[test]
    fn test_underline_widens_selection_cutting_a_pair() {
        // Starts on the closing bold marker
        let result = apply_format("**ab** cd", Selection::new(4, 9), InlineFormat::Underline).unwrap();
        assert_eq!(result.content, "__**ab** cd__");
        assert_eq!(result.selection, Selection::new(0, 13));
        assert_eq!(result.formats, flags(true, false, true));

        // Starts inside the bold text
        let result = apply_format("**ab** cd", Selection::new(3, 9), InlineFormat::Underline).unwrap();
        assert_eq!(result.content, "__**ab** cd__");

        let result = apply_format("x *ab* y", Selection::new(0, 4), InlineFormat::Underline).unwrap();
        assert_eq!(result.content, "__x *ab*__ y");
    }

    #[test]
    fn test_underline_nests_inside_bold_text() {
        let result = apply_format("**abc**", Selection::new(3, 4), InlineFormat::Underline).unwrap();
        assert_eq!(result.content, "**a__b__c**");
        assert_eq!(result.selection, Selection::new(3, 8));
        assert_eq!(result.formats, flags(false, false, true));
    }

    #[test]
    fn test_underline_inside_underlined_run_removes_it() {
        let result = apply_format("__abc__ d", Selection::new(3, 4), InlineFormat::Underline).unwrap();
        assert_eq!(result.content, "abc d");
        assert_eq!(result.selection, Selection::new(0, 3));
        assert!(result.formats.is_plain());
    }

    #[test]
    fn test_clear_removes_everything() {
        let content = "x __***all***__ y";
        let result = apply_format(content, Selection::new(2, 15), InlineFormat::Clear).unwrap();
        assert_eq!(result.content, "x all y");
        assert_eq!(result.selection, Selection::new(2, 5));
        assert!(result.formats.is_plain());
    }

    #[test]
    fn test_empty_selection_is_a_noop_signal() {
        let result = apply_format("hello", Selection::caret(0), InlineFormat::Bold);
        assert_eq!(result, Err(FormatError::NothingSelected));
        assert_eq!(
            FormatError::NothingSelected.to_string(),
            "Please select some text first to apply formatting."
        );
    }

    #[test]
    fn test_reversed_selection() {
        let result = apply_format("hello world", Selection::new(11, 6), InlineFormat::Bold).unwrap();
        assert_eq!(result.content, "hello **world**");
        assert_eq!(result.selection, Selection::new(6, 15));
    }

    #[test]
    fn test_selection_uses_utf16_offsets() {
        let content = "\u{1F600} café";
        // emoji (2 units) + space (1) = 3, "café" = 4 units
        let result = apply_format(content, Selection::new(3, 7), InlineFormat::Bold).unwrap();
        assert_eq!(result.content, "\u{1F600} **café**");
        assert_eq!(result.selection, Selection::new(3, 11));
    }

    #[test]
    fn test_stray_asterisk_reports_derived_state() {
        // A lone asterisk takes the italic branch but no pair matches
        let result = apply_format("a*b", Selection::new(0, 3), InlineFormat::Bold).unwrap();
        assert_eq!(result.content, "a*b");
        assert!(result.formats.is_plain());
    }

    #[test]
    fn test_parse_format_names() {
        assert_eq!("bold".parse::<InlineFormat>(), Ok(InlineFormat::Bold));
        assert_eq!("clearFormat".parse::<InlineFormat>(), Ok(InlineFormat::Clear));
        assert!("strike".parse::<InlineFormat>().is_err());
    }
}
