// Selection ranges over note content
// Offsets are UTF-16 code units, the unit text inputs report caret positions in.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A caret or selection inside a content string.
///
/// `start` is inclusive and `end` exclusive. `start == end` is a bare caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Selection { start, end }
    }

    /// A caret with nothing selected
    pub fn caret(offset: usize) -> Self {
        Selection {
            start: offset,
            end: offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Length in UTF-16 code units
    pub fn len(&self) -> usize {
        self.end.abs_diff(self.start)
    }

    /// Same range with `start <= end`
    pub fn normalized(&self) -> Self {
        if self.start <= self.end {
            *self
        } else {
            Selection {
                start: self.end,
                end: self.start,
            }
        }
    }

    /// Convert to a byte range into `text`.
    ///
    /// Offsets past the end clamp to the text length. An offset that falls
    /// between the two halves of a surrogate pair snaps back to the start of
    /// that character so the range always lies on char boundaries.
    pub fn to_byte_range(&self, text: &str) -> Range<usize> {
        let sel = self.normalized();
        utf16_to_byte(text, sel.start)..utf16_to_byte(text, sel.end)
    }
}

/// Number of UTF-16 code units needed to encode `text`
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte offset of the character containing UTF-16 offset `offset`
pub fn utf16_to_byte(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte_idx, ch) in text.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset {
            return byte_idx;
        }
        units = next;
    }
    text.len()
}
