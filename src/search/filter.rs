// Note filtering for the search bar

use super::normalize::Matcher;
use crate::note::Note;
use crate::richtext::strip_markers;

/// Notes whose title or content matches `query`, in their original order.
///
/// Inline markers are stripped before matching so `**ca**t` is found by
/// `cat`. A blank query keeps every note.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let Some(matcher) = Matcher::new(query) else {
        return notes.iter().collect();
    };

    notes
        .iter()
        .filter(|note| {
            matcher.is_match(&strip_markers(&note.title))
                || matcher.is_match(&strip_markers(&note.content))
        })
        .collect()
}
