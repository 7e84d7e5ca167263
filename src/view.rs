// Note display
// Produces the markup a rendering surface shows for a note. The result is
// derived on every render and never stored.

use crate::note::Note;
use crate::richtext::render_markers_to_markup;
use crate::search::{escape_html, highlight_markup, highlight_plain_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    pub title_html: String,
    pub body_html: String,
    pub text_format_class: &'static str,
}

/// Escape, style and highlight note content: the full display pipeline
pub fn render_note_body(content: &str, query: &str) -> String {
    let styled = render_markers_to_markup(&escape_html(content));
    highlight_markup(&styled, query)
}

pub fn render_note(note: &Note, query: &str) -> NoteView {
    NoteView {
        title_html: highlight_plain_text(&note.title, query),
        body_html: render_note_body(&note.content, query),
        text_format_class: note.text_format.css_class(),
    }
}
