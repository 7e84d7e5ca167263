// Inline rich text: marker syntax, selection-aware toggles and rendering

pub mod inline_format;
pub mod markers;
pub mod render;
pub mod selection;

pub use inline_format::{FormatError, Formatted, InlineFormat, apply_format, detect_formats};
pub use markers::{FormatFlags, derive_format_state, strip_markers};
pub use render::render_markers_to_markup;
pub use selection::Selection;
