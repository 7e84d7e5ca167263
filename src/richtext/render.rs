// Marker to markup rendering
// Turns `**`, `*`, `***` and `__` runs into styled span wrappers for display.

use super::markers::{BOLD, BOLD_ITALIC, ITALIC, UNDERLINE};

pub const BOLD_CLASS: &str = "text-bold";
pub const ITALIC_CLASS: &str = "text-italic";
pub const UNDERLINE_CLASS: &str = "text-underline";

/// Replace inline markers with `<span class="text-…">` wrappers.
///
/// Passes run in a fixed order: `***` first (italic around bold), then
/// `**`, `*` and `__`. Running the triple pass first keeps a `***x***` run
/// from being split into a bold pair plus a stray asterisk. Each pass only
/// sees markers the previous passes left behind.
///
/// No escaping is done here. Escape raw user text before calling this.
pub fn render_markers_to_markup(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let bold_italic = format!(
        r#"<span class="{ITALIC_CLASS}"><span class="{BOLD_CLASS}">${{1}}</span></span>"#
    );
    let bold = format!(r#"<span class="{BOLD_CLASS}">${{1}}</span>"#);
    let italic = format!(r#"<span class="{ITALIC_CLASS}">${{1}}</span>"#);
    let underline = format!(r#"<span class="{UNDERLINE_CLASS}">${{1}}</span>"#);

    let out = BOLD_ITALIC.replace_all(content, bold_italic.as_str());
    let out = BOLD.replace_all(&out, bold.as_str());
    let out = ITALIC.replace_all(&out, italic.as_str());
    UNDERLINE.replace_all(&out, underline.as_str()).into_owned()
}
