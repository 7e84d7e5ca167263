// Search highlighting
// Wraps query matches in `<mark class="search-highlight">` for display.
// Highlights are never persisted; rendering twice with any query gives the
// same result as rendering once.

use super::markup::{Element, Fragment, Node};
use super::normalize::Matcher;

pub const HIGHLIGHT_TAG: &str = "mark";
pub const HIGHLIGHT_CLASS: &str = "search-highlight";

/// Escape `text` and highlight every match of `query` in it.
///
/// Matching runs on the unescaped text, so a query such as `&` matches the
/// ampersand rather than the `&amp;` entity. A blank query only escapes.
pub fn highlight_plain_text(text: &str, query: &str) -> String {
    let nodes = match Matcher::new(query) {
        Some(matcher) => highlight_text(text, &matcher),
        None => vec![Node::text(text)],
    };
    Fragment::new(nodes).serialize()
}

/// Highlight matches of `query` inside already-styled markup.
///
/// Highlights from an earlier pass are removed first. Only text is searched:
/// tags and attributes are never matched, and a match cannot span two
/// elements. A blank query returns the markup with old highlights removed.
pub fn highlight_markup(html: &str, query: &str) -> String {
    let mut fragment = Fragment::parse(html);
    fragment.unwrap_elements(is_highlight);

    if let Some(matcher) = Matcher::new(query) {
        fragment.map_text(|text| highlight_text(text, &matcher));
    }
    fragment.serialize()
}

/// Whether `el` is a highlight produced by this module
pub fn is_highlight(el: &Element) -> bool {
    el.name == HIGHLIGHT_TAG && el.has_class(HIGHLIGHT_CLASS)
}

fn highlight_element(text: &str) -> Node {
    Node::Element(
        Element::new(HIGHLIGHT_TAG)
            .with_attr("class", HIGHLIGHT_CLASS)
            .with_child(Node::text(text)),
    )
}

// Split one text leaf into plain and highlighted runs
fn highlight_text(text: &str, matcher: &Matcher) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut last = 0;
    for range in matcher.find_all(text) {
        if range.start > last {
            nodes.push(Node::text(&text[last..range.start]));
        }
        nodes.push(highlight_element(&text[range.clone()]));
        last = range.end;
    }
    if last < text.len() {
        nodes.push(Node::text(&text[last..]));
    }
    nodes
}
