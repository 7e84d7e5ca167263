// Styled markup tree
// A small, forgiving reader and writer for the inline markup produced by the
// format renderer and the highlighter. Only what a note body can contain is
// modelled: text and elements with attributes. Tokenizing is html5ever's.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use std::cell::RefCell;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Concatenated text of this node and everything below it
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Element(el) => {
            for child in &el.children {
                collect_text(child, out);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercase tag name
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into().to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into().to_ascii_lowercase(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }
}

/// A sequence of sibling nodes, the parsed form of a markup string
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub nodes: Vec<Node>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Fragment { nodes }
    }

    /// Parse markup into a tree. Never fails: malformed input degrades to
    /// text, unknown closing tags are dropped and open elements are closed
    /// at the end of input. Character references are decoded.
    pub fn parse(html: &str) -> Self {
        let sink = FragmentSink {
            builder: RefCell::new(TreeBuilder::default()),
        };
        let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
        let mut queue = BufferQueue::default();
        queue.push_back(StrTendril::from(html));
        let _ = tokenizer.feed(&mut queue);
        tokenizer.end();

        tokenizer.sink.builder.into_inner().finish()
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            write_node(node, &mut out);
        }
        out
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            collect_text(node, &mut out);
        }
        out
    }

    /// Replace every element matching `pred` with its own text, merging the
    /// result into neighbouring text nodes.
    pub fn unwrap_elements<P>(&mut self, pred: P)
    where
        P: Fn(&Element) -> bool,
    {
        let nodes = std::mem::take(&mut self.nodes);
        self.nodes = unwrap_where(nodes, &pred);
    }

    /// Rewrite every text leaf with `f`. Elements, their names and their
    /// attributes are left untouched.
    pub fn map_text<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> Vec<Node>,
    {
        let nodes = std::mem::take(&mut self.nodes);
        self.nodes = map_text_nodes(nodes, &mut f);
    }
}

fn unwrap_where<P>(nodes: Vec<Node>, pred: &P) -> Vec<Node>
where
    P: Fn(&Element) -> bool,
{
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) => push_text(&mut out, text),
            Node::Element(el) if pred(&el) => {
                let text = Node::Element(el).text_content();
                push_text(&mut out, text);
            }
            Node::Element(mut el) => {
                el.children = unwrap_where(std::mem::take(&mut el.children), pred);
                out.push(Node::Element(el));
            }
        }
    }
    out
}

fn map_text_nodes<F>(nodes: Vec<Node>, f: &mut F) -> Vec<Node>
where
    F: FnMut(&str) -> Vec<Node>,
{
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) => out.extend(f(&text)),
            Node::Element(mut el) => {
                el.children = map_text_nodes(std::mem::take(&mut el.children), f);
                out.push(Node::Element(el));
            }
        }
    }
    out
}

// Append text, merging with a preceding text node. Empty text is dropped.
fn push_text(out: &mut Vec<Node>, text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(prev)) = out.last_mut() {
        prev.push_str(&text);
    } else {
        out.push(Node::Text(text));
    }
}

/// Escape `& < > " '` so text can be placed into markup verbatim
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape_html(text)),
        Node::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if el.is_void() {
                return;
            }
            for child in &el.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}

// Builds the tree from tokens as they arrive. Unbalanced closing tags are
// dropped and anything still open is closed at end of input.
#[derive(Default)]
struct TreeBuilder {
    text: String,
    stack: Vec<Element>,
    root: Vec<Node>,
}

impl TreeBuilder {
    fn open_element(&mut self, element: Element, self_closing: bool) {
        self.flush_text();
        if self_closing || element.is_void() {
            self.push_node(Node::Element(element));
        } else {
            self.stack.push(element);
        }
    }

    // Close the innermost open element called `name`, closing anything
    // opened inside it. A closing tag with no open match is dropped.
    fn close_element(&mut self, name: &str) {
        self.flush_text();
        let Some(depth) = self.stack.iter().rposition(|el| el.name == name) else {
            return;
        };
        while self.stack.len() > depth {
            if let Some(el) = self.stack.pop() {
                self.push_node(Node::Element(el));
            }
        }
    }

    fn push_node(&mut self, node: Node) {
        let target = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        match node {
            Node::Text(text) => push_text(target, text),
            node => target.push(node),
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.push_node(Node::Text(text));
        }
    }

    fn finish(mut self) -> Fragment {
        self.flush_text();
        while let Some(el) = self.stack.pop() {
            self.push_node(Node::Element(el));
        }
        Fragment::new(self.root)
    }
}

struct FragmentSink {
    builder: RefCell<TreeBuilder>,
}

impl TokenSink for FragmentSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut builder = self.builder.borrow_mut();
        match token {
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let element = tag.attrs.iter().fold(Element::new(name), |el, attr| {
                            el.with_attr(attr.name.local.to_string(), attr.value.to_string())
                        });
                        builder.open_element(element, tag.self_closing);
                    }
                    TagKind::EndTag => builder.close_element(&name),
                }
            }
            Token::CharacterTokens(text) => builder.text.push_str(&text),
            // Comments, doctypes and parse errors carry no note text
            _ => {}
        }
        TokenSinkResult::Continue
    }
}
