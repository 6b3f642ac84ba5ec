//! Rendered-text helpers over a parsed snapshot

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

/// Elements that start a new line in rendered text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p", "pre", "section",
    "table", "tr", "ul",
];

/// Elements whose contents never render as text
const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript"];

/// The subtree a lookup is evaluated against
///
/// Field lookups run against the whole document; list-item lookups run against
/// a single item element.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    root: ElementRef<'a>,
    base: Option<&'a Url>,
}

impl<'a> Scope<'a> {
    /// Scope covering a whole document
    pub fn document(html: &'a Html, base: Option<&'a Url>) -> Self {
        Self {
            root: html.root_element(),
            base,
        }
    }

    /// Narrows the scope to `element`, keeping the base URL
    pub fn within(&self, element: ElementRef<'a>) -> Self {
        Self {
            root: element,
            base: self.base,
        }
    }

    pub fn root(&self) -> ElementRef<'a> {
        self.root
    }

    /// URL relative links are resolved against
    pub fn base(&self) -> Option<&'a Url> {
        self.base
    }

    /// Elements under the scope root matching `css`
    ///
    /// Returns None when the selector does not parse.
    pub fn select(&self, css: &str) -> Option<Vec<ElementRef<'a>>> {
        select_all(self.root, css)
    }
}

/// Elements under `root` matching `css`, or None for an invalid selector
pub fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Option<Vec<ElementRef<'a>>> {
    match Selector::parse(css) {
        Ok(selector) => Some(root.select(&selector).collect()),
        Err(e) => {
            tracing::trace!("Invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

/// Visible text of an element, approximating how a browser renders it
///
/// Line breaks come from `<br>` and block elements, and paragraphs are set
/// apart by a blank line. Whitespace inside text runs collapses to single
/// spaces and consecutive blank lines collapse to one.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    normalize_text(&raw)
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                for c in text.chars() {
                    out.push(if c.is_whitespace() { ' ' } else { c });
                }
            }
            Node::Element(el) => {
                let name = el.name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let brk = if name == "p" {
                    "\n\n"
                } else if BLOCK_TAGS.contains(&name) {
                    "\n"
                } else {
                    ""
                };
                out.push_str(brk);
                collect_text(child_el, out);
                out.push_str(brk);
            }
            _ => {}
        }
    }
}

/// Collapses spaces within lines and runs of blank lines
pub fn normalize_text(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut pending_blank = false;

    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }
        if pending_blank {
            lines.push(String::new());
            pending_blank = false;
        }
        lines.push(collapsed);
    }

    lines.join("\n")
}
