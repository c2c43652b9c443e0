//! Document model used by every extractor.
//!
//! Extractors only ever talk to [`DocumentModel`], so signal scanning can be
//! exercised against hand-built documents as well as real HTML parsed by
//! `scraper` (html5ever never rejects input, so malformed pages simply yield
//! fewer elements).

use scraper::{ElementRef, Html, Node, Selector};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Tags whose text never contributes to visible body copy.
const NON_VISIBLE_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Elements that break words apart. Inline elements (`b`, `span`, `a`, ...)
/// join their text to the surrounding copy.
const BLOCK_TAGS: [&str; 32] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr",
];

/// Owned view of one matched element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSnapshot {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    /// Raw concatenation of all descendant text nodes.
    pub text: String,
}

impl ElementSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Text with whitespace runs collapsed and ends trimmed.
    pub fn clean_text(&self) -> String {
        collapse_whitespace(&self.text)
    }
}

/// Query surface the extractors need from a parsed page.
pub trait DocumentModel {
    /// All elements matching a CSS selector, in document order.
    fn select(&self, selector: &str) -> Vec<ElementSnapshot>;

    /// Visible text of `<body>`, whitespace collapsed.
    fn body_text(&self) -> String;

    /// Serialized inner markup of `<body>`.
    fn body_markup(&self) -> String;

    fn exists(&self, selector: &str) -> bool {
        !self.select(selector).is_empty()
    }

    /// Cleaned text of the first match, if it is non-empty.
    fn first_text(&self, selector: &str) -> Option<String> {
        self.select(selector)
            .into_iter()
            .next()
            .map(|el| el.clean_text())
            .filter(|s| !s.is_empty())
    }

    /// Trimmed value of `attr` on the first match, if it is non-empty.
    fn first_attr(&self, selector: &str, attr: &str) -> Option<String> {
        self.select(selector)
            .into_iter()
            .next()
            .and_then(|el| el.attr(attr).map(|v| v.trim().to_string()))
            .filter(|s| !s.is_empty())
    }
}

/// `DocumentModel` backed by an html5ever parse tree.
pub struct HtmlDocument {
    html: Html,
    /// Parsed selectors by source string; `None` marks one that failed to parse.
    selectors: RefCell<HashMap<String, Option<Selector>>>,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            selectors: RefCell::new(HashMap::new()),
        }
    }

    fn body(&self) -> Option<ElementRef<'_>> {
        static SELECTOR: OnceLock<Selector> = OnceLock::new();
        let selector = SELECTOR.get_or_init(|| Selector::parse("body").unwrap());
        self.html.select(selector).next()
    }
}

impl DocumentModel for HtmlDocument {
    fn select(&self, selector: &str) -> Vec<ElementSnapshot> {
        let mut cache = self.selectors.borrow_mut();
        let parsed = cache
            .entry(selector.to_string())
            .or_insert_with(|| match Selector::parse(selector) {
                Ok(s) => Some(s),
                Err(e) => {
                    log::warn!("Ignoring unparsable selector {:?}: {:?}", selector, e);
                    None
                }
            });
        let Some(parsed) = parsed else {
            return Vec::new();
        };

        self.html
            .select(parsed)
            .map(|el| ElementSnapshot {
                name: el.value().name().to_string(),
                attrs: el
                    .value()
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                text: el.text().collect::<String>(),
            })
            .collect()
    }

    fn body_text(&self) -> String {
        let Some(body) = self.body() else {
            return String::new();
        };
        let mut text = String::new();
        collect_visible_text(body, &mut text);
        collapse_whitespace(&text)
    }

    fn body_markup(&self) -> String {
        self.body().map(|b| b.inner_html()).unwrap_or_default()
    }
}

fn collect_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if NON_VISIBLE_TAGS.contains(&el.name()) => {}
            Node::Element(el) => {
                let block = BLOCK_TAGS.contains(&el.name());
                if block {
                    out.push(' ');
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_visible_text(child_el, out);
                }
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_text_skips_scripts_and_styles() {
        let doc = HtmlDocument::parse(
            r#"<html><body><p>Hello</p><script>var x = 1;</script><style>p{}</style><p>world</p></body></html>"#,
        );
        assert_eq!(doc.body_text(), "Hello world");
    }

    #[test]
    fn inline_markup_does_not_split_words() {
        let doc = HtmlDocument::parse(
            "<body><p>un<b>believ</b>able price $<span>19</span>.99</p></body>",
        );
        assert_eq!(doc.body_text(), "unbelievable price $19.99");
    }

    #[test]
    fn block_elements_separate_words() {
        let doc = HtmlDocument::parse(
            "<body><h1>Title</h1><div>one</div><ul><li>two</li><li>three</li></ul>four<br>five</body>",
        );
        assert_eq!(doc.body_text(), "Title one two three four five");
    }

    #[test]
    fn select_keeps_document_order_and_attrs() {
        let doc = HtmlDocument::parse(
            r#"<body><a href="/a">First</a><a href="/b" rel="nofollow">Second</a></body>"#,
        );
        let anchors = doc.select("a[href]");
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors[0].attr("href"), Some("/a"));
        assert_eq!(anchors[1].attr("rel"), Some("nofollow"));
        assert_eq!(anchors[1].clean_text(), "Second");
    }

    #[test]
    fn bad_selector_yields_nothing() {
        let doc = HtmlDocument::parse("<p>x</p>");
        assert!(doc.select("p[[").is_empty());
        // cached failure stays a failure, valid selectors are unaffected
        assert!(doc.select("p[[").is_empty());
        assert_eq!(doc.select("p").len(), 1);
        assert_eq!(doc.select("p").len(), 1);
    }

    #[test]
    fn malformed_html_still_parses() {
        let doc = HtmlDocument::parse("<div><h1>Unclosed <b>title");
        assert_eq!(doc.first_text("h1").as_deref(), Some("Unclosed title"));
        assert_eq!(HtmlDocument::parse("").body_text(), "");
    }
}
