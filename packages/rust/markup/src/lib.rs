//! Catalog markup helpers and the semester-block parser.
//!
//! The catalog API answers in XML. Documents are loaded through the
//! lenient HTML parser in `scraper`, which tolerates the malformed markup
//! the API sometimes returns, and then walked by element name.

pub mod normalize;
pub mod semesters;

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use degreemap_shared::{DegreeMapError, Result};

pub use semesters::parse_year;

// ---------------------------------------------------------------------------
// Document loading
// ---------------------------------------------------------------------------

/// Parse an API response into a queryable document.
///
/// Self-closing tags (`<cores/>`) carry no meaning to an HTML parser, so they
/// are expanded into explicit open/close pairs first.
pub fn parse_document(markup: &str) -> Html {
    Html::parse_document(&expand_self_closing(markup))
}

fn expand_self_closing(markup: &str) -> String {
    static SELF_CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<([A-Za-z][\w:.\-]*)([^<>]*?)/>").expect("valid regex")
    });

    SELF_CLOSING_RE
        .replace_all(markup, "<$1$2></$1>")
        .into_owned()
}

/// Compile a CSS selector, reporting failures as parse errors.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DegreeMapError::parse(format!("bad selector '{css}': {e}")))
}

// ---------------------------------------------------------------------------
// Element navigation
// ---------------------------------------------------------------------------

/// Whether an element's tag name matches, ignoring any namespace prefix.
fn has_name(el: &ElementRef<'_>, name: &str) -> bool {
    let tag = el.value().name();
    tag.eq_ignore_ascii_case(name)
        || tag
            .rsplit_once(':')
            .is_some_and(|(_, local)| local.eq_ignore_ascii_case(name))
}

/// Direct child elements with the given tag name, in document order.
pub fn child_elements<'a>(el: ElementRef<'a>, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| has_name(child, name))
}

/// First direct child element with the given tag name.
pub fn first_child<'a>(el: ElementRef<'a>, name: &'a str) -> Option<ElementRef<'a>> {
    child_elements(el, name).next()
}

/// Follow a `/`-separated chain of direct children, e.g. `"cores/core"`.
pub fn children_at<'a>(el: ElementRef<'a>, path: &'a str) -> Vec<ElementRef<'a>> {
    path.split('/')
        .filter(|step| !step.is_empty())
        .fold(vec![el], |nodes, step| {
            nodes
                .into_iter()
                .flat_map(|node| child_elements(node, step))
                .collect()
        })
}

/// All descendant text of an element, concatenated.
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Text nodes that are immediate children of the element (no nested markup).
pub fn direct_text<'a>(el: ElementRef<'a>) -> impl Iterator<Item = &'a str> {
    el.children().filter_map(|node| node.value().as_text().map(|t| &**t))
}

/// Attribute value by name.
pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}
