//! Description HTML cleanup.
//!
//! Keeps the semantic markup of a write-up while dropping scripts, styles,
//! presentational hooks and blank paragraphs.

use scraper::{ElementRef, Node};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const DROPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Sanitized markup of everything inside `element`.
pub(crate) fn sanitize_inner(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_children(&mut out, element);
    out.trim().to_string()
}

/// Sanitized markup of `element` itself.
pub(crate) fn sanitize_outer(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    write_element(&mut out, element);
    out.trim().to_string()
}

fn write_children(out: &mut String, element: ElementRef<'_>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => escape_text(out, text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_element(out, child);
                }
            }
            _ => {}
        }
    }
}

fn write_element(out: &mut String, element: ElementRef<'_>) {
    let name = element.value().name();
    if DROPPED_ELEMENTS.contains(&name) || is_empty_paragraph(element) {
        return;
    }

    out.push('<');
    out.push_str(name);
    let mut attrs: Vec<(&str, &str)> = element
        .value()
        .attrs()
        .filter(|(attr, _)| keep_attribute(attr))
        .collect();
    attrs.sort_by(|a, b| a.0.cmp(b.0));
    for (attr, value) in attrs {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        escape_attr(out, value);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    write_children(out, element);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn keep_attribute(name: &str) -> bool {
    !(name == "class" || name == "id" || name.starts_with("data-"))
}

/// A `<p>` with no visible text and nothing but line breaks inside.
fn is_empty_paragraph(element: ElementRef<'_>) -> bool {
    if element.value().name() != "p" {
        return false;
    }
    let blank_text = element.text().all(|t| t.trim().is_empty());
    let only_breaks = element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .all(|el| el.value().name() == "br");
    blank_text && only_breaks
}

fn escape_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
