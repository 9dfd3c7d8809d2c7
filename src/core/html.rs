// src/core/html.rs
// Small helpers over `scraper` so specs read as "first text of X", "all src of Y".

use scraper::{ElementRef, Html, Selector};

use crate::core::sanitize::normalize_ws;
use crate::error::{Error, Result};

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector { selector: s!(css), reason: e.to_string() })
}

/// Visible text of an element, whitespace-collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Text of the first match. `None` when nothing matches; `Some("")` when the
/// element exists but is empty.
pub fn first_text(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel).next().map(text_of)
}

/// Text of every match, in document order.
pub fn all_text(doc: &Html, sel: &Selector) -> Vec<String> {
    doc.select(sel).map(text_of).collect()
}

/// Value of `attr` on every match that carries it, in document order.
pub fn all_attr(doc: &Html, sel: &Selector, attr: &str) -> Vec<String> {
    doc.select(sel)
        .filter_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
