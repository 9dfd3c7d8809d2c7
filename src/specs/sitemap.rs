// src/specs/sitemap.rs
//! Sitemap spec: `<loc>` links, split into nested sitemaps and species pages.

use scraper::Html;

use crate::core::html;
use crate::error::Result;

/// What a discovered link points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Sitemap,
    Species,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SitemapLink {
    pub url: String,
    pub kind: LinkKind,
}

/// Classify a link by its path: `*.xml` is a nested sitemap, everything else a page.
pub fn kind_of(url: &str) -> LinkKind {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path.to_ascii_lowercase().ends_with(".xml") {
        LinkKind::Sitemap
    } else {
        LinkKind::Species
    }
}

/// Every `<loc>` text in document order, minus links starting with a skip prefix.
pub fn parse_sitemap(body: &str, skip_prefixes: &[String]) -> Result<Vec<SitemapLink>> {
    // The HTML parser is lenient enough for sitemap XML: unknown tags become
    // plain elements and `loc` still matches as a type selector.
    let doc = Html::parse_document(body);
    let loc = html::selector("loc")?;

    let links = html::all_text(&doc, &loc)
        .into_iter()
        .filter(|link| !link.is_empty())
        .filter(|link| !skip_prefixes.iter().any(|p| link.starts_with(p.as_str())))
        .map(|url| SitemapLink { kind: kind_of(&url), url })
        .collect();
    Ok(links)
}
