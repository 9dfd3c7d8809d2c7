// src/specs/species_page.rs
//! Species page spec.
//!
//! Current layout (MUI):
//! - name:        first `h1.MuiTypography-root`
//! - common name: first `span.MuiTypography-subtitle1`, `A | B` rewritten to `A, B`
//! - images:      `src` of every `img` inside `.swiper`
//!
//! Legacy layout, only consulted when the current name heading is absent:
//! `.fishname h2 i`, `.fishname .commonname`, `#lightSlider img`.
//!
//! The page id is the URL's last path segment. Image `src` values are kept as
//! written in the page; the front-end resolves them.

use scraper::{Html, Selector};

use crate::core::{html, sanitize};
use crate::data::ScrapedSpecies;
use crate::error::Result;

struct Layout {
    name: Selector,
    common_name: Selector,
    images: Selector,
}

impl Layout {
    fn new(name: &str, common_name: &str, images: &str) -> Result<Self> {
        Ok(Self {
            name: html::selector(name)?,
            common_name: html::selector(common_name)?,
            images: html::selector(images)?,
        })
    }
}

/// Compiled selectors for both layouts. Build once per crawl and share.
pub struct SpeciesPageSpec {
    modern: Layout,
    legacy: Layout,
}

impl SpeciesPageSpec {
    pub fn new() -> Result<Self> {
        Ok(Self {
            modern: Layout::new(
                "h1.MuiTypography-root",
                "span.MuiTypography-subtitle1",
                ".swiper img",
            )?,
            legacy: Layout::new(".fishname h2 i", ".fishname .commonname", "#lightSlider img")?,
        })
    }

    /// Parse one species page. Never fails: absent fields come back empty.
    pub fn parse(&self, url: &str, body: &str) -> ScrapedSpecies {
        let doc = Html::parse_document(body);

        let layout = if doc.select(&self.modern.name).next().is_some() {
            &self.modern
        } else if doc.select(&self.legacy.name).next().is_some() {
            logd!("{url}: current layout missing, using legacy selectors");
            &self.legacy
        } else {
            &self.modern
        };

        let name = html::first_text(&doc, &layout.name).unwrap_or_default();
        let common_name = html::first_text(&doc, &layout.common_name)
            .map(|s| sanitize::join_common_names(&s))
            .unwrap_or_default();
        let image_urls = html::all_attr(&doc, &layout.images, "src");

        ScrapedSpecies {
            id: sanitize::last_path_segment(url),
            name,
            common_name,
            url: s!(url),
            image_urls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_layout_is_a_fallback() {
        let spec = SpeciesPageSpec::new().unwrap();
        let body = r#"<div class="fishname"><h2><i>Labroides dimidiatus</i></h2>
            <span class="commonname">Cleaner wrasse</span></div>
            <ul id="lightSlider"><li><img src="a.jpg"></li><li><img src="b.jpg"></li></ul>"#;

        let item = spec.parse("https://reeflifesurvey.com/species/labroides-dimidiatus/", body);
        assert_eq!(item.id, "labroides-dimidiatus");
        assert_eq!(item.name, "Labroides dimidiatus");
        assert_eq!(item.common_name, "Cleaner wrasse");
        assert_eq!(item.image_urls, vec![s!("a.jpg"), s!("b.jpg")]);
    }

    #[test]
    fn modern_layout_wins_over_legacy() {
        let spec = SpeciesPageSpec::new().unwrap();
        let body = r#"<h1 class="MuiTypography-root">New name</h1>
            <div class="fishname"><h2><i>Old name</i></h2></div>"#;
        assert_eq!(spec.parse("https://x/species/a/", body).name, "New name");
    }
}
