// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific parsing for the RLS website. Each spec owns one kind of page and
//! encodes *where the data lives in the HTML* and *how to extract it robustly*.
//!
//! ## What lives here
//! - **Pure parsing** of already-fetched text (sitemaps, species pages). No I/O.
//! - **Selector choice & precedence**: prefer the current site layout, fall back to
//!   the legacy layout only when the current one is absent.
//! - **Tolerant extraction**: missing elements become empty strings / lists, never errors.
//!
//! ## What does **not** live here
//! - Fetching, pacing, de-duplication: that is `scrape`.
//! - Persistence: `store` writes the crawl file.
//! - Joining with survey or reference data: `merge`.
//!
//! ## Typical call chain
//! ```text
//! cli → runner::crawl_to_file → scrape::Crawler
//!                                 ├─ specs::sitemap::parse_sitemap      (phase 1)
//!                                 └─ specs::species_page::parse         (phase 2)
//! ```
//!
//! In short: **`specs` knows how to read the pages.**
pub mod sitemap;
pub mod species_page;
