// src/config/options.rs
use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

use super::consts::*;

/// Every knob the pipeline has. Built once (defaults → config file → CLI flags)
/// and handed down to each operation; nothing reads global state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppOptions {
    pub net: NetOptions,
    pub crawl: CrawlOptions,
    pub download: DownloadOptions,
    pub merge: MergeOptions,
    pub maps: MapOptions,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetOptions {
    pub user_agent: String,
    pub page_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            user_agent: s!(USER_AGENT),
            page_timeout_secs: PAGE_TIMEOUT_SECS,
            download_timeout_secs: DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

impl NetOptions {
    pub fn page_timeout(&self) -> Duration { Duration::from_secs(self.page_timeout_secs) }
    pub fn download_timeout(&self) -> Duration { Duration::from_secs(self.download_timeout_secs) }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlOptions {
    /// Sitemaps the frontier is seeded with.
    pub start_urls: Vec<String>,
    /// Hosts (and their subdomains) the crawl may visit.
    pub allowed_domains: Vec<String>,
    /// Sitemap links starting with any of these are not followed.
    pub skip_prefixes: Vec<String>,
    pub workers: usize,
    pub request_pause_ms: u64,
    pub jitter_ms: u64,
    /// Stop after this many species pages (sampling / smoke runs).
    pub max_pages: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            start_urls: vec![s!(START_URL)],
            allowed_domains: vec![s!(ALLOWED_DOMAIN)],
            skip_prefixes: vec![s!(SKIP_PREFIX)],
            workers: WORKERS,
            request_pause_ms: REQUEST_PAUSE_MS,
            jitter_ms: JITTER_MS,
            max_pages: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadOptions {
    pub data_types: Vec<String>,
    pub url_prefix: String,
    pub url_suffix: String,
    pub workers: usize,
    /// Where the species reference feed lives; there is no built-in default.
    pub reference_url: Option<String>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            data_types: SURVEY_DATA_TYPES.iter().map(|t| s!(*t)).collect(),
            url_prefix: s!(WFS_URL_PREFIX),
            url_suffix: s!(WFS_URL_SUFFIX),
            workers: DOWNLOAD_WORKERS,
            reference_url: None,
        }
    }
}

impl DownloadOptions {
    pub fn url_for(&self, data_type: &str) -> String {
        format!("{}{}{}", self.url_prefix, data_type, self.url_suffix)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeOptions {
    pub min_crawl_items: usize,
    pub min_survey_rows: usize,
    pub expected_survey_files: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            min_crawl_items: MIN_CRAWL_ITEMS,
            min_survey_rows: MIN_SURVEY_ROWS,
            expected_survey_files: EXPECTED_SURVEY_FILES,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapOptions {
    pub width: u32,
    pub marker_radius: u32,
    pub ocean_rgb: [u8; 3],
    pub land_rgb: [u8; 3],
    pub marker_rgb: [u8; 3],
    /// GeoJSON with land polygons; without it the whole map is ocean.
    pub land_path: Option<PathBuf>,
    pub species_maps: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            marker_radius: MARKER_RADIUS,
            ocean_rgb: OCEAN_RGB,
            land_rgb: LAND_RGB,
            marker_rgb: MARKER_RGB,
            land_path: None,
            species_maps: true,
        }
    }
}
