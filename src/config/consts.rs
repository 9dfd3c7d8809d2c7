// src/config/consts.rs

// Net config
pub const USER_AGENT: &str = concat!("rls-data/", env!("CARGO_PKG_VERSION"));
pub const PAGE_TIMEOUT_SECS: u64 = 60;
// the m1 export alone takes minutes
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 600;

// Crawl
pub const START_URL: &str = "https://reeflifesurvey.com/sitemap-species.xml";
pub const ALLOWED_DOMAIN: &str = "reeflifesurvey.com";
pub const SKIP_PREFIX: &str = "https://images.reeflifesurvey";

// Survey data (AODN geoserver WFS)
pub const WFS_URL_PREFIX: &str = "https://geoserver-portal.aodn.org.au/geoserver/ows?\
    SERVICE=WFS&outputFormat=csv&REQUEST=GetFeature&VERSION=1.0.0&typeName=imos:ep_";
pub const WFS_URL_SUFFIX: &str = "_public_data";
pub const SURVEY_DATA_TYPES: [&str; 4] = [
    "m0_off_transect_sighting",
    "m1",
    "m2_cryptic_fish",
    "m2_inverts",
];

// Concurrency
pub const WORKERS: usize = 4;
pub const DOWNLOAD_WORKERS: usize = 3;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite
pub const JITTER_MS: u64 = 50; // extra 0..50 ms

// Sanity thresholds for a full production run
pub const MIN_CRAWL_ITEMS: usize = 4_900;
pub const MIN_SURVEY_ROWS: usize = 810_000;
pub const EXPECTED_SURVEY_FILES: usize = 4;

// Output file names
pub const SPECIES_FILE: &str = "species.json";
pub const SITES_FILE: &str = "sites.json";
pub const SURVEYS_FILE: &str = "surveys.json";
pub const SUMMARY_FILE: &str = "summary.json";
pub const SPECIES_MAPS_SUBDIR: &str = "species";

// Maps
pub const MAP_WIDTH: u32 = 400;
pub const MARKER_RADIUS: u32 = 4;
pub const OCEAN_RGB: [u8; 3] = [0xab, 0xca, 0xd7];
pub const LAND_RGB: [u8; 3] = [0xff, 0xff, 0xff];
pub const MARKER_RGB: [u8; 3] = [0xd9, 0x59, 0x36];

// Summary: only surveys from the core programme count
pub const SUMMARY_PROGRAM: &str = "RLS";
