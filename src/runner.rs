// src/runner.rs
//! File-to-file orchestration behind each CLI command. Components stay pure or
//! narrowly scoped; this is where inputs are read, thresholds are enforced and
//! outputs land on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{
    config::{consts::*, options::{CrawlOptions, MapOptions, MergeOptions}},
    core::Fetch,
    data::{ReferenceSpecies, ScrapedSpecies, SitesDoc, SpeciesDoc, SurveysDoc},
    error::{Error, Result},
    file,
    maps::{self, MapReport},
    merge::{self, MergeReport},
    progress::Progress,
    scrape::Crawler,
    store,
};

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
}

/* ---------------- crawl ---------------- */

/// Crawl the species pages and save them, sorted by id, to `out`.
/// Fails when the crawl yields nothing.
pub fn crawl_to_file<F: Fetch + 'static>(
    fetcher: Arc<F>,
    opts: &CrawlOptions,
    out: &Path,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let crawler = Crawler::new(fetcher, opts.clone())?;
    let mut items: Vec<ScrapedSpecies> = crawler.crawl(progress)?.collect();

    if items.is_empty() {
        return Err(Error::TooFew { what: "species pages", expected: 1, found: 0 });
    }

    items.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.url.cmp(&b.url)));
    let before = items.len();
    items.dedup_by(|a, b| a.id == b.id);
    if items.len() != before {
        logw!("Dropped {} pages with a duplicate id", before - items.len());
    }

    store::save_crawl(out, &items)?;
    logf!("Saved {} species to {}", items.len(), out.display());
    Ok(RunSummary { files_written: vec![out.to_path_buf()] })
}

/* ---------------- API JSONs ---------------- */

/// Read crawl, survey and (optional) reference data, merge, and write
/// `species.json`, `sites.json`, `surveys.json` and `summary.json` into `dst`.
///
/// `dst` must be empty. Nothing is written unless every input loads, every
/// threshold holds and every document serializes.
pub fn create_api_jsons(
    crawl_file: &Path,
    survey_dir: &Path,
    dst: &Path,
    reference_file: Option<&Path>,
    opts: &MergeOptions,
) -> Result<(RunSummary, MergeReport)> {
    file::verify_empty_dir(dst)?;

    logf!("Reading data");
    let scraped = store::load_crawl(crawl_file)?;
    if scraped.len() < opts.min_crawl_items {
        return Err(Error::TooFew { what: "crawl items", expected: opts.min_crawl_items, found: scraped.len() });
    }

    let rows = store::read_survey_dir(survey_dir, opts)?;
    if rows.len() < opts.min_survey_rows {
        return Err(Error::TooFew { what: "survey rows", expected: opts.min_survey_rows, found: rows.len() });
    }

    let reference: Vec<ReferenceSpecies> = match reference_file {
        Some(path) => store::load_reference(path)?,
        None => {
            logw!("No species reference given; using crawl data only");
            Vec::new()
        }
    };

    let (docs, report) = merge::merge(&scraped, &reference, &rows);

    let out = |name: &str| dst.join(name);
    let files = vec![
        (out(SPECIES_FILE), file::to_json_bytes(&docs.species, &out(SPECIES_FILE))?),
        (out(SITES_FILE), file::to_json_bytes(&docs.sites, &out(SITES_FILE))?),
        (out(SURVEYS_FILE), file::to_json_bytes(&docs.surveys, &out(SURVEYS_FILE))?),
        (out(SUMMARY_FILE), file::to_json_bytes(&docs.summary, &out(SUMMARY_FILE))?),
    ];
    let files_written = file::write_all(&files)?;
    logf!("Summary: {:?}", docs.summary);

    Ok((RunSummary { files_written }, report))
}

/* ---------------- static maps ---------------- */

/// Load the three API documents and render the maps into `dst`.
pub fn create_static_maps(
    sites_file: &Path,
    species_file: &Path,
    surveys_file: &Path,
    dst: &Path,
    opts: &MapOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<MapReport> {
    logf!("Loading JSONs");
    let sites: SitesDoc = store::load_json(sites_file)?;
    let species: SpeciesDoc = store::load_json(species_file)?;
    let surveys: SurveysDoc = store::load_json(surveys_file)?;
    maps::create_static_maps(&sites, &species, &surveys, dst, opts, progress)
}
