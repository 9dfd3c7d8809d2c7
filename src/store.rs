// src/store.rs
//! Reading pipeline inputs from disk into typed tables.
//!
//! Every loader here is strict: a file that does not parse, a row with a
//! missing column or a feed that changed shape is an error, and the run stops.
//! Downstream merge code assumes well-formed input and never re-checks it.

use std::{fs, path::Path};

use serde::de::DeserializeOwned;

use crate::config::options::MergeOptions;
use crate::data::{cmp_survey_ids, ReferenceSpecies, ScrapedSpecies, SurveyRow};
use crate::error::{Error, Result};
use crate::file;

/// Read and parse the JSON file at `path`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| Error::Json { path: path.to_path_buf(), source })
}

/// Crawl output: a JSON array of scraped species.
pub fn load_crawl(path: &Path) -> Result<Vec<ScrapedSpecies>> {
    let items: Vec<ScrapedSpecies> = load_json(path)?;
    logf!("Read {} items from {}", items.len(), path.display());
    Ok(items)
}

/// Species reference feed: a JSON array of reference species.
pub fn load_reference(path: &Path) -> Result<Vec<ReferenceSpecies>> {
    let items: Vec<ReferenceSpecies> = load_json(path)?;
    logf!("Read {} reference species from {}", items.len(), path.display());
    Ok(items)
}

pub fn save_crawl(path: &Path, items: &[ScrapedSpecies]) -> Result<()> {
    file::write_json(path, items)
}

/// Parse one survey CSV. Any malformed row aborts with the file and line.
pub fn read_survey_file(path: &Path) -> Result<Vec<SurveyRow>> {
    let csv_err = |source| Error::Csv { path: path.to_path_buf(), source };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<SurveyRow>() {
        rows.push(result.map_err(csv_err)?);
    }
    logf!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read every `*.csv` in `dir` (as written by `download-survey-data`).
///
/// The file count must match `opts.expected_survey_files`. Rows without a
/// species name are dropped; the rest come back sorted by
/// `(survey_id, species_name)`.
pub fn read_survey_dir(dir: &Path, opts: &MergeOptions) -> Result<Vec<SurveyRow>> {
    let paths = file::list_files_with_ext(dir, "csv")?;
    if paths.len() != opts.expected_survey_files {
        return Err(Error::SurveyFileCount { expected: opts.expected_survey_files, found: paths.len() });
    }

    let mut rows = Vec::new();
    for path in &paths {
        rows.extend(read_survey_file(path)?);
    }

    let before = rows.len();
    rows.retain(|r| r.species().is_some());
    if rows.len() != before {
        logd!("Dropped {} rows without a species name", before - rows.len());
    }

    sort_survey_rows(&mut rows);
    Ok(rows)
}

pub fn sort_survey_rows(rows: &mut [SurveyRow]) {
    rows.sort_by(|a, b| {
        cmp_survey_ids(&a.survey_id, &b.survey_id)
            .then_with(|| a.species().cmp(&b.species()))
    });
}
