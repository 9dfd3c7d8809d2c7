// src/cli.rs
//! Command table for the `rls-data` binary: one clap subcommand, one handler.

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};

use crate::{
    config::{self, options::AppOptions},
    core::HttpClient,
    download,
    error::{Error, Result},
    log,
    progress::LogProgress,
    runner,
};

#[derive(Debug, Parser)]
#[command(name = "rls-data", version, about = "Reef Life Survey data pipeline")]
pub struct Cli {
    /// TOML file overriding the built-in defaults
    #[arg(long, global = true, env = "RLS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Crawl the species pages into a JSON file
    Crawl {
        out_file: PathBuf,
        /// Sitemap to start from (repeatable; replaces the default)
        #[arg(long = "start-url")]
        start_urls: Vec<String>,
        #[arg(long)]
        workers: Option<usize>,
        /// Stop after this many species pages
        #[arg(long)]
        limit: Option<usize>,
        /// Pause between requests per worker
        #[arg(long)]
        pause_ms: Option<u64>,
    },
    /// Download the survey CSVs into an empty directory
    DownloadSurveyData {
        dest_dir: PathBuf,
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Download and validate the species reference feed
    DownloadSpeciesReference {
        dest_file: PathBuf,
        #[arg(long, env = "RLS_SPECIES_REFERENCE_URL")]
        url: Option<String>,
    },
    /// Merge crawl, survey and reference data into the API JSON files
    CreateApiJsons {
        crawl_file: PathBuf,
        survey_dir: PathBuf,
        output_dir: PathBuf,
        #[arg(long)]
        reference: Option<PathBuf>,
        #[arg(long)]
        min_crawl_items: Option<usize>,
        #[arg(long)]
        min_survey_rows: Option<usize>,
        /// Number of survey CSVs expected in the survey directory
        #[arg(long)]
        survey_files: Option<usize>,
    },
    /// Render region and species maps from the API JSON files
    CreateStaticMaps {
        sites: PathBuf,
        species: PathBuf,
        surveys: PathBuf,
        maps_dir: PathBuf,
        /// GeoJSON land polygons
        #[arg(long)]
        land: Option<PathBuf>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        no_species_maps: bool,
    },
}

/// Parse the process arguments, set up logging, and run the command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    log::init(&cli.log_level);
    run_with(cli)
}

/// Run an already-parsed command line.
pub fn run_with(cli: Cli) -> Result<()> {
    let mut opts = match &cli.config {
        Some(path) => config::load(path)?,
        None => AppOptions::default(),
    };

    match cli.command {
        Command::Crawl { out_file, start_urls, workers, limit, pause_ms } => {
            if !start_urls.is_empty() {
                opts.crawl.start_urls = start_urls;
            }
            if let Some(n) = workers { opts.crawl.workers = n; }
            if let Some(n) = limit { opts.crawl.max_pages = Some(n); }
            if let Some(ms) = pause_ms { opts.crawl.request_pause_ms = ms; }
            crawl(&opts, out_file)
        }
        Command::DownloadSurveyData { dest_dir, workers } => {
            if let Some(n) = workers { opts.download.workers = n; }
            download_survey_data(&opts, dest_dir)
        }
        Command::DownloadSpeciesReference { dest_file, url } => {
            if url.is_some() { opts.download.reference_url = url; }
            download_species_reference(&opts, dest_file)
        }
        Command::CreateApiJsons {
            crawl_file, survey_dir, output_dir, reference,
            min_crawl_items, min_survey_rows, survey_files,
        } => {
            if let Some(n) = min_crawl_items { opts.merge.min_crawl_items = n; }
            if let Some(n) = min_survey_rows { opts.merge.min_survey_rows = n; }
            if let Some(n) = survey_files { opts.merge.expected_survey_files = n; }
            create_api_jsons(&opts, crawl_file, survey_dir, output_dir, reference)
        }
        Command::CreateStaticMaps { sites, species, surveys, maps_dir, land, width, no_species_maps } => {
            if land.is_some() { opts.maps.land_path = land; }
            if let Some(w) = width { opts.maps.width = w; }
            if no_species_maps { opts.maps.species_maps = false; }
            create_static_maps(&opts, sites, species, surveys, maps_dir)
        }
    }
}

/* ---------------- handlers ---------------- */

fn crawl(opts: &AppOptions, out_file: PathBuf) -> Result<()> {
    let client = Arc::new(HttpClient::for_pages(&opts.net)?);
    let mut progress = LogProgress::default();
    runner::crawl_to_file(client, &opts.crawl, &out_file, Some(&mut progress))?;
    Ok(())
}

fn download_survey_data(opts: &AppOptions, dest_dir: PathBuf) -> Result<()> {
    let client = Arc::new(HttpClient::for_downloads(&opts.net)?);
    let mut progress = LogProgress::new(1);
    download::download_survey_data(client, &opts.download, &dest_dir, Some(&mut progress))?;
    Ok(())
}

fn download_species_reference(opts: &AppOptions, dest_file: PathBuf) -> Result<()> {
    let url = opts.download.reference_url.as_deref().ok_or_else(|| {
        Error::Schema(s!("no species reference URL; pass --url or set RLS_SPECIES_REFERENCE_URL"))
    })?;
    let client = HttpClient::for_downloads(&opts.net)?;
    download::download_species_reference(&client, url, &dest_file)?;
    Ok(())
}

fn create_api_jsons(
    opts: &AppOptions,
    crawl_file: PathBuf,
    survey_dir: PathBuf,
    output_dir: PathBuf,
    reference: Option<PathBuf>,
) -> Result<()> {
    let (summary, report) = runner::create_api_jsons(
        &crawl_file,
        &survey_dir,
        &output_dir,
        reference.as_deref(),
        &opts.merge,
    )?;
    logf!(
        "Wrote {} files ({} conflicts, {} reference species not crawled)",
        summary.files_written.len(),
        report.conflicts.len(),
        report.missing_from_crawl.len()
    );
    Ok(())
}

fn create_static_maps(
    opts: &AppOptions,
    sites: PathBuf,
    species: PathBuf,
    surveys: PathBuf,
    maps_dir: PathBuf,
) -> Result<()> {
    let mut progress = LogProgress::default();
    let report = runner::create_static_maps(&sites, &species, &surveys, &maps_dir, &opts.maps, Some(&mut progress))?;
    logf!("Wrote {} map images", report.written.len());
    Ok(())
}
