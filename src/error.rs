// src/error.rs
use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json { path: PathBuf, source: serde_json::Error },

    #[error("malformed survey data in {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("could not write image {}: {source}", path.display())]
    Image { path: PathBuf, source: image::ImageError },

    #[error("invalid config file {}: {source}", path.display())]
    Config { path: PathBuf, source: toml::de::Error },

    #[error("bad selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("{} must be empty", .0.display())]
    NotEmpty(PathBuf),

    #[error("path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("expected {expected} survey data files, but found {found}")]
    SurveyFileCount { expected: usize, found: usize },

    #[error("expected at least {expected} {what}, but found {found}")]
    TooFew { what: &'static str, expected: usize, found: usize },

    #[error("unexpected data: {0}")]
    Schema(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
