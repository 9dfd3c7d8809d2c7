// src/lib.rs
//! Reef Life Survey data pipeline: crawl species pages, download survey data,
//! merge everything into the front-end's JSON documents, and render static maps.

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod progress;

pub mod data;
pub mod download;
pub mod file;
pub mod maps;
pub mod merge;
pub mod runner;
pub mod scrape;
pub mod specs;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};

#[doc(hidden)]
pub use tracing;
