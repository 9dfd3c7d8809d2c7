// src/scrape/mod.rs
mod crawl;
mod frontier;

pub use crawl::{Crawl, Crawler};
pub use frontier::{Frontier, Request};
