// src/config/mod.rs
pub mod consts;
pub mod options;

use std::{fs, path::Path};

use crate::error::{Error, Result};
use options::AppOptions;

/// Load options from a TOML file. Missing tables/keys keep their defaults.
pub fn load(path: &Path) -> Result<AppOptions> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse(&text).map_err(|source| Error::Config { path: path.to_path_buf(), source })
}

pub fn parse(text: &str) -> std::result::Result<AppOptions, toml::de::Error> {
    toml::from_str(text)
}
