// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(())
}

/// Verify that `dir` is an empty directory, creating it if it doesn't exist.
pub fn verify_empty_dir(dir: &Path) -> Result<()> {
    ensure_directory(dir)?;
    let mut entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    if entries.next().is_some() {
        return Err(Error::NotEmpty(dir.to_path_buf()));
    }
    Ok(())
}

/// Pretty JSON (two-space indent, trailing newline), ready to write.
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<Vec<u8>> {
    let mut buf = serde_json::to_vec_pretty(value)
        .map_err(|source| Error::Json { path: path.to_path_buf(), source })?;
    buf.push(b'\n');
    Ok(buf)
}

pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = to_json_bytes(value, path)?;
    write_bytes(path, &bytes)
}

/// Create/truncate `path` and write `bytes`; parent dirs are created as needed.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let file = File::create(path).map_err(|e| Error::io(path, e))?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    out.write_all(bytes).map_err(|e| Error::io(path, e))?;
    out.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Write a batch of already-serialized files. Callers serialize everything
/// first so a serialization failure never leaves half a batch on disk.
///
/// Each file is staged as a hidden temp file beside its target; only when all
/// of them are staged are they renamed into place. A failed rename removes the
/// files already committed.
pub fn write_all(files: &[(PathBuf, Vec<u8>)]) -> Result<Vec<PathBuf>> {
    let mut staged = Vec::with_capacity(files.len());
    for (path, bytes) in files {
        staged.push((path, bytes.len(), stage(path, bytes)?));
    }

    let mut written: Vec<PathBuf> = Vec::with_capacity(files.len());
    for (path, len, tmp) in staged {
        if let Err(e) = tmp.persist(path) {
            for done in &written {
                let _ = fs::remove_file(done);
            }
            return Err(Error::io(path.as_path(), e.error));
        }
        logf!("Wrote {} ({} bytes)", path.display(), len);
        written.push(path.clone());
    }
    Ok(written)
}

fn stage(path: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_directory(dir)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".staged-")
        .tempfile_in(dir)
        .map_err(|e| Error::io(dir, e))?;
    tmp.write_all(bytes).map_err(|e| Error::io(path, e))?;
    tmp.flush().map_err(|e| Error::io(path, e))?;
    Ok(tmp)
}

/// `*.{ext}` files directly inside `dir`, sorted by name.
pub fn list_files_with_ext(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if !path.is_file() { continue; }
        if path.extension().and_then(|s| s.to_str()) != Some(ext) { continue; }
        out.push(path);
    }
    out.sort();
    Ok(out)
}
