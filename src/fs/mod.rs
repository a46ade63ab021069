// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
    fn exists(&self, path: &Path) -> bool;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = fs::File::open(path).with_context(|| format!("opening file {:?}", path))?;
        Ok(Box::new(file))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Last non-blank line of a file, trimmed.
///
/// `Ok(None)` when the file is missing or has no non-blank line; `Err` when
/// it exists but cannot be read.
pub fn last_line(fs: &dyn FileSystem, path: &Path) -> Result<Option<String>> {
    if !fs.exists(path) {
        return Ok(None);
    }

    let reader = BufReader::new(fs.open_read(path)?);
    let mut last = None;
    for line in reader.split(b'\n') {
        let line = line.with_context(|| format!("reading file {:?}", path))?;
        let text = String::from_utf8_lossy(&line);
        let text = text.trim();
        if !text.is_empty() {
            last = Some(text.to_string());
        }
    }
    Ok(last)
}
