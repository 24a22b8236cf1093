//! Content cache for downloaded artifacts.
//!
//! One file per artifact, named by the source URL's basename. The cache
//! persists across runs; `tmp.dat` inside it is the transient landing zone
//! for in-flight downloads.

use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;

/// Default cache location, relative to the working directory.
pub const CACHE_DIR: &str = ".dependencyDownloader";

#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(CACHE_DIR),
        }
    }

    /// Cache rooted at an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache file for a source URL, keyed by the URL's basename.
    pub fn slot(&self, source: &str) -> PathBuf {
        let basename = source.rsplit('/').next().unwrap_or(source);
        self.root.join(basename)
    }

    /// Transient download landing zone.
    pub fn tmp_path(&self) -> PathBuf {
        self.root.join("tmp.dat")
    }

    /// Recursively delete the cache directory.
    pub fn clear(&self) -> Result<()> {
        fs::remove_dir_all(&self.root)?;
        Ok(())
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}
