//! Per-entry orchestration: cache lookup, fetch, verification, extraction
//! and cleanup.
//!
//! Entries are processed strictly in manifest order; within an entry,
//! fetch, verify and extract are serialized. The processor owns the cache
//! directory and the temporary download path inside it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;

use crate::archive::{gzip, tar, zip};
use crate::cache::Cache;
use crate::checksum::{self, ChecksumKind};
use crate::http::{resolve_destination, HttpClient};
use crate::manifest::{Entry, EntryKind, Manifest, ManifestItem};
use crate::progress::DownloadMeter;
use crate::{DependencyError, Result};

/// Modes for a run.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    /// Delete the destinations instead of downloading.
    pub clean: bool,
    /// Fill the cache but skip extraction.
    pub download_only: bool,
    /// Delete the cache directory after all entries are processed.
    pub clear_cache: bool,
}

pub struct Processor {
    client: HttpClient,
    cache: Cache,
}

impl Processor {
    pub fn new(proxy: Option<&str>) -> Result<Self> {
        Self::with_cache(proxy, Cache::new())
    }

    pub fn with_cache(proxy: Option<&str>, cache: Cache) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(proxy)?,
            cache,
        })
    }

    /// Process every manifest item in document order.
    pub async fn run(&self, manifest: &Manifest, options: &RunOptions) -> Result<()> {
        for item in &manifest.items {
            match item {
                ManifestItem::Unknown { tag } => {
                    eprintln!("Unknown file type: {tag}");
                }
                ManifestItem::Artifact(entry) if options.clean => {
                    self.clean_entry(entry)?;
                }
                ManifestItem::Artifact(entry) => {
                    println!("=> Handle {} file: {}", entry.kind.tag(), entry.source);

                    let cache_file = self.fetch_entry(entry).await?;

                    if !options.download_only {
                        self.extract_entry(entry, &cache_file)?;
                        println!();
                    }
                }
            }
        }

        if options.clear_cache {
            self.cache.clear()?;
        }

        Ok(())
    }

    /// Remove an entry's destination. Missing destinations are tolerated.
    fn clean_entry(&self, entry: &Entry) -> Result<()> {
        println!("=> Remove {}", entry.destination);

        match remove_path(Path::new(&entry.destination)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                println!("  Already removed!");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Return a verified cache file for the entry, downloading if needed.
    ///
    /// A digest mismatch on a cached file triggers a re-download; a
    /// mismatch on a fresh download is fatal.
    async fn fetch_entry(&self, entry: &Entry) -> Result<PathBuf> {
        let cache_file = self.cache.slot(&entry.source);

        if cache_file.exists() {
            println!("  -> Found file in cache!");
            match verify_entry(entry, &cache_file) {
                Ok(()) => return Ok(cache_file),
                Err(DependencyError::ChecksumMismatch { .. }) => {
                    println!("  Checksum of cached file is invalid! Try redownload!");
                }
                Err(e) => return Err(e),
            }
        }

        let tmp = self.cache.tmp_path();
        let tmp_str = tmp.to_string_lossy();
        debug!("downloading {} to {}", entry.source, tmp_str);

        let meter = Mutex::new(DownloadMeter::new());
        self.client
            .download(
                &entry.source,
                &tmp_str,
                Some(|written, total| {
                    if let Ok(mut meter) = meter.lock() {
                        meter.update(written, total);
                    }
                }),
            )
            .await?;
        if let Ok(meter) = meter.lock() {
            meter.finish();
        }

        verify_entry(entry, &tmp)?;

        fs::copy(&tmp, &cache_file)?;
        fs::remove_file(&tmp)?;

        Ok(cache_file)
    }

    /// Materialize the verified cache file at the entry's destination.
    fn extract_entry(&self, entry: &Entry, cache_file: &Path) -> Result<()> {
        let destination = Path::new(&entry.destination);
        let sub_dir = entry.source_sub_dir.as_deref();

        match entry.kind {
            EntryKind::File => {
                println!("  Copy plain file: {}", cache_file.display());

                let target = resolve_destination(&entry.source, &entry.destination);
                create_parent(&target)?;
                if target.exists() {
                    return Err(DependencyError::DestinationExists(target));
                }
                fs::copy(cache_file, &target)?;
            }
            EntryKind::Zip => {
                println!("  Extract zip file: {}", cache_file.display());
                zip::extract(cache_file, destination, sub_dir)?;
            }
            EntryKind::GZip => {
                println!("  Decompress Gzip file: {}", cache_file.display());
                create_parent(destination)?;
                gzip::decompress(cache_file, destination)?;
            }
            EntryKind::Tar => {
                println!("  Extract Tar file: {}", cache_file.display());
                tar::extract(cache_file, destination, sub_dir)?;
            }
            EntryKind::TarGz => {
                println!("  Decompress TarGz file: {}", cache_file.display());
                let tmp = self.cache.tmp_path();
                gzip::decompress(cache_file, &tmp)?;

                println!("  Extract TarGz file: {}", cache_file.display());
                tar::extract(&tmp, destination, sub_dir)?;

                fs::remove_file(&tmp)?;
            }
        }

        Ok(())
    }
}

fn verify_entry(entry: &Entry, path: &Path) -> Result<()> {
    if let Some(expected) = &entry.md5 {
        checksum::verify(ChecksumKind::Md5, path, expected)?;
    }
    if let Some(expected) = &entry.sha1 {
        checksum::verify(ChecksumKind::Sha1, path, expected)?;
    }
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
