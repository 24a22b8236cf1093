//! ZIP archive extraction.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;
use zip::ZipArchive;

use super::{check_entry_name, strip_sub_dir};
use crate::progress;
use crate::{DependencyError, Result};

/// Expand a ZIP archive into `destination`.
///
/// Directory entries advance the counter but write nothing; file entries
/// are written with their parent directories created as needed.
pub fn extract(archive_path: &Path, destination: &Path, sub_dir: Option<&str>) -> Result<()> {
    fs::create_dir_all(destination)?;

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .map_err(|e| DependencyError::Archive(format!("Failed to open zip: {e}")))?;

    let total = archive.len();
    println!("  Zip decompress (~{total} files)...");

    for index in 0..total {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| DependencyError::Archive(format!("Failed to read zip entry: {e}")))?;

        if entry.is_dir() {
            progress::print_counter(index + 1, total);
            continue;
        }

        let name = entry.name().to_string();
        check_entry_name(&name)?;

        if let Some(relative) = strip_sub_dir(&name, sub_dir) {
            let out_path = destination.join(relative);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }

            let mut out = File::create(&out_path)?;
            io::copy(&mut entry, &mut out)?;
        }

        progress::print_counter(index + 1, total);
    }

    progress::counter_done();
    Ok(())
}
