//! Archive extraction (zip, gzip, tar, tar.gz).

pub mod gzip;
pub mod tar;
pub mod zip;

use crate::{DependencyError, Result};

/// Resolve an archive entry name against an optional sub directory filter.
///
/// With a sub directory set, entries outside `{sub_dir}/` are skipped and
/// the prefix is stripped from the rest.
pub(crate) fn strip_sub_dir<'a>(name: &'a str, sub_dir: Option<&str>) -> Option<&'a str> {
    match sub_dir {
        None => Some(name),
        Some(prefix) if prefix.is_empty() => Some(name),
        Some(prefix) => name
            .strip_prefix(prefix.trim_end_matches('/'))?
            .strip_prefix('/'),
    }
}

/// Reject entry names that could escape the destination directory.
///
/// Joining an absolute name onto the destination would replace the base
/// path entirely, so absolute names are refused along with `..` components.
pub(crate) fn check_entry_name(name: &str) -> Result<()> {
    if name.starts_with('/') || name.split('/').any(|part| part == "..") {
        return Err(DependencyError::Archive(format!(
            "Path traversal detected in archive: {name}"
        )));
    }
    Ok(())
}
