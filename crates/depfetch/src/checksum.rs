//! Checksum creation and verification for downloaded files.

use md5::Md5;
use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::{DependencyError, Result};

/// Supported checksum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    Md5,
    Sha1,
}

impl ChecksumKind {
    /// Display name of the algorithm
    pub fn name(&self) -> &'static str {
        match self {
            ChecksumKind::Md5 => "MD5",
            ChecksumKind::Sha1 => "SHA1",
        }
    }
}

/// Hash a file and return the digest as lowercase hex.
pub fn hash_file(kind: ChecksumKind, path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let hex = match kind {
        ChecksumKind::Md5 => hash_reader::<Md5>(file)?,
        ChecksumKind::Sha1 => hash_reader::<Sha1>(file)?,
    };
    Ok(hex)
}

/// Verify a file against an expected lowercase hex digest.
///
/// A mismatch carries both the expected and the actual hash.
pub fn verify(kind: ChecksumKind, path: &Path, expected: &str) -> Result<()> {
    println!("  Check {} checksum...", kind.name());

    let actual = hash_file(kind, path)?;
    if actual == expected {
        println!("  Checksum OK!");
        Ok(())
    } else {
        Err(DependencyError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}

fn hash_reader<D: Digest>(mut reader: impl Read) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = [0u8; 8192];

    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        hex.push_str(&format!("{byte:02x}"));
    }
    Ok(hex)
}
