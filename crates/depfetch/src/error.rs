use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DependencyError {
    // Manifest errors
    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    ManifestParse(#[from] roxmltree::Error),

    #[error("Invalid manifest: {0}")]
    ManifestSchema(String),

    // Network errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Bad response: {status} for {url}")]
    HttpStatus { status: u16, url: String },

    // Integrity errors
    #[error("Invalid Checksum!\n Expected: {expected}\n Get: {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    // Archive errors
    #[error("Invalid TAR file")]
    InvalidTar,

    #[error("Archive error: {0}")]
    Archive(String),

    // Filesystem errors
    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DependencyError>;
