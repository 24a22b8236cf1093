//! Manifest-driven dependency fetcher.
//!
//! Given an XML manifest enumerating remote artifacts and their local
//! destinations, this crate downloads each artifact over HTTP(S), verifies
//! it against optional MD5/SHA1 digests and materializes it at the target
//! path, either as a plain file or by extracting a ZIP, GZIP, TAR or
//! TAR.GZ container. Verified downloads are kept in a content cache so
//! repeated runs avoid re-downloading unchanged artifacts.

pub mod archive;
pub mod cache;
pub mod checksum;
pub mod error;
pub mod http;
pub mod manifest;
pub mod processor;
pub mod progress;

pub use cache::Cache;
pub use checksum::ChecksumKind;
pub use error::{DependencyError, Result};
pub use http::HttpClient;
pub use manifest::{Entry, EntryKind, Manifest, ManifestItem};
pub use processor::{Processor, RunOptions};
