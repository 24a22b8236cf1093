//! GZIP decompression.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::Result;

/// Decompress a single-member GZIP stream into `destination`.
///
/// The caller must ensure the destination's parent directory exists.
pub fn decompress(archive_path: &Path, destination: &Path) -> Result<()> {
    println!("  GZip decompress...");

    let file = File::open(archive_path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut out = File::create(destination)?;

    io::copy(&mut decoder, &mut out)?;

    println!("  Done!");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::TempDir;

    pub(crate) fn gzip_bytes(content: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decompress() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("data.gz");
        std::fs::write(&archive, gzip_bytes(b"0123456789")).unwrap();

        let dest = dir.path().join("data");
        decompress(&archive, &dest).unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"0123456789");
    }

    #[test]
    fn test_decompress_garbage_fails() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("data.gz");
        std::fs::write(&archive, b"not gzip at all").unwrap();

        let dest = dir.path().join("data");
        assert!(decompress(&archive, &dest).is_err());
    }
}
