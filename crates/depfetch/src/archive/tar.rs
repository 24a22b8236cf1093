//! Hand-rolled TAR extraction.
//!
//! Decodes the classic ustar layout directly from raw 512-byte blocks:
//! only the name (bytes 0..100), size (bytes 124..136, ASCII octal) and
//! type flag (byte 156) fields are interpreted. Regular file entries are
//! written out; everything else is skipped while still consuming its data
//! blocks. Long-name extensions, sparse files and pax headers are not
//! supported.

use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use super::{check_entry_name, strip_sub_dir};
use crate::{DependencyError, Result};

const BLOCK_SIZE: usize = 512;

/// Extract regular-file entries of a TAR archive into `destination`.
pub fn extract(archive_path: &Path, destination: &Path, sub_dir: Option<&str>) -> Result<()> {
    fs::create_dir_all(destination)?;

    println!("  Tar extract...");

    let file = File::open(archive_path)?;
    extract_stream(BufReader::new(file), destination, sub_dir)?;

    println!("  Done!");
    Ok(())
}

fn extract_stream<R: Read>(mut reader: R, destination: &Path, sub_dir: Option<&str>) -> Result<()> {
    let mut header = [0u8; BLOCK_SIZE];
    let mut block = [0u8; BLOCK_SIZE];

    loop {
        // A short header read or an all-zero block ends the archive.
        let read = read_block(&mut reader, &mut header)?;
        if read < BLOCK_SIZE || header.iter().all(|&b| b == 0) {
            break;
        }

        let size = parse_octal(&header[124..136]);
        let type_flag = parse_octal(&header[156..157]);

        let mut out = if type_flag == 0 {
            open_output(&header[..100], destination, sub_dir)?
        } else {
            None
        };

        // Consume ceil(size / 512) blocks, trimming the final one.
        let mut remaining = size;
        while remaining > 0 {
            let read = read_block(&mut reader, &mut block)?;
            if read < BLOCK_SIZE {
                return Err(DependencyError::InvalidTar);
            }

            let take = remaining.min(BLOCK_SIZE as u64) as usize;
            if let Some(ref mut out) = out {
                out.write_all(&block[..take])?;
            }
            remaining -= take as u64;
        }
    }

    Ok(())
}

fn open_output(
    name_field: &[u8],
    destination: &Path,
    sub_dir: Option<&str>,
) -> Result<Option<File>> {
    let name = parse_name(name_field);
    if name.is_empty() {
        return Ok(None);
    }
    check_entry_name(&name)?;

    let Some(relative) = strip_sub_dir(&name, sub_dir) else {
        return Ok(None);
    };
    if relative.is_empty() {
        return Ok(None);
    }

    let out_path = destination.join(relative);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(Some(File::create(&out_path)?))
}

/// Fill `buf` from the reader, returning how many bytes were read.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let read = reader.read(&mut buf[filled..])?;
        if read == 0 {
            break;
        }
        filled += read;
    }
    Ok(filled)
}

/// Decode a zero-padded ASCII octal field. Non-digit bytes are skipped
/// without resetting the accumulator.
fn parse_octal(field: &[u8]) -> u64 {
    let mut value = 0u64;
    for &byte in field {
        if byte.is_ascii_digit() {
            value = value * 8 + u64::from(byte - b'0');
        }
    }
    value
}

/// Decode the NUL-terminated name field.
///
/// Leading `'0'` bytes are turned into spaces and all spaces are removed
/// from the result. This mirrors the historical behavior of the tool this
/// format handling was ported from; manifests relying on it exist.
fn parse_name(field: &[u8]) -> String {
    let mut bytes = Vec::with_capacity(field.len());
    let mut leading = true;

    for &byte in field {
        if byte == 0 {
            break;
        }
        if leading && byte == b'0' {
            bytes.push(b' ');
        } else {
            leading = false;
            bytes.push(byte);
        }
    }

    String::from_utf8_lossy(&bytes).replace(' ', "")
}
