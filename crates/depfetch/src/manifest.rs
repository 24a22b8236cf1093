//! Manifest loading and validation.
//!
//! The manifest is an XML document with a `DependencyList` root holding
//! one element per artifact. Recognized element names are `File`, `Zip`,
//! `GZip`, `Tar` and `TarGz`; anything else survives loading as an unknown
//! item so the processor can warn and move on. Validation of known entries is strict:
//! `Source` and `Destination` are required, digest attributes must be
//! lowercase hex of the right length, and unrecognized attributes are
//! rejected. Attribute names are case-sensitive.

use std::fs;
use std::path::Path;

use crate::{DependencyError, Result};

/// How the artifact is materialized at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Zip,
    GZip,
    Tar,
    TarGz,
}

impl EntryKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "File" => Some(EntryKind::File),
            "Zip" => Some(EntryKind::Zip),
            "GZip" => Some(EntryKind::GZip),
            "Tar" => Some(EntryKind::Tar),
            "TarGz" => Some(EntryKind::TarGz),
            _ => None,
        }
    }

    /// Manifest element name, used in per-entry banners.
    pub fn tag(&self) -> &'static str {
        match self {
            EntryKind::File => "File",
            EntryKind::Zip => "Zip",
            EntryKind::GZip => "GZip",
            EntryKind::Tar => "Tar",
            EntryKind::TarGz => "TarGz",
        }
    }
}

/// One declarative artifact record.
#[derive(Debug, Clone)]
pub struct Entry {
    pub kind: EntryKind,
    pub source: String,
    pub destination: String,
    pub source_sub_dir: Option<String>,
    pub md5: Option<String>,
    pub sha1: Option<String>,
}

/// A manifest item: either a valid artifact entry or an element with an
/// unrecognized tag name.
#[derive(Debug, Clone)]
pub enum ManifestItem {
    Artifact(Entry),
    Unknown { tag: String },
}

/// The ordered list of manifest items, in document order.
#[derive(Debug, Default)]
pub struct Manifest {
    pub items: Vec<ManifestItem>,
}

const ROOT_ELEMENT: &str = "DependencyList";

const KNOWN_ATTRIBUTES: [&str; 5] = ["Source", "Destination", "SourceSubDir", "Md5", "Sha1"];

impl Manifest {
    /// Load and validate the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| DependencyError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse and validate a manifest document.
    pub fn parse(text: &str) -> Result<Self> {
        let document = roxmltree::Document::parse(text)?;

        let root = document.root_element();
        if root.tag_name().name() != ROOT_ELEMENT {
            return Err(DependencyError::ManifestSchema(format!(
                "Unexpected root element <{}>, expected <{ROOT_ELEMENT}>",
                root.tag_name().name()
            )));
        }

        let mut items = Vec::new();
        for node in root.children() {
            if !node.is_element() {
                continue;
            }

            let tag = node.tag_name().name();
            match EntryKind::from_tag(tag) {
                Some(kind) => items.push(ManifestItem::Artifact(parse_entry(kind, &node)?)),
                None => items.push(ManifestItem::Unknown {
                    tag: tag.to_string(),
                }),
            }
        }

        Ok(Self { items })
    }
}

fn parse_entry(kind: EntryKind, node: &roxmltree::Node) -> Result<Entry> {
    for attribute in node.attributes() {
        if !KNOWN_ATTRIBUTES.contains(&attribute.name()) {
            return Err(DependencyError::ManifestSchema(format!(
                "Unknown attribute '{}' on <{}>",
                attribute.name(),
                kind.tag()
            )));
        }
    }

    let source = required_attribute(node, kind, "Source")?;
    let destination = required_attribute(node, kind, "Destination")?;

    let md5 = digest_attribute(node, kind, "Md5", 32)?;
    let sha1 = digest_attribute(node, kind, "Sha1", 40)?;

    Ok(Entry {
        kind,
        source,
        destination,
        source_sub_dir: node.attribute("SourceSubDir").map(str::to_string),
        md5,
        sha1,
    })
}

fn required_attribute(node: &roxmltree::Node, kind: EntryKind, name: &str) -> Result<String> {
    node.attribute(name)
        .map(str::to_string)
        .ok_or_else(|| {
            DependencyError::ManifestSchema(format!(
                "Missing attribute '{}' on <{}>",
                name,
                kind.tag()
            ))
        })
}

fn digest_attribute(
    node: &roxmltree::Node,
    kind: EntryKind,
    name: &str,
    length: usize,
) -> Result<Option<String>> {
    let Some(value) = node.attribute(name) else {
        return Ok(None);
    };

    let valid = value.len() == length
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
    if !valid {
        return Err(DependencyError::ManifestSchema(format!(
            "Attribute '{}' on <{}> must be {} lowercase hex characters",
            name,
            kind.tag(),
            length
        )));
    }

    Ok(Some(value.to_string()))
}
