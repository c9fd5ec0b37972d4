//! Published artifact sets.
//!
//! This module handles:
//! - Loading a publication directory into comparable text
//! - Version normalization of artifact names and text content
//! - Entry manifests for jar/zip archives
//! - SHA256 digests for other binary content

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Placeholder substituted for the version in names and text content.
pub const VERSION_PLACEHOLDER: &str = "{version}";

const ARCHIVE_EXTENSIONS: &[&str] = &[".jar", ".zip", ".war", ".aar"];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// How an artifact's content was turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// UTF-8 text with the version normalized.
    Text,
    /// Sorted `name crc32 size` listing of archive entries.
    ArchiveManifest,
    /// `sha256:<hex>` digest line.
    Digest,
}

/// Artifacts of one published version, keyed by version-normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSet {
    entries: BTreeMap<String, String>,
}

impl ArtifactSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artifact's comparable content under `name`.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.entries.insert(name.into(), content.into());
    }

    /// Loads every file directly inside `dir`.
    ///
    /// `version` is replaced by [`VERSION_PLACEHOLDER`] in file names and text
    /// content so that sets of different versions line up.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Artifact`] if the directory or one of its files cannot
    /// be read, or an archive is corrupt.
    pub fn load_dir(dir: &Path, version: &str) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::artifact(
                format!("Not a directory: {}", dir.display()),
                Some(dir.to_path_buf()),
            ));
        }
        let read_dir = std::fs::read_dir(dir).map_err(|e| {
            Error::artifact(
                format!("Failed to list publication directory: {e}"),
                Some(dir.to_path_buf()),
            )
        })?;

        let mut set = Self::new();
        for entry in read_dir {
            let path = entry
                .map_err(|e| {
                    Error::artifact(
                        format!("Failed to list publication directory: {e}"),
                        Some(dir.to_path_buf()),
                    )
                })?
                .path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let bytes = std::fs::read(&path).map_err(|e| {
                Error::artifact(format!("Failed to read artifact: {e}"), Some(path.clone()))
            })?;
            let (kind, content) = comparable_content(file_name, &bytes, version)
                .map_err(|e| Error::artifact(e, Some(path.clone())))?;

            let name = normalize_version(file_name, version);
            debug!(artifact = %name, kind = ?kind, "Loaded artifact");
            set.insert(name, content);
        }
        Ok(set)
    }

    /// Content stored for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Artifact names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name to content mapping.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl FromIterator<(String, String)> for ArtifactSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Replaces every occurrence of `version` with [`VERSION_PLACEHOLDER`].
#[must_use]
pub fn normalize_version(text: &str, version: &str) -> String {
    if version.is_empty() {
        text.to_string()
    } else {
        text.replace(version, VERSION_PLACEHOLDER)
    }
}

fn is_archive(file_name: &str, bytes: &[u8]) -> bool {
    let lower = file_name.to_ascii_lowercase();
    ARCHIVE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) || bytes.starts_with(ZIP_MAGIC)
}

fn comparable_content(
    file_name: &str,
    bytes: &[u8],
    version: &str,
) -> std::result::Result<(ContentKind, String), String> {
    if is_archive(file_name, bytes) {
        return archive_manifest(bytes, version).map(|m| (ContentKind::ArchiveManifest, m));
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok((ContentKind::Text, normalize_version(text, version))),
        Err(_) => Ok((ContentKind::Digest, format!("sha256:{}", sha256_hex(bytes)))),
    }
}

/// Sorted `name crc32 size` lines for the entries of a zip archive.
///
/// Entry timestamps are ignored; entry names have the version normalized.
///
/// # Errors
///
/// Returns a message if the archive cannot be read.
pub fn archive_manifest(bytes: &[u8], version: &str) -> std::result::Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| format!("Failed to open archive: {e}"))?;

    let mut lines = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive
            .by_index(i)
            .map_err(|e| format!("Failed to read archive entry {i}: {e}"))?;
        if file.is_dir() {
            continue;
        }
        lines.push(format!(
            "{} {:08x} {}",
            normalize_version(file.name(), version),
            file.crc32(),
            file.size()
        ));
    }
    lines.sort();
    Ok(lines.join("\n"))
}

/// Lowercase hex SHA256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
