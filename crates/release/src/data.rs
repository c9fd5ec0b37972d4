//! Release notes data model and its serialized form.
//!
//! The data file is produced ahead of time (one record per released version,
//! most recent first by convention) and stored as a pretty-printed JSON list
//! so that changes to it stay readable in review.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Release information for a single version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseNotesData {
    /// Released version.
    pub version: String,
    /// Release date as recorded by the producer (e.g. `2024-05-01`).
    pub date: String,
    /// Issues and pull requests referenced by the release, in order.
    #[serde(default)]
    pub references: Vec<Reference>,
    /// Commit authors with their commit counts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<AuthorContribution>,
}

impl ReleaseNotesData {
    /// Create a release record without references.
    #[must_use]
    pub fn new(version: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            date: date.into(),
            references: Vec::new(),
            authors: Vec::new(),
        }
    }

    /// Add a reference.
    #[must_use]
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    /// Add a commit author.
    #[must_use]
    pub fn with_author(mut self, name: impl Into<String>, commits: u32) -> Self {
        self.authors.push(AuthorContribution {
            name: name.into(),
            commits,
        });
        self
    }

    /// Total number of commits across all authors.
    #[must_use]
    pub fn commit_count(&self) -> u32 {
        self.authors.iter().map(|a| a.commits).sum()
    }
}

/// An issue or pull request referenced by a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Tracker label (e.g. `bug`, `enhancement`).
    pub label: String,
    /// Issue or pull request number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Explicit link; derived from the repository URL when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Display name of the author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Whether the reference is a pull request rather than an issue.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pull_request: bool,
}

impl Reference {
    /// Create a reference.
    #[must_use]
    pub fn new(label: impl Into<String>, number: u64, title: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            number,
            title: title.into(),
            url: None,
            author: None,
            pull_request: false,
        }
    }

    /// Set the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set an explicit link.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Mark the reference as a pull request.
    #[must_use]
    pub const fn pull_request(mut self) -> Self {
        self.pull_request = true;
        self
    }

    /// Link to the reference, preferring the explicit URL.
    #[must_use]
    pub fn link(&self, repository_url: Option<&str>) -> Option<String> {
        if let Some(url) = &self.url {
            return Some(url.clone());
        }
        let kind = if self.pull_request { "pull" } else { "issues" };
        repository_url
            .filter(|base| !base.is_empty())
            .map(|base| format!("{}/{kind}/{}", base.trim_end_matches('/'), self.number))
    }
}

/// Commits contributed to a release by one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorContribution {
    /// Display name.
    pub name: String,
    /// Number of commits.
    pub commits: u32,
}

/// Serializer for the release notes data file.
pub struct ReleaseNotesSerializer;

impl ReleaseNotesSerializer {
    /// Serialize release records as a pretty JSON list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(data: &[ReleaseNotesData]) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Deserialize release records, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedReleaseData`] if the content has the wrong shape.
    pub fn deserialize(raw: &[u8]) -> Result<Vec<ReleaseNotesData>> {
        serde_json::from_slice(raw).map_err(|e| Error::malformed_release_data(e.to_string(), None))
    }

    /// Read and deserialize a release notes data file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileAccess`] if the file cannot be read and
    /// [`Error::MalformedReleaseData`] (naming the file) if it cannot be parsed.
    pub fn read_file(path: &Path) -> Result<Vec<ReleaseNotesData>> {
        debug!(path = %path.display(), "Reading release notes data");
        let raw = std::fs::read(path).map_err(|e| {
            Error::file_access(
                format!("Failed to read release notes data: {}", path.display()),
                path,
                e,
            )
        })?;
        serde_json::from_slice(&raw).map_err(|e| {
            Error::malformed_release_data(
                format!("{e} in {}", path.display()),
                Some(path.to_path_buf()),
            )
        })
    }

    /// Serialize release records into a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileAccess`] if the file cannot be written.
    pub fn write_file(path: &Path, data: &[ReleaseNotesData]) -> Result<()> {
        let content = Self::serialize(data)?;
        std::fs::write(path, content).map_err(|e| {
            Error::file_access(
                format!("Failed to write release notes data: {}", path.display()),
                path,
                e,
            )
        })
    }
}
