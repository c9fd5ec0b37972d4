//! Shipkit configuration.
//!
//! This module defines the Rust representation of `shipkit.toml`. Every
//! field has a default, so an empty file (or no file) is a valid
//! configuration.

use crate::contributors::parse_team;
use crate::error::{Error, Result};
use crate::format::{AttributionHeader, ConfiguredHeader, HeaderProvider, NotesStyle};
use crate::updater::{NotesFiles, NotesRequest, release_notes_url};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "shipkit.toml";

/// Complete shipkit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipkitConfig {
    /// Hosting service settings.
    pub github: GithubConfig,
    /// Developers and contributors.
    pub team: TeamConfig,
    /// Release notes generation.
    #[serde(rename = "releaseNotes")]
    pub release_notes: ReleaseNotesConfig,
    /// Publication target.
    pub publication: PublicationConfig,
}

/// Hosting service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Hosting URL (default: `https://github.com`).
    pub url: String,
    /// Repository path, e.g. `org/repo`.
    pub repository: String,
    /// Prefix of release tags (default: `v`).
    #[serde(rename = "tagPrefix")]
    pub tag_prefix: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            url: "https://github.com".to_string(),
            repository: String::new(),
            tag_prefix: "v".to_string(),
        }
    }
}

impl GithubConfig {
    /// Format a tag name from a version.
    #[must_use]
    pub fn format_tag(&self, version: &str) -> String {
        format!("{}{}", self.tag_prefix, version)
    }
}

/// Team members in `Name:handle` notation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamConfig {
    /// Core developers.
    pub developers: Vec<String>,
    /// Contributors; when set, the fetched contributors file is not used.
    pub contributors: Vec<String>,
}

/// Release notes configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseNotesConfig {
    /// Release notes document.
    pub file: String,
    /// Serialized release notes data.
    #[serde(rename = "dataFile")]
    pub data_file: String,
    /// Serialized fetched contributors.
    #[serde(rename = "contributorsFile")]
    pub contributors_file: String,
    /// Header text placed above the new section.
    pub header: String,
    /// Append a "generated by shipkit" line to the header.
    pub attribution: bool,
    /// Tracker label to display name, in display order.
    #[serde(rename = "labelMapping")]
    pub label_mapping: IndexMap<String, String>,
    /// Emphasize the newest version heading.
    #[serde(rename = "emphasizeVersion")]
    pub emphasize_version: bool,
    /// Output style.
    pub style: NotesStyle,
    /// Print the update instead of writing it.
    #[serde(rename = "previewMode")]
    pub preview_mode: bool,
    /// Branch the notes file is browsed on (default: `master`).
    pub branch: String,
    /// Version being released; the newest data record when unset.
    pub version: Option<String>,
    /// Previously released version.
    #[serde(rename = "previousVersion")]
    pub previous_version: Option<String>,
}

impl Default for ReleaseNotesConfig {
    fn default() -> Self {
        Self {
            file: "docs/release-notes.md".to_string(),
            data_file: "build/release-notes-data.json".to_string(),
            contributors_file: "build/contributors.json".to_string(),
            header: String::new(),
            attribution: false,
            label_mapping: IndexMap::new(),
            emphasize_version: false,
            style: NotesStyle::Detailed,
            preview_mode: false,
            branch: "master".to_string(),
            version: None,
            previous_version: None,
        }
    }
}

/// Publication target configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationConfig {
    /// URL of the repository releases are published to.
    pub repository: String,
    /// Label of the publication badge (default: `Bintray`).
    #[serde(rename = "pluginName")]
    pub plugin_name: String,
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            repository: String::new(),
            plugin_name: "Bintray".to_string(),
        }
    }
}

impl ShipkitConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not a valid configuration.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            Error::config(
                format!("Invalid configuration: {}", e.message()),
                "See the [github], [team], [releaseNotes] and [publication] tables in shipkit.toml",
            )
        })
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(
                format!("Failed to read {}: {e}", path.display()),
                "Pass an existing file with --config or create shipkit.toml",
            )
        })?;
        Self::parse(&content).map_err(|e| match e {
            Error::Config { message, help } => {
                Error::config(format!("{message} in {}", path.display()), help)
            }
            other => other,
        })
    }

    /// Load a configuration file, falling back to defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Check the team lists.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::MalformedTeamMember`] found.
    pub fn validate(&self) -> Result<()> {
        parse_team(&self.team.developers)?;
        parse_team(&self.team.contributors)?;
        Ok(())
    }

    /// Header text after the configured provider has rendered it.
    #[must_use]
    pub fn rendered_header(&self) -> String {
        let configured = &self.release_notes.header;
        if self.release_notes.attribution {
            AttributionHeader.header(configured)
        } else {
            ConfiguredHeader.header(configured)
        }
    }

    /// Build the notes request for `version`.
    #[must_use]
    pub fn notes_request(&self, version: impl Into<String>) -> NotesRequest {
        NotesRequest {
            header: self.rendered_header(),
            contributors: self.team.contributors.clone(),
            developers: self.team.developers.clone(),
            github_url: self.github.url.clone(),
            github_repository: self.github.repository.clone(),
            tag_prefix: self.github.tag_prefix.clone(),
            previous_version: self.release_notes.previous_version.clone(),
            version: version.into(),
            label_mapping: self.release_notes.label_mapping.clone(),
            publication_repository: self.publication.repository.clone(),
            publication_plugin_name: self.publication.plugin_name.clone(),
            emphasize_version: self.release_notes.emphasize_version,
            style: self.release_notes.style,
        }
    }

    /// File locations resolved against `root`.
    #[must_use]
    pub fn notes_files(&self, root: &Path) -> NotesFiles {
        NotesFiles {
            notes: root.join(&self.release_notes.file),
            data: root.join(&self.release_notes.data_file),
            contributors: root.join(&self.release_notes.contributors_file),
        }
    }

    /// Browsable URL of the release notes file.
    #[must_use]
    pub fn release_notes_url(&self) -> String {
        release_notes_url(
            &self.github.url,
            &self.github.repository,
            &self.release_notes.branch,
            &self.release_notes.file,
        )
    }
}
