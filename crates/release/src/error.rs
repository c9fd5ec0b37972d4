//! Error types for release notes and publication comparison.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for release operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating release notes or comparing publications.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A team member entry does not follow the `Name:handle` notation.
    #[error("Invalid team member: '{value}'")]
    #[diagnostic(
        code(shipkit::release::team_member),
        help("Team members must be declared as 'Full Name:handle', e.g. 'Jane Doe:jdoe'")
    )]
    MalformedTeamMember {
        /// The offending entry
        value: String,
    },

    /// The release notes data file could not be parsed.
    #[error("Malformed release notes data: {message}")]
    #[diagnostic(
        code(shipkit::release::release_data),
        help("The release notes data file must be a JSON list of release records")
    )]
    MalformedReleaseData {
        /// The error message
        message: String,
        /// The file that failed to parse
        path: Option<PathBuf>,
    },

    /// The contributors data file could not be parsed.
    #[error("Malformed contributors data: {message}")]
    #[diagnostic(
        code(shipkit::release::contributors_data),
        help("The contributors file must be a JSON list of {{name, login, profileUrl}} entries")
    )]
    MalformedContributorsData {
        /// The error message
        message: String,
        /// The file that failed to parse
        path: Option<PathBuf>,
    },

    /// The release notes file could not be read or written.
    #[error("File access error: {message}")]
    #[diagnostic(
        code(shipkit::release::file_access),
        help("Check file permissions and ensure the parent directory exists")
    )]
    FileAccess {
        /// The error message
        message: String,
        /// The path that caused the error
        path: PathBuf,
        /// The underlying source error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(shipkit::release::config), help("{help}"))]
    Config {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
    },

    /// A published artifact could not be loaded.
    #[error("Artifact error: {message}")]
    #[diagnostic(
        code(shipkit::release::artifact),
        help("Check that the publication directory exists and is readable")
    )]
    Artifact {
        /// The error message
        message: String,
        /// The path that caused the error
        path: Option<PathBuf>,
    },

    /// Wrapped JSON error.
    #[error("JSON error: {0}")]
    #[diagnostic(code(shipkit::release::json))]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new malformed team member error.
    #[must_use]
    pub fn malformed_team_member(value: impl Into<String>) -> Self {
        Self::MalformedTeamMember {
            value: value.into(),
        }
    }

    /// Create a new malformed release data error.
    #[must_use]
    pub fn malformed_release_data(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::MalformedReleaseData {
            message: message.into(),
            path,
        }
    }

    /// Create a new malformed contributors data error.
    #[must_use]
    pub fn malformed_contributors_data(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::MalformedContributorsData {
            message: message.into(),
            path,
        }
    }

    /// Create a new file access error.
    #[must_use]
    pub fn file_access(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileAccess {
            message: message.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }

    /// Create a new artifact error.
    #[must_use]
    pub fn artifact(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Artifact {
            message: message.into(),
            path,
        }
    }
}
