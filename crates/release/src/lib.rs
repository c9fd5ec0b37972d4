//! Release notes generation and publication comparison for shipkit.
//!
//! This crate turns pre-fetched release data into a release notes document and
//! checks a fresh build against the previously published version, so that a
//! release is only shipped when something actually changed.
//!
//! # Architecture
//!
//! The crate is organized around several core modules:
//!
//! - [`contributors`] - Team member parsing and the contributor merge
//! - [`data`] - Release notes data model and its JSON serializer
//! - [`format`] - Detailed and concise release notes formatters
//! - [`updater`] - Content generation and the prepend/preview update
//! - [`diff`] - Unified diff of two file contents
//! - [`artifact`] / [`comparison`] - Publication loading and comparison
//! - [`config`] - `shipkit.toml` configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use shipkit_release::{ReleaseNotesUpdater, ShipkitConfig, TracingSink};
//! use std::path::Path;
//!
//! let config = ShipkitConfig::load_or_default(Path::new("shipkit.toml"))?;
//! let request = config.notes_request("1.1.0");
//! let files = config.notes_files(Path::new("."));
//!
//! ReleaseNotesUpdater::new(TracingSink).update(&request, &files, false)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod artifact;
pub mod comparison;
pub mod config;
pub mod contributors;
pub mod data;
pub mod diff;
pub mod error;
pub mod format;
pub mod updater;

// Re-export main types
pub use artifact::{ArtifactSet, VERSION_PLACEHOLDER};
pub use comparison::{ComparisonReport, PublicationComparator};
pub use config::{CONFIG_FILE, ShipkitConfig};
pub use contributors::{
    Contributor, ContributorMap, ProjectContributor, ProjectContributorsSet, TeamMember,
    merge_contributors,
};
pub use data::{AuthorContribution, Reference, ReleaseNotesData, ReleaseNotesSerializer};
pub use diff::FileDiffGenerator;
pub use error::{Error, Result};
pub use format::{FormatterContext, NotesStyle, ReleaseNotesFormatter, formatter_for};
pub use updater::{
    ConsoleSink, NotesFiles, NotesRequest, NotesSink, ReleaseNotesUpdater, TracingSink,
    commit_range_link, generate_new_content, update_release_notes,
};
