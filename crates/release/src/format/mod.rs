//! Release notes rendering.
//!
//! Two formatters implement [`ReleaseNotesFormatter`]:
//!
//! - [`DetailedFormatter`] - per-release summary line and references grouped by label
//! - [`ConciseFormatter`] - one heading per release and a flat reference list
//!
//! Both are pure functions of a [`FormatterContext`] and the release data, and
//! both append the contributor acknowledgment produced by [`acknowledgments`].
//! The output never ends with a newline; callers add their own separators.

mod badge;
mod concise;
mod detailed;
mod header;

pub use badge::BadgeFormatter;
pub use concise::ConciseFormatter;
pub use detailed::DetailedFormatter;
pub use header::{ATTRIBUTION, AttributionHeader, ConfiguredHeader, HeaderProvider};

use crate::contributors::ContributorMap;
use crate::data::{Reference, ReleaseNotesData};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text rendered when there is no release data at all.
pub const NO_RELEASE_INFORMATION: &str = "No release information.";

/// Text rendered for a release without references.
pub const NO_IMPROVEMENTS: &str =
    "No notable improvements. No pull requests (issues) were referenced from commits.";

/// Renders release data into a release notes document.
pub trait ReleaseNotesFormatter {
    /// Render the releases, newest first.
    fn format(&self, data: &[ReleaseNotesData]) -> String;
}

/// Output style of the release notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotesStyle {
    /// Summary line per release and references grouped by label.
    #[default]
    Detailed,
    /// Compact heading per release and a flat reference list.
    Concise,
}

impl fmt::Display for NotesStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detailed => write!(f, "detailed"),
            Self::Concise => write!(f, "concise"),
        }
    }
}

impl FromStr for NotesStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "detailed" => Ok(Self::Detailed),
            "concise" => Ok(Self::Concise),
            _ => Err(format!("Unknown release notes style: {s}")),
        }
    }
}

/// Everything a formatter needs besides the release data.
#[derive(Debug, Clone, Default)]
pub struct FormatterContext {
    /// Pre-rendered header placed above the first release.
    pub header: String,
    /// Tracker label to display name, in display order.
    pub label_mapping: IndexMap<String, String>,
    /// Compare link for the newest release; empty when unknown.
    pub commit_range_link: String,
    /// URL of the repository the artifacts are published to.
    pub publication_repository: String,
    /// Source repository URL used to derive issue links.
    pub repository_url: Option<String>,
    /// Known contributors keyed by display name.
    pub contributors: ContributorMap,
    /// Whether the newest release heading is emphasized.
    pub emphasize_latest_version: bool,
    /// Label of the publication badge.
    pub publication_plugin_name: String,
    /// Badge renderer.
    pub badges: BadgeFormatter,
}

/// Select the formatter for a style.
#[must_use]
pub fn formatter_for(style: NotesStyle, context: FormatterContext) -> Box<dyn ReleaseNotesFormatter> {
    match style {
        NotesStyle::Detailed => Box::new(DetailedFormatter::new(context)),
        NotesStyle::Concise => Box::new(ConciseFormatter::new(context)),
    }
}

/// Version heading, bold when emphasized.
fn version_heading(level: &str, version: &str, emphasize: bool) -> String {
    if emphasize {
        format!("{level} **{version}**")
    } else {
        format!("{level} {version}")
    }
}

/// `[3 commits](link)` style summary of the newest release's commit range.
fn commits_summary(entry: &ReleaseNotesData, link: &str) -> Option<String> {
    let commits = entry.commit_count();
    let text = match commits {
        0 => "commits".to_string(),
        1 => "1 commit".to_string(),
        n => format!("{n} commits"),
    };
    match (link.is_empty(), commits) {
        (true, 0) => None,
        (true, _) => Some(text),
        (false, _) => Some(format!("[{text}]({link})")),
    }
}

/// Contributor name, linked to the profile when known.
fn person(name: &str, contributors: &ContributorMap) -> String {
    contributors.get(name).map_or_else(
        || name.to_string(),
        |c| format!("[{}]({})", c.name, c.profile_url),
    )
}

/// `Title [(#12)](link)`, or `Title (#12)` without a link.
fn reference_line(reference: &Reference, repository_url: Option<&str>) -> String {
    match reference.link(repository_url) {
        Some(link) => format!("{} [(#{})]({link})", reference.title, reference.number),
        None => format!("{} (#{})", reference.title, reference.number),
    }
}

/// Distinct authors referenced by the releases, in first-appearance order.
fn referenced_authors(data: &[ReleaseNotesData]) -> Vec<&str> {
    let mut authors: Vec<&str> = Vec::new();
    let names = data.iter().flat_map(|entry| {
        entry
            .references
            .iter()
            .filter_map(|r| r.author.as_deref())
            .chain(entry.authors.iter().map(|a| a.name.as_str()))
    });
    for name in names {
        if !authors.contains(&name) {
            authors.push(name);
        }
    }
    authors
}

/// Contributor badge and thanks for everyone referenced by the releases.
///
/// Returns `None` when the releases reference no authors.
#[must_use]
pub fn acknowledgments(data: &[ReleaseNotesData], context: &FormatterContext) -> Option<String> {
    let authors = referenced_authors(data);
    if authors.is_empty() {
        return None;
    }

    let link = context
        .repository_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(|url| format!("{}/graphs/contributors", url.trim_end_matches('/')))
        .unwrap_or_else(|| context.commit_range_link.clone());
    let badge = context
        .badges
        .badge("contributors", &authors.len().to_string(), "blue", &link);
    let thanks = authors
        .iter()
        .map(|name| person(name, &context.contributors))
        .collect::<Vec<_>>()
        .join(", ");

    Some(format!("#### Contributors\n\n{badge}\n\nThanks to {thanks}"))
}

/// Join the header, release sections and acknowledgments into a document.
fn assemble(context: &FormatterContext, sections: &[String], data: &[ReleaseNotesData]) -> String {
    let mut document = context.header.clone();
    document.push_str(&sections.join("\n\n"));
    if let Some(thanks) = acknowledgments(data, context) {
        document.push_str("\n\n");
        document.push_str(&thanks);
    }
    document
}
