//! Contributor identities and their merge into a single registry.
//!
//! Contributors reach the release notes from three places: the team
//! contributors declared in configuration, the project contributors fetched
//! from the hosting service ahead of time, and the declared developers. Each
//! source is turned into [`Contributor`] values and folded into one
//! [`ContributorMap`] keyed by display name.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Merged contributors keyed by display name.
pub type ContributorMap = BTreeMap<String, Contributor>;

/// A person credited in release notes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    /// Display name, unique within a [`ContributorMap`].
    pub name: String,
    /// Hosting service handle.
    pub login: String,
    /// Link to the contributor's profile page.
    pub profile_url: String,
}

impl Contributor {
    /// Create a new contributor.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        login: impl Into<String>,
        profile_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            login: login.into(),
            profile_url: profile_url.into(),
        }
    }

    /// Build a contributor from a team member declared in configuration.
    ///
    /// The profile URL is `org_url/handle`.
    #[must_use]
    pub fn from_team_member(member: &TeamMember, org_url: &str) -> Self {
        Self::new(
            member.name.clone(),
            member.handle.clone(),
            format!("{}/{}", org_url.trim_end_matches('/'), member.handle),
        )
    }
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (@{})", self.name, self.login)
    }
}

/// Team member notation parsed from `"Name:handle"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    /// Display name.
    pub name: String,
    /// Hosting service handle.
    pub handle: String,
}

impl TeamMember {
    /// Parse a `"Name:handle"` entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedTeamMember`] unless the entry contains exactly
    /// one `:` with non-blank text on both sides.
    pub fn parse(notation: &str) -> Result<Self> {
        let Some((name, handle)) = notation.split_once(':') else {
            return Err(Error::malformed_team_member(notation));
        };
        let (name, handle) = (name.trim(), handle.trim());
        if name.is_empty() || handle.is_empty() || handle.contains(':') {
            return Err(Error::malformed_team_member(notation));
        }
        Ok(Self {
            name: name.to_string(),
            handle: handle.to_string(),
        })
    }
}

impl FromStr for TeamMember {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse every entry of a team list, failing on the first malformed one.
///
/// # Errors
///
/// Returns [`Error::MalformedTeamMember`] for the first invalid entry.
pub fn parse_team(entries: &[String]) -> Result<Vec<TeamMember>> {
    entries.iter().map(|entry| TeamMember::parse(entry)).collect()
}

/// A contributor fetched from the hosting service, with its contribution count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContributor {
    /// Contributor identity.
    #[serde(flatten)]
    pub contributor: Contributor,
    /// Number of contributions to the project.
    #[serde(default)]
    pub contributions: u32,
}

impl ProjectContributor {
    /// Create a new project contributor.
    #[must_use]
    pub const fn new(contributor: Contributor, contributions: u32) -> Self {
        Self {
            contributor,
            contributions,
        }
    }
}

/// Set of project contributors, unique by login.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectContributorsSet {
    by_login: BTreeMap<String, ProjectContributor>,
}

impl ProjectContributorsSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contributor.
    ///
    /// When the login is already present the entry with more contributions is kept.
    pub fn add(&mut self, contributor: ProjectContributor) {
        let login = contributor.contributor.login.clone();
        match self.by_login.get(&login) {
            Some(existing) if existing.contributions >= contributor.contributions => {}
            _ => {
                self.by_login.insert(login, contributor);
            }
        }
    }

    /// Number of distinct contributors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_login.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_login.is_empty()
    }

    /// All contributors, most contributions first, ties ordered by name.
    #[must_use]
    pub fn all_contributors(&self) -> Vec<&ProjectContributor> {
        let mut all: Vec<&ProjectContributor> = self.by_login.values().collect();
        all.sort_by(|a, b| {
            b.contributions
                .cmp(&a.contributions)
                .then_with(|| a.contributor.name.cmp(&b.contributor.name))
        });
        all
    }

    /// Serialize the set as a pretty JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.all_contributors())?)
    }

    /// Deserialize a set from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedContributorsData`] if the content has the wrong shape.
    pub fn deserialize(raw: &[u8]) -> Result<Self> {
        let entries: Vec<ProjectContributor> = serde_json::from_slice(raw)
            .map_err(|e| Error::malformed_contributors_data(e.to_string(), None))?;
        Ok(entries.into_iter().collect())
    }

    /// Read a contributors data file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileAccess`] if the file cannot be read and
    /// [`Error::MalformedContributorsData`] if it cannot be parsed.
    pub fn read_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading project contributors");
        let raw = std::fs::read(path).map_err(|e| {
            Error::file_access(
                format!("Failed to read contributors data: {}", path.display()),
                path,
                e,
            )
        })?;
        Self::deserialize(&raw).map_err(|e| match e {
            Error::MalformedContributorsData { message, .. } => Error::malformed_contributors_data(
                format!("{message} in {}", path.display()),
                Some(path.to_path_buf()),
            ),
            other => other,
        })
    }
}

impl FromIterator<ProjectContributor> for ProjectContributorsSet {
    fn from_iter<I: IntoIterator<Item = ProjectContributor>>(iter: I) -> Self {
        let mut set = Self::new();
        for contributor in iter {
            set.add(contributor);
        }
        set
    }
}

/// Merge contributors from configuration, the fetched project set and the developers.
///
/// Sources are folded in the fixed order config, fetched, developers; an entry
/// from a later source replaces an earlier entry with the same name.
///
/// # Errors
///
/// Returns [`Error::MalformedTeamMember`] if a configured contributor or
/// developer entry is not in `"Name:handle"` form.
pub fn merge_contributors(
    config_contributors: &[String],
    fetched: &ProjectContributorsSet,
    developers: &[String],
    org_url: &str,
) -> Result<ContributorMap> {
    let from_team = |entries: &[String]| -> Result<Vec<Contributor>> {
        Ok(parse_team(entries)?
            .iter()
            .map(|member| Contributor::from_team_member(member, org_url))
            .collect())
    };

    let sources = [
        from_team(config_contributors)?,
        // Fewest contributions first, so the most active login keeps a shared name.
        fetched
            .all_contributors()
            .into_iter()
            .rev()
            .map(|pc| pc.contributor.clone())
            .collect(),
        from_team(developers)?,
    ];

    let merged = sources
        .into_iter()
        .flatten()
        .fold(ContributorMap::new(), |mut map, contributor| {
            map.insert(contributor.name.clone(), contributor);
            map
        });

    debug!(count = merged.len(), "Merged contributors");
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn fetched(name: &str, login: &str, contributions: u32) -> ProjectContributor {
        ProjectContributor::new(
            Contributor::new(name, login, format!("https://github.com/{login}")),
            contributions,
        )
    }

    #[test]
    fn test_parse_team_member() {
        let member = TeamMember::parse("Jane Doe:jdoe").unwrap();
        assert_eq!(member.name, "Jane Doe");
        assert_eq!(member.handle, "jdoe");
    }

    #[test]
    fn test_parse_team_member_trims_whitespace() {
        let member: TeamMember = " Jane Doe : jdoe ".parse().unwrap();
        assert_eq!(member.name, "Jane Doe");
        assert_eq!(member.handle, "jdoe");
    }

    #[test]
    fn test_parse_team_member_rejects_bad_notation() {
        for bad in ["janedoe", ":jdoe", "Jane Doe:", "a:b:c", ""] {
            let err = TeamMember::parse(bad).unwrap_err();
            assert!(
                matches!(err, Error::MalformedTeamMember { ref value } if value == bad),
                "expected malformed team member for {bad:?}"
            );
        }
    }

    #[test]
    fn test_merge_single_config_contributor() {
        let merged = merge_contributors(
            &strings(&["Alice:alice1"]),
            &ProjectContributorsSet::new(),
            &[],
            "https://github.com/org",
        )
        .unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged["Alice"],
            Contributor::new("Alice", "alice1", "https://github.com/org/alice1")
        );
    }

    #[test]
    fn test_merge_developers_win_over_fetched_and_config() {
        let set: ProjectContributorsSet = [fetched("Alice", "alice-gh", 10)].into_iter().collect();
        let merged = merge_contributors(
            &strings(&["Alice:alice-config"]),
            &set,
            &strings(&["Alice:alice-dev"]),
            "https://github.com",
        )
        .unwrap();

        assert_eq!(merged["Alice"].login, "alice-dev");
        assert_eq!(merged["Alice"].profile_url, "https://github.com/alice-dev");
    }

    #[test]
    fn test_merge_fetched_wins_over_config() {
        let set: ProjectContributorsSet = [fetched("Bob", "bob-gh", 3)].into_iter().collect();
        let merged =
            merge_contributors(&strings(&["Bob:bob-config"]), &set, &[], "https://github.com")
                .unwrap();

        assert_eq!(merged["Bob"].login, "bob-gh");
    }

    #[test]
    fn test_merge_shared_name_keeps_most_active_login() {
        let set: ProjectContributorsSet = [fetched("Dana", "dana-old", 2), fetched("Dana", "dana", 40)]
            .into_iter()
            .collect();
        let merged = merge_contributors(&[], &set, &[], "https://github.com").unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged["Dana"].login, "dana");
    }

    #[test]
    fn test_merge_keeps_distinct_names() {
        let set: ProjectContributorsSet = [fetched("Carol", "carol", 1)].into_iter().collect();
        let merged = merge_contributors(
            &strings(&["Alice:alice"]),
            &set,
            &strings(&["Bob:bob"]),
            "https://github.com",
        )
        .unwrap();

        let names: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_merge_rejects_malformed_developer() {
        let err = merge_contributors(
            &[],
            &ProjectContributorsSet::new(),
            &strings(&["no-separator"]),
            "https://github.com",
        )
        .unwrap_err();
        assert!(err.to_string().contains("no-separator"));
    }

    #[test]
    fn test_contributors_set_keeps_highest_contribution_count() {
        let mut set = ProjectContributorsSet::new();
        set.add(fetched("Alice", "alice", 5));
        set.add(fetched("Alice A.", "alice", 2));
        set.add(fetched("Alice Anderson", "alice", 9));

        assert_eq!(set.len(), 1);
        assert_eq!(set.all_contributors()[0].contributor.name, "Alice Anderson");
    }

    #[test]
    fn test_contributors_set_orders_by_contributions() {
        let set: ProjectContributorsSet = [
            fetched("Bob", "bob", 1),
            fetched("Alice", "alice", 7),
            fetched("Carol", "carol", 1),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = set
            .all_contributors()
            .iter()
            .map(|pc| pc.contributor.name.as_str())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_contributors_set_serialization_round_trip() {
        let set: ProjectContributorsSet =
            [fetched("Alice", "alice", 7), fetched("Bob", "bob", 2)].into_iter().collect();

        let json = set.serialize().unwrap();
        assert!(json.contains("\"profileUrl\""));

        let parsed = ProjectContributorsSet::deserialize(json.as_bytes()).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn test_contributors_deserialize_without_contribution_count() {
        let raw = br#"[{"name": "Alice", "login": "alice", "profileUrl": "https://github.com/alice"}]"#;
        let set = ProjectContributorsSet::deserialize(raw).unwrap();
        assert_eq!(set.all_contributors()[0].contributions, 0);
    }

    #[test]
    fn test_contributors_deserialize_rejects_wrong_shape() {
        let err = ProjectContributorsSet::deserialize(br#"{"name": "Alice"}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedContributorsData { .. }));
    }

    #[test]
    fn test_contributors_read_file_reports_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("contributors.json");
        std::fs::write(&path, "not json").unwrap();

        let err = ProjectContributorsSet::read_file(&path).unwrap_err();
        assert!(err.to_string().contains("contributors.json"));
    }

    #[test]
    fn test_contributors_read_missing_file() {
        let err = ProjectContributorsSet::read_file(Path::new("/nonexistent/contributors.json"))
            .unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }
}
