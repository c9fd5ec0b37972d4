//! Release notes update: generate the newest section and prepend it to the notes file.
//!
//! Console output goes through a [`NotesSink`] handed to the updater, so the
//! same flow can log through `tracing`, print to stdout, or be recorded in tests.

use crate::contributors::{ProjectContributorsSet, merge_contributors};
use crate::data::{ReleaseNotesData, ReleaseNotesSerializer};
use crate::error::{Error, Result};
use crate::format::{BadgeFormatter, FormatterContext, NotesStyle, formatter_for};
use indexmap::IndexMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info};

const PREVIEW_START: &str = "  Preview of release notes update:\n  ----------------\n";
const PREVIEW_END: &str = "----------------";
const UPDATED: &str = "  Successfully updated release notes!";

/// Destination of the updater's user-facing messages.
pub trait NotesSink {
    /// Emit one message.
    fn emit(&self, message: &str);
}

/// Emits messages as `tracing` info events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotesSink for TracingSink {
    fn emit(&self, message: &str) {
        info!("{message}");
    }
}

/// Writes messages to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotesSink for ConsoleSink {
    fn emit(&self, message: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{message}");
    }
}

/// Inputs for generating the newest release notes section.
#[derive(Debug, Clone, Default)]
pub struct NotesRequest {
    /// Pre-rendered header placed above the releases.
    pub header: String,
    /// Configured contributors in `Name:handle` form.
    pub contributors: Vec<String>,
    /// Developers in `Name:handle` form.
    pub developers: Vec<String>,
    /// Hosting URL, e.g. `https://github.com`.
    pub github_url: String,
    /// Repository path, e.g. `org/repo`.
    pub github_repository: String,
    /// Prefix of release tags, e.g. `v`.
    pub tag_prefix: String,
    /// Previously released version; no compare link without it.
    pub previous_version: Option<String>,
    /// Version being released.
    pub version: String,
    /// Tracker label to display name.
    pub label_mapping: IndexMap<String, String>,
    /// URL of the repository the release is published to.
    pub publication_repository: String,
    /// Label of the publication badge.
    pub publication_plugin_name: String,
    /// Emphasize the newest version heading.
    pub emphasize_version: bool,
    /// Output style.
    pub style: NotesStyle,
}

impl NotesRequest {
    /// Base URL of the source repository (`github_url/github_repository`).
    #[must_use]
    pub fn repository_url(&self) -> String {
        join_url(&[&self.github_url, &self.github_repository])
    }

    /// Compare link between the previous and current release tags.
    #[must_use]
    pub fn commit_range_link(&self) -> String {
        commit_range_link(
            &self.github_url,
            &self.github_repository,
            &self.tag_prefix,
            self.previous_version.as_deref(),
            &self.version,
        )
    }
}

/// Locations of the files an update reads and writes.
#[derive(Debug, Clone)]
pub struct NotesFiles {
    /// Release notes document that receives the new section.
    pub notes: PathBuf,
    /// Serialized release notes data.
    pub data: PathBuf,
    /// Serialized fetched contributors.
    pub contributors: PathBuf,
}

/// Join URL parts with `/`, skipping empty parts and duplicate slashes.
fn join_url(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// `<url>/<repo>/compare/<prefix><previous>...<prefix><version>`, or empty
/// when there is no previous version.
#[must_use]
pub fn commit_range_link(
    github_url: &str,
    github_repository: &str,
    tag_prefix: &str,
    previous_version: Option<&str>,
    version: &str,
) -> String {
    previous_version.map_or_else(String::new, |previous| {
        format!(
            "{}/compare/{tag_prefix}{previous}...{tag_prefix}{version}",
            join_url(&[github_url, github_repository])
        )
    })
}

/// Browsable URL of the release notes file on `branch`.
#[must_use]
pub fn release_notes_url(
    github_url: &str,
    github_repository: &str,
    branch: &str,
    relative_path: &str,
) -> String {
    let path = relative_path.replace('\\', "/");
    join_url(&[github_url, github_repository, "blob", branch, &path])
}

/// Render the newest release notes content, ending with two newlines.
///
/// # Errors
///
/// Returns [`Error::MalformedTeamMember`] if a contributor or developer entry
/// is malformed.
pub fn generate_new_content(
    request: &NotesRequest,
    data: &[ReleaseNotesData],
    fetched: &ProjectContributorsSet,
) -> Result<String> {
    let contributors = merge_contributors(
        &request.contributors,
        fetched,
        &request.developers,
        &request.github_url,
    )?;

    let repository_url = request.repository_url();
    let context = FormatterContext {
        header: request.header.clone(),
        label_mapping: request.label_mapping.clone(),
        commit_range_link: request.commit_range_link(),
        publication_repository: request.publication_repository.clone(),
        repository_url: (!repository_url.is_empty()).then_some(repository_url),
        contributors,
        emphasize_latest_version: request.emphasize_version,
        publication_plugin_name: request.publication_plugin_name.clone(),
        badges: BadgeFormatter::default(),
    };

    debug!(
        style = %request.style,
        releases = data.len(),
        version = %request.version,
        "Formatting release notes"
    );
    let mut content = formatter_for(request.style, context).format(data);
    content.push_str("\n\n");
    Ok(content)
}

/// Preview or prepend `new_content` to `target`.
///
/// In preview mode the content is emitted through `sink` and `target` is not
/// touched. Otherwise the file is rewritten as new content followed by the
/// previous content, through a temporary file renamed over the target. A
/// missing target is created.
///
/// # Errors
///
/// Returns [`Error::FileAccess`] if the target cannot be read or written.
pub fn update_release_notes(
    preview: bool,
    target: &Path,
    new_content: &str,
    sink: &dyn NotesSink,
) -> Result<()> {
    if preview {
        sink.emit(&format!("{PREVIEW_START}{new_content}{PREVIEW_END}"));
        return Ok(());
    }

    let read_failed = |e: std::io::Error| {
        Error::file_access(
            format!("Failed to read release notes: {}", target.display()),
            target,
            e,
        )
    };
    let (existing, permissions) = match fs::read(target) {
        Ok(bytes) => {
            let permissions = fs::metadata(target).map_err(read_failed)?.permissions();
            (bytes, Some(permissions))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => (Vec::new(), None),
        Err(e) => return Err(read_failed(e)),
    };

    let dir = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| {
        Error::file_access(
            format!("Failed to create directory: {}", dir.display()),
            dir,
            e,
        )
    })?;

    let write_failed = |e: std::io::Error| {
        Error::file_access(
            format!("Failed to write release notes: {}", target.display()),
            target,
            e,
        )
    };
    let mut temp = temp_file_in(dir, permissions).map_err(write_failed)?;
    temp.write_all(new_content.as_bytes()).map_err(write_failed)?;
    temp.write_all(&existing).map_err(write_failed)?;
    temp.persist(target).map_err(|e| write_failed(e.error))?;

    info!(path = %target.display(), bytes = new_content.len(), "Updated release notes");
    sink.emit(UPDATED);
    Ok(())
}

/// Temporary sibling of the notes file carrying the mode the result should have.
///
/// An existing file keeps its permissions; a new one gets the usual
/// umask-filtered mode instead of the owner-only default of temporary files.
fn temp_file_in(dir: &Path, permissions: Option<fs::Permissions>) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    match permissions {
        Some(permissions) => {
            builder.permissions(permissions);
        }
        #[cfg(unix)]
        None => {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        #[cfg(not(unix))]
        None => {}
    }
    builder.tempfile_in(dir)
}

/// Reads the data files, renders the newest section and updates the notes file.
#[derive(Debug, Default)]
pub struct ReleaseNotesUpdater<S> {
    sink: S,
}

impl<S: NotesSink> ReleaseNotesUpdater<S> {
    /// Create an updater reporting through `sink`.
    #[must_use]
    pub const fn new(sink: S) -> Self {
        Self { sink }
    }

    /// The sink receiving user-facing messages.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Load the fetched contributors.
    ///
    /// Configured contributors take the place of the fetched set, so the file
    /// is only read when none are configured. A missing file is an empty set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn fetched_contributors(
        &self,
        request: &NotesRequest,
        contributors_file: &Path,
    ) -> Result<ProjectContributorsSet> {
        if !request.contributors.is_empty() {
            debug!("Contributors configured, skipping contributors file");
            return Ok(ProjectContributorsSet::new());
        }
        if !contributors_file.exists() {
            debug!(path = %contributors_file.display(), "No contributors file");
            return Ok(ProjectContributorsSet::new());
        }
        ProjectContributorsSet::read_file(contributors_file)
    }

    /// Generate the newest content from `files` and preview or prepend it.
    ///
    /// Returns the generated content.
    ///
    /// # Errors
    ///
    /// Returns an error if an input file is unreadable or malformed, a team
    /// entry is malformed, or the notes file cannot be written.
    pub fn update(&self, request: &NotesRequest, files: &NotesFiles, preview: bool) -> Result<String> {
        let data = ReleaseNotesSerializer::read_file(&files.data)?;
        let fetched = self.fetched_contributors(request, &files.contributors)?;
        let content = generate_new_content(request, &data, &fetched)?;
        update_release_notes(preview, &files.notes, &content, &self.sink)?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributors::{Contributor, ProjectContributor};
    use crate::data::Reference;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingSink {
        messages: RefCell<Vec<String>>,
    }

    impl NotesSink for RecordingSink {
        fn emit(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    fn request() -> NotesRequest {
        NotesRequest {
            github_url: "https://github.com".to_string(),
            github_repository: "org/repo".to_string(),
            tag_prefix: "v".to_string(),
            previous_version: Some("1.0.0".to_string()),
            version: "1.1.0".to_string(),
            ..Default::default()
        }
    }

    fn files(temp: &TempDir) -> NotesFiles {
        NotesFiles {
            notes: temp.path().join("docs/release-notes.md"),
            data: temp.path().join("build/release-notes-data.json"),
            contributors: temp.path().join("build/contributors.json"),
        }
    }

    fn write_data(files: &NotesFiles) {
        fs::create_dir_all(files.data.parent().unwrap()).unwrap();
        let data = vec![
            ReleaseNotesData::new("1.1.0", "2024-05-01")
                .with_reference(Reference::new("bug", 12, "Fix NPE").with_author("Alice")),
        ];
        ReleaseNotesSerializer::write_file(&files.data, &data).unwrap();
    }

    #[test]
    fn test_commit_range_link_with_repository_in_url() {
        let link = commit_range_link("https://github.com/org/repo", "", "v", Some("1.0.0"), "1.1.0");
        assert_eq!(link, "https://github.com/org/repo/compare/v1.0.0...v1.1.0");
    }

    #[test]
    fn test_commit_range_link_without_previous_version() {
        assert_eq!(
            commit_range_link("https://github.com/org/repo", "", "v", None, "1.1.0"),
            ""
        );
    }

    #[test]
    fn test_commit_range_link_joins_repository() {
        let link = commit_range_link("https://github.com/", "org/repo", "", Some("1.0"), "1.1");
        assert_eq!(link, "https://github.com/org/repo/compare/1.0...1.1");
    }

    #[test]
    fn test_release_notes_url_normalizes_separators() {
        assert_eq!(
            release_notes_url("https://github.com", "org/repo", "master", "docs\\release-notes.md"),
            "https://github.com/org/repo/blob/master/docs/release-notes.md"
        );
    }

    #[test]
    fn test_generate_new_content_ends_with_two_newlines() {
        let data = vec![ReleaseNotesData::new("1.1.0", "2024-05-01")];
        let content =
            generate_new_content(&request(), &data, &ProjectContributorsSet::new()).unwrap();

        assert!(content.starts_with("#### 1.1.0\n"));
        assert!(content.contains("[commits](https://github.com/org/repo/compare/v1.0.0...v1.1.0)"));
        assert!(content.ends_with("commits.\n\n"));
        assert!(!content.ends_with("\n\n\n"));
    }

    #[test]
    fn test_generate_new_content_links_developers() {
        let request = NotesRequest {
            developers: vec!["Alice:alice1".to_string()],
            ..request()
        };
        let data = vec![ReleaseNotesData::new("1.1.0", "2024-05-01")
            .with_reference(Reference::new("bug", 1, "Fix").with_author("Alice"))];

        let content = generate_new_content(&request, &data, &ProjectContributorsSet::new()).unwrap();

        assert!(content.contains("Thanks to [Alice](https://github.com/alice1)"));
    }

    #[test]
    fn test_generate_new_content_rejects_malformed_developer() {
        let request = NotesRequest {
            developers: vec!["Alice".to_string()],
            ..request()
        };
        let err = generate_new_content(&request, &[], &ProjectContributorsSet::new()).unwrap_err();
        assert!(matches!(err, Error::MalformedTeamMember { .. }));
    }

    #[test]
    fn test_preview_does_not_touch_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("notes.md");
        fs::write(&target, "old notes\n").unwrap();
        let sink = RecordingSink::default();

        update_release_notes(true, &target, "new notes\n\n", &sink).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "old notes\n");
        assert_eq!(
            sink.messages.borrow().as_slice(),
            ["  Preview of release notes update:\n  ----------------\nnew notes\n\n----------------"]
        );
    }

    #[test]
    fn test_update_prepends_and_preserves_existing() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("notes.md");
        fs::write(&target, "#### 1.0.0\n - old\n").unwrap();
        let sink = RecordingSink::default();

        update_release_notes(false, &target, "#### 1.1.0\n - new\n\n", &sink).unwrap();

        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "#### 1.1.0\n - new\n\n#### 1.0.0\n - old\n"
        );
        assert_eq!(
            sink.messages.borrow().as_slice(),
            ["  Successfully updated release notes!"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_update_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("notes.md");
        fs::write(&target, "old\n").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();

        update_release_notes(false, &target, "new\n", &RecordingSink::default()).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn test_update_preserves_non_utf8_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("notes.md");
        fs::write(&target, b"legacy \xff\xfe notes\n").unwrap();

        update_release_notes(false, &target, "#### 1.1.0\n\n", &RecordingSink::default()).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"#### 1.1.0\n\nlegacy \xff\xfe notes\n");
    }

    #[test]
    fn test_update_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("docs/nested/notes.md");

        update_release_notes(false, &target, "content\n\n", &RecordingSink::default()).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "content\n\n");
    }

    #[test]
    fn test_update_reports_unreadable_target() {
        let temp = TempDir::new().unwrap();
        // A directory cannot be read as a file.
        let err = update_release_notes(false, temp.path(), "x", &RecordingSink::default())
            .unwrap_err();
        assert!(matches!(err, Error::FileAccess { .. }));
    }

    #[test]
    fn test_updater_end_to_end() {
        let temp = TempDir::new().unwrap();
        let files = files(&temp);
        write_data(&files);
        fs::create_dir_all(files.notes.parent().unwrap()).unwrap();
        fs::write(&files.notes, "previous\n").unwrap();

        let updater = ReleaseNotesUpdater::new(RecordingSink::default());
        let content = updater.update(&request(), &files, false).unwrap();

        let written = fs::read_to_string(&files.notes).unwrap();
        assert_eq!(written, format!("{content}previous\n"));
        assert!(written.contains("Fix NPE [(#12)](https://github.com/org/repo/issues/12)"));
    }

    #[test]
    fn test_updater_preview_leaves_notes_absent() {
        let temp = TempDir::new().unwrap();
        let files = files(&temp);
        write_data(&files);

        let updater = ReleaseNotesUpdater::new(RecordingSink::default());
        updater.update(&request(), &files, true).unwrap();

        assert!(!files.notes.exists());
        assert_eq!(updater.sink().messages.borrow().len(), 1);
    }

    #[test]
    fn test_fetched_contributors_skipped_when_configured() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("contributors.json");
        fs::write(&path, "not json").unwrap();
        let updater = ReleaseNotesUpdater::new(RecordingSink::default());

        let configured = NotesRequest {
            contributors: vec!["Bob:bob".to_string()],
            ..request()
        };
        assert!(updater.fetched_contributors(&configured, &path).unwrap().is_empty());
        assert!(updater.fetched_contributors(&request(), &path).is_err());
    }

    #[test]
    fn test_fetched_contributors_read_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("contributors.json");
        let set: ProjectContributorsSet = vec![ProjectContributor {
            contributor: Contributor::new("Carol", "carol", "https://github.com/carol"),
            contributions: 4,
        }]
        .into_iter()
        .collect();
        fs::write(&path, set.serialize().unwrap()).unwrap();

        let updater = ReleaseNotesUpdater::new(RecordingSink::default());
        let fetched = updater.fetched_contributors(&request(), &path).unwrap();

        assert_eq!(fetched.len(), 1);
        let missing = updater
            .fetched_contributors(&request(), &temp.path().join("absent.json"))
            .unwrap();
        assert!(missing.is_empty());
    }
}
