//! `shipkit notes` - update or preview the release notes.

use super::CommandOutput;
use crate::cli::NotesOptions;
use shipkit_release::{
    ConsoleSink, Error, ReleaseNotesSerializer, ReleaseNotesUpdater, ShipkitConfig,
};
use std::path::Path;
use tracing::{debug, info};

/// Directory the configured relative paths are resolved against.
fn project_root(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Apply command line overrides to the loaded configuration.
fn apply_overrides(config: &mut ShipkitConfig, preview: Option<bool>, options: &NotesOptions) {
    let notes = &mut config.release_notes;
    if let Some(preview) = preview {
        notes.preview_mode = preview;
    }
    if let Some(version) = &options.version {
        notes.version = Some(version.clone());
    }
    if let Some(previous) = &options.previous_version {
        notes.previous_version = Some(previous.clone());
    }
    if let Some(style) = options.style {
        notes.style = style;
    }
}

/// Execute `notes update` / `notes preview`.
///
/// # Errors
///
/// Returns an error if the configuration or data files are invalid, the
/// version cannot be determined, or the notes file cannot be written.
pub fn execute(
    config_path: &Path,
    preview: Option<bool>,
    options: &NotesOptions,
) -> miette::Result<CommandOutput> {
    let mut config = ShipkitConfig::load_or_default(config_path)?;
    apply_overrides(&mut config, preview, options);
    config.validate()?;

    let files = config.notes_files(project_root(config_path));
    let version = match &config.release_notes.version {
        Some(version) => version.clone(),
        None => {
            let data = ReleaseNotesSerializer::read_file(&files.data)?;
            data.first().map(|newest| newest.version.clone()).ok_or_else(|| {
                Error::config(
                    "Cannot determine the version being released",
                    "Pass --version or add a release to the release notes data file",
                )
            })?
        }
    };
    debug!(version = %version, style = %config.release_notes.style, "Resolved release");

    let request = config.notes_request(version);
    let preview = config.release_notes.preview_mode;
    ReleaseNotesUpdater::new(ConsoleSink).update(&request, &files, preview)?;

    if !preview {
        info!(url = %config.release_notes_url(), "Release notes published");
    }
    Ok(CommandOutput::success(String::new()))
}
