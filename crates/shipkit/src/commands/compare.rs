//! `shipkit compare` - compare a build against the previous publication.

use super::CommandOutput;
use shipkit_release::{ArtifactSet, FileDiffGenerator, PublicationComparator};
use std::path::Path;
use tracing::info;

/// Execute the `compare` command.
///
/// The output fails when the publications differ, so that a release can be
/// skipped when nothing changed.
///
/// # Errors
///
/// Returns an error if either publication directory cannot be loaded.
pub fn execute(
    previous: &Path,
    current: &Path,
    previous_version: &str,
    version: &str,
    context: usize,
) -> miette::Result<CommandOutput> {
    let previous_set = ArtifactSet::load_dir(previous, previous_version)?;
    let current_set = ArtifactSet::load_dir(current, version)?;
    info!(
        previous = previous_set.len(),
        current = current_set.len(),
        "Loaded publications"
    );

    let comparator = PublicationComparator::new(FileDiffGenerator::new()).with_context(context);
    let report = comparator.compare_sets(&previous_set, &current_set);

    if report.has_differences() {
        Ok(CommandOutput::failure(report.to_string()))
    } else {
        Ok(CommandOutput::success(report.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn publication(root: &Path, dir: &str, version: &str, body: &str) -> std::path::PathBuf {
        let path = root.join(dir);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(
            path.join(format!("lib-{version}.pom")),
            format!("<version>{version}</version>\n{body}"),
        )
        .unwrap();
        path
    }

    #[test]
    fn test_same_content_across_versions() {
        let temp = TempDir::new().unwrap();
        let previous = publication(temp.path(), "prev", "1.0.0", "<dep>a</dep>");
        let current = publication(temp.path(), "cur", "1.1.0", "<dep>a</dep>");

        let output = execute(&previous, &current, "1.0.0", "1.1.0", 0).unwrap();

        assert!(output.success);
        assert_eq!(output.text, "Publications are identical.");
    }

    #[test]
    fn test_changed_content_fails() {
        let temp = TempDir::new().unwrap();
        let previous = publication(temp.path(), "prev", "1.0.0", "<dep>a</dep>");
        let current = publication(temp.path(), "cur", "1.1.0", "<dep>b</dep>");

        let output = execute(&previous, &current, "1.0.0", "1.1.0", 0).unwrap();

        assert!(!output.success);
        assert!(output.text.starts_with("lib-{version}.pom differs:"));
        assert!(output.text.contains("    -<dep>a</dep>"));
        assert!(output.text.contains("    +<dep>b</dep>"));
    }
}
