//! Concise release notes: one heading per release and a flat reference list.

use super::{
    FormatterContext, NO_RELEASE_INFORMATION, ReleaseNotesFormatter, assemble, commits_summary,
    reference_line, version_heading,
};
use crate::data::ReleaseNotesData;
use std::fmt::Write;

/// Renders each release as a heading followed by one line per reference.
///
/// Mapped labels prefix the line as `[Display name]`; unmapped labels are dropped.
#[derive(Debug, Clone)]
pub struct ConciseFormatter {
    context: FormatterContext,
}

impl ConciseFormatter {
    /// Create a concise formatter.
    #[must_use]
    pub const fn new(context: FormatterContext) -> Self {
        Self { context }
    }

    fn format_release(&self, entry: &ReleaseNotesData, newest: bool) -> String {
        let ctx = &self.context;
        let mut output = version_heading("###", &entry.version, newest && ctx.emphasize_latest_version);
        let _ = write!(output, " - {}", entry.date);
        let link = if newest { ctx.commit_range_link.as_str() } else { "" };
        if let Some(commits) = commits_summary(entry, link) {
            let _ = write!(output, " - {commits}");
        }

        if entry.references.is_empty() {
            output.push_str("\n - No notable improvements.");
            return output;
        }

        for reference in &entry.references {
            let line = reference_line(reference, ctx.repository_url.as_deref());
            match ctx.label_mapping.get(&reference.label) {
                Some(display) => {
                    let _ = write!(output, "\n - [{display}] {line}");
                }
                None => {
                    let _ = write!(output, "\n - {line}");
                }
            }
        }
        output
    }
}

impl ReleaseNotesFormatter for ConciseFormatter {
    fn format(&self, data: &[ReleaseNotesData]) -> String {
        if data.is_empty() {
            return format!("{}{NO_RELEASE_INFORMATION}", self.context.header);
        }
        let sections: Vec<String> = data
            .iter()
            .enumerate()
            .map(|(index, entry)| self.format_release(entry, index == 0))
            .collect();
        assemble(&self.context, &sections, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributors::{Contributor, ContributorMap};
    use crate::data::Reference;
    use indexmap::IndexMap;

    fn context() -> FormatterContext {
        let mut label_mapping = IndexMap::new();
        label_mapping.insert("bug".to_string(), "Bug fixes".to_string());

        FormatterContext {
            label_mapping,
            commit_range_link: "https://github.com/org/repo/compare/v1.0.0...v1.1.0".to_string(),
            repository_url: Some("https://github.com/org/repo".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_concise_release() {
        let data = vec![
            ReleaseNotesData::new("1.1.0", "2024-05-01")
                .with_reference(Reference::new("bug", 12, "Fix NPE"))
                .with_reference(Reference::new("internal", 13, "Bump deps").pull_request()),
        ];

        let notes = ConciseFormatter::new(context()).format(&data);

        assert_eq!(
            notes,
            "### 1.1.0 - 2024-05-01 - [commits](https://github.com/org/repo/compare/v1.0.0...v1.1.0)\n \
- [Bug fixes] Fix NPE [(#12)](https://github.com/org/repo/issues/12)\n \
- Bump deps [(#13)](https://github.com/org/repo/pull/13)"
        );
    }

    #[test]
    fn test_concise_multiple_releases_newest_first() {
        let ctx = FormatterContext {
            emphasize_latest_version: true,
            ..context()
        };
        let data = vec![
            ReleaseNotesData::new("1.1.0", "2024-05-01"),
            ReleaseNotesData::new("1.0.0", "2024-04-01"),
        ];

        let notes = ConciseFormatter::new(ctx).format(&data);

        assert!(notes.starts_with("### **1.1.0** - 2024-05-01"));
        assert!(notes.contains("\n\n### 1.0.0 - 2024-04-01\n - No notable improvements."));
    }

    #[test]
    fn test_concise_acknowledgments() {
        let mut contributors = ContributorMap::new();
        contributors.insert(
            "Alice".to_string(),
            Contributor::new("Alice", "alice1", "https://github.com/alice1"),
        );
        let ctx = FormatterContext {
            contributors,
            ..context()
        };
        let data = vec![
            ReleaseNotesData::new("1.1.0", "2024-05-01")
                .with_reference(Reference::new("bug", 12, "Fix NPE").with_author("Alice")),
        ];

        let notes = ConciseFormatter::new(ctx).format(&data);

        assert!(notes.ends_with("Thanks to [Alice](https://github.com/alice1)"));
    }

    #[test]
    fn test_concise_empty_data() {
        let ctx = FormatterContext {
            header: "Header\n".to_string(),
            ..Default::default()
        };
        assert_eq!(
            ConciseFormatter::new(ctx).format(&[]),
            "Header\nNo release information."
        );
    }
}
