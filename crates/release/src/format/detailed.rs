//! Detailed release notes: summary line and label groups per release.

use super::{
    FormatterContext, NO_IMPROVEMENTS, NO_RELEASE_INFORMATION, ReleaseNotesFormatter, assemble,
    commits_summary, person, reference_line, version_heading,
};
use crate::data::{Reference, ReleaseNotesData};
use indexmap::IndexMap;
use std::fmt::Write;

/// Renders each release with a summary line and references grouped by label.
///
/// Labels appear in label-mapping order under their display names; labels
/// without a mapping follow as their own groups under the raw label.
#[derive(Debug, Clone)]
pub struct DetailedFormatter {
    context: FormatterContext,
}

impl DetailedFormatter {
    /// Create a detailed formatter.
    #[must_use]
    pub const fn new(context: FormatterContext) -> Self {
        Self { context }
    }

    fn format_release(&self, entry: &ReleaseNotesData, newest: bool) -> String {
        let ctx = &self.context;
        let mut output = version_heading(
            "####",
            &entry.version,
            newest && ctx.emphasize_latest_version,
        );
        let _ = write!(output, "\n - {}", self.summary(entry, newest));

        if entry.references.is_empty() {
            let _ = write!(output, "\n - {NO_IMPROVEMENTS}");
            return output;
        }

        for (display, references) in self.group_by_label(&entry.references) {
            let _ = write!(output, "\n - {display}:");
            for reference in references {
                let _ = write!(
                    output,
                    "\n   - {}",
                    reference_line(reference, ctx.repository_url.as_deref())
                );
            }
        }
        output
    }

    /// `date - [N commits](link) by authors - published to badge`
    fn summary(&self, entry: &ReleaseNotesData, newest: bool) -> String {
        let ctx = &self.context;
        let mut parts = vec![entry.date.clone()];

        let link = if newest { ctx.commit_range_link.as_str() } else { "" };
        let authors = entry
            .authors
            .iter()
            .map(|a| person(&a.name, &ctx.contributors))
            .collect::<Vec<_>>()
            .join(", ");
        match (commits_summary(entry, link), authors.is_empty()) {
            (Some(commits), true) => parts.push(commits),
            (Some(commits), false) => parts.push(format!("{commits} by {authors}")),
            (None, false) => parts.push(format!("by {authors}")),
            (None, true) => {}
        }

        if !ctx.publication_repository.is_empty() {
            let label = if ctx.publication_plugin_name.is_empty() {
                "repository"
            } else {
                ctx.publication_plugin_name.as_str()
            };
            let badge =
                ctx.badges
                    .badge(label, &entry.version, "green", &ctx.publication_repository);
            parts.push(format!("published to {badge}"));
        }

        parts.join(" - ")
    }

    fn group_by_label<'a>(&'a self, references: &'a [Reference]) -> IndexMap<&'a str, Vec<&'a Reference>> {
        let mapping = &self.context.label_mapping;
        let mut groups: IndexMap<&str, Vec<&Reference>> = IndexMap::new();

        for (label, display) in mapping {
            let matching: Vec<&Reference> =
                references.iter().filter(|r| &r.label == label).collect();
            if !matching.is_empty() {
                groups.insert(display.as_str(), matching);
            }
        }
        for reference in references.iter().filter(|r| !mapping.contains_key(&r.label)) {
            groups.entry(reference.label.as_str()).or_default().push(reference);
        }
        groups
    }
}

impl ReleaseNotesFormatter for DetailedFormatter {
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

    fn context() -> FormatterContext {
        let mut label_mapping = IndexMap::new();
        label_mapping.insert("enhancement".to_string(), "Enhancements".to_string());
        label_mapping.insert("bug".to_string(), "Bug fixes".to_string());

        let mut contributors = ContributorMap::new();
        contributors.insert(
            "Alice".to_string(),
            Contributor::new("Alice", "alice1", "https://github.com/alice1"),
        );

        FormatterContext {
            header: "# Release notes\n\n".to_string(),
            label_mapping,
            commit_range_link: "https://github.com/org/repo/compare/v1.0.0...v1.1.0".to_string(),
            publication_repository: "https://bintray.com/org/maven/lib".to_string(),
            repository_url: Some("https://github.com/org/repo".to_string()),
            contributors,
            emphasize_latest_version: false,
            publication_plugin_name: "Bintray".to_string(),
            ..Default::default()
        }
    }

    fn release() -> ReleaseNotesData {
        ReleaseNotesData::new("1.1.0", "2024-05-01")
            .with_reference(Reference::new("bug", 12, "Fix NPE"))
            .with_reference(Reference::new("docs", 13, "Document config"))
            .with_reference(Reference::new("enhancement", 14, "Faster builds"))
            .with_author("Alice", 2)
            .with_author("Bob", 1)
    }

    #[test]
    fn test_detailed_full_release() {
        let notes = DetailedFormatter::new(context()).format(&[release()]);

        let expected = "# Release notes\n\n\
#### 1.1.0\n \
- 2024-05-01 - [3 commits](https://github.com/org/repo/compare/v1.0.0...v1.1.0) by [Alice](https://github.com/alice1), Bob - published to [![Bintray](https://img.shields.io/badge/Bintray-1.1.0-green.svg)](https://bintray.com/org/maven/lib)\n \
- Enhancements:\n   \
- Faster builds [(#14)](https://github.com/org/repo/issues/14)\n \
- Bug fixes:\n   \
- Fix NPE [(#12)](https://github.com/org/repo/issues/12)\n \
- docs:\n   \
- Document config [(#13)](https://github.com/org/repo/issues/13)\n\n\
#### Contributors\n\n\
[![contributors](https://img.shields.io/badge/contributors-2-blue.svg)](https://github.com/org/repo/graphs/contributors)\n\n\
Thanks to [Alice](https://github.com/alice1), Bob";

        assert_eq!(notes, expected);
    }

    #[test]
    fn test_detailed_emphasizes_only_newest() {
        let ctx = FormatterContext {
            emphasize_latest_version: true,
            ..context()
        };
        let data = vec![release(), ReleaseNotesData::new("1.0.0", "2024-04-01")];
        let notes = DetailedFormatter::new(ctx).format(&data);

        assert!(notes.contains("#### **1.1.0**\n"));
        assert!(notes.contains("#### 1.0.0\n"));
    }

    #[test]
    fn test_detailed_commit_link_only_on_newest() {
        let data = vec![
            ReleaseNotesData::new("1.1.0", "2024-05-01"),
            ReleaseNotesData::new("1.0.0", "2024-04-01"),
        ];
        let notes = DetailedFormatter::new(context()).format(&data);

        assert_eq!(notes.matches("/compare/").count(), 1);
        assert!(notes.contains(" - 2024-04-01 - published to "));
    }

    #[test]
    fn test_detailed_without_references() {
        let data = vec![ReleaseNotesData::new("1.0.0", "2024-04-01")];
        let notes = DetailedFormatter::new(FormatterContext::default()).format(&data);
        assert_eq!(notes, format!("#### 1.0.0\n - 2024-04-01\n - {NO_IMPROVEMENTS}"));
    }

    #[test]
    fn test_detailed_empty_data() {
        let notes = DetailedFormatter::new(context()).format(&[]);
        assert_eq!(notes, "# Release notes\n\nNo release information.");
    }

    #[test]
    fn test_detailed_unmapped_labels_keep_first_appearance_order() {
        let data = vec![
            ReleaseNotesData::new("2.0.0", "2024-06-01")
                .with_reference(Reference::new("refactoring", 1, "Split module"))
                .with_reference(Reference::new("docs", 2, "Guide"))
                .with_reference(Reference::new("refactoring", 3, "Rename types")),
        ];
        let notes = DetailedFormatter::new(FormatterContext::default()).format(&data);

        let refactoring = notes.find(" - refactoring:").unwrap();
        let docs = notes.find(" - docs:").unwrap();
        assert!(refactoring < docs);
        assert!(notes.contains(" - refactoring:\n   - Split module (#1)\n   - Rename types (#3)"));
    }
}
