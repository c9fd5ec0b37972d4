//! Comparison of a fresh build against the previously published version.

use crate::artifact::ArtifactSet;
use crate::diff::FileDiffGenerator;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info};

/// Diffs artifacts with matching names.
#[derive(Debug, Clone, Default)]
pub struct PublicationComparator {
    diff: FileDiffGenerator,
    context: usize,
}

impl PublicationComparator {
    /// Create a comparator using `diff` for pairwise diffs.
    #[must_use]
    pub fn new(diff: FileDiffGenerator) -> Self {
        Self { diff, context: 0 }
    }

    /// Show `context` unchanged lines around each change.
    #[must_use]
    pub fn with_context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }

    /// Diff every artifact present on both sides.
    ///
    /// Only artifacts whose diff is non-empty appear in the result.
    #[must_use]
    pub fn compare(
        &self,
        previous: &BTreeMap<String, String>,
        current: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        previous
            .iter()
            .filter_map(|(name, before)| {
                let after = current.get(name)?;
                let diff = self.diff.generate_diff_with_context(before, after, self.context);
                debug!(artifact = %name, changed = !diff.is_empty(), "Compared artifact");
                (!diff.is_empty()).then(|| (name.clone(), diff))
            })
            .collect()
    }

    /// Compare two artifact sets, including artifacts present on one side only.
    #[must_use]
    pub fn compare_sets(&self, previous: &ArtifactSet, current: &ArtifactSet) -> ComparisonReport {
        let diffs = self.compare(previous.as_map(), current.as_map());
        let only_in_previous = previous
            .names()
            .filter(|name| current.get(name).is_none())
            .map(str::to_string)
            .collect();
        let only_in_current = current
            .names()
            .filter(|name| previous.get(name).is_none())
            .map(str::to_string)
            .collect();

        let report = ComparisonReport {
            diffs,
            only_in_previous,
            only_in_current,
        };
        info!(
            differences = report.has_differences(),
            changed = report.diffs.len(),
            "Compared publications"
        );
        report
    }
}

/// Result of comparing two publications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonReport {
    /// Non-empty diffs by artifact name.
    pub diffs: BTreeMap<String, String>,
    /// Artifacts missing from the current build.
    pub only_in_previous: Vec<String>,
    /// Artifacts new in the current build.
    pub only_in_current: Vec<String>,
}

impl ComparisonReport {
    /// Whether the publications differ in any way.
    #[must_use]
    pub fn has_differences(&self) -> bool {
        !self.diffs.is_empty() || !self.only_in_previous.is_empty() || !self.only_in_current.is_empty()
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_differences() {
            return write!(f, "Publications are identical.");
        }
        let mut first = true;
        let mut separate = |f: &mut fmt::Formatter<'_>| -> fmt::Result {
            if !std::mem::take(&mut first) {
                writeln!(f)?;
            }
            Ok(())
        };

        for (name, diff) in &self.diffs {
            separate(f)?;
            write!(f, "{name} differs:\n{diff}")?;
        }
        for name in &self.only_in_previous {
            separate(f)?;
            write!(f, "{name} is missing from the current publication")?;
        }
        for name in &self.only_in_current {
            separate(f)?;
            write!(f, "{name} is new in the current publication")?;
        }
        Ok(())
    }
}
