//! Unified diff between two file contents.
//!
//! The output is the hunk body of a unified diff without the `---`/`+++`
//! file header, every line indented by four spaces. Identical inputs produce
//! an empty string.

use similar::{Algorithm, ChangeTag, TextDiff};

const INDENTATION: &str = "    ";

/// Platform line separator.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Platform line separator.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Generates `git diff` style differences between file contents.
#[derive(Debug, Clone)]
pub struct FileDiffGenerator {
    line_separator: String,
}

impl Default for FileDiffGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl FileDiffGenerator {
    /// Create a generator splitting on the platform line separator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_line_separator(LINE_SEPARATOR)
    }

    /// Create a generator splitting on `separator`.
    #[must_use]
    pub fn with_line_separator(separator: impl Into<String>) -> Self {
        Self {
            line_separator: separator.into(),
        }
    }

    /// The separator used to split input and join output.
    #[must_use]
    pub fn line_separator(&self) -> &str {
        &self.line_separator
    }

    /// Diff without context lines.
    #[must_use]
    pub fn generate_diff(&self, previous: &str, current: &str) -> String {
        self.generate_diff_with_context(previous, current, 0)
    }

    /// Diff with `context` unchanged lines around each change.
    ///
    /// Returns an empty string when the contents have no differences.
    #[must_use]
    pub fn generate_diff_with_context(&self, previous: &str, current: &str, context: usize) -> String {
        let previous_lines = self.break_into_lines(previous);
        let current_lines = self.break_into_lines(current);
        // Any radius past the longer input is equivalent and keeps grouping from overflowing.
        let context = context.min(previous_lines.len().max(current_lines.len()));

        let diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_slices(&previous_lines, &current_lines);
        let mut unified = diff.unified_diff();
        unified.context_radius(context);

        let mut lines = Vec::new();
        for hunk in unified.iter_hunks() {
            lines.push(hunk.header().to_string());
            lines.extend(hunk.iter_changes().map(|change| {
                let sign = match change.tag() {
                    ChangeTag::Equal => ' ',
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                };
                format!("{sign}{}", change.value())
            }));
        }
        if lines.is_empty() {
            return String::new();
        }

        let separator = format!("{}{INDENTATION}", self.line_separator);
        format!("{INDENTATION}{}", lines.join(&separator))
    }

    /// Split on the separator, dropping trailing empty segments.
    fn break_into_lines<'a>(&self, content: &'a str) -> Vec<&'a str> {
        let mut lines: Vec<&str> = if self.line_separator.is_empty() {
            vec![content]
        } else {
            content.split(self.line_separator.as_str()).collect()
        };
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines
    }
}
