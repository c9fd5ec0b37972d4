pub mod compare;
pub mod diff;
pub mod notes;

use crate::cli::NotesOptions;
use std::path::PathBuf;

/// A parsed command ready to execute.
#[derive(Debug)]
pub enum Command {
    /// Update or preview the release notes; `preview` overrides the configuration.
    Notes {
        preview: Option<bool>,
        options: NotesOptions,
    },
    Compare {
        previous: PathBuf,
        current: PathBuf,
        previous_version: String,
        version: String,
        context: usize,
    },
    Diff {
        old: PathBuf,
        new: PathBuf,
        context: usize,
    },
}

impl Command {
    /// Name used in the command span.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Notes { .. } => "notes",
            Self::Compare { .. } => "compare",
            Self::Diff { .. } => "diff",
        }
    }
}

/// What a command prints and whether it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    pub const fn success(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }

    pub const fn failure(text: String) -> Self {
        Self {
            text,
            success: false,
        }
    }
}
