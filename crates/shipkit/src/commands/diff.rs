//! `shipkit diff` - show the differences between two files.

use super::CommandOutput;
use miette::{IntoDiagnostic, WrapErr};
use shipkit_release::FileDiffGenerator;
use std::path::Path;

fn read(path: &Path) -> miette::Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read {}", path.display()))
}

/// Execute the `diff` command.
///
/// # Errors
///
/// Returns an error if either file cannot be read.
pub fn execute(old: &Path, new: &Path, context: usize) -> miette::Result<CommandOutput> {
    let previous = read(old)?;
    let current = read(new)?;
    let diff = FileDiffGenerator::new().generate_diff_with_context(&previous, &current, context);
    Ok(CommandOutput::success(diff))
}
