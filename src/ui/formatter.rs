//! Pure formatting functions for terminal output.
//!
//! Functions here only print; they never read input and never fail.

use console::style;

use crate::calculation::{BaseVersion, ExcludedCandidate};
use crate::output::VersionVariables;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Show which base version was selected and where it came from.
///
/// # Arguments
/// * `base_version` - The winning candidate
/// * `branch` - Branch whose configuration produced it
pub fn display_base_version(base_version: &BaseVersion, branch: &str) {
    eprintln!(
        "{} {} {}",
        style("Base version:").bold(),
        style(&base_version.semantic_version).cyan(),
        style(format!("({}, via '{}')", base_version.source, branch)).dim()
    );
}

/// List candidates dropped by filters, with the reason for each.
pub fn display_excluded(excluded: &[ExcludedCandidate]) {
    if excluded.is_empty() {
        return;
    }

    eprintln!("{}", style("Excluded candidates:").bold());
    for entry in excluded {
        eprintln!(
            "  - {} {}",
            entry.candidate.semantic_version,
            style(format!("[{}]", entry.reason)).dim()
        );
    }
}

/// Aligned `Name: value` table of every variable.
pub fn format_variable_table(variables: &VersionVariables) -> Vec<String> {
    let width = variables.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    variables
        .iter()
        .map(|(name, value)| format!("{:<width$} : {}", name, value, width = width))
        .collect()
}
