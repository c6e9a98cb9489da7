//! Pure formatting functions for UI output.
//!
//! Everything here builds strings; printing happens in the parent module.

use console::style;

use crate::analyzer::History;
use crate::boundary::BoundaryWarning;
use crate::domain::{Version, VersionBump};

pub fn format_error(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

pub fn format_success(message: &str) -> String {
    format!("{} {}", style("✓").green().bold(), message)
}

pub fn format_status(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

pub fn format_boundary_warning(warning: &BoundaryWarning) -> String {
    format!("{} {}", style("⚠ WARNING:").yellow(), warning)
}

/// Summary of the release about to be cut.
///
/// Lists how many changes each release section holds and the resulting
/// version transition.
pub fn format_release_summary(
    history: &History,
    current: &Version,
    next: &Version,
    bump: VersionBump,
) -> String {
    let mut lines = Vec::new();

    match history.unreleased() {
        Some(head) if !head.is_empty() => {
            lines.push(format!(
                "{}",
                style(format!("{} unreleased changes:", head.len())).bold()
            ));
            for (group, records) in &head.groups {
                lines.push(format!("  {:<8} {}", group.label(), records.len()));
            }
        }
        _ => lines.push(format!("{}", style("No unreleased changes").bold())),
    }

    lines.push(format!(
        "  {} -> {} ({})",
        style(current).red(),
        style(next).green(),
        bump
    ));

    lines.join("\n")
}
