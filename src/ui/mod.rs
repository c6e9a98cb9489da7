//! User interface module - terminal output.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Writing to the terminal
//!
//! Everything except the final result goes to stderr so that stdout only
//! carries machine-readable output (the resolved version).

pub mod formatter;

use crate::analyzer::History;
use crate::boundary::BoundaryWarning;
use crate::domain::{Version, VersionBump};

pub fn display_error(message: &str) {
    eprintln!("{}", formatter::format_error(message));
}

pub fn display_success(message: &str) {
    eprintln!("{}", formatter::format_success(message));
}

pub fn display_status(message: &str) {
    eprintln!("{}", formatter::format_status(message));
}

pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{}", formatter::format_boundary_warning(warning));
}

pub fn display_release_summary(
    history: &History,
    current: &Version,
    next: &Version,
    bump: VersionBump,
) {
    eprintln!(
        "{}",
        formatter::format_release_summary(history, current, next, bump)
    );
}
