//! Keep-a-Changelog rendering of release contexts.

use std::fmt::Write;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::domain::{ChangeRecord, ReleaseContext};

pub const PREAMBLE: &str = "# Changelog\n\n\
All notable changes to this project will be documented in this file.\n\n\
The format is based on [Keep a Changelog](https://keepachangelog.com/en/1.0.0/), and this project\n\
adheres to [Semantic Versioning](https://semver.org/spec/v2.0.0.html).";

/// Render a changelog document.
///
/// `contexts` are ordered oldest first and rendered newest first. Sections
/// keep the order in which their group was first seen.
#[instrument(skip_all, fields(releases = contexts.len()))]
pub fn render<F>(contexts: &[ReleaseContext], mut date_of: F) -> String
where
    F: FnMut(&ReleaseContext) -> NaiveDate,
{
    let mut output = String::from(PREAMBLE);

    for context in contexts.iter().rev() {
        let date = date_of(context);
        let _ = write!(
            output,
            "\n\n## [{}] - {}",
            context.label(),
            date.format("%Y-%m-%d")
        );

        for (group, records) in &context.groups {
            let _ = write!(output, "\n\n### {}\n", group);
            for record in records {
                output.push_str("\n- ");
                output.push_str(&render_entry(record));
            }
        }
    }

    debug!(output_len = output.len(), "changelog rendered");
    output
}

/// Single bullet text (without the leading "- ")
pub fn render_entry(record: &ChangeRecord) -> String {
    let mut line = String::new();

    if let Some(scope) = &record.scope {
        let _ = write!(line, "({}) ", scope);
    }
    line.push_str(&record.description);
    if let Some(long) = &record.long_description {
        line.push(' ');
        line.push_str(long);
    }
    if record.is_breaking_change {
        line.push_str(" **BREAKING CHANGE**");
        if let Some(desc) = &record.breaking_change_description {
            line.push_str(": ");
            line.push_str(desc);
        }
    }

    line
}
