use std::fs;
use std::path::Path;

use regex::{Captures, Regex};
use tracing::debug;

use crate::domain::Version;
use crate::error::{ReleaseError, Result};

/// Replace the `version = "<current>"` line of the `[package]` table.
///
/// Only simple `key = value` lines may sit between the table header and the
/// version key. Returns `None` when no such field holds `current`.
pub fn patch_version_field(
    content: &str,
    current: &Version,
    next: &Version,
) -> Result<Option<String>> {
    let pattern = format!(
        r#"(?m)^(\[package\]\r?\n(?:[\w-]+ = .*\r?\n)*?version = "){}""#,
        regex::escape(&current.to_string())
    );
    let re = Regex::new(&pattern)
        .map_err(|e| ReleaseError::manifest(format!("Invalid version field pattern: {}", e)))?;

    if !re.is_match(content) {
        return Ok(None);
    }

    let patched = re.replacen(content, 1, |caps: &Captures| format!("{}{}\"", &caps[1], next));
    Ok(Some(patched.into_owned()))
}

/// Read a manifest and return its content with the package version bumped.
///
/// Nothing is written; fails with `Manifest` when the field is missing.
pub fn patched_manifest(path: &Path, current: &Version, next: &Version) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReleaseError::manifest(format!("Cannot read {}: {}", path.display(), e))
    })?;

    let patched = patch_version_field(&content, current, next)?.ok_or_else(|| {
        ReleaseError::manifest(format!("Failed to find version field in {}", path.display()))
    })?;

    debug!(path = %path.display(), version = %next, "patched manifest");
    Ok(patched)
}
