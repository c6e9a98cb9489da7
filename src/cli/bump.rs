//! `bump` workflow: classify history, pick the next version, write files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::analyzer::{History, HistoryWalker};
use crate::boundary::BoundaryWarning;
use crate::changelog;
use crate::config::Config;
use crate::domain::{next_version, Version, VersionBump};
use crate::error::Result;
use crate::git::Repository;
use crate::manifest;

/// Arguments for the bump workflow, decoupled from clap
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BumpArgs {
    /// Compute and print the version without writing any file
    pub dry_run: bool,
}

/// Result of a bump run
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    pub previous: Version,
    pub version: Version,
    pub bump: VersionBump,
    /// Classified history with the HEAD release labelled as `version`
    pub history: History,
    pub warnings: Vec<BoundaryWarning>,
    /// Files written, empty on a dry run
    pub written: Vec<PathBuf>,
}

/// Run the bump workflow.
///
/// `today` dates the HEAD release in the changelog. Nothing is written
/// unless the whole pipeline succeeded.
#[instrument(skip_all, fields(dry_run = args.dry_run))]
pub fn run_bump<R: Repository>(
    repo: &R,
    config: &Config,
    args: &BumpArgs,
    today: NaiveDate,
) -> Result<BumpOutcome> {
    let registry = config.registry();
    let pattern = config.tag_pattern();
    let root = repo.workdir()?;

    let mut history = HistoryWalker::new(repo, &registry, &pattern).walk()?;
    let mut warnings = std::mem::take(&mut history.warnings);

    let version_path = root.join(&config.files.version);
    let current_text =
        current_version_text(&version_path, &config.files.version, &history, &mut warnings)?;
    let previous = Version::parse(&current_text)?;

    let bump = history
        .unreleased()
        .map(|head| head.bump())
        .unwrap_or(VersionBump::Patch);
    let version = next_version(bump, &current_text)?;
    debug!(%previous, %version, %bump, "resolved next version");

    if let Some(head) = history.unreleased_mut() {
        head.version = Some(version.to_string());
    }

    let mut tag_dates = HashMap::new();
    for tag in history.releases.iter().filter_map(|ctx| ctx.tag.as_deref()) {
        tag_dates.insert(tag.to_string(), repo.tag_date(tag)?);
    }
    let document = changelog::render(&history.releases, |ctx| {
        ctx.tag
            .as_ref()
            .and_then(|tag| tag_dates.get(tag))
            .copied()
            .unwrap_or(today)
    });

    // Stage every file before touching the disk.
    let mut staged = vec![(version_path, version.to_string())];
    if let Some(manifest_file) = &config.files.manifest {
        let manifest_path = root.join(manifest_file);
        let patched = manifest::patched_manifest(&manifest_path, &previous, &version)?;
        staged.push((manifest_path, patched));
    }
    staged.push((root.join(&config.files.changelog), document));

    let mut written = Vec::new();
    if !args.dry_run {
        for (path, content) in staged {
            fs::write(&path, content)?;
            info!(path = %path.display(), "wrote file");
            written.push(path);
        }
    }

    Ok(BumpOutcome {
        previous,
        version,
        bump,
        history,
        warnings,
        written,
    })
}

/// Current version: the version file, else the latest tag, else 0.0.0
fn current_version_text(
    path: &Path,
    display_name: &str,
    history: &History,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<String> {
    if path.exists() {
        return Ok(fs::read_to_string(path)?.trim().to_string());
    }

    let fallback = history
        .latest_release()
        .map(|release| release.label().to_string())
        .unwrap_or_else(|| "0.0.0".to_string());

    warnings.push(BoundaryWarning::MissingVersionFile {
        path: display_name.to_string(),
        fallback: fallback.clone(),
    });
    Ok(fallback)
}
