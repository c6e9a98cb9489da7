use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::domain::{TagPattern, TypeRegistry};
use crate::error::{ReleaseError, Result};

/// Represents the complete configuration for git-release.
///
/// Contains the commit type registry, output file locations, tag naming and
/// pull-request merge settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Commit types and the scopes each one allows
    #[serde(default = "default_types")]
    pub types: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub merge: MergeConfig,
}

/// Returns the default commit type registry.
fn default_types() -> BTreeMap<String, Vec<String>> {
    let mut types = BTreeMap::new();
    types.insert("feat".to_string(), vec![]);
    types.insert("fix".to_string(), vec![]);
    types.insert("docs".to_string(), vec![]);
    types.insert("ci".to_string(), vec!["scripts".to_string()]);
    types
}

fn default_version_file() -> String {
    "VERSION".to_string()
}

fn default_changelog_file() -> String {
    "CHANGELOG.md".to_string()
}

/// Files written by the bump command, relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_version_file")]
    pub version: String,

    #[serde(default = "default_changelog_file")]
    pub changelog: String,

    /// Manifest whose `[package]` version is patched, when set
    #[serde(default)]
    pub manifest: Option<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            version: default_version_file(),
            changelog: default_changelog_file(),
            manifest: None,
        }
    }
}

/// Tag naming configuration.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct TagsConfig {
    /// Prefix stripped from tag names to obtain versions (e.g. "v")
    #[serde(default)]
    pub prefix: String,
}

fn default_base_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Configuration for the merge command.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MergeConfig {
    #[serde(default = "default_base_branch")]
    pub base: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Push the base branch after a fast-forward merge
    #[serde(default)]
    pub push: bool,

    /// Editor command; falls back to $VISUAL, $EDITOR, then vi
    #[serde(default)]
    pub editor: Option<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            base: default_base_branch(),
            remote: default_remote(),
            push: false,
            editor: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            types: default_types(),
            files: FilesConfig::default(),
            tags: TagsConfig::default(),
            merge: MergeConfig::default(),
        }
    }
}

impl Config {
    /// Commit type registry built from the `[types]` table
    pub fn registry(&self) -> TypeRegistry {
        TypeRegistry::from(&self.types)
    }

    pub fn tag_pattern(&self) -> TagPattern {
        TagPattern::new(self.tags.prefix.clone())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in the given directory
/// 3. `.gitrelease.toml` in user config directory
/// 4. Default configuration if no file found
pub fn load_config(config_path: Option<&Path>, search_dir: &Path) -> Result<Config> {
    let local = search_dir.join("gitrelease.toml");

    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let global = config_dir.join(".gitrelease.toml");
        if global.exists() {
            global
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(config_str).map_err(|e| ReleaseError::config(e.to_string()))?;

    if config.types.is_empty() {
        return Err(ReleaseError::config("[types] must register at least one commit type"));
    }

    Ok(config)
}
