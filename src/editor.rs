//! Interactive editing of squash commit messages.

use std::env;
use std::fs;
use std::io::Write;

use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::command::CommandLine;
use crate::error::{ReleaseError, Result};

/// Lets the user edit a message template and returns the edited text
pub trait MessageEditor {
    fn edit(&self, template: &str) -> Result<String>;
}

/// Runs the user's editor on a temporary file.
///
/// The command may carry its own arguments (`code --wait`); it is split with
/// [CommandLine] and the file path is appended as the last argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellEditor {
    command: String,
}

impl ShellEditor {
    pub fn new(command: impl Into<String>) -> Self {
        ShellEditor {
            command: command.into(),
        }
    }

    /// Pick the editor: the configured command, then `$VISUAL`, then
    /// `$EDITOR`, then `vi`.
    pub fn from_config(configured: Option<&str>) -> Self {
        let command = configured
            .map(str::to_string)
            .or_else(|| non_empty_var("VISUAL"))
            .or_else(|| non_empty_var("EDITOR"))
            .unwrap_or_else(|| "vi".to_string());
        ShellEditor::new(command)
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl MessageEditor for ShellEditor {
    #[instrument(skip(self, template), fields(editor = %self.command))]
    fn edit(&self, template: &str) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("SQUASH_MSG")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(template.as_bytes())?;
        file.flush()?;

        run_editor(&self.command, &file)?;

        let edited = fs::read_to_string(file.path())?;
        debug!(len = edited.len(), "editor returned");
        Ok(edited)
    }
}

fn run_editor(command: &str, file: &NamedTempFile) -> Result<()> {
    let status = CommandLine::parse(command)?
        .to_command()
        .arg(file.path())
        .status()
        .map_err(|e| ReleaseError::editor(format!("Failed to launch '{}': {}", command, e)))?;

    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(ReleaseError::editor(format!(
            "'{}' exited with code {}",
            command, code
        ))),
        None => Err(ReleaseError::Terminated(command.to_string())),
    }
}

/// Drop `#` comment lines and trailing blank lines from an edited message
pub fn strip_comments(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect();
    lines.join("\n").trim_end().to_string()
}
