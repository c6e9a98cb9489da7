//! Splitting user-supplied command strings such as `code --wait` into a
//! program and its arguments, without going through a shell.
//!
//! Rules:
//! - unquoted ASCII whitespace separates items
//! - `'...'` and `"..."` group text, quotes may join adjacent text
//!   (`a"b c"d` is the single item `ab cd`)
//! - inside double quotes `\"` and `\\` are the only escapes; any other
//!   character after `\` is an error
//! - backslashes outside double quotes are literal

use std::process::Command;

use crate::error::{ReleaseError, Result};

/// A parsed command string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn parse(command: &str) -> Result<Self> {
        let mut items: Vec<String> = Vec::new();
        let mut current: Option<String> = None;
        let mut quote: Option<char> = None;
        let mut escaping = false;

        for c in command.chars() {
            if current.is_none() && c.is_ascii_whitespace() {
                continue;
            }
            let item = current.get_or_insert_with(String::new);

            if escaping {
                if c != '"' && c != '\\' {
                    return Err(ReleaseError::InvalidEscapeSequence {
                        command: command.to_string(),
                        character: c,
                    });
                }
                item.push(c);
                escaping = false;
                continue;
            }

            match (quote, c) {
                (Some('"'), '\\') => escaping = true,
                (None, '\'' | '"') => quote = Some(c),
                (Some(q), c) if c == q => quote = None,
                (None, c) if c.is_ascii_whitespace() => {
                    items.push(std::mem::take(item));
                    current = None;
                }
                _ => item.push(c),
            }
        }

        if escaping {
            return Err(ReleaseError::UnterminatedEscapeSequence(command.to_string()));
        }
        if let Some(quote) = quote {
            return Err(ReleaseError::MissingQuote {
                command: command.to_string(),
                quote,
            });
        }
        items.extend(current);

        let mut items = items.into_iter();
        let program = items.next().ok_or(ReleaseError::EmptyProgram)?;
        Ok(CommandLine {
            program,
            args: items.collect(),
        })
    }

    /// Process builder for the program with its arguments
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}
