use std::fmt;

use crate::domain::registry::TypeRegistry;
use crate::error::{ReleaseError, Result};

const BREAKING_TOKENS: [&str; 2] = ["BREAKING CHANGE: ", "BREAKING-CHANGE: "];

/// Changelog section a change is listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeGroup {
    Added,
    Removed,
    Fixed,
    Changed,
}

impl ChangeGroup {
    /// Resolve the group from the commit type and the first word of the subject.
    ///
    /// Precedence: add/support, then remove/delete, then a literal "fix" word
    /// or a fix-typed commit, then everything else.
    pub fn resolve(commit_type: &str, group_word: &str) -> Self {
        match group_word {
            "add" | "support" => ChangeGroup::Added,
            "remove" | "delete" => ChangeGroup::Removed,
            "fix" => ChangeGroup::Fixed,
            _ if commit_type == "fix" => ChangeGroup::Fixed,
            _ => ChangeGroup::Changed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChangeGroup::Added => "Added",
            ChangeGroup::Removed => "Removed",
            ChangeGroup::Fixed => "Fixed",
            ChangeGroup::Changed => "Changed",
        }
    }
}

impl fmt::Display for ChangeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified commit message, ready to be listed in the changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub commit_type: String,
    pub scope: Option<String>,
    pub group: ChangeGroup,
    pub description: String,
    pub long_description: Option<String>,
    pub is_breaking_change: bool,
    pub breaking_change_description: Option<String>,
}

impl ChangeRecord {
    /// Classify a commit message.
    ///
    /// Accepted form:
    /// ```text
    /// <type>[(<scope>)][!]: <group> <description>
    ///
    /// [<body>]
    ///
    /// [BREAKING CHANGE: <text>]
    /// ```
    /// Trailing whitespace of the message is ignored.
    pub fn classify(message: &str, registry: &TypeRegistry) -> Result<Self> {
        let trimmed = message.trim_end();

        let (subject, body) = match trimmed.split_once('\n') {
            None => (trimmed, None),
            Some((subject, rest)) => {
                let body = rest
                    .strip_prefix('\n')
                    .ok_or_else(|| ReleaseError::parse(message))?;
                (subject, Some(body))
            }
        };

        let header = Header::tokenize(subject).ok_or_else(|| ReleaseError::parse(message))?;
        registry.validate(header.commit_type, header.scope)?;

        let (body, breaking_desc) = match body {
            Some(body) => split_breaking(body),
            None => (None, None),
        };
        let long_description = body.map(collapse_whitespace).filter(|b| !b.is_empty());
        let breaking_change_description = breaking_desc
            .map(collapse_whitespace)
            .filter(|b| !b.is_empty());

        Ok(ChangeRecord {
            commit_type: header.commit_type.to_string(),
            scope: header.scope.map(str::to_string),
            group: ChangeGroup::resolve(header.commit_type, header.group_word),
            description: sentence(header.description),
            long_description: long_description.as_deref().map(sentence),
            is_breaking_change: header.breaking || breaking_change_description.is_some(),
            breaking_change_description: breaking_change_description.as_deref().map(sentence),
        })
    }

    /// Whether this change introduces a feature
    pub fn is_feature(&self) -> bool {
        self.commit_type == "feat"
    }
}

/// Classify a commit message against a type registry
pub fn classify(message: &str, registry: &TypeRegistry) -> Result<ChangeRecord> {
    ChangeRecord::classify(message, registry)
}

/// Tokens of the subject line
#[derive(Debug, PartialEq, Eq)]
struct Header<'a> {
    commit_type: &'a str,
    scope: Option<&'a str>,
    breaking: bool,
    group_word: &'a str,
    /// Group word plus the rest of the subject
    description: &'a str,
}

impl<'a> Header<'a> {
    fn tokenize(line: &'a str) -> Option<Self> {
        let line = line.trim_end();

        let (commit_type, mut rest) = split_lowercase_word(line)?;

        let mut scope = None;
        if let Some(after) = rest.strip_prefix('(') {
            let close = after.find(')')?;
            if close == 0 {
                return None;
            }
            scope = Some(&after[..close]);
            rest = &after[close + 1..];
        }

        let breaking = match rest.strip_prefix('!') {
            Some(after) => {
                rest = after;
                true
            }
            None => false,
        };

        let description = rest.strip_prefix(": ")?;
        let (group_word, after_group) = split_lowercase_word(description)?;
        let remainder = after_group.strip_prefix(' ')?;
        if remainder.trim().is_empty() || description.ends_with('.') {
            return None;
        }

        Some(Header {
            commit_type,
            scope,
            breaking,
            group_word,
            description,
        })
    }
}

/// Split a leading run of ASCII lowercase letters; `None` when the run is empty
fn split_lowercase_word(text: &str) -> Option<(&str, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    Some(text.split_at(end))
}

/// Split a body into free text and the breaking-change footer text.
///
/// A footer preceded by free text wins over a body that merely starts with
/// the token.
fn split_breaking(body: &str) -> (Option<&str>, Option<&str>) {
    let mut search = body.chars().next().map_or(body.len(), char::len_utf8);

    while let Some(offset) = body[search..].find("\n\n") {
        let at = search + offset;
        if let Some(desc) = strip_breaking_token(&body[at + 2..]) {
            return (Some(&body[..at]), Some(desc));
        }
        search = at + 1;
    }

    match strip_breaking_token(body) {
        Some(desc) => (None, Some(desc)),
        None => (Some(body), None),
    }
}

fn strip_breaking_token(text: &str) -> Option<&str> {
    BREAKING_TOKENS
        .iter()
        .find_map(|token| text.strip_prefix(token))
        .filter(|desc| !desc.is_empty())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase the first character and make sure the text ends with a period
fn sentence(text: &str) -> String {
    let mut chars = text.chars();
    let mut out: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if !out.ends_with('.') {
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(message: &str) -> Result<ChangeRecord> {
        classify(message, &TypeRegistry::default())
    }

    #[test]
    fn test_feat_add_is_added() {
        let record = classify_default("feat: add widget support").unwrap();
        assert_eq!(record.commit_type, "feat");
        assert_eq!(record.group, ChangeGroup::Added);
        assert_eq!(record.description, "Add widget support.");
        assert_eq!(record.scope, None);
        assert_eq!(record.long_description, None);
        assert!(!record.is_breaking_change);
        assert!(record.is_feature());
    }

    #[test]
    fn test_fix_with_marker_is_breaking() {
        let record = classify_default("fix!: fix crash on startup").unwrap();
        assert_eq!(record.group, ChangeGroup::Fixed);
        assert_eq!(record.description, "Fix crash on startup.");
        assert!(record.is_breaking_change);
        assert_eq!(record.breaking_change_description, None);
    }

    #[test]
    fn test_breaking_footer_without_marker() {
        let record = classify_default(
            "feat: change login flow\n\nSessions move to tokens.\n\nBREAKING CHANGE: clients must reauthenticate",
        )
        .unwrap();
        assert!(record.is_breaking_change);
        assert_eq!(
            record.breaking_change_description.as_deref(),
            Some("Clients must reauthenticate.")
        );
        assert_eq!(
            record.long_description.as_deref(),
            Some("Sessions move to tokens.")
        );
    }

    #[test]
    fn test_breaking_footer_with_marker() {
        let record =
            classify_default("feat!: change login flow\n\nBREAKING CHANGE: clients must reauthenticate")
                .unwrap();
        assert!(record.is_breaking_change);
        assert_eq!(record.long_description, None);
        assert_eq!(
            record.breaking_change_description.as_deref(),
            Some("Clients must reauthenticate.")
        );
    }

    #[test]
    fn test_breaking_footer_hyphenated_token() {
        let record =
            classify_default("fix: fix config loading\n\nBREAKING-CHANGE: drop the old path").unwrap();
        assert!(record.is_breaking_change);
        assert_eq!(
            record.breaking_change_description.as_deref(),
            Some("Drop the old path.")
        );
    }

    #[test]
    fn test_body_whitespace_collapsed() {
        let record = classify_default(
            "feat: add export\n\nwrites csv   files\n  into the output\n\ndirectory.",
        )
        .unwrap();
        assert_eq!(
            record.long_description.as_deref(),
            Some("Writes csv files into the output directory.")
        );
    }

    #[test]
    fn test_breaking_description_whitespace_collapsed() {
        let record = classify_default(
            "feat: change api\n\nBREAKING CHANGE: the endpoint\n   now requires\nauth",
        )
        .unwrap();
        assert_eq!(
            record.breaking_change_description.as_deref(),
            Some("The endpoint now requires auth.")
        );
    }

    #[test]
    fn test_trailing_newline_ignored() {
        let record = classify_default("feat: add widget support\n").unwrap();
        assert_eq!(record.description, "Add widget support.");
    }

    #[test]
    fn test_scope_allowed_for_ci() {
        let record = classify_default("ci(scripts): update release script").unwrap();
        assert_eq!(record.scope.as_deref(), Some("scripts"));
        assert_eq!(record.group, ChangeGroup::Changed);
        assert_eq!(record.description, "Update release script.");
    }

    #[test]
    fn test_scope_rejected_for_feat() {
        let err = classify_default("feat(auth): add login").unwrap_err();
        assert!(matches!(err, ReleaseError::UnsupportedScope { .. }));
    }

    #[test]
    fn test_unsupported_type() {
        let err = classify_default("chore: add x").unwrap_err();
        assert!(matches!(err, ReleaseError::UnsupportedType(ty) if ty == "chore"));
    }

    #[test]
    fn test_group_mapping() {
        let cases = [
            ("feat: support dark mode", ChangeGroup::Added),
            ("feat: remove legacy api", ChangeGroup::Removed),
            ("feat: delete temp files", ChangeGroup::Removed),
            ("feat: fix typo in output", ChangeGroup::Fixed),
            ("fix: handle empty input", ChangeGroup::Fixed),
            ("fix: add missing check", ChangeGroup::Added),
            ("feat: improve startup time", ChangeGroup::Changed),
            ("docs: update readme", ChangeGroup::Changed),
        ];

        for (message, expected) in cases {
            let record = classify_default(message).unwrap();
            assert_eq!(record.group, expected, "message: {}", message);
        }
    }

    #[test]
    fn test_description_keeps_group_word() {
        let record = classify_default("fix: handle empty input").unwrap();
        assert_eq!(record.description, "Handle empty input.");
    }

    #[test]
    fn test_body_period_not_doubled() {
        let record = classify_default("feat: add export\n\nSupports csv.").unwrap();
        assert_eq!(record.long_description.as_deref(), Some("Supports csv."));
    }

    #[test]
    fn test_breaking_token_inside_body_text_is_not_a_footer() {
        let record =
            classify_default("feat: add export\n\nmentions BREAKING CHANGE: inline").unwrap();
        assert!(!record.is_breaking_change);
        assert_eq!(
            record.long_description.as_deref(),
            Some("Mentions BREAKING CHANGE: inline.")
        );
    }

    #[test]
    fn test_grammar_violations() {
        let invalid = [
            "",
            "add widget support",
            "feat add widget",
            "feat:add widget",
            "Feat: add widget",
            "feat: Add widget",
            "feat: add",
            "feat: add ",
            "feat: add widget.",
            "feat(): add widget",
            "feat(scripts: add widget",
            "feat: add widget\nbody on next line",
            ": add widget",
        ];

        for message in invalid {
            let err = classify_default(message).unwrap_err();
            assert!(
                matches!(err, ReleaseError::Parse(_)),
                "expected parse error for {:?}, got {:?}",
                message,
                err
            );
        }
    }

    #[test]
    fn test_unicode_body() {
        let record = classify_default("feat: add greeting\n\nélan vital").unwrap();
        assert_eq!(record.long_description.as_deref(), Some("Élan vital."));
    }
}
