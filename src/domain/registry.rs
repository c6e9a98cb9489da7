use std::collections::{BTreeMap, BTreeSet};

use crate::error::{ReleaseError, Result};

/// Commit types accepted by the classifier and the scopes each one allows.
///
/// The table is built once from configuration and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    types: BTreeMap<String, BTreeSet<String>>,
}

impl TypeRegistry {
    /// Build a registry from `(type, allowed scopes)` pairs
    pub fn new<T, S, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, Vec<S>)>,
        T: Into<String>,
        S: Into<String>,
    {
        let types = entries
            .into_iter()
            .map(|(ty, scopes)| (ty.into(), scopes.into_iter().map(Into::into).collect()))
            .collect();

        TypeRegistry { types }
    }

    /// Check that a type (and optional scope) is registered
    pub fn validate(&self, commit_type: &str, scope: Option<&str>) -> Result<()> {
        let scopes = self
            .types
            .get(commit_type)
            .ok_or_else(|| ReleaseError::UnsupportedType(commit_type.to_string()))?;

        match scope {
            Some(scope) if !scopes.contains(scope) => Err(ReleaseError::UnsupportedScope {
                commit_type: commit_type.to_string(),
                scope: scope.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn contains(&self, commit_type: &str) -> bool {
        self.types.contains_key(commit_type)
    }

    /// Registered type names, sorted
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        TypeRegistry::new([
            ("feat", Vec::<&str>::new()),
            ("fix", vec![]),
            ("docs", vec![]),
            ("ci", vec!["scripts"]),
        ])
    }
}

impl From<&BTreeMap<String, Vec<String>>> for TypeRegistry {
    fn from(table: &BTreeMap<String, Vec<String>>) -> Self {
        TypeRegistry::new(table.iter().map(|(ty, scopes)| (ty.clone(), scopes.clone())))
    }
}
