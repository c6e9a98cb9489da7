use indexmap::IndexMap;

use crate::domain::commit::{ChangeGroup, ChangeRecord};
use crate::domain::version::VersionBump;

/// Changes belonging to one release, grouped by changelog section
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseContext {
    /// Version label; `None` while the release is still unreleased
    pub version: Option<String>,
    /// Tag the release was cut from; `None` for HEAD
    pub tag: Option<String>,
    /// Sections in first-seen order, records in walk order
    pub groups: IndexMap<ChangeGroup, Vec<ChangeRecord>>,
}

impl ReleaseContext {
    /// Context for a tagged release
    pub fn tagged(tag: impl Into<String>, version: impl Into<String>) -> Self {
        ReleaseContext {
            version: Some(version.into()),
            tag: Some(tag.into()),
            groups: IndexMap::new(),
        }
    }

    /// Context for changes not yet released
    pub fn unreleased() -> Self {
        ReleaseContext::default()
    }

    pub fn is_unreleased(&self) -> bool {
        self.tag.is_none()
    }

    pub fn push(&mut self, record: ChangeRecord) {
        self.groups.entry(record.group).or_default().push(record);
    }

    pub fn records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.groups.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bump level required by the changes of this release
    pub fn bump(&self) -> VersionBump {
        VersionBump::from_records(self.records())
    }

    /// Heading label used in the changelog
    pub fn label(&self) -> &str {
        self.version.as_deref().unwrap_or("Unreleased")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commit::classify;
    use crate::domain::registry::TypeRegistry;

    fn record(message: &str) -> ChangeRecord {
        classify(message, &TypeRegistry::default()).unwrap()
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let mut ctx = ReleaseContext::unreleased();
        ctx.push(record("fix: fix crash"));
        ctx.push(record("feat: add export"));
        ctx.push(record("fix: handle empty input"));
        ctx.push(record("feat: remove legacy flag"));

        let groups: Vec<ChangeGroup> = ctx.groups.keys().copied().collect();
        assert_eq!(
            groups,
            vec![ChangeGroup::Fixed, ChangeGroup::Added, ChangeGroup::Removed]
        );
        assert_eq!(ctx.groups[&ChangeGroup::Fixed].len(), 2);
        assert_eq!(
            ctx.groups[&ChangeGroup::Fixed][1].description,
            "Handle empty input."
        );
        assert_eq!(ctx.len(), 4);
    }

    #[test]
    fn test_bump_follows_records() {
        let mut ctx = ReleaseContext::tagged("v1.0.0", "1.0.0");
        assert_eq!(ctx.bump(), VersionBump::Patch);
        ctx.push(record("feat: add export"));
        assert_eq!(ctx.bump(), VersionBump::Minor);
        ctx.push(record("fix!: fix api shape"));
        assert_eq!(ctx.bump(), VersionBump::Major);
    }

    #[test]
    fn test_label() {
        assert_eq!(ReleaseContext::unreleased().label(), "Unreleased");
        assert_eq!(ReleaseContext::tagged("v1.2.0", "1.2.0").label(), "1.2.0");
    }

    #[test]
    fn test_unreleased_flag() {
        assert!(ReleaseContext::unreleased().is_unreleased());
        assert!(!ReleaseContext::tagged("1.0.0", "1.0.0").is_unreleased());
        assert!(ReleaseContext::unreleased().is_empty());
    }
}
