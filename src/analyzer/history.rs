use tracing::{debug, instrument};

use crate::boundary::BoundaryWarning;
use crate::domain::{ChangeRecord, ReleaseContext, TagPattern, TypeRegistry};
use crate::error::Result;
use crate::git::Repository;

/// Classified history of a repository, one context per release
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    /// Tagged releases oldest first, followed by the unreleased HEAD context
    pub releases: Vec<ReleaseContext>,
    pub warnings: Vec<BoundaryWarning>,
}

impl History {
    /// Changes made since the latest tag
    pub fn unreleased(&self) -> Option<&ReleaseContext> {
        self.releases.last().filter(|ctx| ctx.is_unreleased())
    }

    pub fn unreleased_mut(&mut self) -> Option<&mut ReleaseContext> {
        self.releases.last_mut().filter(|ctx| ctx.is_unreleased())
    }

    /// Most recent tagged release
    pub fn latest_release(&self) -> Option<&ReleaseContext> {
        self.releases.iter().rev().find(|ctx| !ctx.is_unreleased())
    }
}

/// Walks tags oldest to newest and classifies every commit between them
pub struct HistoryWalker<'a, R: Repository> {
    repo: &'a R,
    registry: &'a TypeRegistry,
    pattern: &'a TagPattern,
}

impl<'a, R: Repository> HistoryWalker<'a, R> {
    pub fn new(repo: &'a R, registry: &'a TypeRegistry, pattern: &'a TagPattern) -> Self {
        HistoryWalker {
            repo,
            registry,
            pattern,
        }
    }

    /// Build one release context per tag plus one for HEAD.
    ///
    /// Fails on the first commit message that does not classify.
    #[instrument(skip(self))]
    pub fn walk(&self) -> Result<History> {
        let (tags, mut warnings) = self.pattern.sort_by_version(&self.repo.list_tags()?);

        let mut releases = Vec::with_capacity(tags.len() + 1);
        let mut previous: Option<&str> = None;

        let bounds = tags.iter().map(|t| Some(t.as_str())).chain(std::iter::once(None));
        for tag in bounds {
            let mut context = match tag {
                Some(tag) => ReleaseContext::tagged(tag, self.pattern.version_part(tag)),
                None => ReleaseContext::unreleased(),
            };

            for hash in self.repo.rev_list(previous, tag.unwrap_or("HEAD"))? {
                let message = self.repo.commit_message(&hash)?;
                let record = ChangeRecord::classify(&message, self.registry)?;
                debug!(commit = %hash, group = %record.group, breaking = record.is_breaking_change, "classified commit");
                context.push(record);
            }

            debug!(release = context.label(), changes = context.len(), "walked release");
            releases.push(context);
            previous = tag;
        }

        if let (Some(latest), Some(head)) = (tags.last(), releases.last()) {
            if head.is_empty() {
                warnings.push(BoundaryWarning::NoNewCommits {
                    latest_tag: latest.clone(),
                });
            }
        }

        Ok(History { releases, warnings })
    }
}
