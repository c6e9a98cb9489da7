//! Domain logic - pure release rules independent of git operations

pub mod commit;
pub mod registry;
pub mod release;
pub mod tag;
pub mod version;

pub use commit::{classify, ChangeGroup, ChangeRecord};
pub use registry::TypeRegistry;
pub use release::ReleaseContext;
pub use tag::TagPattern;
pub use version::{next_version, Version, VersionBump};
