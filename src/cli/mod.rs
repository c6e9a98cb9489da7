//! Command drivers
//!
//! Each driver takes its collaborators (repository, editor, hosting) as trait
//! objects so the workflows run against mocks in tests and against git2, the
//! user's editor and `gh` from the binary. Argument parsing stays in
//! `main.rs`.

pub mod bump;
pub mod merge;

pub use bump::{run_bump, BumpArgs, BumpOutcome};
pub use merge::{run_merge, MergeMode, MergeOutcome};
