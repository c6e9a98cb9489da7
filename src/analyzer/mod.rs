//! Analysis engine turning git history into classified releases

pub mod history;

pub use history::{History, HistoryWalker};
