//! Saving recordings to disk: ledger deduplication, lock markers and
//! atomic commit of finished transfers.

pub mod manager;
pub mod paths;

pub use manager::{DownloadManager, SaveOutcome, SaveReport, SkipReason};
pub use paths::{lock_path, target_path};
