use crate::paths::{lock_path, target_path};
use fetchtv_core::{
    FetchError, Item, ItemSummary, MediaSource, RecorderConfig, Result, SaveOptions,
    ShowRecordings,
};
use fetchtv_persistence::SavedLedger;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// Why an item was not transferred
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AlreadySaved,
    LockConflict(PathBuf),
    RecordingInProgress,
}

/// Final state of one item
#[derive(Debug)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The file was committed but the ledger could not be rewritten
    Unrecorded(PathBuf, FetchError),
    Skipped(SkipReason),
    Failed(FetchError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_) | SaveOutcome::Unrecorded(..))
    }
}

/// Per-item entry of a save run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveReport {
    pub item: ItemSummary,
    pub recorded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveReport {
    fn new(item: &Item, outcome: &SaveOutcome) -> Self {
        let mut report = Self {
            item: item.summary(),
            recorded: outcome.is_saved(),
            warning: None,
            error: None,
        };
        match outcome {
            SaveOutcome::Saved(_) => {}
            SaveOutcome::Unrecorded(path, e) => {
                report.error = Some(format!(
                    "Saved to [{}] but the save list could not be updated: {}",
                    path.display(),
                    e
                ));
            }
            SaveOutcome::Skipped(SkipReason::AlreadySaved) => {}
            SaveOutcome::Skipped(SkipReason::LockConflict(_)) => {
                report.warning = Some(format!(
                    "Already writing (lock file exists) skipping: [{}]",
                    item.title
                ));
            }
            SaveOutcome::Skipped(SkipReason::RecordingInProgress) => {
                report.warning = Some("Skipping item it's currently recording".to_string());
            }
            SaveOutcome::Failed(e) => report.error = Some(format!("Error writing file: {}", e)),
        }
        report
    }
}

/// Streams recordings into a save directory, one item at a time
pub struct DownloadManager<'a> {
    source: &'a dyn MediaSource,
    ledger: &'a mut SavedLedger,
    options: SaveOptions,
    settings: RecorderConfig,
}

impl<'a> DownloadManager<'a> {
    pub fn new(
        source: &'a dyn MediaSource,
        ledger: &'a mut SavedLedger,
        options: SaveOptions,
        settings: RecorderConfig,
    ) -> Self {
        Self {
            source,
            ledger,
            options,
            settings,
        }
    }

    /// Save every item of `shows` in catalog order
    ///
    /// Items already in the ledger produce no report unless overwriting.
    pub async fn save_all(&mut self, shows: &[ShowRecordings]) -> Vec<SaveReport> {
        let mut reports = Vec::new();

        for show in shows {
            for item in &show.items {
                let outcome = self.save_item(&show.title, item).await;
                if matches!(outcome, SaveOutcome::Skipped(SkipReason::AlreadySaved)) {
                    continue;
                }
                reports.push(SaveReport::new(item, &outcome));
            }
        }

        if reports.is_empty() {
            info!("There is nothing new to record");
        }
        reports
    }

    /// Run one item through ledger check, lock probe, transfer and commit
    pub async fn save_item(&mut self, show_title: &str, item: &Item) -> SaveOutcome {
        if !self.options.overwrite && self.ledger.contains(&item.id) {
            debug!("Already saved: [{}] {}", item.id, item.title);
            return SaveOutcome::Skipped(SkipReason::AlreadySaved);
        }

        let target = target_path(
            &self.options.path,
            show_title,
            &item.title,
            &self.settings.extension,
        );
        let lock = lock_path(&target, &self.settings.lock_suffix);

        match self.transfer(item, &target, &lock).await {
            Ok(outcome) => outcome,
            Err(FetchError::DownloadConflict(path)) => {
                warn!("Already writing (lock file exists) skipping: [{}]", item.title);
                SaveOutcome::Skipped(SkipReason::LockConflict(path))
            }
            Err(FetchError::RecordingInProgress(title)) => {
                warn!("Skipping [{}], it's currently recording", title);
                SaveOutcome::Skipped(SkipReason::RecordingInProgress)
            }
            Err(e) if e.is_fatal() => {
                error!("Failed to save [{}]: {}", item.title, e);
                SaveOutcome::Failed(e)
            }
            Err(e) => {
                warn!("Error writing [{}]: {}", item.title, e);
                SaveOutcome::Failed(e)
            }
        }
    }

    async fn transfer(&mut self, item: &Item, target: &Path, lock: &Path) -> Result<SaveOutcome> {
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).await?;
        }

        if fs::try_exists(lock).await? {
            return Err(FetchError::DownloadConflict(lock.to_path_buf()));
        }

        let mut stream = self.source.open(&item.url).await?;
        if stream.content_length() == Some(self.settings.recording_sentinel) {
            return Err(FetchError::RecordingInProgress(item.title.clone()));
        }

        info!("Writing: [{}] to [{}]", item.title, target.display());
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(lock)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(FetchError::DownloadConflict(lock.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let mut written: u64 = 0;
        while let Some(chunk) = stream.next_chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        fs::rename(lock, target).await?;
        debug!("Committed {} bytes to {}", written, target.display());

        if let Err(e) = self.ledger.record(item) {
            error!(
                "Saved [{}] but could not update {}: {}",
                item.title,
                self.ledger.path().display(),
                e
            );
            return Ok(SaveOutcome::Unrecorded(target.to_path_buf(), e));
        }
        Ok(SaveOutcome::Saved(target.to_path_buf()))
    }
}
