use fetchtv_core::{Item, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Item ids already downloaded into one save path
///
/// Stored as a JSON object mapping item id to title. The whole file is
/// rewritten after every recorded item.
#[derive(Debug, Clone)]
pub struct SavedLedger {
    path: PathBuf,
    files: BTreeMap<String, String>,
}

impl SavedLedger {
    /// Load `<dir>/<file_name>`, creating the directory and an empty ledger
    /// file when they do not exist yet
    pub fn load(dir: &Path, file_name: &str) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(file_name);

        if !path.exists() {
            info!("Creating ledger {}", path.display());
            fs::write(&path, "{}")?;
            return Ok(Self {
                path,
                files: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let files = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content)?
        };

        debug!("Loaded {} saved item(s) from {}", files.len(), path.display());
        Ok(Self { path, files })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, id: &str) -> bool {
        self.files.contains_key(id)
    }

    pub fn title(&self, id: &str) -> Option<&str> {
        self.files.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Record a saved item and persist the ledger immediately
    ///
    /// The in-memory entry is rolled back when the file cannot be written.
    pub fn record(&mut self, item: &Item) -> Result<()> {
        let previous = self.files.insert(item.id.clone(), item.title.clone());
        if let Err(e) = self.save() {
            match previous {
                Some(title) => self.files.insert(item.id.clone(), title),
                None => self.files.remove(&item.id),
            };
            return Err(e);
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.files)?;
        fs::write(&self.path, json)?;
        debug!("Wrote {} entries to {}", self.files.len(), self.path.display());
        Ok(())
    }
}
