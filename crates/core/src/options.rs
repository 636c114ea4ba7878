use std::path::PathBuf;

/// Which listing the caller asked for
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListMode {
    /// Show titles only; items are neither filtered nor probed
    Shows,
    /// Shows with their (title-filtered) items
    #[default]
    Recordings,
    /// Only items the server reports as still recording
    CurrentlyRecording,
}

/// Criteria applied to the catalog by the filter engine
///
/// Tokens are matched as case-insensitive substrings. An empty list means
/// "no constraint" for inclusion lists and "exclude nothing" for `exclude`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub folders: Vec<String>,
    pub exclude: Vec<String>,
    pub titles: Vec<String>,
    pub mode: ListMode,
}

impl FilterOptions {
    pub fn new(mode: ListMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_folders<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        self.folders = split_all(values);
        self
    }

    pub fn with_exclude<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        self.exclude = split_all(values);
        self
    }

    pub fn with_titles<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        self.titles = split_all(values);
        self
    }
}

/// Where and how recordings are saved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveOptions {
    pub path: PathBuf,
    /// Transfer again even when the ledger already lists the item
    pub overwrite: bool,
}

impl SaveOptions {
    pub fn new(path: impl Into<PathBuf>, overwrite: bool) -> Self {
        // `C:\temp\` and `C:\temp` must share one ledger
        let path: PathBuf = path.into().components().collect();
        Self { path, overwrite }
    }
}

/// Split one multi-value option into tokens.
///
/// `"wibble, wobble"` gives `["wibble", "wobble"]`. Each token is trimmed and
/// stripped of surrounding single or double quotes, empty tokens are dropped.
pub fn split_tokens(value: &str) -> Vec<String> {
    strip_quotes(value.trim())
        .split(',')
        .map(|token| strip_quotes(token.trim()).trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}

fn split_all<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| split_tokens(value.as_ref()))
        .collect()
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}
