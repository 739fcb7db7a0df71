use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jokebox_core::{next_joke_id, Joke};

/// File-backed store for the whole joke collection. The collection is one
/// JSON array; every read parses the full file and every write rewrites it.
/// There is no incremental persistence.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the collection. A missing file is an empty collection, not an
    /// error (first-run bootstrap).
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or is not valid JSON.
    pub fn load(&self) -> Result<Vec<Joke>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let body = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read joke store {}", self.path.display()))?;
        serde_json::from_str(&body)
            .with_context(|| format!("joke store {} is not valid JSON", self.path.display()))
    }

    /// Overwrite the collection with `jokes`. The document is written to a
    /// sibling temp file and renamed into place, so readers observe either
    /// the prior state or the full new state.
    ///
    /// # Errors
    /// Returns an error when serialization or any filesystem step fails.
    pub fn save(&self, jokes: &[Joke]) -> Result<()> {
        let body = serde_json::to_string_pretty(jokes)
            .context("failed to serialize joke collection")?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create store directory {}", parent.display())
                })?;
            }
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, body)
            .with_context(|| format!("failed to write joke store {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!("failed to replace joke store {}", self.path.display())
        })
    }

    /// Id for the next created joke, computed over a fresh [`JsonStore::load`].
    ///
    /// # Errors
    /// Returns an error when the load fails.
    pub fn next_id(&self) -> Result<u64> {
        Ok(next_joke_id(&self.load()?))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut file_name = self.path.file_name().map_or_else(
            || std::ffi::OsString::from("jokes.json"),
            std::ffi::OsStr::to_os_string,
        );
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}
