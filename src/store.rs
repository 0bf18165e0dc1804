/*!
 * Persisted haiku list.
 *
 * The list lives in one JSON file holding an array of `{haiku, link}`
 * objects. The extractor replaces the whole file after every pass and the
 * presenter only reads it.
 */

use log::debug;
use std::path::{Path, PathBuf};

use crate::errors::StoreError;
use crate::file_utils::FileManager;
use crate::haiku::HaikuRecord;

/// JSON file holding the current haiku list
#[derive(Debug, Clone)]
pub struct HaikuStore {
    path: PathBuf,
}

impl HaikuStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full list
    pub fn load(&self) -> Result<Vec<HaikuRecord>, StoreError> {
        let content = std::fs::read_to_string(&self.path)?;
        let haikus: Vec<HaikuRecord> = serde_json::from_str(&content)?;
        debug!("Loaded {} haikus from {:?}", haikus.len(), self.path);
        Ok(haikus)
    }

    /// Read the list, failing when it holds nothing to show
    pub fn load_non_empty(&self) -> Result<Vec<HaikuRecord>, StoreError> {
        let haikus = self.load()?;
        if haikus.is_empty() {
            return Err(StoreError::Empty(self.path.display().to_string()));
        }
        Ok(haikus)
    }

    /// Replace the stored list with `haikus`
    pub fn save(&self, haikus: &[HaikuRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec(haikus)?;
        FileManager::write_atomic(&self.path, &json)?;
        debug!("Saved {} haikus to {:?}", haikus.len(), self.path);
        Ok(())
    }
}
