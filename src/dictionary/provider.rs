//! Sources for the emoji dataset.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::models::EmojiEntry;

/// Trait for loading the emoji dataset (enables testing with fake
/// implementations).
#[async_trait]
pub trait DictionaryProvider: Send + Sync {
  /// Load every dataset entry, in dataset order.
  ///
  /// # Returns
  /// The ordered list of `EmojiEntry` records, or an error describing why the
  /// dataset could not be read.
  async fn load(&self) -> Result<Vec<EmojiEntry>>;
}

/// Reads the dataset from a JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
  path: PathBuf,
}

impl JsonFileProvider {
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path: path.as_ref().to_path_buf(),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[async_trait]
impl DictionaryProvider for JsonFileProvider {
  async fn load(&self) -> Result<Vec<EmojiEntry>> {
    let raw = tokio::fs::read_to_string(&self.path)
      .await
      .with_context(|| format!("Failed to read emoji dataset {}", self.path.display()))?;

    let entries: Vec<EmojiEntry> = serde_json::from_str(&raw)
      .with_context(|| format!("Failed to parse emoji dataset {}", self.path.display()))?;

    debug!("Read {} emoji entries from {}", entries.len(), self.path.display());
    Ok(entries)
  }
}

/// Serves a dataset that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
  entries: Vec<EmojiEntry>,
}

impl StaticProvider {
  pub fn new(entries: Vec<EmojiEntry>) -> Self {
    Self { entries }
  }
}

#[async_trait]
impl DictionaryProvider for StaticProvider {
  async fn load(&self) -> Result<Vec<EmojiEntry>> {
    Ok(self.entries.clone())
  }
}
