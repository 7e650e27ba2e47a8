//! Dictionary providers for testing deferred loading
//!
//! `GatedProvider` holds its dataset back until the test opens the gate, so
//! tests can drive hook calls while the dictionary is still pending.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use emoticon_filter::dictionary::{DictionaryProvider, EmojiEntry};
use tokio::sync::Notify;

/// Serves `entries` once `open()` has been called.
pub struct GatedProvider {
  entries: Vec<EmojiEntry>,
  gate: Arc<Notify>,
  loads: AtomicUsize,
}

impl GatedProvider {
  pub fn new(entries: Vec<EmojiEntry>) -> Self {
    Self {
      entries,
      gate: Arc::new(Notify::new()),
      loads: AtomicUsize::new(0),
    }
  }

  /// Release the dataset to the waiting load.
  pub fn open(&self) {
    self.gate.notify_one();
  }

  /// Number of times `load` was entered.
  pub fn loads(&self) -> usize {
    self.loads.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl DictionaryProvider for GatedProvider {
  async fn load(&self) -> Result<Vec<EmojiEntry>> {
    self.loads.fetch_add(1, Ordering::SeqCst);
    self.gate.notified().await;
    Ok(self.entries.clone())
  }
}

/// Always fails, like a missing or corrupt dataset.
pub struct FailingProvider;

#[async_trait]
impl DictionaryProvider for FailingProvider {
  async fn load(&self) -> Result<Vec<EmojiEntry>> {
    Err(anyhow!("dataset unavailable"))
  }
}
