//! Emoji dictionary: dataset models, providers and the resolved lookup tables
//! the filter reads from.

pub mod index;
pub mod models;
pub mod provider;

use std::time::Instant;

use anyhow::Result;
use tracing::debug;

pub use index::{NameIndex, ReservedOverrides};
pub use models::EmojiEntry;
pub use provider::{DictionaryProvider, JsonFileProvider, StaticProvider};

/// Outcome of resolving a short-code name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a> {
  /// A fixed reserved symbol.
  Reserved(char),
  /// A dataset sequence.
  Sequence(&'a str),
}

/// Immutable name lookup built once from the dataset.
#[derive(Debug, Clone, Default)]
pub struct EmojiDictionary {
  names: NameIndex,
  reserved: ReservedOverrides,
}

impl EmojiDictionary {
  /// Build a dictionary from dataset entries with the default reserved
  /// overrides.
  pub fn new(entries: &[EmojiEntry]) -> Self {
    Self::with_reserved(entries, ReservedOverrides::default())
  }

  pub fn with_reserved(entries: &[EmojiEntry], reserved: ReservedOverrides) -> Self {
    Self {
      names: NameIndex::from_entries(entries),
      reserved,
    }
  }

  /// Load the dataset from `provider` and build the dictionary.
  ///
  /// # Arguments
  /// * `provider` - Source of the dataset entries.
  ///
  /// # Returns
  /// The resolved dictionary, or the provider's error.
  pub async fn load(provider: &dyn DictionaryProvider) -> Result<Self> {
    let start = Instant::now();
    let entries = provider.load().await?;
    let dictionary = Self::new(&entries);

    debug!(
      "Built emoji dictionary in {duration:?} ({count} names)",
      duration = start.elapsed(),
      count = dictionary.names.len()
    );

    Ok(dictionary)
  }

  /// Resolve a short-code name (without colons), reserved symbols first.
  pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
    if let Some(symbol) = self.reserved.get(name) {
      return Some(Resolved::Reserved(symbol));
    }
    self.resolve_dataset(name).map(Resolved::Sequence)
  }

  /// Resolve a name against the dataset only, ignoring reserved overrides.
  pub fn resolve_dataset(&self, name: &str) -> Option<&str> {
    self.names.get(name)
  }

  pub fn names(&self) -> &NameIndex {
    &self.names
  }

  pub fn reserved(&self) -> &ReservedOverrides {
    &self.reserved
  }
}
