//! Lookup tables built from the emoji dataset.

use std::collections::HashMap;

use tracing::warn;

use super::models::EmojiEntry;

/// Lowercase name to codepoint sequence, in first-insertion order.
///
/// A name that appears twice keeps its original position but takes the later
/// value, so the reverse lookup scans entries in a stable order.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
  entries: Vec<(String, String)>,
  positions: HashMap<String, usize>,
}

impl NameIndex {
  /// Build the index from dataset entries.
  ///
  /// Entries with an empty name or sequence are skipped.
  pub fn from_entries<'a, I>(entries: I) -> Self
  where
    I: IntoIterator<Item = &'a EmojiEntry>,
  {
    let mut index = Self::default();

    for entry in entries {
      let name = entry.name.trim();
      if name.is_empty() || entry.codepoint_sequence.is_empty() {
        warn!("Skipping incomplete emoji entry: {entry:?}");
        continue;
      }
      index.insert(name, &entry.codepoint_sequence);
    }

    index
  }

  /// Insert or overwrite `name`. The key is stored lowercase.
  pub fn insert(&mut self, name: &str, codepoint_sequence: &str) {
    let key = name.to_lowercase();

    if let Some(&position) = self.positions.get(&key) {
      warn!("Duplicate emoji name '{key}', keeping the later value");
      self.entries[position].1 = codepoint_sequence.to_string();
      return;
    }

    self.positions.insert(key.clone(), self.entries.len());
    self.entries.push((key, codepoint_sequence.to_string()));
  }

  /// Look up a name, ignoring case.
  pub fn get(&self, name: &str) -> Option<&str> {
    let key = name.to_lowercase();
    self
      .positions
      .get(&key)
      .map(|&position| self.entries[position].1.as_str())
  }

  /// Iterate `(name, sequence)` pairs in index order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(name, sequence)| (name.as_str(), sequence.as_str()))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Fixed symbols that take priority over dataset entries of the same name.
#[derive(Debug, Clone)]
pub struct ReservedOverrides {
  symbols: HashMap<String, char>,
}

impl ReservedOverrides {
  /// Create an empty override table.
  pub fn empty() -> Self {
    Self {
      symbols: HashMap::new(),
    }
  }

  /// Add or replace an override. The name is stored lowercase.
  pub fn with(mut self, name: &str, symbol: char) -> Self {
    self.symbols.insert(name.to_lowercase(), symbol);
    self
  }

  pub fn get(&self, name: &str) -> Option<char> {
    self.symbols.get(&name.to_lowercase()).copied()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.symbols.contains_key(&name.to_lowercase())
  }
}

impl Default for ReservedOverrides {
  /// The trademark sign is the only symbol reserved by default.
  fn default() -> Self {
    Self::empty().with("tm", '\u{2122}')
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_index_lowercases_keys() {
    let entries = vec![EmojiEntry::new("Smile", "😄")];
    let index = NameIndex::from_entries(&entries);
    assert_eq!(index.get("smile"), Some("😄"));
    assert_eq!(index.get("SMILE"), Some("😄"));
    assert_eq!(index.iter().next(), Some(("smile", "😄")));
  }

  #[test]
  fn test_duplicate_name_last_write_wins_first_position_kept() {
    let entries = vec![
      EmojiEntry::new("one", "1️⃣"),
      EmojiEntry::new("heart", "❤️"),
      EmojiEntry::new("ONE", "🥇"),
    ];
    let index = NameIndex::from_entries(&entries);

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("one"), Some("🥇"));
    let order: Vec<_> = index.iter().map(|(name, _)| name).collect();
    assert_eq!(order, vec!["one", "heart"]);
  }

  #[test]
  fn test_incomplete_entries_skipped() {
    let entries = vec![EmojiEntry::new("", "😄"), EmojiEntry::new("blank", "")];
    let index = NameIndex::from_entries(&entries);
    assert!(index.is_empty());
  }

  #[test]
  fn test_default_reserved_overrides() {
    let reserved = ReservedOverrides::default();
    assert_eq!(reserved.get("tm"), Some('™'));
    assert_eq!(reserved.get("TM"), Some('™'));
    assert!(!reserved.contains("smile"));
  }
}
