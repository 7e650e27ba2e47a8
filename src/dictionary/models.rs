//! Data transfer objects for the emoji dataset.

use serde::{Deserialize, Serialize};

/// A single named emoji from the dataset.
///
/// The dataset ships in a compact form (`{"n": "smile", "u": "😄"}`); the
/// long field names are accepted as aliases so hand-written fixtures stay
/// readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiEntry {
  /// Short-code name without the surrounding colons.
  #[serde(rename = "n", alias = "name")]
  pub name: String,
  /// The literal Unicode sequence rendered for this emoji.
  #[serde(rename = "u", alias = "codepoints")]
  pub codepoint_sequence: String,
}

impl EmojiEntry {
  /// Build an entry from borrowed parts.
  pub fn new(name: impl Into<String>, codepoint_sequence: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      codepoint_sequence: codepoint_sequence.into(),
    }
  }
}
