//! Sample emoji datasets
//!
//! Shaped like the production dataset: a JSON array of `{"n": name, "u":
//! emoji}` records.

use emoticon_filter::dictionary::EmojiEntry;
use serde_json::json;

/// A small dataset covering the common cases, including a dataset entry named
/// `tm` that the reserved override must win against.
pub fn sample_dataset() -> serde_json::Value {
  json!([
    { "n": "smile", "u": "😄" },
    { "n": "wave", "u": "👋" },
    { "n": "heart", "u": "❤️" },
    { "n": "thumbsup", "u": "👍" },
    { "n": "+1", "u": "👍" },
    { "n": "tm", "u": "™️" },
    { "n": "family_mwg", "u": "👨‍👩‍👧" }
  ])
}

pub fn sample_entries() -> Vec<EmojiEntry> {
  serde_json::from_value(sample_dataset()).unwrap()
}
