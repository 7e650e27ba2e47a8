//! Unicode emoji back to `:name:` short codes.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::dictionary::EmojiDictionary;

static NON_ASCII_RUN: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^\x00-\x7F]+").expect("valid non-ascii run pattern"));

/// Replace every maximal run of non-ASCII characters that equals a dataset
/// sequence with its `:name:` short code.
///
/// Reserved names are never produced. Runs without an exact match, including
/// several adjacent emoji, are left unchanged.
pub fn to_short_codes(dictionary: &EmojiDictionary, text: &str) -> String {
  let mut cache = ReverseCache::new(dictionary);

  let converted = NON_ASCII_RUN
    .replace_all(text, |captures: &Captures| {
      let run = &captures[0];
      match cache.lookup(run) {
        Some(name) => format!(":{name}:"),
        None => run.to_string(),
      }
    })
    .into_owned();

  debug!(
    "Reverse mapped {hits} of {lookups} runs, scanned {scanned} names",
    hits = cache.hits,
    lookups = cache.lookups,
    scanned = cache.scanned
  );
  converted
}

/// Sequence to name memo, scoped to one [`to_short_codes`] call.
///
/// Every index entry passed over while searching is remembered, so the index
/// is walked at most once per call. The first name seen for a sequence wins.
struct ReverseCache<'d> {
  dictionary: &'d EmojiDictionary,
  names: HashMap<&'d str, &'d str>,
  scanned: usize,
  lookups: usize,
  hits: usize,
}

impl<'d> ReverseCache<'d> {
  fn new(dictionary: &'d EmojiDictionary) -> Self {
    Self {
      dictionary,
      names: HashMap::new(),
      scanned: 0,
      lookups: 0,
      hits: 0,
    }
  }

  fn lookup(&mut self, run: &str) -> Option<&'d str> {
    self.lookups += 1;

    if let Some(&name) = self.names.get(run) {
      self.hits += 1;
      return Some(name);
    }

    let dictionary = self.dictionary;
    let reserved = dictionary.reserved();
    for (name, sequence) in dictionary.names().iter().skip(self.scanned) {
      self.scanned += 1;
      if reserved.contains(name) {
        continue;
      }

      self.names.entry(sequence).or_insert(name);
      if sequence == run {
        self.hits += 1;
        return self.names.get(run).copied();
      }
    }

    None
  }
}
