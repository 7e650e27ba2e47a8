//! Short-code tokens (`:name:`) and their resolution in both directions.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::literal::Segment;
use crate::dictionary::{EmojiDictionary, Resolved};

static SHORT_CODE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r":[A-Za-z0-9_-]+:").expect("valid short code pattern"));

/// A `:name:` token located inside a text segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
  /// Byte range of the token, colons included.
  pub range: Range<usize>,
  /// The name between the colons, as written.
  pub name: &'a str,
}

/// Find every short-code token in `text`.
///
/// A token must be followed by whitespace or the end of the text. Nothing is
/// required before it, so `fix:bug:` yields `:bug:`.
pub fn tokens(text: &str) -> Vec<Token<'_>> {
  let mut found = Vec::new();
  let mut position = 0;

  while let Some(candidate) = SHORT_CODE.find_at(text, position) {
    let closes_cleanly = text[candidate.end()..]
      .chars()
      .next()
      .is_none_or(char::is_whitespace);

    if closes_cleanly {
      found.push(Token {
        range: candidate.range(),
        name: &text[candidate.start() + 1..candidate.end() - 1],
      });
      position = candidate.end();
    } else {
      // Retry from the next byte; the closing colon may open another token.
      position = candidate.start() + 1;
    }
  }

  found
}

/// Resolve short codes for rendering.
///
/// Dataset names become their Unicode sequence inside the text (rendered by
/// the next stage); reserved names become finished markup via `reserved`.
/// Unknown names are left as written.
pub fn resolve_incoming(
  segments: Vec<Segment>,
  dictionary: &EmojiDictionary,
  reserved: &dyn Fn(char) -> String,
) -> Vec<Segment> {
  let mut out = Vec::with_capacity(segments.len());
  let mut resolved = 0usize;

  for segment in segments {
    let Segment::Text(text) = segment else {
      out.push(segment);
      continue;
    };

    let mut pending = String::with_capacity(text.len());
    let mut cursor = 0;

    for token in tokens(&text) {
      let Some(value) = dictionary.resolve(token.name) else {
        trace!("Unresolved short code :{}:", token.name);
        continue;
      };

      pending.push_str(&text[cursor..token.range.start]);
      match value {
        Resolved::Sequence(sequence) => pending.push_str(sequence),
        Resolved::Reserved(symbol) => {
          if !pending.is_empty() {
            out.push(Segment::Text(std::mem::take(&mut pending)));
          }
          out.push(Segment::Markup(reserved(symbol)));
        }
      }
      cursor = token.range.end;
      resolved += 1;
    }

    pending.push_str(&text[cursor..]);
    if !pending.is_empty() {
      out.push(Segment::Text(pending));
    }
  }

  if resolved > 0 {
    debug!("Resolved {resolved} incoming short codes");
  }
  out
}

/// Replace short codes with literal Unicode for sending.
///
/// Only dataset names are substituted; reserved names stay as typed.
pub fn resolve_outgoing(segments: Vec<Segment>, dictionary: &EmojiDictionary) -> Vec<Segment> {
  let mut resolved = 0usize;

  let out = segments
    .into_iter()
    .map(|segment| {
      let Segment::Text(text) = segment else {
        return segment;
      };

      let mut rewritten = String::with_capacity(text.len());
      let mut cursor = 0;

      for token in tokens(&text) {
        if dictionary.reserved().contains(token.name) {
          trace!("Keeping reserved short code :{}: literal", token.name);
          continue;
        }
        let Some(sequence) = dictionary.resolve_dataset(token.name) else {
          continue;
        };

        rewritten.push_str(&text[cursor..token.range.start]);
        rewritten.push_str(sequence);
        cursor = token.range.end;
        resolved += 1;
      }

      rewritten.push_str(&text[cursor..]);
      Segment::Text(rewritten)
    })
    .collect();

  if resolved > 0 {
    debug!("Resolved {resolved} outgoing short codes");
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dictionary::EmojiEntry;

  fn dictionary() -> EmojiDictionary {
    EmojiDictionary::new(&[
      EmojiEntry::new("smile", "😄"),
      EmojiEntry::new("+1", "👍"),
      EmojiEntry::new("thumbs_up", "👍"),
      EmojiEntry::new("tm", "🅣"),
    ])
  }

  fn names(text: &str) -> Vec<&str> {
    tokens(text).into_iter().map(|token| token.name).collect()
  }

  fn text(value: &str) -> Vec<Segment> {
    vec![Segment::Text(value.to_string())]
  }

  #[test]
  fn test_tokens_need_trailing_whitespace_or_end() {
    assert_eq!(names(":smile:"), vec!["smile"]);
    assert_eq!(names(":smile: :wave:\n"), vec!["smile", "wave"]);
    assert_eq!(names(":smile:!"), Vec::<&str>::new());
  }

  #[test]
  fn test_tokens_unconstrained_on_the_left() {
    assert_eq!(names("fix:bug:"), vec!["bug"]);
    assert_eq!(names(":a::b: "), vec!["b"]);
  }

  #[test]
  fn test_tokens_grammar() {
    assert_eq!(names(":thumbs_up: :a-b: :x1:"), vec!["thumbs_up", "a-b", "x1"]);
    assert_eq!(names(":: :white space:"), Vec::<&str>::new());
    assert_eq!(names(":+1:"), Vec::<&str>::new());
  }

  #[test]
  fn test_incoming_substitutes_unicode() {
    let out = resolve_incoming(text("hi :SMILE: there"), &dictionary(), &|_| unreachable!());
    assert_eq!(out, text("hi 😄 there"));
  }

  #[test]
  fn test_incoming_reserved_becomes_markup() {
    let out = resolve_incoming(text("brand:tm: x"), &dictionary(), &|symbol| format!("<{symbol}>"));
    assert_eq!(
      out,
      vec![
        Segment::Text("brand".to_string()),
        Segment::Markup("<™>".to_string()),
        Segment::Text(" x".to_string()),
      ]
    );
  }

  #[test]
  fn test_incoming_unknown_left_verbatim() {
    let out = resolve_incoming(text(":notarealcode:"), &dictionary(), &|_| unreachable!());
    assert_eq!(out, text(":notarealcode:"));
  }

  #[test]
  fn test_incoming_skips_protected_segments() {
    let segments = vec![Segment::Markup("<pre>:smile:</pre>".to_string())];
    let out = resolve_incoming(segments.clone(), &dictionary(), &|_| unreachable!());
    assert_eq!(out, segments);
  }

  #[test]
  fn test_outgoing_keeps_reserved_literal() {
    let out = resolve_outgoing(text(":smile: and :tm:"), &dictionary());
    assert_eq!(out, text("😄 and :tm:"));
  }

  #[test]
  fn test_outgoing_preserves_surrounding_whitespace() {
    let out = resolve_outgoing(text("  :thumbs_up:\t:nope:\n"), &dictionary());
    assert_eq!(out, text("  👍\t:nope:\n"));
  }
}
