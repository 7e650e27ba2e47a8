//! Literal span protection.
//!
//! Backtick-fenced text and pre-existing `<pre>` elements must reach the
//! output exactly as written. [`protect`] splits a message into segments that
//! carry that flag, so later stages only ever rewrite [`Segment::Text`].
//! [`mask`] and [`unmask`] expose the same split as the marker-string form
//! (`<pre class="rtf-single">…</pre>` / `<pre class="rtf-multi">…</pre>`).

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

static SINGLE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`[^`\n]+`").expect("valid single fence pattern"));
static MULTI_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"```[^`]+```").expect("valid multi fence pattern"));
static PRE_ELEMENT: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<pre\b[^>]*>.*?</pre>").expect("valid pre element pattern"));
static PRE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</pre\s*>").expect("valid pre close pattern"));
static MASK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?s)<pre class="rtf-(single|multi)">(.*?)</pre>"#).expect("valid mask marker pattern")
});

/// Kind of backtick fence around a literal span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
  /// `` `inline` ``
  Single,
  /// ```` ```block``` ````
  Multi,
}

impl Fence {
  fn delimiter(self) -> &'static str {
    match self {
      Fence::Single => "`",
      Fence::Multi => "```",
    }
  }

  fn marker_class(self) -> &'static str {
    match self {
      Fence::Single => "rtf-single",
      Fence::Multi => "rtf-multi",
    }
  }
}

/// A piece of a message flowing through the filter pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Plain content that later stages may rewrite.
  Text(String),
  /// Markup that passes through untouched (generated images, `<pre>`
  /// elements from upstream).
  Markup(String),
  /// Fenced literal text, stored without its delimiters.
  Literal { fence: Fence, body: String },
}

impl Segment {
  pub fn is_protected(&self) -> bool {
    !matches!(self, Segment::Text(_))
  }

  fn write_source(&self, out: &mut String) {
    match self {
      Segment::Text(text) | Segment::Markup(text) => out.push_str(text),
      Segment::Literal { fence, body } => {
        out.push_str(fence.delimiter());
        out.push_str(body);
        out.push_str(fence.delimiter());
      }
    }
  }

  fn write_masked(&self, out: &mut String) {
    match self {
      Segment::Text(text) | Segment::Markup(text) => out.push_str(text),
      Segment::Literal { fence, body } => {
        out.push_str(&format!(r#"<pre class="{}">"#, fence.marker_class()));
        out.push_str(body);
        out.push_str("</pre>");
      }
    }
  }
}

/// Split `text` into protected and rewritable segments.
///
/// `<pre>` elements are located first, then triple fences, then single fences
/// in whatever text remains, so protected regions never nest. A fence only
/// opens at the start of the text or after whitespace; unterminated fences are
/// left as plain text.
///
/// A `</pre>` with no opening tag protects everything before it, back to the
/// previous protected region.
pub fn protect(text: &str) -> Vec<Segment> {
  let mut regions = pre_regions(text);

  for fence in [Fence::Multi, Fence::Single] {
    let pattern = match fence {
      Fence::Single => &*SINGLE_FENCE,
      Fence::Multi => &*MULTI_FENCE,
    };

    let mut found = Vec::new();
    for gap in gaps(text.len(), &regions) {
      scan_fences(pattern, text, gap, &mut found);
    }

    regions.extend(found.into_iter().map(|range| (range, Some(fence))));
    regions.sort_by_key(|(range, _)| range.start);
  }

  let mut segments = Vec::with_capacity(regions.len() * 2 + 1);
  let mut cursor = 0;

  for (range, fence) in regions {
    if cursor < range.start {
      segments.push(Segment::Text(text[cursor..range.start].to_string()));
    }

    let segment = match fence {
      Some(fence) => {
        let width = fence.delimiter().len();
        Segment::Literal {
          fence,
          body: text[range.start + width..range.end - width].to_string(),
        }
      }
      None => Segment::Markup(text[range.clone()].to_string()),
    };
    trace!("Protected region {range:?}: {segment:?}");
    segments.push(segment);
    cursor = range.end;
  }

  if cursor < text.len() {
    segments.push(Segment::Text(text[cursor..].to_string()));
  }

  segments
}

/// Reassemble segments into a string, restoring fence delimiters.
pub fn restore(segments: &[Segment]) -> String {
  let mut out = String::new();
  for segment in segments {
    segment.write_source(&mut out);
  }
  out
}

/// Replace fenced spans with their marker elements.
pub fn mask(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for segment in protect(text) {
    segment.write_masked(&mut out);
  }
  out
}

/// Turn marker elements produced by [`mask`] back into backtick fences.
pub fn unmask(text: &str) -> String {
  MASK_MARKER
    .replace_all(text, |captures: &regex::Captures| {
      let fence = if &captures[1] == "single" {
        Fence::Single
      } else {
        Fence::Multi
      };
      format!("{0}{1}{0}", fence.delimiter(), &captures[2])
    })
    .into_owned()
}

/// Unclaimed byte ranges of `0..len` between sorted `regions`.
fn gaps(len: usize, regions: &[(Range<usize>, Option<Fence>)]) -> Vec<Range<usize>> {
  let mut gaps = Vec::new();
  let mut cursor = 0;
  for (range, _) in regions {
    if cursor < range.start {
      gaps.push(cursor..range.start);
    }
    cursor = range.end;
  }
  if cursor < len {
    gaps.push(cursor..len);
  }
  gaps
}

/// Complete `<pre>` elements plus the text leading up to any unopened `</pre>`.
fn pre_regions(text: &str) -> Vec<(Range<usize>, Option<Fence>)> {
  let mut regions = Vec::new();
  let mut cursor = 0;

  for element in PRE_ELEMENT.find_iter(text) {
    push_unopened_close(text, cursor..element.start(), &mut regions);
    regions.push((element.range(), None));
    cursor = element.end();
  }
  push_unopened_close(text, cursor..text.len(), &mut regions);

  regions
}

fn push_unopened_close(text: &str, window: Range<usize>, regions: &mut Vec<(Range<usize>, Option<Fence>)>) {
  let Some(close) = PRE_CLOSE.find_iter(&text[window.clone()]).last() else {
    return;
  };
  let end = window.start + close.end();
  trace!("Unopened </pre> at {}, protecting {}..{end}", window.start + close.start(), window.start);
  regions.push((window.start..end, None));
}

/// Collect fence matches lying entirely inside `window`.
fn scan_fences(pattern: &Regex, text: &str, window: Range<usize>, found: &mut Vec<Range<usize>>) {
  let haystack = &text[..window.end];
  let mut position = window.start;

  while let Some(candidate) = pattern.find_at(haystack, position) {
    let opens_cleanly = text[..candidate.start()]
      .chars()
      .next_back()
      .is_none_or(char::is_whitespace);

    if opens_cleanly {
      found.push(candidate.range());
      position = candidate.end();
    } else {
      // The opening backtick is ASCII, so the next byte is a char boundary.
      position = candidate.start() + 1;
    }
  }
}
