//! Unicode emoji to image markup.
//!
//! The conversion itself sits behind [`UnicodeRenderer`]; the filter supplies
//! the glyph options and the callback that turns a glyph request into a
//! resource locator ([`ResourcePaths::locate`]).

use tracing::{debug, trace};
use unicode_segmentation::UnicodeSegmentation;

/// Marker class carried by every generated image.
pub const EMOJI_CLASS: &str = r#"class="emoji""#;
/// Marker class for a message that is a single glyph.
pub const BIG_EMOJI_CLASS: &str = r#"class="emoji big""#;

const VARIATION_SELECTOR: char = '\u{FE0F}';
const ZERO_WIDTH_JOINER: char = '\u{200D}';
const KEYCAP: char = '\u{20E3}';

/// Glyph size and file extension requested from the resource host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
  /// Edge length in pixels of the square glyph images.
  pub glyph_size: u32,
  /// Extension appended to the icon identifier, dot included.
  pub extension: String,
}

impl RenderOptions {
  /// Directory name of the size bucket, e.g. `72x72`.
  pub fn size_bucket(&self) -> String {
    format!("{0}x{0}", self.glyph_size)
  }
}

impl Default for RenderOptions {
  fn default() -> Self {
    Self {
      glyph_size: 72,
      extension: ".png".to_string(),
    }
  }
}

/// What the locator callback is asked to resolve for one glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRequest<'a> {
  /// Canonical icon identifier, see [`icon_id`].
  pub icon: &'a str,
  pub size: &'a str,
  pub extension: &'a str,
}

/// Converts Unicode emoji inside plain text into image markup.
pub trait UnicodeRenderer: Send + Sync {
  /// Replace every emoji sequence in `text` with an image element whose
  /// source is produced by `locate`.
  ///
  /// # Arguments
  /// * `text` - Unprotected message text.
  /// * `options` - Glyph size and extension to request.
  /// * `locate` - Callback computing the resource locator for a glyph.
  ///
  /// # Returns
  /// The text with emoji replaced by markup; everything else unchanged.
  fn render(&self, text: &str, options: &RenderOptions, locate: &dyn Fn(&GlyphRequest) -> String) -> String;
}

/// Default renderer producing Twemoji-style `<img>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwemojiRenderer;

impl UnicodeRenderer for TwemojiRenderer {
  fn render(&self, text: &str, options: &RenderOptions, locate: &dyn Fn(&GlyphRequest) -> String) -> String {
    let size = options.size_bucket();
    let mut out = String::with_capacity(text.len());

    for grapheme in text.graphemes(true) {
      if !is_emoji(grapheme) {
        out.push_str(grapheme);
        continue;
      }

      let icon = icon_id(grapheme);
      let source = locate(&GlyphRequest {
        icon: &icon,
        size: &size,
        extension: &options.extension,
      });
      trace!("Rendering {grapheme} as {source}");
      out.push_str(&image_markup(grapheme, &source));
    }

    out
  }
}

/// Builds resource locators under the static asset host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
  static_path: String,
}

impl ResourcePaths {
  pub fn new(static_path: &str) -> Self {
    Self {
      static_path: static_path.trim_end_matches('/').to_string(),
    }
  }

  /// `{static}/images/mega/twemojis/2_v2/{size}/{icon}{ext}`
  pub fn locate(&self, glyph: &GlyphRequest) -> String {
    format!(
      "{}/images/mega/twemojis/2_v2/{}/{}{}",
      self.static_path, glyph.size, glyph.icon, glyph.extension
    )
  }
}

/// The image element emitted for one glyph.
pub fn image_markup(alt: &str, source: &str) -> String {
  format!(r#"<img {EMOJI_CLASS} draggable="false" alt="{alt}" src="{source}"/>"#)
}

/// Lowercase hex code points joined by `-`.
///
/// The emoji presentation selector is dropped unless the sequence contains a
/// zero-width joiner, matching the asset file names.
pub fn icon_id(sequence: &str) -> String {
  let keep_selector = sequence.contains(ZERO_WIDTH_JOINER);
  sequence
    .chars()
    .filter(|&ch| keep_selector || ch != VARIATION_SELECTOR)
    .map(|ch| format!("{:x}", ch as u32))
    .collect::<Vec<_>>()
    .join("-")
}

/// Mark a message consisting of exactly one image element as large.
///
/// Any other shape, including leading or trailing text, is returned as is.
pub fn enlarge_single_glyph(html: String) -> String {
  let is_single_image = html.starts_with("<img")
    && html.find('>').is_some_and(|close| close + 1 == html.len())
    && !html[1..].contains("<img");

  if !is_single_image {
    return html;
  }

  debug!("Enlarging single glyph message");
  html.replacen(EMOJI_CLASS, BIG_EMOJI_CLASS, 1)
}

/// Whether a grapheme cluster should be drawn as an emoji image.
pub fn is_emoji(grapheme: &str) -> bool {
  let Some(first) = grapheme.chars().next() else {
    return false;
  };

  if grapheme.chars().any(is_pictographic) || is_keycap_sequence(grapheme) {
    return true;
  }

  is_text_default_symbol(first) && grapheme.contains(VARIATION_SELECTOR)
}

fn is_keycap_sequence(grapheme: &str) -> bool {
  let chars: Vec<char> = grapheme.chars().collect();
  let is_keycap_base = |ch: char| matches!(ch, '0'..='9' | '#' | '*');

  match chars.as_slice() {
    [base, KEYCAP] => is_keycap_base(*base),
    [base, VARIATION_SELECTOR, KEYCAP] => is_keycap_base(*base),
    _ => false,
  }
}

/// Code points drawn as emoji without a presentation selector.
fn is_pictographic(ch: char) -> bool {
  matches!(ch as u32,
    0x1F000..=0x1F02F | // Mahjong tiles
    0x1F0A0..=0x1F0FF | // Playing cards
    0x1F100..=0x1F1FF | // Enclosed alphanumerics, regional indicators
    0x1F200..=0x1F2FF | // Enclosed ideographic supplement
    0x1F300..=0x1F5FF | // Misc symbols and pictographs
    0x1F600..=0x1F64F | // Emoticons
    0x1F680..=0x1F6FF | // Transport and map
    0x1F900..=0x1F9FF | // Supplemental symbols and pictographs
    0x1FA70..=0x1FAFF | // Symbols and pictographs extended-A
    0x2600..=0x26FF |   // Misc symbols
    0x2700..=0x27BF |   // Dingbats
    0x231A..=0x231B |
    0x23E9..=0x23F3 |
    0x23F8..=0x23FA |
    0x25AA..=0x25AB |
    0x25B6 |
    0x25C0 |
    0x25FB..=0x25FE |
    0x2934..=0x2935 |
    0x2B05..=0x2B07 |
    0x2B1B..=0x2B1C |
    0x2B50 |
    0x2B55 |
    0x3030 |
    0x303D |
    0x3297 |
    0x3299
  )
}

/// Symbols that only become emoji when followed by U+FE0F.
fn is_text_default_symbol(ch: char) -> bool {
  matches!(ch as u32,
    0x00A9 | 0x00AE | 0x203C | 0x2049 | 0x2122 | 0x2139 |
    0x2194..=0x2199 | 0x21A9..=0x21AA | 0x2328 | 0x23CF | 0x24C2
  )
}
