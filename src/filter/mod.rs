//! The emoticon filter.
//!
//! Converts between `:short_codes:`, Unicode emoji and inline image markup
//! for chat messages.
//!
//! # Architecture
//!
//! Every transform is a pipeline of pure stages over a list of
//! [`Segment`](literal::Segment)s:
//! - [`literal`] - splits out fenced spans and `<pre>` elements that must not
//!   be rewritten
//! - [`shortcode`] - finds `:name:` tokens and resolves them
//! - [`render`] - turns Unicode emoji into `<img>` markup and applies the
//!   single-glyph enlargement
//! - [`reverse`] - maps Unicode back to short codes
//!
//! Generated markup is stored as its own segment, so no stage ever rescans
//! the output of an earlier one.
//!
//! # Example
//!
//! ```
//! use emoticon_filter::dictionary::{EmojiDictionary, EmojiEntry};
//! use emoticon_filter::filter::{EmoticonFilter, FilterConfig};
//!
//! let dictionary = EmojiDictionary::new(&[EmojiEntry::new("wave", "👋")]);
//! let filter = EmoticonFilter::new(dictionary, FilterConfig::default());
//! let dictionary = filter.ready().unwrap();
//!
//! assert_eq!(filter.outgoing_text(&dictionary, "hi :wave:"), "hi 👋");
//! assert!(filter.incoming_html(&dictionary, "hi :wave:").contains(r#"alt="👋""#));
//! ```

pub mod literal;
pub mod render;
pub mod reverse;
pub mod shortcode;

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{debug, error, trace};

use self::literal::Segment;
use self::render::{GlyphRequest, RenderOptions, ResourcePaths, TwemojiRenderer, UnicodeRenderer};
use crate::dictionary::{DictionaryProvider, EmojiDictionary};
use crate::message::{Message, MessageHook};

/// Default host the glyph images are served from.
pub const DEFAULT_STATIC_PATH: &str = "https://eu.static.mega.co.nz/4/";
/// Default key recorded in [`Message::processed_by`].
pub const DEFAULT_PROCESSED_MARKER: &str = "emojiFltr";

/// Settings that control how the filter renders and marks messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
  /// Base URL of the static asset host.
  pub static_path: String,
  /// Glyph size and extension requested for images.
  pub render: RenderOptions,
  /// Key identifying this filter instance in `processed_by`.
  pub processed_marker: String,
}

impl Default for FilterConfig {
  fn default() -> Self {
    Self {
      static_path: DEFAULT_STATIC_PATH.to_string(),
      render: RenderOptions::default(),
      processed_marker: DEFAULT_PROCESSED_MARKER.to_string(),
    }
  }
}

type DictionaryFuture = Shared<BoxFuture<'static, Arc<EmojiDictionary>>>;

/// Bidirectional emoticon transform engine.
///
/// The dictionary arrives through a shared future. Hook calls made before it
/// resolves wait for it and then run against the complete dictionary.
pub struct EmoticonFilter {
  dictionary: DictionaryFuture,
  renderer: Arc<dyn UnicodeRenderer>,
  paths: ResourcePaths,
  config: FilterConfig,
}

impl EmoticonFilter {
  /// Create a filter around an already loaded dictionary.
  pub fn new(dictionary: EmojiDictionary, config: FilterConfig) -> Self {
    let ready = futures::future::ready(Arc::new(dictionary)).boxed().shared();
    let filter = Self::from_future(ready, config);
    // Drive the ready future once so `ready()` reports it immediately.
    filter.dictionary.clone().now_or_never();
    filter
  }

  /// Create a filter whose dictionary is still being loaded by `provider`.
  ///
  /// When called inside a Tokio runtime the load starts right away; otherwise
  /// it runs the first time a transform waits for it. A failed load is logged
  /// and replaced by an empty dataset, so waiting transforms still complete.
  pub fn loading(provider: Arc<dyn DictionaryProvider>, config: FilterConfig) -> Self {
    let load = async move {
      match EmojiDictionary::load(provider.as_ref()).await {
        Ok(dictionary) => Arc::new(dictionary),
        Err(e) => {
          error!("Failed to load emoji dataset: {e:#}");
          Arc::new(EmojiDictionary::default())
        }
      }
    }
    .boxed()
    .shared();

    if let Ok(runtime) = tokio::runtime::Handle::try_current() {
      runtime.spawn(load.clone());
    }

    Self::from_future(load, config)
  }

  fn from_future(dictionary: DictionaryFuture, config: FilterConfig) -> Self {
    Self {
      dictionary,
      renderer: Arc::new(TwemojiRenderer),
      paths: ResourcePaths::new(&config.static_path),
      config,
    }
  }

  /// Replace the Unicode render engine.
  pub fn with_renderer(mut self, renderer: Arc<dyn UnicodeRenderer>) -> Self {
    self.renderer = renderer;
    self
  }

  pub fn config(&self) -> &FilterConfig {
    &self.config
  }

  /// The dictionary, if it has finished loading.
  pub fn ready(&self) -> Option<Arc<EmojiDictionary>> {
    self.dictionary.peek().cloned()
  }

  /// Wait for the dictionary to finish loading.
  pub async fn when_ready(&self) -> Arc<EmojiDictionary> {
    self.dictionary.clone().await
  }

  /// Render message text or HTML with inline emoji images.
  ///
  /// Fenced spans and `<pre>` elements come back unchanged. A message that is
  /// exactly one emoji gets the large marker class.
  ///
  /// # Arguments
  /// * `dictionary` - Loaded dictionary used to resolve short codes.
  /// * `contents` - Decrypted text or upstream HTML. Sanitizing it is the
  ///   caller's job.
  ///
  /// # Returns
  /// The rewritten HTML; empty input yields an empty string.
  pub fn incoming_html(&self, dictionary: &EmojiDictionary, contents: &str) -> String {
    if contents.is_empty() {
      return String::new();
    }

    let segments = literal::protect(contents);
    let segments = shortcode::resolve_incoming(segments, dictionary, &|symbol| self.reserved_markup(symbol));
    let segments = self.render_segments(segments);
    let html = render::enlarge_single_glyph(literal::restore(&segments));

    trace!("Incoming transform: {contents:?} -> {html:?}");
    html
  }

  /// Substitute literal Unicode for known short codes before sending.
  ///
  /// Reserved codes and unknown codes stay as typed.
  pub fn outgoing_text(&self, dictionary: &EmojiDictionary, contents: &str) -> String {
    if contents.is_empty() {
      return String::new();
    }

    let segments = shortcode::resolve_outgoing(literal::protect(contents), dictionary);
    literal::restore(&segments)
  }

  /// Map Unicode emoji in `text` back to short codes.
  pub fn short_codes(&self, dictionary: &EmojiDictionary, text: &str) -> String {
    reverse::to_short_codes(dictionary, text)
  }

  /// [`incoming_html`](Self::incoming_html) once the dictionary is loaded.
  pub async fn incoming(&self, contents: &str) -> String {
    let dictionary = self.when_ready().await;
    self.incoming_html(&dictionary, contents)
  }

  /// [`outgoing_text`](Self::outgoing_text) once the dictionary is loaded.
  pub async fn outgoing(&self, contents: &str) -> String {
    let dictionary = self.when_ready().await;
    self.outgoing_text(&dictionary, contents)
  }

  /// [`short_codes`](Self::short_codes) once the dictionary is loaded.
  pub async fn to_short_codes(&self, text: &str) -> String {
    let dictionary = self.when_ready().await;
    self.short_codes(&dictionary, text)
  }

  /// Apply the render-side transform to a message in place.
  ///
  /// Skips messages that are still encrypted, have no text, or already carry
  /// this filter's marker. Uses `message_html` when an earlier filter set it.
  pub fn process_incoming(&self, dictionary: &EmojiDictionary, message: &mut Message) {
    let marker = &self.config.processed_marker;

    if message.decrypted == Some(false) {
      trace!("Skipping encrypted message");
      return;
    }
    if message.is_processed_by(marker) {
      trace!("Message already processed by {marker}");
      return;
    }
    let Some(text) = message.text_contents.as_deref().filter(|text| !text.is_empty()) else {
      return;
    };

    let source = message.message_html.as_deref().unwrap_or(text);
    let html = self.incoming_html(dictionary, source);
    if !html.is_empty() {
      message.message_html = Some(html);
    }
    message.mark_processed_by(marker);
  }

  /// Apply the send-side transform to a message in place.
  pub fn process_outgoing(&self, dictionary: &EmojiDictionary, message: &mut Message) {
    let Some(text) = message.text_contents.as_deref().filter(|text| !text.is_empty()) else {
      return;
    };
    let rewritten = self.outgoing_text(dictionary, text);
    message.text_contents = Some(rewritten);
  }

  fn render_segments(&self, segments: Vec<Segment>) -> Vec<Segment> {
    segments
      .into_iter()
      .map(|segment| match segment {
        Segment::Text(text) => {
          let html = self
            .renderer
            .render(&text, &self.config.render, &|glyph| self.paths.locate(glyph));
          Segment::Markup(html)
        }
        protected => protected,
      })
      .collect()
  }

  fn reserved_markup(&self, symbol: char) -> String {
    let alt = symbol.to_string();
    let icon = render::icon_id(&alt);
    let size = self.config.render.size_bucket();
    let source = self.paths.locate(&GlyphRequest {
      icon: &icon,
      size: &size,
      extension: &self.config.render.extension,
    });
    render::image_markup(&alt, &source)
  }
}

#[async_trait]
impl MessageHook for EmoticonFilter {
  async fn on_before_render(&self, message: &mut Message) {
    if message.decrypted == Some(false) {
      return;
    }
    if self.ready().is_none() {
      debug!("Emoji dictionary pending, deferring render transform");
    }
    let dictionary = self.when_ready().await;
    self.process_incoming(&dictionary, message);
  }

  async fn on_before_send(&self, message: &mut Message) {
    if self.ready().is_none() {
      debug!("Emoji dictionary pending, deferring send transform");
    }
    let dictionary = self.when_ready().await;
    self.process_outgoing(&dictionary, message);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dictionary::{EmojiEntry, StaticProvider};

  fn filter() -> EmoticonFilter {
    let dictionary = EmojiDictionary::new(&[
      EmojiEntry::new("smile", "😄"),
      EmojiEntry::new("wave", "👋"),
      EmojiEntry::new("tm", "🅣"),
    ]);
    let config = FilterConfig {
      static_path: "https://static.example/".to_string(),
      ..Default::default()
    };
    EmoticonFilter::new(dictionary, config)
  }

  fn incoming(text: &str) -> String {
    let filter = filter();
    let dictionary = filter.ready().unwrap();
    filter.incoming_html(&dictionary, text)
  }

  fn outgoing(text: &str) -> String {
    let filter = filter();
    let dictionary = filter.ready().unwrap();
    filter.outgoing_text(&dictionary, text)
  }

  #[test]
  fn test_new_filter_is_ready() {
    assert!(filter().ready().is_some());
  }

  #[test]
  fn test_incoming_single_emoji_is_big() {
    insta::assert_snapshot!(
      incoming(":smile:"),
      @r#"<img class="emoji big" draggable="false" alt="😄" src="https://static.example/images/mega/twemojis/2_v2/72x72/1f604.png"/>"#
    );
  }

  #[test]
  fn test_incoming_with_text_not_big() {
    insta::assert_snapshot!(
      incoming("hi :smile:"),
      @r#"hi <img class="emoji" draggable="false" alt="😄" src="https://static.example/images/mega/twemojis/2_v2/72x72/1f604.png"/>"#
    );
  }

  #[test]
  fn test_incoming_reserved_symbol_markup() {
    insta::assert_snapshot!(
      incoming("ACME:tm: rocks"),
      @r#"ACME<img class="emoji" draggable="false" alt="™" src="https://static.example/images/mega/twemojis/2_v2/72x72/2122.png"/> rocks"#
    );
  }

  #[test]
  fn test_incoming_reserved_alone_is_big() {
    assert!(incoming(":TM:").starts_with(r#"<img class="emoji big" draggable="false" alt="™""#));
  }

  #[test]
  fn test_incoming_literal_protection() {
    assert_eq!(incoming("`:smile:`"), "`:smile:`");
    assert_eq!(incoming("```\n:wave: 👋\n```"), "```\n:wave: 👋\n```");
  }

  #[test]
  fn test_incoming_unresolved_passthrough() {
    assert_eq!(incoming(":notarealcode:"), ":notarealcode:");
  }

  #[test]
  fn test_incoming_converts_raw_unicode() {
    let html = incoming("👋 there");
    assert!(html.starts_with(r#"<img class="emoji" draggable="false" alt="👋""#));
    assert!(html.ends_with("/> there"));
  }

  #[test]
  fn test_incoming_two_emoji_not_big() {
    let html = incoming(":smile: :wave:");
    assert_eq!(html.matches("<img").count(), 2);
    assert!(!html.contains("emoji big"));
  }

  #[test]
  fn test_incoming_existing_pre_untouched() {
    assert_eq!(
      incoming("<pre>:smile: 👋</pre> :wave:").split("</pre>").next(),
      Some("<pre>:smile: 👋")
    );
  }

  #[test]
  fn test_incoming_unopened_pre_close_untouched() {
    assert_eq!(incoming("hi :smile: there</pre>"), "hi :smile: there</pre>");
    assert!(incoming("x</pre> :smile:").starts_with("x</pre> <img"));
  }

  #[test]
  fn test_incoming_empty() {
    assert_eq!(incoming(""), "");
  }

  #[test]
  fn test_outgoing_substitutes_known_codes() {
    assert_eq!(outgoing("hello :wave: :nope: :tm:"), "hello 👋 :nope: :tm:");
  }

  #[test]
  fn test_outgoing_respects_fences() {
    assert_eq!(outgoing("`:wave:` :wave:"), "`:wave:` 👋");
  }

  #[test]
  fn test_process_incoming_is_idempotent() {
    let filter = filter();
    let dictionary = filter.ready().unwrap();
    let mut message = Message::new(":smile:");

    filter.process_incoming(&dictionary, &mut message);
    let first = message.message_html.clone();
    assert!(first.as_deref().is_some_and(|html| html.contains("emoji big")));
    assert!(message.is_processed_by(DEFAULT_PROCESSED_MARKER));

    filter.process_incoming(&dictionary, &mut message);
    assert_eq!(message.message_html, first);
  }

  #[test]
  fn test_process_incoming_prefers_html() {
    let filter = filter();
    let dictionary = filter.ready().unwrap();
    let mut message = Message::new("hi :wave:");
    message.message_html = Some("<b>hi</b> :wave:".to_string());

    filter.process_incoming(&dictionary, &mut message);
    assert!(message.message_html.unwrap().starts_with("<b>hi</b> <img"));
  }

  #[test]
  fn test_process_incoming_skips_encrypted_and_empty() {
    let filter = filter();
    let dictionary = filter.ready().unwrap();

    let mut encrypted = Message::new(":smile:");
    encrypted.decrypted = Some(false);
    filter.process_incoming(&dictionary, &mut encrypted);
    assert_eq!(encrypted.message_html, None);
    assert!(encrypted.processed_by.is_empty());

    let mut empty = Message::default();
    filter.process_incoming(&dictionary, &mut empty);
    assert_eq!(empty, Message::default());
  }

  #[test]
  fn test_processed_marker_is_per_instance() {
    let dictionary = EmojiDictionary::new(&[EmojiEntry::new("smile", "😄")]);
    let config = FilterConfig {
      processed_marker: "secondary".to_string(),
      ..Default::default()
    };
    let other = EmoticonFilter::new(dictionary, config);
    let dictionary = other.ready().unwrap();

    let mut message = Message::new(":smile:");
    message.mark_processed_by(DEFAULT_PROCESSED_MARKER);
    other.process_incoming(&dictionary, &mut message);

    assert!(message.is_processed_by("secondary"));
    assert!(message.message_html.is_some());
  }

  #[test]
  fn test_round_trip_through_short_codes() {
    let filter = filter();
    let dictionary = filter.ready().unwrap();
    let sent = filter.outgoing_text(&dictionary, ":smile:");
    assert_eq!(filter.short_codes(&dictionary, &sent), ":smile:");
  }

  #[tokio::test]
  async fn test_loading_filter_waits_for_dictionary() {
    let provider = Arc::new(StaticProvider::new(vec![EmojiEntry::new("wave", "👋")]));
    let filter = EmoticonFilter::loading(provider, FilterConfig::default());

    let mut message = Message::new("hi :wave:");
    filter.on_before_send(&mut message).await;

    assert_eq!(message.text_contents.as_deref(), Some("hi 👋"));
    assert!(filter.ready().is_some());
  }
}
