//! Chat message shape shared with the surrounding pipeline, and the hook
//! trait the pipeline drives.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat message as seen by filters.
///
/// The pipeline owns the message; filters only read and rewrite the text
/// fields and record themselves in `processed_by`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
  /// Plain (decrypted) message text.
  pub text_contents: Option<String>,
  /// Rendered HTML produced by earlier filters, if any.
  pub message_html: Option<String>,
  /// `Some(false)` while the payload is still encrypted.
  pub decrypted: Option<bool>,
  /// Markers of the filters that already handled this message.
  #[serde(default)]
  pub processed_by: BTreeSet<String>,
}

impl Message {
  /// A decrypted message with the given text.
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text_contents: Some(text.into()),
      ..Default::default()
    }
  }

  pub fn is_processed_by(&self, marker: &str) -> bool {
    self.processed_by.contains(marker)
  }

  pub fn mark_processed_by(&mut self, marker: &str) {
    self.processed_by.insert(marker.to_string());
  }
}

/// Callbacks a message pipeline invokes on attached filters.
#[async_trait]
pub trait MessageHook: Send + Sync {
  /// Called before a received message is rendered; may rewrite
  /// `message_html`.
  async fn on_before_render(&self, message: &mut Message);

  /// Called before a message is sent; may rewrite `text_contents`.
  async fn on_before_send(&self, message: &mut Message);
}
