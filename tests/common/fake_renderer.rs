//! Render engine double
//!
//! `RecordingRenderer` remembers every text it is handed together with the
//! options and locator the filter supplied, and returns the text unchanged.

use std::sync::Mutex;

use emoticon_filter::filter::render::{GlyphRequest, RenderOptions, UnicodeRenderer};

/// One `render` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCall {
  pub text: String,
  pub size: String,
  pub extension: String,
  /// What the filter's locator returned for the fixed icon.
  pub location: String,
}

pub struct RecordingRenderer {
  icon: String,
  calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
  /// A renderer that asks the locator for `icon` on every call.
  pub fn new(icon: &str) -> Self {
    Self {
      icon: icon.to_string(),
      calls: Mutex::new(Vec::new()),
    }
  }

  pub fn calls(&self) -> Vec<RenderCall> {
    self.calls.lock().unwrap().clone()
  }
}

impl UnicodeRenderer for RecordingRenderer {
  fn render(&self, text: &str, options: &RenderOptions, locate: &dyn Fn(&GlyphRequest) -> String) -> String {
    let size = options.size_bucket();
    let location = locate(&GlyphRequest {
      icon: &self.icon,
      size: &size,
      extension: &options.extension,
    });

    self.calls.lock().unwrap().push(RenderCall {
      text: text.to_string(),
      size,
      extension: options.extension.clone(),
      location,
    });
    text.to_string()
  }
}
