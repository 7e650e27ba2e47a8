//! Color utilities for terminal output
//!
//! Semantic styling for the CLI's stderr diagnostics and the version report,
//! respecting the `--color` preference.

use std::fmt::Display;

use owo_colors::OwoColorize;

use crate::cli::ColorOption;

/// Color scheme for the application
pub struct ColorScheme {
  enabled: bool,
}

impl ColorScheme {
  /// Create a new color scheme based on user preference and terminal
  /// capabilities
  pub fn new(color_option: ColorOption) -> Self {
    let enabled = match color_option {
      ColorOption::Always => true,
      ColorOption::Never => false,
      ColorOption::Auto => {
        // Diagnostics are written to stderr
        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
      }
    };

    Self { enabled }
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled
  }

  fn paint<T: Display>(&self, text: T, style: impl FnOnce(&T) -> String) -> String {
    if self.enabled { style(&text) } else { text.to_string() }
  }

  /// Style for success messages (green)
  pub fn success<T: Display>(&self, text: T) -> String {
    self.paint(text, |t| t.green().to_string())
  }

  /// Style for error messages (bright red)
  pub fn error<T: Display>(&self, text: T) -> String {
    self.paint(text, |t| t.bright_red().bold().to_string())
  }

  /// Style for progress indicators (bright cyan)
  pub fn progress<T: Display>(&self, text: T) -> String {
    self.paint(text, |t| t.bright_cyan().to_string())
  }

  /// Style for emphasis/important text (bright white, bold)
  pub fn emphasis<T: Display>(&self, text: T) -> String {
    self.paint(text, |t| t.bright_white().bold().to_string())
  }

  /// Style for file paths (magenta)
  pub fn path<T: Display>(&self, text: T) -> String {
    self.paint(text, |t| t.magenta().to_string())
  }

  /// Style for numbers and metrics (bright blue)
  pub fn number<T: Display>(&self, text: T) -> String {
    self.paint(text, |t| t.bright_blue().to_string())
  }

  /// Style for commands and code (bright green)
  pub fn code<T: Display>(&self, text: T) -> String {
    self.paint(text, |t| t.bright_green().to_string())
  }

  /// Style for dimmed/secondary text
  pub fn dimmed<T: Display>(&self, text: T) -> String {
    self.paint(text, |t| t.dimmed().to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_color_scheme_disabled() {
    let scheme = ColorScheme::new(ColorOption::Never);
    assert!(!scheme.is_enabled());
    assert_eq!(scheme.success("test"), "test");
    assert_eq!(scheme.error("test"), "test");
    assert_eq!(scheme.number(42), "42");
  }

  #[test]
  fn test_color_scheme_enabled() {
    let scheme = ColorScheme::new(ColorOption::Always);
    assert!(scheme.is_enabled());
    assert_ne!(scheme.success("test"), "test");
    assert_ne!(scheme.path("emoji.json"), "emoji.json");
    assert!(scheme.error("test").contains("test"));
  }
}
