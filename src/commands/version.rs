//! Version/metadata reporting.
//!
//! Implements `emoticon-filter version`, printing either a colored summary or
//! a JSON document describing the build.

use serde_json::json;

use crate::color::ColorScheme;

/// Render version and build metadata in JSON or human-readable form.
///
/// # Arguments
/// * `json` - When `true`, emit a JSON document instead of colored text.
/// * `short` - When `true`, print only the semantic version string.
/// * `colors` - Shared color palette for styled terminal output.
pub(crate) fn handle_version_command(json: bool, short: bool, colors: &ColorScheme) {
  let version = env!("CARGO_PKG_VERSION");

  if short {
    println!("{version}");
    return;
  }

  let info = BuildInfo::embedded();

  if json {
    println!("{}", info.to_json(version));
  } else {
    println!("{} {}", colors.emphasis("emoticon-filter"), colors.number(version));
    println!("{}: {}", colors.emphasis("Git commit"), colors.code(info.git_hash));
    println!(
      "{}: {}",
      colors.emphasis("Built"),
      colors.dimmed(format_timestamp(info.build_timestamp))
    );
    println!("{}: {}", colors.emphasis("Target"), info.target);
    println!("{}: {}", colors.emphasis("Rust version"), info.rustc_version);
  }
}

/// Build metadata captured by `build.rs`.
struct BuildInfo {
  git_hash: &'static str,
  build_timestamp: &'static str,
  target: &'static str,
  rustc_version: &'static str,
}

impl BuildInfo {
  fn embedded() -> Self {
    Self {
      git_hash: env!("GIT_HASH"),
      build_timestamp: env!("BUILD_TIMESTAMP"),
      target: env!("TARGET"),
      rustc_version: env!("RUSTC_VERSION"),
    }
  }

  fn to_json(&self, version: &str) -> String {
    let document = json!({
      "version": version,
      "git_commit": self.git_hash,
      "build_timestamp": format_timestamp(self.build_timestamp),
      "target": self.target,
      "rust_version": self.rustc_version,
    });
    serde_json::to_string_pretty(&document).unwrap_or_else(|_| document.to_string())
  }
}

/// Convert the embedded build timestamp into a human-readable ISO-8601 string.
///
/// Returns the raw input when it is not a Unix epoch in seconds.
fn format_timestamp(timestamp: &str) -> String {
  timestamp
    .parse::<i64>()
    .ok()
    .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
    .map(|datetime| datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string())
    .unwrap_or_else(|| timestamp.to_string())
}
