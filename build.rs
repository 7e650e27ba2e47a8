//! Build script for emoticon-filter
//!
//! Embeds version and build metadata for the `version` subcommand

use std::env;
use std::process::Command;

fn main() {
  embed_build_info();
  set_rerun_conditions();
}

/// Exposes build metadata to the crate as `rustc-env` variables.
///
/// - `GIT_HASH`: short commit hash, `unknown` outside a checkout
/// - `BUILD_TIMESTAMP`: Unix seconds at build time
/// - `TARGET`: target triple
/// - `RUSTC_VERSION`: compiler version string
fn embed_build_info() {
  let git_hash = command_output("git", &["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".to_string());
  println!("cargo:rustc-env=GIT_HASH={git_hash}");

  let timestamp = std::time::SystemTime::now()
    .duration_since(std::time::UNIX_EPOCH)
    .map(|elapsed| elapsed.as_secs())
    .unwrap_or_default();
  println!("cargo:rustc-env=BUILD_TIMESTAMP={timestamp}");

  println!("cargo:rustc-env=TARGET={}", env::var("TARGET").unwrap_or_default());

  let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
  let rustc_version = command_output(&rustc, &["--version"]).unwrap_or_else(|| "unknown".to_string());
  println!("cargo:rustc-env=RUSTC_VERSION={rustc_version}");
}

/// Trimmed stdout of a successful command, if any.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
  let output = Command::new(program).args(args).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let text = String::from_utf8(output.stdout).ok()?.trim().to_string();
  (!text.is_empty()).then_some(text)
}

fn set_rerun_conditions() {
  println!("cargo:rerun-if-changed=build.rs");

  // Commit hash changes with HEAD
  println!("cargo:rerun-if-changed=.git/HEAD");

  println!("cargo:rerun-if-env-changed=TARGET");
}
