//! Transform subcommand handlers.
//!
//! Implements `emoticon-filter incoming`, `outgoing` and `shortcodes`: load
//! the dataset named by `--dataset`, read the text, print the result.

use std::process;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::info;

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::dictionary::{EmojiDictionary, JsonFileProvider};
use crate::filter::EmoticonFilter;

/// Which filter direction a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
  /// Short codes and Unicode to image markup.
  Incoming,
  /// Short codes to Unicode.
  Outgoing,
  /// Unicode to short codes.
  ShortCodes,
}

/// Run a transform and print its output to stdout.
///
/// # Arguments
/// * `transform` - Direction to run.
/// * `text` - Inline text; stdin is read when `None`.
/// * `cli` - Parsed CLI settings (dataset path and render options).
/// * `colors` - Shared color scheme for diagnostics.
pub(crate) async fn handle_transform_command(transform: Transform, text: Option<&str>, cli: &Cli, colors: &ColorScheme) {
  match run_transform(transform, text, cli, colors).await {
    Ok(output) => println!("{output}"),
    Err(e) => {
      eprintln!("{} {}", colors.error("✗"), colors.error("Transform failed"));
      eprintln!("  {}: {e:#}", colors.emphasis("Error"));
      process::exit(1);
    }
  }
}

async fn run_transform(transform: Transform, text: Option<&str>, cli: &Cli, colors: &ColorScheme) -> Result<String> {
  let dataset = cli
    .dictionary
    .dataset
    .as_deref()
    .context("--dataset is required for transforms")?;

  let input = match text {
    Some(text) => text.to_string(),
    None => read_stdin().await?,
  };

  if !cli.behavior.quiet && cli.behavior.verbose > 0 {
    eprintln!("{} Loading dataset {}", colors.progress("→"), colors.path(dataset));
  }

  let provider = JsonFileProvider::new(dataset);
  let dictionary = EmojiDictionary::load(&provider).await?;
  info!("Loaded {} emoji names from {}", dictionary.names().len(), provider.path().display());

  let filter = EmoticonFilter::new(dictionary, cli.render.filter_config());
  let output = apply(&filter, transform, &input).await;

  if !cli.behavior.quiet && cli.behavior.verbose > 0 {
    eprintln!(
      "{} {} {} -> {} characters",
      colors.success("✓"),
      colors.code(format!("{transform:?}")),
      colors.number(input.chars().count()),
      colors.number(output.chars().count())
    );
  }

  Ok(output)
}

/// Run `transform` over `input` once the filter's dictionary is ready.
pub async fn apply(filter: &EmoticonFilter, transform: Transform, input: &str) -> String {
  match transform {
    Transform::Incoming => filter.incoming(input).await,
    Transform::Outgoing => filter.outgoing(input).await,
    Transform::ShortCodes => filter.to_short_codes(input).await,
  }
}

/// Read all of stdin, dropping one trailing newline.
async fn read_stdin() -> Result<String> {
  let mut buffer = String::new();
  tokio::io::stdin()
    .read_to_string(&mut buffer)
    .await
    .context("Failed to read text from stdin")?;

  if buffer.ends_with('\n') {
    buffer.pop();
    if buffer.ends_with('\r') {
      buffer.pop();
    }
  }
  Ok(buffer)
}
