//! Command-line interface definitions for emoticon-filter.
//!
//! The CLI loads an emoji dataset and runs one of the filter transforms over
//! an argument or stdin, printing the result to stdout. Diagnostics go to
//! stderr so the output can be piped.

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::color::ColorScheme;
use crate::commands::completions::handle_completions_command;
use crate::commands::transform::{Transform, handle_transform_command};
use crate::commands::version::handle_version_command;
use crate::filter::render::RenderOptions;
use crate::filter::{DEFAULT_PROCESSED_MARKER, DEFAULT_STATIC_PATH, FilterConfig};

/// emoticon-filter - Convert emoji short codes, Unicode and image markup
#[derive(Debug, Parser)]
#[command(
  name = "emoticon-filter",
  version,
  about = "Convert emoji short codes, Unicode emoji and image markup",
  long_about = "Runs the chat emoticon filter over text.\n\
                Renders :short_codes: and Unicode emoji as image markup, substitutes Unicode for\n\
                short codes before sending, or maps Unicode back to short codes.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Dictionary options
  #[command(flatten)]
  pub dictionary: DictionaryOptions,

  /// Rendering options
  #[command(flatten)]
  pub render: RenderArgs,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

/// Transforms and utilities
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Render short codes and Unicode emoji as inline image markup
  Incoming {
    /// Text to transform (reads stdin when omitted)
    #[arg(value_name = "TEXT")]
    text: Option<String>,
  },

  /// Replace short codes with literal Unicode emoji
  Outgoing {
    /// Text to transform (reads stdin when omitted)
    #[arg(value_name = "TEXT")]
    text: Option<String>,
  },

  /// Replace Unicode emoji with short codes
  Shortcodes {
    /// Text to transform (reads stdin when omitted)
    #[arg(value_name = "TEXT")]
    text: Option<String>,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

impl Command {
  /// The transform this command runs and its inline text, if any.
  pub fn transform(&self) -> Option<(Transform, Option<&str>)> {
    match self {
      Command::Incoming { text } => Some((Transform::Incoming, text.as_deref())),
      Command::Outgoing { text } => Some((Transform::Outgoing, text.as_deref())),
      Command::Shortcodes { text } => Some((Transform::ShortCodes, text.as_deref())),
      Command::Version { .. } | Command::Completions { .. } => None,
    }
  }
}

/// Shells supported by `completions`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  Powershell,
  Elvish,
}

/// Dictionary options
#[derive(Debug, Parser)]
pub struct DictionaryOptions {
  /// JSON emoji dataset (`[{"n": name, "u": emoji}, ...]`)
  #[arg(long, env = "EMOTICON_DATASET", value_name = "FILE")]
  pub dataset: Option<String>,
}

/// Rendering options
#[derive(Debug, Parser)]
pub struct RenderArgs {
  /// Base URL of the static asset host
  #[arg(long, env = "EMOTICON_STATIC_PATH", default_value = DEFAULT_STATIC_PATH, value_name = "URL")]
  pub static_path: String,

  /// Glyph image size in pixels
  #[arg(long, default_value = "72", value_name = "N")]
  pub glyph_size: u32,

  /// Glyph image file extension
  #[arg(long, default_value = ".png", value_name = "EXT")]
  pub extension: String,

  /// Key recorded on messages this filter has processed
  #[arg(long, default_value = DEFAULT_PROCESSED_MARKER, value_name = "KEY")]
  pub marker: String,
}

impl RenderArgs {
  /// Build the filter configuration from these options.
  pub fn filter_config(&self) -> FilterConfig {
    FilterConfig {
      static_path: self.static_path.clone(),
      render: RenderOptions {
        glyph_size: self.glyph_size,
        extension: self.extension.clone(),
      },
      processed_marker: self.marker.clone(),
    }
  }
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

impl Cli {
  /// Parse CLI arguments from the environment
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if self.command.transform().is_some() && self.dictionary.dataset.is_none() {
      return Err("--dataset (or EMOTICON_DATASET) is required for transforms".to_string());
    }

    if self.render.glyph_size == 0 {
      return Err("--glyph-size must be at least 1".to_string());
    }

    if !self.render.extension.starts_with('.') || self.render.extension.len() < 2 {
      return Err("--extension must look like \".png\"".to_string());
    }

    if self.render.marker.trim().is_empty() {
      return Err("--marker must not be empty".to_string());
    }

    Ok(())
  }
}

/// Parse CLI arguments, initialize shared services, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse_args();

  init_tracing(&cli.behavior);

  let colors = ColorScheme::new(cli.behavior.color);

  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    Command::Version { json, short } => handle_version_command(*json, *short, &colors),
    Command::Completions { shell } => handle_completions_command(*shell),
    command => {
      if let Some((transform, text)) = command.transform() {
        handle_transform_command(transform, text, &cli, &colors).await;
      }
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
