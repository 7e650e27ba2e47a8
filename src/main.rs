//! emoticon-filter - Convert emoji short codes, Unicode and image markup
//!
//! This is the main entry point for the CLI application.

#[tokio::main]
async fn main() {
  emoticon_filter::cli::run().await;
}
