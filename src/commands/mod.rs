//! CLI subcommand handlers.
//!
//! One module per `emoticon-filter` subcommand. The transform handlers share
//! dataset loading and stdin handling.

pub mod completions;
pub mod transform;
pub mod version;
