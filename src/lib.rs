//! Emoticon filter library
//!
//! Converts chat message content between `:short_codes:`, Unicode emoji and
//! inline image markup, with literal spans protected from rewriting.

pub mod cli;
pub mod color;
pub mod commands;
pub mod dictionary;
pub mod filter;
pub mod message;
