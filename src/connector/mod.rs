//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Chat backends (OpenAI chat completions, Gemini generateContent)
//! - Gemini model listing
//! - Preference storage (JSON file, in-memory)
//! - Console presentation
//!
//! `api` wires them together behind the CLI.

pub mod adapter;
pub mod api;

pub use adapter::*;
