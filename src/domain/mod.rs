//! # Domain Layer
//!
//! Conversation, message and provider models plus the error types.
//! This layer is independent of external frameworks and infrastructure.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
