//! # Application Layer
//!
//! Interfaces the engine depends on, and the use cases orchestrating them:
//! conversation dispatch, transcript storage and model discovery.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
