mod discover_models;
mod dispatcher;
mod session_store;

pub use discover_models::*;
pub use dispatcher::*;
pub use session_store::*;
