mod chat_provider;
mod model_catalog;
mod preference_store;
mod presenter;

pub use chat_provider::*;
pub use model_catalog::*;
pub use preference_store::*;
pub use presenter::*;
