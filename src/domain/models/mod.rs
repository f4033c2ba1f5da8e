mod conversation;
mod message;
mod model_info;
mod preferences;
mod provider;
mod session;

pub use conversation::*;
pub use message::*;
pub use model_info::*;
pub use preferences::*;
pub use provider::*;
pub use session::*;
