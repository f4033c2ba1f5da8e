pub mod chat_controller;
pub mod config_controller;
pub mod models_controller;

pub use chat_controller::ChatController;
pub use config_controller::ConfigController;
pub use models_controller::ModelsController;
