use anyhow::Result;

use crate::cli::ConfigAction;
use crate::Commands;

use super::container::Container;
use super::controller::{ChatController, ConfigController, ModelsController};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    models_controller: ModelsController<'a>,
    config_controller: ConfigController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            models_controller: ModelsController::new(container),
            config_controller: ConfigController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat => self.chat_controller.chat().await,
            Commands::Ask { message } => self.chat_controller.ask(message.join(" ")).await,
            Commands::Models { select: None } => self.models_controller.list().await,
            Commands::Models {
                select: Some(model_id),
            } => self.models_controller.select(model_id).await,
            Commands::Config { action } => self.route_config(action).await,
        }
    }

    async fn route_config(&self, action: ConfigAction) -> Result<String> {
        match action {
            ConfigAction::Show => self.config_controller.show().await,
            ConfigAction::Provider { name } => self.config_controller.provider(name).await,
            ConfigAction::Key { provider, key } => self.config_controller.key(provider, key).await,
            ConfigAction::Prompt { prompt } => self.config_controller.prompt(prompt.join(" ")).await,
            ConfigAction::Model { model } => self.config_controller.model(model).await,
        }
    }
}
