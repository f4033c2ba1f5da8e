mod console_presenter;
mod gemini_model_catalog;
mod gemini_provider;
mod in_memory_preference_store;
mod json_preference_store;
mod openai_provider;

pub use console_presenter::*;
pub use gemini_model_catalog::*;
pub use gemini_provider::{GeminiProvider, NO_RESPONSE_TEXT};
pub use in_memory_preference_store::*;
pub use json_preference_store::*;
pub use openai_provider::{OpenAiProvider, NO_CONTENT, OPENAI_MODEL};
