use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation (/new, /dismiss, /quit)
    Chat,

    /// Send one message in a fresh conversation and print the transcript
    Ask {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        message: Vec<String>,
    },

    /// List Gemini models usable with the saved Gemini key
    Models {
        /// Save this model for Gemini conversations
        #[arg(short, long)]
        select: Option<String>,
    },

    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print current settings with keys masked
    Show,

    /// Choose the active backend
    Provider {
        /// openai or gemini
        name: String,
    },

    /// Save an API key for a backend
    Key { provider: String, key: String },

    /// Replace the system prompt
    Prompt {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        prompt: Vec<String>,
    },

    /// Set the Gemini model without checking availability
    Model { model: String },
}
