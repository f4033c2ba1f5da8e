use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Preference error: {0}")]
    PreferenceError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn preference(msg: impl Into<String>) -> Self {
        Self::PreferenceError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Failure of a single provider call.
///
/// The `Display` output is the exact text that lands in the transcript, so a
/// failed call still produces an assistant turn the user can read.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No response was received (connection refused, DNS, TLS, ...).
    #[error("{provider} Error: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    /// The remote answered with a non-2xx status.
    #[error("{provider} Error: {status} {detail}")]
    Rejected {
        provider: &'static str,
        status: u16,
        detail: String,
    },

    /// The body could not be read or was not the JSON we expected.
    #[error("{provider} Parse Error: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn transport(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            message: message.into(),
        }
    }

    pub fn rejected(provider: &'static str, status: u16, detail: impl Into<String>) -> Self {
        Self::Rejected {
            provider,
            status,
            detail: detail.into(),
        }
    }

    pub fn malformed(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            provider,
            message: message.into(),
        }
    }
}
