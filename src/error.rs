use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CliError {
    pub message: String,
    pub exit_code: i32,
}

impl CliError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: 2,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: 3,
        }
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: 4,
        }
    }

    /// Malformed share token or backup payload.
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: 5,
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: 6,
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: 7,
        }
    }
}
