use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArmoryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Command build error: {0}")]
    CommandBuild(String),

    #[error("No terminal emulator available")]
    TerminalUnavailable,

    #[error("Launch error: {0}")]
    Launch(String),

    #[error("Invalid value for '{param}': {reason}")]
    Validation { param: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ArmoryError {
    pub fn validation(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            param: param.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArmoryError>;
