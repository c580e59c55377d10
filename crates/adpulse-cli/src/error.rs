use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] adpulse_core::ValidationError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Source(#[from] adpulse_core::SourceError),

    #[error(transparent)]
    Core(#[from] adpulse_core::CoreError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::Configuration(_) => 2,
            Self::Source(_) => 3,
            Self::Core(_) | Self::Command(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
