use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaylogError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("discovery error: {0}")]
    Discovery(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("storage error: {0}")]
    Store(String),

    #[error("io error: {0}")]
    Io(String),
}

impl PlaylogError {
    /// Prefixes the message, keeping the error class.
    pub fn context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            Self::Config(m) => Self::Config(format!("{ctx}: {m}")),
            Self::Discovery(m) => Self::Discovery(format!("{ctx}: {m}")),
            Self::Parse(m) => Self::Parse(format!("{ctx}: {m}")),
            Self::Store(m) => Self::Store(format!("{ctx}: {m}")),
            Self::Io(m) => Self::Io(format!("{ctx}: {m}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlaylogError>;
