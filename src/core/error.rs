use thiserror::Error;

#[derive(Error, Debug)]
pub enum HallError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Unknown simulation mode: {0}")]
    UnknownMode(String),

    #[error("Unknown analysis focus: {0}")]
    UnknownFocus(String),

    #[error("Remote analysis error: {0}")]
    RemoteError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, HallError>;
