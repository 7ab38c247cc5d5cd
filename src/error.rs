use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Static data error: {0}")]
    StaticData(String),

    #[error("Legistar record error: {message}")]
    Legistar { message: String },
}

pub type Result<T> = std::result::Result<T, RosterError>;
