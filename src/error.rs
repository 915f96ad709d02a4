use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("retrieval failed for {source_id}: {reason}")]
    Retrieval { source_id: String, reason: String },

    #[error("background task failed: {0}")]
    Task(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("toml write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScoreError>;
