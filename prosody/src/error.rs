use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProsodyError {
    #[error("Text cannot be empty")]
    EmptyInput,

    #[error("Chunk index {index} out of range ({total} chunks)")]
    ChunkIndexOutOfRange { index: usize, total: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ProsodyError>;
