use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptMakerError {
    #[error("Unknown template: {0}")]
    TemplateNotFound(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidFieldValue { field: String, value: String },

    #[error("Field '{0}' is not a list field")]
    NotAListField(String),

    #[error("Example index {index} out of range ({len} examples)")]
    ExampleOutOfRange { index: usize, len: usize },

    #[error("Share token could not be decoded")]
    InvalidToken,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PromptMakerError>;
