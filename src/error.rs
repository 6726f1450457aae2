use thiserror::Error;

#[derive(Error, Debug)]
pub enum KubescoreError {
    #[error("duplicate check identifier: {0}")]
    DuplicateCheck(String),

    #[error("invalid version range for check {id}: {min} > {max}")]
    InvalidVersionRange {
        id: String,
        min: String,
        max: String,
    },

    #[error("invalid kubernetes version: {0}")]
    InvalidVersion(String),

    #[error("unknown check identifier in {field}: {id}")]
    UnknownCheck { field: &'static str, id: String },

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("failed to parse {name}:{line}: {message}")]
    Parse {
        name: String,
        line: usize,
        message: String,
    },

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KubescoreError>;
