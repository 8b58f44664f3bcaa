use thiserror::Error;

#[derive(Debug, Error)]
pub enum SniffError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type SniffResult<T> = Result<T, SniffError>;
