#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("invalid user: {0}")]
    InvalidUser(String),
}
