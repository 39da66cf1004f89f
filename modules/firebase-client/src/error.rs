use thiserror::Error;

pub type Result<T> = std::result::Result<T, FirebaseError>;

#[derive(Debug, Error)]
pub enum FirebaseError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FirebaseError {
    fn from(err: reqwest::Error) -> Self {
        FirebaseError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FirebaseError {
    fn from(err: serde_json::Error) -> Self {
        FirebaseError::Parse(err.to_string())
    }
}
