use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncoreError {
    #[error("Event source error: {0}")]
    EventSource(String),

    #[error("Vote store error: {0}")]
    VoteStore(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
