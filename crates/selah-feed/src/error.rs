use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("not found")]
    NotFound,

    #[error("invalid request: {0}")]
    Invalid(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
