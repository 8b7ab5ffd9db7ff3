use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures talking to the hosted database's REST endpoint.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid store url: {0}")]
    InvalidUrl(String),

    #[error("Missing service key")]
    MissingKey,

    #[error("Service key is not a valid header value")]
    InvalidKey,

    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store returned {status}: {body}")]
    Status { status: u16, body: String },
}
