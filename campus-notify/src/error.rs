use campus_core::CampusError;
use thiserror::Error;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Error, Debug)]
pub enum NotifyError {
    /// A required credential resolved to absent for this school.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} returned {status}: {body}")]
    Provider {
        provider: &'static str,
        status: u16,
        body: String,
    },
}

impl From<NotifyError> for CampusError {
    fn from(e: NotifyError) -> Self {
        let campus = match &e {
            NotifyError::MissingCredential(field) => {
                CampusError::unavailable(format!("Messaging is not configured ({field})"))
            }
            NotifyError::InvalidMessage(msg) => CampusError::unprocessable(msg.clone()),
            NotifyError::Http(_) | NotifyError::Provider { .. } => {
                CampusError::bad_gateway("Message provider rejected the request")
            }
        };
        campus.with_source(e.into())
    }
}
