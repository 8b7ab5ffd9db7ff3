use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use campus_core::errors::CampusError;

#[derive(Debug)]
pub struct CampusAxumError(pub anyhow::Error);

impl From<anyhow::Error> for CampusAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl From<CampusError> for CampusAxumError {
    fn from(e: CampusError) -> Self {
        Self(e.into_anyhow())
    }
}

impl IntoResponse for CampusAxumError {
    fn into_response(self) -> Response {
        // A CampusError anywhere in the chain keeps its status and shape
        let safe = match CampusError::find_in(&self.0) {
            Some(campus) => campus.sanitize_for_client(),
            None => {
                tracing::error!(error = %self.0, "unhandled error");
                CampusError::general_error("Internal server error")
            }
        };

        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
