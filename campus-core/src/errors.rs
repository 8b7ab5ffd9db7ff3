//! # Errors
//!
//! Campus answers HTTP clients with one error shape:
//! `{ "name", "message", "code", "className" }`.
//!
//! A [`CampusError`] travels inside `anyhow::Error` through handlers and
//! integrations and is recovered at the transport edge with
//! [`CampusError::find_in`]. The resolvers never raise these; they degrade.

use std::fmt;

use anyhow::Error as AnyError;

pub type CampusResult<T> = std::result::Result<T, AnyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotAuthenticated,
    NotFound,
    Unprocessable,
    GeneralError,
    BadGateway,
    Unavailable,
}

impl ErrorKind {
    // (status, name, className)
    fn parts(self) -> (u16, &'static str, &'static str) {
        match self {
            ErrorKind::NotAuthenticated => (401, "NotAuthenticated", "not-authenticated"),
            ErrorKind::NotFound => (404, "NotFound", "not-found"),
            ErrorKind::Unprocessable => (422, "Unprocessable", "unprocessable"),
            ErrorKind::GeneralError => (500, "GeneralError", "general-error"),
            ErrorKind::BadGateway => (502, "BadGateway", "bad-gateway"),
            ErrorKind::Unavailable => (503, "Unavailable", "unavailable"),
        }
    }

    pub fn status_code(self) -> u16 {
        self.parts().0
    }

    pub fn name(self) -> &'static str {
        self.parts().1
    }

    pub fn class_name(self) -> &'static str {
        self.parts().2
    }
}

#[derive(Debug)]
pub struct CampusError {
    pub kind: ErrorKind,
    pub message: String,
    /// Underlying failure. Logged, never sent to clients.
    pub source: Option<AnyError>,
}

impl CampusError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: AnyError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn into_anyhow(self) -> AnyError {
        AnyError::new(self)
    }

    /// First `CampusError` in the chain, looking through `.context(...)` layers.
    pub fn find_in(err: &AnyError) -> Option<&CampusError> {
        err.chain().find_map(|e| e.downcast_ref::<CampusError>())
    }

    /// Same kind and message, without the source.
    pub fn sanitize_for_client(&self) -> CampusError {
        CampusError::new(self.kind, self.message.clone())
    }

    pub fn not_authenticated(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAuthenticated, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unprocessable, msg)
    }

    pub fn general_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::GeneralError, msg)
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadGateway, msg)
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, msg)
    }
}

impl fmt::Display for CampusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.kind.name(), self.code(), self.message)
    }
}

impl std::error::Error for CampusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| &**e as &(dyn std::error::Error + 'static))
    }
}

#[cfg(feature = "serde")]
impl CampusError {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.kind.name(),
            "message": self.message,
            "code": self.code(),
            "className": self.kind.class_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_status_and_names() {
        let e = CampusError::bad_gateway("School directory is unavailable");
        assert_eq!(e.code(), 502);
        assert_eq!(e.kind.name(), "BadGateway");
        assert_eq!(e.kind.class_name(), "bad-gateway");
        assert_eq!(e.to_string(), "BadGateway (502): School directory is unavailable");
    }

    #[test]
    fn find_in_sees_through_context() {
        let err = CampusError::bad_gateway("store down")
            .into_anyhow()
            .context("loading school");
        assert_eq!(CampusError::find_in(&err).map(|e| e.code()), Some(502));
        assert!(CampusError::find_in(&anyhow::anyhow!("plain")).is_none());
    }

    #[test]
    fn sanitize_drops_source() {
        let e = CampusError::unavailable("Messaging is not configured")
            .with_source(anyhow::anyhow!("api key sk_live_123 rejected"));
        assert!(e.source.is_some());

        let safe = e.sanitize_for_client();
        assert!(safe.source.is_none());
        assert_eq!(safe.message, "Messaging is not configured");
    }
}
