use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use campus_axum::{CampusAxumError, CampusState};
use campus_core::{CampusError, TenantId};
use campus_notify::{Dispatch, Email, EmailSender, SmsSender};
use serde::Deserialize;
use serde_json::{json, Value};
use subtle::ConstantTimeEq;

pub const API_TOKEN_HEADER: &str = "x-internal-token";

pub async fn health() -> &'static str {
    "ok"
}

pub async fn marketing() -> &'static str {
    "Campus: school management for modern schools"
}

pub async fn page_not_found() -> CampusAxumError {
    CampusError::not_found("Page not found").into()
}

/// Shared handles for the notify endpoints.
#[derive(Clone)]
pub struct NotifyApi {
    token: Option<Arc<str>>,
    sms: SmsSender,
    email: EmailSender,
}

impl NotifyApi {
    pub fn new(state: &CampusState) -> Self {
        let mut sms = SmsSender::new(Arc::clone(&state.credentials));
        if let Some(base) = state.config.get("sms.base_url") {
            sms = sms.with_base_url(base);
        }
        let mut email = EmailSender::new(Arc::clone(&state.credentials));
        if let Some(base) = state.config.get("email.base_url") {
            email = email.with_base_url(base);
        }

        Self {
            token: state.config.get("notify.api_token").map(Arc::from),
            sms,
            email,
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), CampusError> {
        let Some(expected) = self.token.as_deref() else {
            return Err(CampusError::unavailable("Notify API is disabled"));
        };
        let presented = headers
            .get(API_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
            return Err(CampusError::not_authenticated("Invalid internal token"));
        }
        Ok(())
    }
}

pub fn notify_router(api: NotifyApi) -> Router<()> {
    Router::new()
        .route("/sms", post(send_sms))
        .route("/email", post(send_email))
        .with_state(api)
}

#[derive(Debug, Deserialize)]
pub struct SmsRequest {
    pub school_id: Option<String>,
    pub recipients: Vec<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub school_id: Option<String>,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

fn dispatched(d: Dispatch) -> Json<Value> {
    Json(json!({
        "provider": d.provider,
        "schoolCredentials": d.used_tenant_credentials,
        "response": d.response,
    }))
}

async fn send_sms(
    State(api): State<NotifyApi>,
    headers: HeaderMap,
    Json(req): Json<SmsRequest>,
) -> Result<Json<Value>, CampusAxumError> {
    api.authorize(&headers)?;

    let tenant = req.school_id.map(TenantId::from);
    let recipients: Vec<&str> = req.recipients.iter().map(String::as_str).collect();
    let d = api
        .sms
        .send(tenant.as_ref(), &recipients, &req.message)
        .await
        .map_err(CampusError::from)?;

    Ok(dispatched(d))
}

async fn send_email(
    State(api): State<NotifyApi>,
    headers: HeaderMap,
    Json(req): Json<EmailRequest>,
) -> Result<Json<Value>, CampusAxumError> {
    api.authorize(&headers)?;

    let tenant = req.school_id.map(TenantId::from);
    let email = Email {
        from: req.from,
        to: req.to,
        subject: req.subject,
        html: req.html,
    };
    let d = api
        .email
        .send(tenant.as_ref(), &email)
        .await
        .map_err(CampusError::from)?;

    Ok(dispatched(d))
}
