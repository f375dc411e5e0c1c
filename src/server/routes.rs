//! HTTP routes
//!
//! Thin handlers that authorize, parse form parameters, and call into the
//! [`ChannelRegistry`]. All responses are plain text.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, Query, State};
use axum::http::header::{AUTHORIZATION, LOCATION};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{any, post};
use axum::Router;
use serde::Deserialize;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::config::ServerConfig;
use super::error::ApiError;
use crate::registry::{ChannelId, ChannelRegistry};

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ChannelRegistry>,
    auth_key: Arc<str>,
}

impl AppState {
    pub fn new(registry: Arc<ChannelRegistry>, auth_key: &str) -> Self {
        Self {
            registry,
            auth_key: Arc::from(auth_key),
        }
    }

    /// Check the shared secret in the `Authorization` header
    ///
    /// An empty configured key never authorizes anything.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let provided = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

        match provided {
            Some(key) if !self.auth_key.is_empty() && key == &*self.auth_key => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// Build the router with request tracing and timeout layers
pub fn router(registry: Arc<ChannelRegistry>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/v1/whep/endpoint", any(whep_endpoint_query))
        .route("/v1/whep/endpoint/:channel_id", any(whep_endpoint_path))
        .route("/v1/whip/endpoint", any(whip_endpoint))
        .route("/v1/state/start_stream", post(start_stream))
        .route("/v1/state/end_stream", post(end_stream))
        .route("/v1/state/heartbeat", post(heartbeat))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(registry, &config.auth_key))
}

/// Form fields accepted by the state routes
#[derive(Debug, Default, Deserialize)]
pub struct StreamForm {
    pub channel_id: Option<String>,
    pub endpoint: Option<String>,
}

fn parse_channel_id(raw: Option<&str>) -> Result<ChannelId, ApiError> {
    raw.filter(|s| !s.is_empty())
        .ok_or(ApiError::InvalidParameters)?
        .parse()
        .map_err(|_| ApiError::InvalidParameters)
}

fn parse_form(form: Result<Form<StreamForm>, FormRejection>) -> Result<StreamForm, ApiError> {
    match form {
        Ok(Form(form)) => Ok(form),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected form body");
            Err(ApiError::InvalidParameters)
        }
    }
}

/// Percent-escape every non-ASCII byte so the endpoint fits in a header
fn escape_non_ascii(endpoint: &str) -> String {
    let mut escaped = String::with_capacity(endpoint.len());
    for byte in endpoint.bytes() {
        if byte.is_ascii() {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{:02X}", byte));
        }
    }
    escaped
}

fn location_header(endpoint: &str) -> Option<HeaderValue> {
    HeaderValue::try_from(escape_non_ascii(endpoint)).ok()
}

async fn redirect_to_channel(state: &AppState, id: ChannelId) -> Result<impl IntoResponse, ApiError> {
    let endpoint = state.registry.resolve(id).await?;
    let location = location_header(&endpoint).ok_or_else(|| {
        tracing::error!(channel = %id, "Stored endpoint is not a valid Location header");
        ApiError::BadEndpoint
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]))
}

/// ANY /v1/whep/endpoint/:channel_id
pub async fn whep_endpoint_path(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_channel_id(Some(&raw))?;
    redirect_to_channel(&state, id).await
}

#[derive(Debug, Deserialize)]
pub struct ChannelQuery {
    pub channel_id: Option<String>,
}

/// ANY /v1/whep/endpoint?channel_id=N
pub async fn whep_endpoint_query(
    State(state): State<AppState>,
    query: Option<Query<ChannelQuery>>,
) -> Result<impl IntoResponse, ApiError> {
    let raw = query.and_then(|Query(q)| q.channel_id);
    let id = parse_channel_id(raw.as_deref())?;
    redirect_to_channel(&state, id).await
}

/// ANY /v1/whip/endpoint
pub async fn whip_endpoint() -> impl IntoResponse {
    (StatusCode::NOT_IMPLEMENTED, "Not implemented")
}

/// POST /v1/state/start_stream
pub async fn start_stream(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<StreamForm>, FormRejection>,
) -> Result<impl IntoResponse, ApiError> {
    state.authorize(&headers)?;
    let form = parse_form(form)?;

    let id = parse_channel_id(form.channel_id.as_deref())?;
    let endpoint = form
        .endpoint
        .filter(|e| !e.is_empty())
        .ok_or(ApiError::InvalidParameters)?;
    // The endpoint is echoed back as a Location header, so it must be one
    if location_header(&endpoint).is_none() {
        return Err(ApiError::InvalidParameters);
    }

    state.registry.register(id, endpoint).await;
    Ok((StatusCode::ACCEPTED, "Accepted"))
}

/// POST /v1/state/end_stream
pub async fn end_stream(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<StreamForm>, FormRejection>,
) -> Result<impl IntoResponse, ApiError> {
    state.authorize(&headers)?;
    let form = parse_form(form)?;
    let id = parse_channel_id(form.channel_id.as_deref())?;

    state.registry.unregister(id).await;
    Ok((StatusCode::OK, "OK"))
}

/// POST /v1/state/heartbeat
pub async fn heartbeat(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<StreamForm>, FormRejection>,
) -> Result<impl IntoResponse, ApiError> {
    state.authorize(&headers)?;
    let form = parse_form(form)?;
    let id = parse_channel_id(form.channel_id.as_deref())?;

    state.registry.heartbeat(id).await?;
    Ok((StatusCode::OK, "OK"))
}
