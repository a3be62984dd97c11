//! Proxy handler
//!
//! Every path and method lands in one fallback handler. The request is
//! captured, forwarded upstream (unless proxying is off) and recorded as ammo
//! when the upstream answered below 300, or always with `save_all`.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, Method, StatusCode, Uri, Version, header},
    response::{IntoResponse, Response},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::DispatcherConfig;
use crate::payload::{PayloadError, PayloadWriter};
use crate::request::CapturedRequest;

/// Shared state of the dispatcher
#[derive(Debug)]
pub struct AppState {
    config: DispatcherConfig,
    client: reqwest::Client,
    payloads: PayloadWriter,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: DispatcherConfig) -> Result<SharedState, reqwest::Error> {
        // Redirects go back to the client untouched
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        let payloads = PayloadWriter::new(config.output_dir.clone());

        info!(
            "Recording ammo to {} (proxy: {}, save all: {}, skip static: {})",
            payloads.dir().display(),
            config.proxy,
            config.save_all,
            config.skip_static
        );

        Ok(Arc::new(Self {
            config,
            client,
            payloads,
        }))
    }
}

/// Create the dispatcher router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug)]
pub enum DispatchError {
    Upstream(reqwest::Error),
    Payload(PayloadError),
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        match self {
            DispatchError::Upstream(err) => {
                error!("Upstream request failed: {}", err);
                (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
            }
            DispatchError::Payload(err) => {
                error!("Failed to save request: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

async fn dispatch(
    State(state): State<SharedState>,
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, DispatchError> {
    let config = &state.config;
    let request = CapturedRequest::capture(
        &method,
        &uri,
        version,
        &headers,
        body,
        config.target.as_deref(),
    );

    if !config.proxy {
        state
            .payloads
            .save(&request, config.skip_static)
            .await
            .map_err(DispatchError::Payload)?;
        return Ok("request is saved".into_response());
    }

    let upstream = state
        .client
        .request(method, request.upstream_url(config.scheme()))
        .headers(end_to_end(&headers))
        .body(request.body.clone())
        .send()
        .await
        .map_err(DispatchError::Upstream)?;

    let status = upstream.status();
    if status.as_u16() < 300 || config.save_all {
        if let Err(err) = state.payloads.save(&request, config.skip_static).await {
            error!("Failed to save {} {}: {}", request.method, request.uri, err);
        }
    }

    let response_headers = end_to_end(upstream.headers());
    let body = upstream.bytes().await.map_err(DispatchError::Upstream)?;

    Ok((status, response_headers, body).into_response())
}

/// Headers that belong to one connection and are not forwarded
fn is_hop_by_hop(name: &HeaderName) -> bool {
    *name == header::CONNECTION
        || *name == header::TRANSFER_ENCODING
        || *name == header::TE
        || *name == header::TRAILER
        || *name == header::UPGRADE
        || *name == header::PROXY_AUTHORIZATION
        || *name == header::HOST
        || *name == header::CONTENT_LENGTH
        || name.as_str() == "keep-alive"
        || name.as_str() == "proxy-connection"
}

fn end_to_end(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_by_hop(name) {
            forwarded.append(name.clone(), value.clone());
        }
    }
    forwarded
}
