//! Pass-through reverse proxy with a passive observation tap.
//!
//! Every request is forwarded verbatim to the configured upstream and the
//! response is returned unmodified: same status, same headers, same body.
//! Responses whose request path contains the transfer marker are buffered
//! and offered to the payload recognizer; recognized batches are forwarded
//! once, fire-and-forget, to the ingest task. Tap failures of any kind are
//! swallowed — the proxied flow must never notice the observation.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::header::{CONTENT_LENGTH, HOST, TRANSFER_ENCODING},
    http::{HeaderMap, StatusCode},
    response::Response,
};

use crate::error::ObserverError;
use crate::state::SharedState;

/// Fallback handler shadowing the upstream application.
pub async fn proxy_handler(
    State(state): State<SharedState>,
    req: Request,
) -> Result<Response, ObserverError> {
    let (parts, body) = req.into_parts();

    let path = parts.uri.path().to_string();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    let target = format!(
        "{}{}",
        state.config.upstream_url.trim_end_matches('/'),
        path_and_query
    );

    let request_body = to_bytes(body, usize::MAX)
        .await
        .map_err(|e| ObserverError::Upstream(format!("request body: {}", e)))?;

    // Host names the observer, content-length is re-derived from the body.
    let mut request_headers = parts.headers.clone();
    request_headers.remove(HOST);
    request_headers.remove(CONTENT_LENGTH);

    let upstream_response = state
        .http
        .request(parts.method.clone(), target)
        .headers(request_headers)
        .body(request_body)
        .send()
        .await
        .map_err(|e| ObserverError::Upstream(e.to_string()))?;

    let status = upstream_response.status();
    let mut response_headers = upstream_response.headers().clone();
    response_headers.remove(TRANSFER_ENCODING);

    if path.contains(&state.config.transfer_marker) {
        // Matching paths are buffered so the tap can inspect the body; the
        // exact bytes are returned either way.
        let bytes = upstream_response
            .bytes()
            .await
            .map_err(|e| ObserverError::Upstream(e.to_string()))?;

        observe(&state, &path, &bytes);

        Ok(assemble(status, response_headers, Body::from(bytes)))
    } else {
        // Everything else streams straight through.
        Ok(assemble(
            status,
            response_headers,
            Body::from_stream(upstream_response.bytes_stream()),
        ))
    }
}

fn assemble(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Offer an observed response body to the recognizer and forward on success.
/// Failures are dropped silently; they must never reach the proxied flow.
fn observe(state: &SharedState, path: &str, body: &[u8]) {
    match txlens::payload::recognize(path, &state.config.transfer_marker, body) {
        Ok(batch) => {
            log::debug!(
                "Recognized transfer payload: {} transactions on {}",
                batch.len(),
                path
            );
            if state.tap.send(batch).is_err() {
                log::debug!("Ingest channel closed, dropping observed batch");
            }
        }
        Err(reason) => {
            log::debug!(
                "Observed response on {} not transaction data: {}",
                path,
                reason
            );
        }
    }
}
