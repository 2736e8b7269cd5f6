use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::api::error_response;
use crate::logging::TraceId;
use crate::state::AppState;

/// Identity of the caller on whose behalf a pipeline run is made. Alerts are
/// addressed to it and it is stored on the maintenance record.
#[derive(Debug, Clone)]
pub struct Requester(pub String);

impl std::ops::Deref for Requester {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

/// Resolves the [`Requester`] from the configured identity header.
///
/// When `identity.require` is `true`, requests without a non-empty header are
/// rejected with 401. Otherwise they proceed as `identity.anonymous`.
pub async fn requester_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let identity = &state.config.identity;

    let trace_id = req
        .extensions()
        .get::<TraceId>()
        .map(|t| t.0.clone())
        .unwrap_or_default();

    let header_value = req
        .headers()
        .get(identity.header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let requester = match header_value {
        Some(value) => value,
        None if identity.require => {
            tracing::warn!(
                trace_id = %trace_id,
                header = %identity.header,
                "Request rejected: missing requester identity"
            );
            return error_response(
                StatusCode::UNAUTHORIZED,
                &trace_id,
                "unauthorized",
                &format!("missing {} header", identity.header),
            );
        }
        None => identity.anonymous.clone(),
    };

    tracing::debug!(trace_id = %trace_id, requester = %requester, "Requester resolved");
    req.extensions_mut().insert(Requester(requester));
    next.run(req).await
}
