//! Cross-origin rules and protocol headers every Actions client expects.

use axum::extract::{Request, State};
use axum::http::header::{ACCEPT_ENCODING, AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{Any, CorsLayer};

use crate::consts::ACTION_VERSION;
use crate::state::AppState;

pub const X_ACTION_VERSION: HeaderName = HeaderName::from_static("x-action-version");
pub const X_BLOCKCHAIN_IDS: HeaderName = HeaderName::from_static("x-blockchain-ids");

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            CONTENT_ENCODING,
            ACCEPT_ENCODING,
            X_ACTION_VERSION,
            X_BLOCKCHAIN_IDS,
        ])
        .expose_headers([X_ACTION_VERSION, X_BLOCKCHAIN_IDS])
}

/// Stamps the Actions version and this deployment's chain onto every response.
pub async fn action_headers(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();
    headers.insert(X_ACTION_VERSION, HeaderValue::from_static(ACTION_VERSION));
    headers.insert(
        X_BLOCKCHAIN_IDS,
        HeaderValue::from_static(state.config.cluster.blockchain_id()),
    );
    res
}
