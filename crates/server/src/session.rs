use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::errors::ApiError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "auth_token";

/// Bearer header first, then the session cookie.
fn session_token(req: &Request) -> Option<String> {
    if let Some(value) = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        if let Some(token) = value.strip_prefix("Bearer ") {
            return Some(token.trim().to_string());
        }
    }
    CookieJar::from_headers(req.headers())
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolve the caller's `Actor` and attach it to the request; 401 otherwise.
pub async fn require_session(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let Some(token) = session_token(&req) else {
        debug!(path = %req.uri().path(), "no session token");
        return Err(ApiError::unauthorized("authentication required"));
    };
    let actor = state.auth.decode_token(&token).map_err(|e| state.api_error(e))?;
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}
