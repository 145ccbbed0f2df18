//! Shared-secret bearer token authentication.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, info, warn};

use crate::config::AccessConfig;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Literal prefix of a valid Authorization header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Result of checking one request against the configured secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    ServerMisconfigured,
    MissingHeader,
    MalformedHeader,
    InvalidToken,
    Authorized,
}

impl AuthOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthOutcome::ServerMisconfigured => "server_misconfigured",
            AuthOutcome::MissingHeader => "missing_header",
            AuthOutcome::MalformedHeader => "malformed_header",
            AuthOutcome::InvalidToken => "invalid_token",
            AuthOutcome::Authorized => "authorized",
        }
    }

    pub fn into_result(self) -> ApiResult<()> {
        match self {
            AuthOutcome::ServerMisconfigured => Err(ApiError::Misconfigured),
            AuthOutcome::MissingHeader => Err(ApiError::MissingAuthorization),
            AuthOutcome::MalformedHeader => Err(ApiError::MalformedAuthorization),
            AuthOutcome::InvalidToken => Err(ApiError::InvalidToken),
            AuthOutcome::Authorized => Ok(()),
        }
    }
}

/// Check an Authorization header value against the configured secret.
///
/// Server configuration is checked before the header is looked at. An
/// empty header counts as missing. The token is everything after the
/// `"Bearer "` prefix, untrimmed, and must equal the secret exactly.
pub fn authorize(header: Option<&str>, access: &AccessConfig) -> AuthOutcome {
    if !access.is_configured() {
        error!("Server configuration error - API access token not configured");
        return AuthOutcome::ServerMisconfigured;
    }

    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => {
            warn!("Authorization header missing from request");
            return AuthOutcome::MissingHeader;
        }
    };

    let Some(token) = header.strip_prefix(BEARER_PREFIX) else {
        warn!("Invalid authorization format");
        return AuthOutcome::MalformedHeader;
    };

    if token != access.secret() {
        warn!("Invalid access token provided");
        return AuthOutcome::InvalidToken;
    }

    info!("Access token validated successfully");
    AuthOutcome::Authorized
}

/// Middleware guarding protected routes. Short-circuits with the matching
/// error response, otherwise passes the request through untouched.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Non-UTF-8 bytes never match a secret, so a lossy view is enough.
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let outcome = authorize(header.as_deref(), &state.config.access);
    metrics::record_auth_outcome(outcome.as_str());

    match outcome.into_result() {
        Ok(()) => {
            debug!(path = %request.uri().path(), "Request authorized");
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
