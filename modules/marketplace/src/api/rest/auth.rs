//! Bearer-token authentication middleware and extractors.
//!
//! The middleware runs once per request: when an Authorization header is
//! present it asks the identity delegate to validate the token and records
//! the outcome as a request extension. Handlers then declare their
//! requirement through extractors - [`Auth`] for authenticated routes,
//! [`MaybeAuth`] for public ones.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::{request::Parts, HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

use crate::api::rest::error::ApiError;
use crate::domain::model::Principal;
use crate::domain::ports::{AuthClient, AuthError};

/// Shared state for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub auth_client: Arc<dyn AuthClient>,
}

/// Outcome of the authentication attempt, recorded per request.
#[derive(Clone, Copy)]
pub(crate) enum AuthOutcome {
    Authenticated(Principal),
    Anonymous,
    Unauthorized,
    ServiceUnavailable,
}

/// Authentication middleware.
///
/// 1. Skips CORS preflight requests.
/// 2. Without an Authorization header: records `Anonymous`.
/// 3. With one: delegates to the auth service and records the result.
///    An unreachable auth service is recorded as `ServiceUnavailable`, never
///    as a credential failure.
pub async fn authn_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_preflight_request(req.method(), req.headers()) {
        return next.run(req).await;
    }

    let outcome = match extract_bearer_token(req.headers()) {
        None => AuthOutcome::Anonymous,
        Some(token) => match state.auth_client.authenticate(token).await {
            Ok(principal) => AuthOutcome::Authenticated(principal),
            Err(err) => {
                log_authn_error(&err);
                match err {
                    AuthError::Unauthorized(_) => AuthOutcome::Unauthorized,
                    AuthError::ServiceUnavailable(_) => AuthOutcome::ServiceUnavailable,
                }
            }
        },
    };

    req.extensions_mut().insert(outcome);
    next.run(req).await
}

/// Extractor for routes that require an authenticated principal.
#[derive(Debug, Clone, Copy)]
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let outcome = parts.extensions.get::<AuthOutcome>().copied().ok_or_else(|| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Authentication middleware not configured",
            )
        })?;

        match outcome {
            AuthOutcome::Authenticated(principal) => Ok(Auth(principal)),
            AuthOutcome::Anonymous => Err(ApiError::unauthorized(
                "Missing or invalid Authorization header",
            )),
            AuthOutcome::Unauthorized => Err(ApiError::unauthorized("Authentication failed")),
            AuthOutcome::ServiceUnavailable => Err(ApiError::service_unavailable(
                "Authentication service unavailable",
            )),
        }
    }
}

/// Extractor for public routes: attaches the principal when a valid token
/// was presented, proceeds anonymously otherwise.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuth(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = match parts.extensions.get::<AuthOutcome>() {
            Some(AuthOutcome::Authenticated(principal)) => Some(*principal),
            _ => None,
        };
        Ok(MaybeAuth(principal))
    }
}

fn log_authn_error(err: &AuthError) {
    match err {
        AuthError::Unauthorized(msg) => tracing::debug!("Authentication rejected: {msg}"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!("Authentication service unavailable: {msg}");
        }
    }
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer ").map(str::trim))
}

/// Check if this is a CORS preflight request
fn is_preflight_request(method: &Method, headers: &HeaderMap) -> bool {
    method == Method::OPTIONS
        && headers.contains_key(axum::http::header::ORIGIN)
        && headers.contains_key(axum::http::header::ACCESS_CONTROL_REQUEST_METHOD)
}

// Exercised end-to-end (middleware + extractors through the router) in
// tests/rest_api.rs; direct unit tests here would have to fake the whole
// middleware stack.
