//! Per-tier rate limit gates.
//!
//! [`general_limit`] wraps the whole router. [`save_limit`] and
//! [`delete_limit`] are route layers on the mutating routes, so they only
//! run after the general gate has admitted the request.

use std::convert::Infallible;
use std::time::SystemTime;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::RETRY_AFTER;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cundatabs_core::{client_key, LimitResult, Tier};

use crate::dto::RateLimitedBody;
use crate::state::AppState;

pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");

/// Caller identity taken from `x-forwarded-for` / `x-real-ip`.
pub struct ClientKey(pub String);

impl ClientKey {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        ClientKey(client_key(header("x-forwarded-for"), header("x-real-ip")))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientKey::from_headers(&parts.headers))
    }
}

/// A denied request, rendered as a 429.
pub struct RateLimited {
    pub result: LimitResult,
    pub now: SystemTime,
}

impl IntoResponse for RateLimited {
    fn into_response(self) -> Response {
        let retry_after = self.result.reset_after_secs(self.now);
        let body = RateLimitedBody {
            error: "Rate limit exceeded",
            remaining: 0,
            reset_time: retry_after,
        };

        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        let headers = response.headers_mut();
        for (name, value) in limit_headers(&self.result) {
            headers.insert(name, value);
        }
        headers.insert(RETRY_AFTER, HeaderValue::from(retry_after));
        response
    }
}

fn limit_headers(result: &LimitResult) -> [(HeaderName, HeaderValue); 2] {
    [
        (X_RATELIMIT_REMAINING, HeaderValue::from(result.remaining)),
        (X_RATELIMIT_RESET, HeaderValue::from(result.reset_epoch_secs())),
    ]
}

pub async fn general_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    enforce(&state, Tier::General, req, next).await
}

pub async fn save_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    enforce(&state, Tier::Save, req, next).await
}

pub async fn delete_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    enforce(&state, Tier::Delete, req, next).await
}

async fn enforce(state: &AppState, tier: Tier, req: Request, next: Next) -> Response {
    let ClientKey(key) = ClientKey::from_headers(req.headers());
    let now = state.clock.now();
    let result = state.limiters.check(tier, &key, now);

    if !result.allowed {
        tracing::warn!(client = %key, %tier, "Rate limit exceeded");
        return RateLimited { result, now }.into_response();
    }

    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    for (name, value) in limit_headers(&result) {
        // An inner, stricter tier has already annotated the response.
        if tier == Tier::General {
            headers.entry(name).or_insert(value);
        } else {
            headers.insert(name, value);
        }
    }
    response
}
