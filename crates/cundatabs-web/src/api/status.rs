use axum::extract::State;
use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use cundatabs_core::LimitResult;

use crate::dto::{HealthResponse, RateLimitStatusResponse, TierStatusDto};
use crate::middleware::rate_limit::ClientKey;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let now: DateTime<Utc> = state.clock.now().into();
    Json(HealthResponse {
        status: "ok",
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Reports the caller's standing in every tier. Peeks only, so asking
/// does not use up save or delete quota.
pub async fn rate_limit_status(
    State(state): State<AppState>,
    ClientKey(key): ClientKey,
) -> Json<RateLimitStatusResponse> {
    let now = state.clock.now();
    let status = state.limiters.status(&key, now);
    let dto = |result: LimitResult| TierStatusDto {
        remaining: result.remaining,
        reset_time: result.reset_after_secs(now),
    };

    Json(RateLimitStatusResponse {
        general: dto(status.general),
        save: dto(status.save),
        delete: dto(status.delete),
    })
}
