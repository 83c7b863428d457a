use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Body of a 429 response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitedBody {
    pub error: &'static str,
    pub remaining: u32,
    /// Seconds until the window resets.
    pub reset_time: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStatusDto {
    pub remaining: u32,
    /// Seconds until the window resets.
    pub reset_time: u64,
}

#[derive(Debug, Serialize)]
pub struct RateLimitStatusResponse {
    pub general: TierStatusDto,
    pub save: TierStatusDto,
    pub delete: TierStatusDto,
}
