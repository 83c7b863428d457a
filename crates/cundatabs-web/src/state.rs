use std::sync::Arc;

use cundatabs_core::{Clock, RateLimitTiers, TabStore};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub limiters: Arc<RateLimitTiers>,
    pub store: Arc<TabStore>,
    /// Time source for rate limiting and file naming. Tests swap in a manual clock.
    pub clock: Arc<dyn Clock>,
}
