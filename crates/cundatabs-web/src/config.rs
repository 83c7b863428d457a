use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use cundatabs_core::{LimiterConfig, RateLimitTiers};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_tabs_dir")]
    pub tabs_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    /// Holds `index.html`, served at `/`.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    /// Served under `/static/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
    #[serde(default = "default_general_tier")]
    pub general: TierConfig,
    #[serde(default = "default_save_tier")]
    pub save: TierConfig,
    #[serde(default = "default_delete_tier")]
    pub delete: TierConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TierConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl TierConfig {
    pub fn limiter_config(&self) -> LimiterConfig {
        LimiterConfig::new(self.max_requests, Duration::from_secs(self.window_secs))
    }
}

impl From<LimiterConfig> for TierConfig {
    fn from(config: LimiterConfig) -> Self {
        Self {
            window_secs: config.window.as_secs(),
            max_requests: config.max_requests,
        }
    }
}

impl RateLimitConfig {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn build_tiers(&self) -> RateLimitTiers {
        RateLimitTiers::new(
            self.general.limiter_config(),
            self.save.limiter_config(),
            self.delete.limiter_config(),
        )
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}
fn default_max_body_bytes() -> usize { 1024 * 1024 }
fn default_tabs_dir() -> PathBuf { PathBuf::from("tablaturas") }
fn default_public_dir() -> PathBuf { PathBuf::from("public") }
fn default_static_dir() -> PathBuf { PathBuf::from("static") }
fn default_sweep_interval_secs() -> u64 { 5 * 60 }
fn default_general_tier() -> TierConfig { LimiterConfig::general().into() }
fn default_save_tier() -> TierConfig { LimiterConfig::save().into() }
fn default_delete_tier() -> TierConfig { LimiterConfig::delete().into() }

impl Default for StorageConfig {
    fn default() -> Self {
        Self { tabs_dir: default_tabs_dir() }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            public_dir: default_public_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            general: default_general_tier(),
            save: default_save_tier(),
            delete: default_delete_tier(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
            storage: StorageConfig::default(),
            assets: AssetsConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads the TOML file named by `CUNDATABS_CONFIG` (if set), then
    /// applies environment overrides and validates the result.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var_os("CUNDATABS_CONFIG").map(PathBuf::from) {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                Self::from_toml(&contents)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies overrides looked up by environment variable name.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<()> {
        if let Some(addr) = lookup("CUNDATABS_BIND_ADDR") {
            self.bind_addr = addr
                .parse()
                .with_context(|| format!("invalid CUNDATABS_BIND_ADDR: {addr}"))?;
        }
        if let Some(port) = lookup("PORT") {
            let port: u16 = port
                .parse()
                .with_context(|| format!("invalid PORT: {port}"))?;
            self.bind_addr.set_port(port);
        }
        if let Some(dir) = lookup("CUNDATABS_TABS_DIR") {
            self.storage.tabs_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("CUNDATABS_PUBLIC_DIR") {
            self.assets.public_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("CUNDATABS_STATIC_DIR") {
            self.assets.static_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let tiers = [
            ("general", &self.rate_limit.general),
            ("save", &self.rate_limit.save),
            ("delete", &self.rate_limit.delete),
        ];
        for (name, tier) in tiers {
            if tier.window_secs == 0 {
                anyhow::bail!("rate_limit.{name}.window_secs must be greater than zero");
            }
            if tier.max_requests == 0 {
                anyhow::bail!("rate_limit.{name}.max_requests must be greater than zero");
            }
        }
        if self.rate_limit.sweep_interval_secs == 0 {
            anyhow::bail!("rate_limit.sweep_interval_secs must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_standard_tiers() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.storage.tabs_dir, PathBuf::from("tablaturas"));
        assert_eq!(config.rate_limit.general.limiter_config(), LimiterConfig::general());
        assert_eq!(config.rate_limit.save.limiter_config(), LimiterConfig::save());
        assert_eq!(config.rate_limit.delete.limiter_config(), LimiterConfig::delete());
        assert_eq!(config.rate_limit.sweep_interval(), Duration::from_secs(300));
        config.validate().unwrap();
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.rate_limit.save.max_requests, 10);
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn toml_overrides_single_tier() {
        let config = ServerConfig::from_toml(
            r#"
            bind_addr = "127.0.0.1:8080"

            [storage]
            tabs_dir = "/var/lib/cundatabs"

            [rate_limit.save]
            window_secs = 30
            max_requests = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.storage.tabs_dir, PathBuf::from("/var/lib/cundatabs"));
        assert_eq!(config.rate_limit.save, TierConfig { window_secs: 30, max_requests: 3 });
        assert_eq!(config.rate_limit.delete.max_requests, 5);
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "4000"),
            ("CUNDATABS_TABS_DIR", "/tmp/tabs"),
            ("CUNDATABS_STATIC_DIR", "assets"),
        ]);
        let mut config = ServerConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:4000");
        assert_eq!(config.storage.tabs_dir, PathBuf::from("/tmp/tabs"));
        assert_eq!(config.assets.static_dir, PathBuf::from("assets"));
        assert_eq!(config.assets.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn port_applies_after_bind_addr() {
        let mut config = ServerConfig::default();
        config
            .apply_overrides(|k| match k {
                "CUNDATABS_BIND_ADDR" => Some("127.0.0.1:9000".to_string()),
                "PORT" => Some("9100".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9100");
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = ServerConfig::default();
        let err = config
            .apply_overrides(|k| (k == "PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("invalid PORT"));
    }

    #[test]
    fn zero_cap_fails_validation() {
        let mut config = ServerConfig::default();
        config.rate_limit.delete.max_requests = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("rate_limit.delete.max_requests"));
    }

    #[test]
    fn zero_window_fails_validation() {
        let mut config = ServerConfig::default();
        config.rate_limit.general.window_secs = 0;
        assert!(config.validate().is_err());
    }
}
