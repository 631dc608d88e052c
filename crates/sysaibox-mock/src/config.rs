//! Configuration for the Sys AI Box mock server.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Default values mirroring the real box's device flow.
pub mod defaults {
    use std::time::Duration;

    /// Bind host.
    pub const HOST: &str = "0.0.0.0";

    /// Bind port.
    pub const PORT: u16 = 8080;

    /// Externally reachable base URL, used to build `verification_uri`.
    pub const PUBLIC_URL: &str = "http://localhost:8080";

    /// Prefix of human-typeable user codes (`SWIFT-XXXX`).
    pub const USER_CODE_PREFIX: &str = "SWIFT";

    /// Number of hex digits after the prefix.
    pub const USER_CODE_LEN: usize = 4;

    /// Lifetime of a device code (10 minutes).
    pub const DEVICE_CODE_TTL: Duration = Duration::from_secs(600);

    /// Polling interval hint handed to clients.
    pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

    /// Access token lifetime reported to clients (1 hour).
    pub const TOKEN_TTL: Duration = Duration::from_secs(3600);

    /// Version string reported by `/api/v1/health` and `/api/v1/version`.
    pub const REPORTED_VERSION: &str = "1.0.0-mock";

    /// Build label reported by `/api/v1/version`.
    pub const BUILD: &str = "dev";
}

/// What happens to a pairing once its device code has been redeemed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RedemptionPolicy {
    /// The pairing stays authorized and may be redeemed again.
    #[default]
    Reusable,
    /// The pairing moves to `consumed`; a second redemption is rejected.
    SingleUse,
}

impl FromStr for RedemptionPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reusable" => Ok(Self::Reusable),
            "single-use" | "single_use" | "singleuse" => Ok(Self::SingleUse),
            other => anyhow::bail!("unknown redemption policy '{other}'"),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Base URL printed in `verification_uri` (no trailing slash).
    pub public_url: String,

    /// Prefix for generated user codes.
    pub user_code_prefix: String,

    /// Hex digits in the random part of a user code.
    pub user_code_len: usize,

    /// Device code lifetime.
    pub device_code_ttl: Duration,

    /// Polling interval hint.
    pub poll_interval: Duration,

    /// Access token lifetime.
    pub token_ttl: Duration,

    /// Redemption policy.
    pub redemption: RedemptionPolicy,

    /// Interval of the stale-record sweep. `None` keeps every record.
    pub cleanup_interval: Option<Duration>,

    /// Version reported by the info endpoints.
    pub reported_version: String,

    /// Build label reported by the version endpoint.
    pub build: String,
}

impl Config {
    /// Create a configuration with the default device-flow parameters.
    #[must_use]
    pub fn new(public_url: Option<String>) -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            public_url: public_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| defaults::PUBLIC_URL.to_string()),
            user_code_prefix: defaults::USER_CODE_PREFIX.to_string(),
            user_code_len: defaults::USER_CODE_LEN,
            device_code_ttl: defaults::DEVICE_CODE_TTL,
            poll_interval: defaults::POLL_INTERVAL,
            token_ttl: defaults::TOKEN_TTL,
            redemption: RedemptionPolicy::default(),
            cleanup_interval: None,
            reported_version: defaults::REPORTED_VERSION.to_string(),
            build: defaults::BUILD.to_string(),
        }
    }

    /// Create a test configuration with a fixed public URL.
    #[must_use]
    pub fn for_testing() -> Self {
        let mut config = Self::new(Some("http://mock.test".to_string()));
        config.host = "127.0.0.1".to_string();
        config.port = 0;
        config
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if environment variables are invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(std::env::var("MOCK_PUBLIC_URL").ok());

        if let Ok(prefix) = std::env::var("MOCK_USER_CODE_PREFIX") {
            config.user_code_prefix = prefix.trim().to_ascii_uppercase();
        }
        if let Ok(policy) = std::env::var("MOCK_REDEMPTION") {
            config.redemption = policy.parse()?;
        }

        Ok(config)
    }

    /// Builder-style override of the redemption policy.
    #[must_use]
    pub const fn with_redemption(mut self, redemption: RedemptionPolicy) -> Self {
        self.redemption = redemption;
        self
    }

    /// URL of the human approval console.
    #[must_use]
    pub fn verification_uri(&self) -> String {
        format!("{}/console", self.public_url)
    }

    /// Socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns error if `host` is not an IP address.
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip = self
            .host
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid host '{}': {e}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.device_code_ttl, Duration::from_secs(600));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.redemption, RedemptionPolicy::Reusable);
        assert!(config.cleanup_interval.is_none());
    }

    #[test]
    fn test_verification_uri_strips_trailing_slash() {
        let config = Config::new(Some("http://box.local:8080/".to_string()));
        assert_eq!(config.verification_uri(), "http://box.local:8080/console");
    }

    #[test]
    fn test_redemption_policy_parse() {
        assert_eq!("reusable".parse::<RedemptionPolicy>().unwrap(), RedemptionPolicy::Reusable);
        assert_eq!("Single-Use".parse::<RedemptionPolicy>().unwrap(), RedemptionPolicy::SingleUse);
        assert!("forever".parse::<RedemptionPolicy>().is_err());
    }

    #[test]
    fn test_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr().unwrap().port(), 8080);

        let mut bad = Config::default();
        bad.host = "not-an-ip".to_string();
        assert!(bad.bind_addr().is_err());
    }
}
