//! Dashboard configuration
//!
//! Where the hive lives, how often to poll it, and the link targets used when
//! the hive cannot supply its own.

use std::time::Duration;

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Hive base URL (e.g., "http://localhost:8090")
    pub hive_url: String,

    /// How often to re-poll pipeline state
    pub poll_interval: Duration,

    /// Per-request timeout for calls to the hive
    pub request_timeout: Duration,

    /// Build-system link shown when a pipeline's own cannot be fetched
    pub default_jenkins_url: String,

    /// Base URL of the log search UI
    pub kibana_url: String,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(hive_url: String) -> Self {
        Self {
            hive_url,
            poll_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            default_jenkins_url: "http://localhost:8080/".to_string(),
            kibana_url: "http://localhost:5601".to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Optional environment variables:
    /// - POLL_INTERVAL (seconds, default: 5)
    /// - REQUEST_TIMEOUT (seconds, default: 10)
    /// - DEFAULT_JENKINS_URL (default: http://localhost:8080/)
    /// - KIBANA_URL (default: http://localhost:5601)
    pub fn from_env(hive_url: String) -> Self {
        let defaults = Self::new(hive_url);

        let poll_interval = std::env::var("POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.poll_interval);

        let request_timeout = std::env::var("REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let default_jenkins_url =
            std::env::var("DEFAULT_JENKINS_URL").unwrap_or(defaults.default_jenkins_url);

        let kibana_url = std::env::var("KIBANA_URL").unwrap_or(defaults.kibana_url);

        Self {
            hive_url: defaults.hive_url,
            poll_interval,
            request_timeout,
            default_jenkins_url,
            kibana_url,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [
            ("hive_url", &self.hive_url),
            ("default_jenkins_url", &self.default_jenkins_url),
            ("kibana_url", &self.kibana_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{} must start with http:// or https://", name);
            }
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8090".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.hive_url = "localhost:8090".to_string();
        assert!(config.validate().is_err());
        config.hive_url = "https://hive.internal".to_string();
        assert!(config.validate().is_ok());

        config.kibana_url = "kibana".to_string();
        assert!(config.validate().is_err());
        config.kibana_url = "http://kibana".to_string();

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
