//! Monitor configuration
//!
//! Defines the configurable parameters for the monitor: the compute API
//! endpoint, the inter-poll interval, and the instances to watch.

use std::time::Duration;

use pulse_core::domain::instance::InstanceId;

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Compute API base URL (e.g., "http://localhost:8000")
    pub api_url: String,

    /// Fixed delay between poll iterations of one instance
    pub poll_interval: Duration,

    /// Instance to run a full poll (status + log + files) against
    pub instance: Option<InstanceId>,

    /// Instances to run batch status-only polls against
    pub watch: Vec<InstanceId>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            poll_interval: Duration::from_secs(7),
            instance: None,
            watch: Vec::new(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - PULSE_API_URL (required)
    /// - PULSE_POLL_INTERVAL (optional, seconds, default: 7)
    /// - PULSE_INSTANCE (optional, instance id for a full poll)
    /// - PULSE_WATCH (optional, comma-separated instance ids for status polls)
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = std::env::var("PULSE_API_URL")
            .map_err(|_| anyhow::anyhow!("PULSE_API_URL environment variable not set"))?;

        let poll_interval = std::env::var("PULSE_POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(7));

        let instance = std::env::var("PULSE_INSTANCE")
            .ok()
            .and_then(|s| s.parse::<InstanceId>().ok());

        let watch = std::env::var("PULSE_WATCH")
            .ok()
            .map(|s| {
                s.split(',')
                    .filter_map(|part| part.trim().parse::<InstanceId>().ok())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            api_url,
            poll_interval,
            instance,
            watch,
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.poll_interval, Duration::from_secs(7));
        assert!(config.instance.is_none());
        assert!(config.watch.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Invalid URL should fail
        config.api_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.api_url = "http://localhost:8000".to_string();
        assert!(config.validate().is_ok());

        // Zero interval should fail
        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
