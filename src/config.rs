//! Sampler configuration
//!
//! Values are fixed when the sampler is constructed; the running app always
//! uses the defaults.

use std::time::Duration;

/// Channel the rate is published on
pub const DEFAULT_CHANNEL: &str = "MouseRate";

/// Sampling window length in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "mouse_rate=debug,tauri=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Display sink channel name
    pub channel: String,

    /// Window length in milliseconds
    pub interval_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl SamplerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one_second_mouse_rate() {
        let config = SamplerConfig::default();
        assert_eq!(config.channel, "MouseRate");
        assert_eq!(config.interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_custom_interval() {
        let config = SamplerConfig {
            interval_ms: 250,
            ..SamplerConfig::default()
        };
        assert_eq!(config.interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_log_filter_covers_crate_targets() {
        // EnvFilter target directives match by prefix, so this covers mouse_rate_lib too
        assert!(DEFAULT_LOG_FILTER.starts_with("mouse_rate=debug"));
        assert!(!DEFAULT_LOG_FILTER.contains("mouse_rate_lib"));
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
