//! Feed configuration.
//!
//! Plain data consumed by the bring-up code that owns sockets,
//! threads and CPU pinning; the handler itself reads none of it.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Feed handler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Multicast group publishing the feed
    pub multicast_group: String,
    /// Multicast port
    pub multicast_port: u16,
    /// Pin producer/consumer threads to dedicated cores
    pub pin_to_core: bool,
    /// Core for the ingest thread
    pub producer_core: usize,
    /// Core for the consumer thread
    pub consumer_core: usize,
    /// Record ring capacity; must be a power of two
    pub ring_capacity: usize,
    /// Log level for the subscriber installed by the binary
    pub log_level: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            multicast_group: "233.54.12.111".to_string(),
            multicast_port: 26_477,
            pin_to_core: true,
            producer_core: 1,
            consumer_core: 2,
            ring_capacity: 65_536,
            log_level: "info".to_string(),
        }
    }
}

impl FeedConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FeedConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from the `TICKWIRE_CONFIG` environment variable with
    /// fallback to defaults
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var("TICKWIRE_CONFIG") {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.multicast_port, 26_477);
        assert!(config.ring_capacity.is_power_of_two());
        assert_ne!(config.producer_core, config.consumer_core);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = FeedConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: FeedConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.multicast_group, config.multicast_group);
        assert_eq!(parsed.ring_capacity, config.ring_capacity);
    }
}
