//! Application configuration.
//!
//! [`AppConfig`] groups the rendering-service settings. All sections and
//! fields carry serde defaults so a partial (or absent) configuration
//! file still yields a working setup.

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Rendering-service section.
    #[serde(default)]
    service: ServiceConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified service settings.
    pub fn new(service: ServiceConfig) -> Self {
        Self { service }
    }

    /// Returns the rendering-service configuration.
    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }
}

/// Settings for the external rendering service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the rendering service.
    #[serde(default = "default_host")]
    host: String,

    /// Endpoint of the PDF-merge collaborator, if deployed.
    #[serde(default)]
    merge_url: Option<String>,

    /// Seconds between queue polls.
    #[serde(default = "default_poll_interval_secs")]
    poll_interval_secs: u64,

    /// Queue poll attempt ceiling.
    #[serde(default = "default_poll_attempts")]
    poll_attempts: u32,
}

impl ServiceConfig {
    /// Creates a configuration for the given host with default polling.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Returns the service base URL.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the merge collaborator endpoint, if configured.
    pub fn merge_url(&self) -> Option<&str> {
        self.merge_url.as_deref()
    }

    /// Returns the queue poll interval in seconds.
    pub fn poll_interval_secs(&self) -> u64 {
        self.poll_interval_secs
    }

    /// Returns the queue poll attempt ceiling.
    pub fn poll_attempts(&self) -> u32 {
        self.poll_attempts
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            merge_url: None,
            poll_interval_secs: default_poll_interval_secs(),
            poll_attempts: default_poll_attempts(),
        }
    }
}

fn default_host() -> String {
    "http://localhost:8080".to_owned()
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_poll_attempts() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.service().host(), "http://localhost:8080");
        assert_eq!(config.service().poll_interval_secs(), 10);
        assert_eq!(config.service().poll_attempts(), 30);
        assert_eq!(config.service().merge_url(), None);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"service": {"host": "https://render.example"}}"#).unwrap();
        assert_eq!(config.service().host(), "https://render.example");
        assert_eq!(config.service().poll_attempts(), 30);

        let empty: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.service().host(), "http://localhost:8080");
    }

    #[test]
    fn test_full_section() {
        let json = r#"{
            "service": {
                "host": "https://render.example",
                "merge_url": "https://merge.example/combine",
                "poll_interval_secs": 2,
                "poll_attempts": 5
            }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.service().merge_url(),
            Some("https://merge.example/combine")
        );
        assert_eq!(config.service().poll_interval_secs(), 2);
        assert_eq!(config.service().poll_attempts(), 5);
    }
}
