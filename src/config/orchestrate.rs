//! Upstream Orchestrate API configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upstream Orchestrate API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OrchestrateConfig {
    /// Static IAM API key sent on every upstream request
    pub api_key: Option<String>,

    /// IBM Cloud region hosting the instance (e.g. us-south, eu-de, au-syd)
    #[serde(default = "default_region")]
    pub region: String,

    /// Orchestrate instance identifier
    pub instance_id: Option<String>,

    /// Explicit base URL override; when set, region and instance are ignored
    pub base_url: Option<String>,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl OrchestrateConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// The instance base URL: the explicit override when present, otherwise
    /// derived from region and instance id.
    pub fn resolved_base_url(&self) -> Option<String> {
        if let Some(url) = &self.base_url {
            return Some(url.clone());
        }
        self.instance_id.as_ref().map(|instance| {
            format!(
                "https://api.{}.watson-orchestrate.cloud.ibm.com/instances/{}/v1/orchestrate",
                self.region, instance
            )
        })
    }

    /// Validate upstream configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("orchestrate.api_key"));
        }
        if self.resolved_base_url().is_none() {
            return Err(ValidationError::MissingRequired("orchestrate.instance_id"));
        }
        if let Some(url) = &self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidBaseUrl);
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for OrchestrateConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            region: default_region(),
            instance_id: None,
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_region() -> String {
    "us-south".to_string()
}

fn default_timeout() -> u64 {
    120
}
