use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::defaults;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Endpoints and credentials used to build the API clients
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub region: String,
    /// Key Protect base URL; derived from `region` when unset
    pub kms_base_url: Option<String>,
    /// HPCS broker URL used for endpoint lookup; derived from `region` when unset
    pub hpcs_endpoint_url: Option<String>,
    pub resource_controller_url: String,
    /// IBM Cloud console base, used for dashboard links
    pub console_url: String,
    pub iam_token: Option<String>,
    pub request_timeout_secs: u64,
}

impl SessionConfig {
    pub fn kms_base_url(&self) -> String {
        self.kms_base_url
            .clone()
            .unwrap_or_else(|| defaults::kms_base_url(&self.region))
    }

    pub fn hpcs_endpoint_url(&self) -> String {
        self.hpcs_endpoint_url
            .clone()
            .unwrap_or_else(|| defaults::hpcs_endpoint_url(&self.region))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            region: defaults::REGION.to_string(),
            kms_base_url: None,
            hpcs_endpoint_url: None,
            resource_controller_url: defaults::RESOURCE_CONTROLLER_URL.to_string(),
            console_url: defaults::CONSOLE_URL.to_string(),
            iam_token: None,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("region", &self.region)
            .field("kms_base_url", &self.kms_base_url)
            .field("hpcs_endpoint_url", &self.hpcs_endpoint_url)
            .field("resource_controller_url", &self.resource_controller_url)
            .field("console_url", &self.console_url)
            .field("iam_token", &self.iam_token.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Outer limits for the long-running lifecycle operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub create_secs: u64,
    pub update_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            create_secs: defaults::CREATE_TIMEOUT_SECS,
            update_secs: defaults::UPDATE_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
        }
    }
}
