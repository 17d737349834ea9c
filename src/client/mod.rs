use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::errors::KeyControllerError;

pub mod hpcs;
pub mod key_protect;
pub mod resource_controller;
pub mod types;


pub use hpcs::HpcsEndpointClient;
pub use key_protect::KeyProtectClient;
pub use resource_controller::ResourceControllerClient;
pub use types::{
    CreateKeyRequest, HpcsEndpoints, Key, KeyCollection, KeyState, KmsHosts, ServiceInstance,
};

/// Failure reported by one of the remote APIs.
///
/// `status` is the HTTP status when the server answered; transport and
/// decoding failures leave it unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Some(404), message)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }

    /// Build an error from a non-success response, pulling the most useful
    /// message out of the known error body shapes.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| extract_error_message(&value))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "no response body".to_string()
                } else {
                    body.trim().to_string()
                }
            });

        Self::new(Some(status), message)
    }
}

fn extract_error_message(value: &serde_json::Value) -> Option<String> {
    // Key Protect: {"resources": [{"errorMsg": "...", "reasons": [{"message": "..."}]}]}
    if let Some(resource) = value.get("resources").and_then(|r| r.get(0)) {
        let msg = resource.get("errorMsg").and_then(|m| m.as_str());
        let reason = resource
            .get("reasons")
            .and_then(|r| r.get(0))
            .and_then(|r| r.get("message"))
            .and_then(|m| m.as_str());
        return match (msg, reason) {
            (Some(msg), Some(reason)) => Some(format!("{msg}: {reason}")),
            (Some(msg), None) => Some(msg.to_string()),
            (None, Some(reason)) => Some(reason.to_string()),
            (None, None) => None,
        };
    }

    // Resource controller and broker APIs
    value
        .get("message")
        .or_else(|| value.get("errors").and_then(|e| e.get(0)).and_then(|e| e.get("message")))
        .or_else(|| value.get("error"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::new(err.status().map(|s| s.as_u16()), err.to_string())
    }
}

/// Where a key operation is sent: the keys collection URL and the instance
/// it belongs to. Resolved per call, never stored on a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEndpoint {
    pub keys_url: Url,
    pub instance_id: String,
}

impl KeyEndpoint {
    pub fn new(keys_url: Url, instance_id: impl Into<String>) -> Self {
        Self {
            keys_url,
            instance_id: instance_id.into(),
        }
    }

    /// URL of a single key under the collection
    pub fn key_url(&self, key_id: &str) -> Result<Url, ApiError> {
        let mut url = self.keys_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::new(None, format!("{} cannot be a base URL", self.keys_url)))?
            .pop_if_empty()
            .push(key_id);
        Ok(url)
    }
}

/// Keys API of a Key Protect or HPCS instance
#[async_trait]
pub trait KeyManagementApi: Send + Sync {
    async fn create_key(
        &self,
        endpoint: &KeyEndpoint,
        request: &CreateKeyRequest,
    ) -> Result<Key, ApiError>;

    async fn get_key(&self, endpoint: &KeyEndpoint, key_id: &str) -> Result<Key, ApiError>;

    /// Delete a key; `force` removes it even while other resources still reference it.
    /// Returns the deleted key when the service echoes it back.
    async fn delete_key(
        &self,
        endpoint: &KeyEndpoint,
        key_id: &str,
        force: bool,
    ) -> Result<Option<Key>, ApiError>;
}

/// Lookup of the KMS API hosts of an HPCS instance
#[async_trait]
pub trait HpcsEndpointApi: Send + Sync {
    async fn get_api_endpoint(&self, instance_id: &str) -> Result<HpcsEndpoints, ApiError>;
}

/// Resource controller, used to learn an instance's CRN from its GUID
#[async_trait]
pub trait ResourceControllerApi: Send + Sync {
    async fn get_instance(&self, instance_id: &str) -> Result<ServiceInstance, ApiError>;
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, KeyControllerError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("kms-key-controller/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| KeyControllerError::ClientSession(format!("Failed to build HTTP client: {e}")))
}

/// Pass successful responses through, turn everything else into an `ApiError`
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_response(status.as_u16(), &body))
}

/// Join a relative path onto a base URL string
pub(crate) fn join_url(base: &str, path: &str) -> Result<Url, ApiError> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| ApiError::new(None, format!("Invalid URL '{joined}': {e}")))
}
