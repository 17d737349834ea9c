use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::client::{
    HpcsEndpointApi, HpcsEndpointClient, KeyManagementApi, KeyProtectClient,
    ResourceControllerApi, ResourceControllerClient,
};
use crate::config::SessionConfig;
use crate::errors::KeyControllerError;
use crate::utils::SecureString;

/// API clients and endpoint settings shared by every lifecycle operation.
///
/// Clients are optional so a session can be assembled piecemeal; asking for
/// one that was never configured is a client-session error.
#[derive(Clone)]
pub struct ClientSession {
    key_management: Option<Arc<dyn KeyManagementApi>>,
    hpcs_endpoint: Option<Arc<dyn HpcsEndpointApi>>,
    resource_controller: Option<Arc<dyn ResourceControllerApi>>,
    kms_base_url: String,
    console_url: String,
}

impl ClientSession {
    pub fn new(kms_base_url: impl Into<String>, console_url: impl Into<String>) -> Self {
        Self {
            key_management: None,
            hpcs_endpoint: None,
            resource_controller: None,
            kms_base_url: kms_base_url.into(),
            console_url: console_url.into(),
        }
    }

    /// Build HTTP clients for all three APIs from configuration
    pub fn from_config(
        config: &SessionConfig,
        token: SecureString,
    ) -> Result<Self, KeyControllerError> {
        if token.is_empty() {
            return Err(KeyControllerError::ClientSession(
                "IAM token is empty".to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.request_timeout_secs);

        let key_management = KeyProtectClient::new(token.clone(), timeout)?;
        let hpcs_endpoint =
            HpcsEndpointClient::new(config.hpcs_endpoint_url(), token.clone(), timeout)?;
        let resource_controller =
            ResourceControllerClient::new(config.resource_controller_url.clone(), token, timeout)?;

        info!(
            "Client session ready (region {}, key management at {})",
            config.region,
            config.kms_base_url()
        );

        Ok(Self::new(config.kms_base_url(), config.console_url.clone())
            .with_key_management(Arc::new(key_management))
            .with_hpcs_endpoint(Arc::new(hpcs_endpoint))
            .with_resource_controller(Arc::new(resource_controller)))
    }

    pub fn with_key_management(mut self, api: Arc<dyn KeyManagementApi>) -> Self {
        self.key_management = Some(api);
        self
    }

    pub fn with_hpcs_endpoint(mut self, api: Arc<dyn HpcsEndpointApi>) -> Self {
        self.hpcs_endpoint = Some(api);
        self
    }

    pub fn with_resource_controller(mut self, api: Arc<dyn ResourceControllerApi>) -> Self {
        self.resource_controller = Some(api);
        self
    }

    pub fn key_management_api(&self) -> Result<Arc<dyn KeyManagementApi>, KeyControllerError> {
        self.key_management.clone().ok_or_else(|| {
            KeyControllerError::ClientSession("Key management API is not configured".to_string())
        })
    }

    pub fn hpcs_endpoint_api(&self) -> Result<Arc<dyn HpcsEndpointApi>, KeyControllerError> {
        self.hpcs_endpoint.clone().ok_or_else(|| {
            KeyControllerError::ClientSession("HPCS endpoint API is not configured".to_string())
        })
    }

    pub fn resource_controller_api(
        &self,
    ) -> Result<Arc<dyn ResourceControllerApi>, KeyControllerError> {
        self.resource_controller.clone().ok_or_else(|| {
            KeyControllerError::ClientSession(
                "Resource controller API is not configured".to_string(),
            )
        })
    }

    /// Base URL of the standard Key Protect service
    pub fn kms_base_url(&self) -> &str {
        &self.kms_base_url
    }

    /// Console base used to build dashboard links
    pub fn base_controller_url(&self) -> &str {
        &self.console_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    #[test]
    fn test_missing_clients_are_session_errors() {
        let session = ClientSession::new("https://us-south.kms.cloud.ibm.com", "https://cloud.ibm.com");

        assert!(matches!(
            session.key_management_api(),
            Err(KeyControllerError::ClientSession(_))
        ));
        assert!(matches!(
            session.hpcs_endpoint_api(),
            Err(KeyControllerError::ClientSession(_))
        ));
        assert!(matches!(
            session.resource_controller_api(),
            Err(KeyControllerError::ClientSession(_))
        ));
    }

    #[test]
    fn test_from_config_builds_all_clients() {
        let config = SessionConfig {
            region: "eu-gb".to_string(),
            ..SessionConfig::default()
        };

        let session = ClientSession::from_config(&config, SecureString::from("token")).unwrap();
        assert!(session.key_management_api().is_ok());
        assert!(session.hpcs_endpoint_api().is_ok());
        assert!(session.resource_controller_api().is_ok());
        assert_eq!(session.kms_base_url(), "https://eu-gb.kms.cloud.ibm.com");
        assert_eq!(session.base_controller_url(), "https://cloud.ibm.com");
    }

    #[test]
    fn test_from_config_rejects_empty_token() {
        let result = ClientSession::from_config(&SessionConfig::default(), SecureString::default());
        assert!(matches!(result, Err(KeyControllerError::ClientSession(_))));
    }
}
