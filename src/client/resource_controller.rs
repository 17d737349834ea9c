use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::debug;

use super::types::ServiceInstance;
use super::{build_http_client, check_status, join_url, ApiError, ResourceControllerApi};
use crate::errors::KeyControllerError;
use crate::utils::SecureString;

pub struct ResourceControllerClient {
    client: reqwest::Client,
    base_url: String,
    token: SecureString,
}

impl ResourceControllerClient {
    pub fn new(
        base_url: impl Into<String>,
        token: SecureString,
        timeout: Duration,
    ) -> Result<Self, KeyControllerError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into(),
            token,
        })
    }
}

#[async_trait]
impl ResourceControllerApi for ResourceControllerClient {
    async fn get_instance(&self, instance_id: &str) -> Result<ServiceInstance, ApiError> {
        let url = join_url(&self.base_url, &format!("v2/resource_instances/{instance_id}"))?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.expose())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }
}
