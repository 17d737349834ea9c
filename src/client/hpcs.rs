use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::debug;

use super::types::HpcsEndpoints;
use super::{build_http_client, check_status, join_url, ApiError, HpcsEndpointApi};
use crate::errors::KeyControllerError;
use crate::utils::SecureString;

/// Client for the HPCS broker's endpoint lookup
pub struct HpcsEndpointClient {
    client: reqwest::Client,
    base_url: String,
    token: SecureString,
}

impl HpcsEndpointClient {
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
impl HpcsEndpointApi for HpcsEndpointClient {
    async fn get_api_endpoint(&self, instance_id: &str) -> Result<HpcsEndpoints, ApiError> {
        let url = join_url(&self.base_url, &format!("instances/{instance_id}"))?;
        debug!("Looking up HPCS endpoints: GET {}", url);

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
