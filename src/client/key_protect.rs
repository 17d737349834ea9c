use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::types::{CreateKeyRequest, Key, KeyCollection};
use super::{build_http_client, check_status, ApiError, KeyEndpoint, KeyManagementApi};
use crate::constants::api::{INSTANCE_HEADER, KEY_MEDIA_TYPE, PREFER_REPRESENTATION};
use crate::errors::KeyControllerError;
use crate::utils::SecureString;

/// HTTP client for the Key Protect keys API (also served by HPCS instances)
pub struct KeyProtectClient {
    client: reqwest::Client,
    token: SecureString,
}

impl KeyProtectClient {
    pub fn new(token: SecureString, timeout: Duration) -> Result<Self, KeyControllerError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            token,
        })
    }

    fn request(&self, method: Method, url: Url, endpoint: &KeyEndpoint) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(self.token.expose())
            .header(INSTANCE_HEADER, &endpoint.instance_id)
            .header(ACCEPT, "application/json")
    }

    async fn first_key(response: reqwest::Response) -> Result<Key, ApiError> {
        let collection: KeyCollection<Key> = response.json().await?;
        collection
            .resources
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::new(None, "response contained no key resources"))
    }
}

#[async_trait]
impl KeyManagementApi for KeyProtectClient {
    async fn create_key(
        &self,
        endpoint: &KeyEndpoint,
        request: &CreateKeyRequest,
    ) -> Result<Key, ApiError> {
        debug!(
            "POST {} (instance {}, extractable={}, imported={})",
            endpoint.keys_url,
            endpoint.instance_id,
            request.extractable,
            request.payload.is_some()
        );

        let body = serde_json::to_vec(&KeyCollection::single(request))
            .map_err(|e| ApiError::new(None, format!("Failed to encode key request: {e}")))?;

        let response = self
            .request(Method::POST, endpoint.keys_url.clone(), endpoint)
            .header(CONTENT_TYPE, KEY_MEDIA_TYPE)
            .header("Prefer", PREFER_REPRESENTATION)
            .body(body)
            .send()
            .await?;

        Self::first_key(check_status(response).await?).await
    }

    async fn get_key(&self, endpoint: &KeyEndpoint, key_id: &str) -> Result<Key, ApiError> {
        let url = endpoint.key_url(key_id)?;
        debug!("GET {} (instance {})", url, endpoint.instance_id);

        let response = self.request(Method::GET, url, endpoint).send().await?;

        Self::first_key(check_status(response).await?).await
    }

    async fn delete_key(
        &self,
        endpoint: &KeyEndpoint,
        key_id: &str,
        force: bool,
    ) -> Result<Option<Key>, ApiError> {
        let mut url = endpoint.key_url(key_id)?;
        if force {
            url.query_pairs_mut().append_pair("force", "true");
        }
        debug!("DELETE {} (instance {})", url, endpoint.instance_id);

        let response = self
            .request(Method::DELETE, url, endpoint)
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await?;
        let response = check_status(response).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let collection: KeyCollection<Key> = serde_json::from_str(&body)
            .map_err(|e| ApiError::new(None, format!("Failed to decode delete response: {e}")))?;
        Ok(collection.resources.into_iter().next())
    }
}
