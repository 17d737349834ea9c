use tracing::debug;
use url::Url;

use crate::client::KeyEndpoint;
use crate::constants::api::{KEYS_PATH, PRIVATE_HOST_PREFIX};
use crate::crn::{Crn, EndpointType, ServiceType};
use crate::errors::KeyControllerError;
use crate::session::ClientSession;

/// Works out which keys API a request must go to.
///
/// Nothing is cached: every call re-derives the endpoint from the CRN (or
/// instance ID) it is given, and the result is handed to the client per call.
pub struct EndpointResolver<'a> {
    session: &'a ClientSession,
}

impl<'a> EndpointResolver<'a> {
    pub fn new(session: &'a ClientSession) -> Self {
        Self { session }
    }

    /// Resolve the endpoint of the instance that owns an existing key
    pub async fn resolve_for_crn(&self, crn: &Crn) -> Result<KeyEndpoint, KeyControllerError> {
        self.resolve(crn.service_type()?, crn.instance_id(), crn.endpoint_type())
            .await
    }

    /// Resolve the endpoint of an instance known only by its GUID.
    /// The service family is read from the instance CRN held by the resource controller.
    pub async fn resolve_for_instance(
        &self,
        instance_id: &str,
        endpoint_type: EndpointType,
    ) -> Result<(ServiceType, KeyEndpoint), KeyControllerError> {
        let resource_controller = self.session.resource_controller_api()?;
        let instance = resource_controller
            .get_instance(instance_id)
            .await
            .map_err(|e| {
                KeyControllerError::remote(
                    format!("Error while looking up service instance {instance_id}"),
                    e,
                )
            })?;

        let instance_crn = Crn::parse(&instance.crn)?;
        let service = instance_crn.service_type()?;
        let endpoint = self.resolve(service, instance_id, endpoint_type).await?;

        Ok((service, endpoint))
    }

    pub async fn resolve(
        &self,
        service: ServiceType,
        instance_id: &str,
        endpoint_type: EndpointType,
    ) -> Result<KeyEndpoint, KeyControllerError> {
        let keys_url = match service {
            ServiceType::HsCrypto => {
                let hpcs = self.session.hpcs_endpoint_api()?;
                let endpoints = hpcs.get_api_endpoint(instance_id).await.map_err(|e| {
                    KeyControllerError::remote(
                        format!("Error while looking up HPCS endpoints of {instance_id}"),
                        e,
                    )
                })?;

                let host = match endpoint_type {
                    EndpointType::Public => endpoints.kms.public,
                    EndpointType::Private => endpoints.kms.private,
                };
                hpcs_keys_url(&host)?
            }
            ServiceType::Kms => kms_keys_url(self.session.kms_base_url(), endpoint_type)?,
        };

        debug!(
            "Resolved {} {} endpoint for instance {}: {}",
            service, endpoint_type, instance_id, keys_url
        );

        Ok(KeyEndpoint::new(keys_url, instance_id))
    }
}

/// `https://<host>/api/v2/keys` for an HPCS KMS host
pub fn hpcs_keys_url(host: &str) -> Result<Url, KeyControllerError> {
    let host = host.trim();
    if host.is_empty() || host.contains('/') {
        return Err(KeyControllerError::UrlParse(format!(
            "'{host}' is not a valid HPCS host"
        )));
    }

    let raw = format!("https://{host}{KEYS_PATH}");
    let url = Url::parse(&raw)
        .map_err(|e| KeyControllerError::UrlParse(format!("{raw}: {e}")))?;

    if url.host_str().is_none() {
        return Err(KeyControllerError::UrlParse(format!("{raw}: missing host")));
    }

    Ok(url)
}

/// Prefix the host of a Key Protect base URL with `private.`.
///
/// Idempotent: a base whose host already starts with `private.` is returned as is.
/// Bases without a scheme are treated as a bare host.
pub fn private_base_url(base: &str) -> String {
    match base.split_once("://") {
        Some((_, host)) if host.starts_with(PRIVATE_HOST_PREFIX) => base.to_string(),
        Some((scheme, host)) => format!("{scheme}://{PRIVATE_HOST_PREFIX}{host}"),
        None if base.starts_with(PRIVATE_HOST_PREFIX) => base.to_string(),
        None => format!("{PRIVATE_HOST_PREFIX}{base}"),
    }
}

/// Keys collection URL of the standard Key Protect service
pub fn kms_keys_url(base: &str, endpoint_type: EndpointType) -> Result<Url, KeyControllerError> {
    let base = match endpoint_type {
        EndpointType::Private => private_base_url(base),
        EndpointType::Public => base.to_string(),
    };

    let base = if base.contains("://") {
        base
    } else {
        format!("https://{base}")
    };

    let raw = format!("{}{KEYS_PATH}", base.trim_end_matches('/'));
    Url::parse(&raw).map_err(|e| KeyControllerError::UrlParse(format!("{raw}: {e}")))
}
