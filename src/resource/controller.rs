use tracing::{info, warn};
use url::form_urlencoded;

use super::data::{KeyResourceData, KeySpec};
use super::endpoint::EndpointResolver;
use crate::client::CreateKeyRequest;
use crate::constants::dashboard::{CRN_SUFFIX, KMS_SERVICES_PATH};
use crate::crn::Crn;
use crate::errors::KeyControllerError;
use crate::session::ClientSession;

/// Create, Read, Update, Delete and Exists for a single Key Protect / HPCS key
#[derive(Clone)]
pub struct KeyResource {
    session: ClientSession,
}

impl KeyResource {
    pub fn new(session: ClientSession) -> Self {
        Self { session }
    }

    /// Generate or import the key described by `data`, then read it back.
    pub async fn create(&self, data: &mut KeyResourceData) -> Result<(), KeyControllerError> {
        let spec = data.spec();
        spec.validate()?;

        let key_management = self.session.key_management_api()?;
        let (service, endpoint) = EndpointResolver::new(&self.session)
            .resolve_for_instance(&spec.instance_id, spec.endpoint_type)
            .await?;

        let (request, context) = creation_request(&spec);
        info!(
            "Creating {} key '{}' in {} instance {}",
            if request.extractable { "standard" } else { "root" },
            spec.key_name,
            service,
            spec.instance_id
        );

        let key = key_management
            .create_key(&endpoint, &request)
            .await
            .map_err(|e| KeyControllerError::remote(context, e))?;

        if key.crn.is_empty() {
            return Err(KeyControllerError::InvalidCrn(format!(
                "created key {} was returned without a CRN",
                key.id
            )));
        }

        info!("✅ New key created: {} ({})", key.id, key.crn);
        data.set_id(key.crn);

        self.read(data).await
    }

    /// Refresh every field of `data` from the remote key named by its CRN
    pub async fn read(&self, data: &mut KeyResourceData) -> Result<(), KeyControllerError> {
        let key_management = self.session.key_management_api()?;
        let crn = data.parsed_id()?;
        let service = crn.service_type()?;

        let endpoint = EndpointResolver::new(&self.session)
            .resolve(service, crn.instance_id(), crn.endpoint_type())
            .await?;

        let key_id = crn.key_id();
        let key = key_management
            .get_key(&endpoint, key_id)
            .await
            .map_err(|e| KeyControllerError::remote("Get Key failed with error", e))?;

        let key_crn = if key.crn.is_empty() {
            crn.clone()
        } else {
            Crn::parse(&key.crn)?
        };
        let dashboard_url = dashboard_url(self.session.base_controller_url(), &key_crn, &key.id);

        data.apply_key(&key, key_id, &crn, service, dashboard_url);
        Ok(())
    }

    /// Only `force_delete` can change in place; it never touches the remote key.
    pub async fn update(
        &self,
        data: &mut KeyResourceData,
        desired: &KeySpec,
    ) -> Result<(), KeyControllerError> {
        if let Some(field) = data.replacement_field(desired) {
            return Err(KeyControllerError::RequiresReplacement(field));
        }

        if data.force_delete != desired.force_delete {
            info!(
                "force_delete changed: {} -> {}",
                data.force_delete, desired.force_delete
            );
            data.force_delete = desired.force_delete;
        }

        self.read(data).await
    }

    /// Delete the remote key and clear the resource ID.
    pub async fn delete(&self, data: &mut KeyResourceData) -> Result<(), KeyControllerError> {
        let key_management = self.session.key_management_api()?;
        let crn = data.parsed_id()?;
        let endpoint = EndpointResolver::new(&self.session)
            .resolve_for_crn(&crn)
            .await?;

        let force = data.force_delete;
        info!(
            "🗑️  Deleting key {} from instance {} (force={})",
            crn.key_id(),
            crn.instance_id(),
            force
        );

        key_management
            .delete_key(&endpoint, crn.key_id(), force)
            .await
            .map_err(|e| KeyControllerError::remote("Error while deleting", e))?;

        data.clear_id();
        info!("✅ Key {} deleted", crn.key_id());
        Ok(())
    }

    /// `Ok(false)` when the keys API answers 404, an error for any other failure.
    pub async fn exists(&self, data: &KeyResourceData) -> Result<bool, KeyControllerError> {
        let key_management = self.session.key_management_api()?;
        let crn = data.parsed_id()?;
        let endpoint = EndpointResolver::new(&self.session)
            .resolve_for_crn(&crn)
            .await?;

        match key_management.get_key(&endpoint, crn.key_id()).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(KeyControllerError::remote(
                "Error while checking key existence",
                e,
            )),
        }
    }

    /// Adopt an existing key by CRN
    pub async fn import(&self, crn: &str) -> Result<KeyResourceData, KeyControllerError> {
        let parsed = Crn::parse(crn)?;
        // Fail on foreign services before any lookup
        let service = parsed.service_type()?;

        let mut data = KeyResourceData {
            instance_id: parsed.instance_id().to_string(),
            ..KeyResourceData::default()
        };
        data.set_id(crn);

        self.read(&mut data).await?;
        info!("✅ Imported {} key {}", service, crn);
        Ok(data)
    }

    /// Exists, then Read. A key that is gone clears the record's ID instead of failing.
    pub async fn refresh(&self, data: &mut KeyResourceData) -> Result<bool, KeyControllerError> {
        if !self.exists(data).await? {
            warn!(
                "Key {} no longer exists, removing it from state",
                data.id().unwrap_or_default()
            );
            data.clear_id();
            return Ok(false);
        }

        self.read(data).await?;
        Ok(true)
    }
}

/// Pick one of the four create/import calls from `standard_key` and payload presence
fn creation_request(spec: &KeySpec) -> (CreateKeyRequest, &'static str) {
    let name = spec.key_name.as_str();

    match (spec.standard_key, spec.payload()) {
        (true, Some(payload)) => (
            CreateKeyRequest::imported_standard(name, payload),
            "Error while creating standard key with payload",
        ),
        (true, None) => (
            CreateKeyRequest::standard(name),
            "Error while creating standard key",
        ),
        (false, Some(payload)) => (
            CreateKeyRequest::imported_root(
                name,
                payload,
                spec.encrypted_nonce(),
                spec.iv_value(),
            ),
            "Error while creating root key with payload",
        ),
        (false, None) => (CreateKeyRequest::root(name), "Error while creating root key"),
    }
}

/// Console link for the instance owning a key: the key CRN minus `:key:<id>`,
/// query-escaped, under the KMS services path.
pub fn dashboard_url(console_url: &str, key_crn: &Crn, key_id: &str) -> String {
    let instance_part = key_crn.without_key_suffix(key_id);
    let escaped: String = form_urlencoded::byte_serialize(instance_part.as_bytes()).collect();

    format!(
        "{}{}{}{}",
        console_url.trim_end_matches('/'),
        KMS_SERVICES_PATH,
        escaped,
        CRN_SUFFIX
    )
}
