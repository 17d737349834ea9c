use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::Key;
use crate::crn::{Crn, EndpointType, ServiceType};
use crate::errors::KeyControllerError;
use crate::utils::SecureString;

/// Declarative description of a key.
///
/// Everything except `force_delete` is fixed once the key exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeySpec {
    pub instance_id: String,
    pub key_name: String,
    #[serde(default)]
    pub endpoint_type: EndpointType,
    #[serde(default)]
    pub standard_key: bool,
    #[serde(default)]
    pub payload: Option<SecureString>,
    #[serde(default)]
    pub encrypted_nonce: Option<SecureString>,
    #[serde(default)]
    pub iv_value: Option<SecureString>,
    #[serde(default)]
    pub force_delete: bool,
}

impl KeySpec {
    pub fn validate(&self) -> Result<(), KeyControllerError> {
        if self.instance_id.trim().is_empty() {
            return Err(KeyControllerError::InvalidRequest(
                "instance_id is required".to_string(),
            ));
        }
        if self.key_name.trim().is_empty() {
            return Err(KeyControllerError::InvalidRequest(
                "key_name is required".to_string(),
            ));
        }

        for (field, value) in [
            ("payload", &self.payload),
            ("encrypted_nonce", &self.encrypted_nonce),
            ("iv_value", &self.iv_value),
        ] {
            if let Some(value) = exposed(value) {
                STANDARD.decode(value).map_err(|e| {
                    KeyControllerError::InvalidRequest(format!("{field} is not valid base64: {e}"))
                })?;
            }
        }

        if self.standard_key && (self.encrypted_nonce().is_some() || self.iv_value().is_some()) {
            warn!("⚠️  encrypted_nonce and iv_value only apply to imported root keys and will be ignored");
        }

        Ok(())
    }

    /// Import material, treating an empty string as absent
    pub fn payload(&self) -> Option<&str> {
        exposed(&self.payload)
    }

    pub fn encrypted_nonce(&self) -> Option<&str> {
        exposed(&self.encrypted_nonce)
    }

    pub fn iv_value(&self) -> Option<&str> {
        exposed(&self.iv_value)
    }
}

fn exposed(secret: &Option<SecureString>) -> Option<&str> {
    secret
        .as_ref()
        .map(SecureString::expose)
        .filter(|value| !value.is_empty())
}

/// Local record of a managed key: the configured fields plus everything
/// computed from the remote key. `id` is always the key CRN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyResourceData {
    #[serde(default)]
    pub id: Option<String>,

    pub instance_id: String,
    pub key_name: String,
    #[serde(default)]
    pub endpoint_type: EndpointType,
    #[serde(default)]
    pub standard_key: bool,
    #[serde(default)]
    pub payload: Option<SecureString>,
    #[serde(default)]
    pub encrypted_nonce: Option<SecureString>,
    #[serde(default)]
    pub iv_value: Option<SecureString>,
    #[serde(default)]
    pub force_delete: bool,

    #[serde(default)]
    pub key_id: Option<String>,
    /// "hs-crypto" or "kms"
    #[serde(rename = "type", default)]
    pub instance_type: Option<String>,
    #[serde(default)]
    pub crn: Option<String>,
    #[serde(default)]
    pub resource_name: Option<String>,
    #[serde(default)]
    pub resource_crn: Option<String>,
    #[serde(default)]
    pub resource_status: Option<String>,
    #[serde(default)]
    pub resource_group_name: Option<String>,
    #[serde(default)]
    pub resource_controller_url: Option<String>,
}

impl KeyResourceData {
    pub fn from_spec(spec: KeySpec) -> Self {
        Self {
            instance_id: spec.instance_id,
            key_name: spec.key_name,
            endpoint_type: spec.endpoint_type,
            standard_key: spec.standard_key,
            payload: spec.payload,
            encrypted_nonce: spec.encrypted_nonce,
            iv_value: spec.iv_value,
            force_delete: spec.force_delete,
            ..Self::default()
        }
    }

    pub fn spec(&self) -> KeySpec {
        KeySpec {
            instance_id: self.instance_id.clone(),
            key_name: self.key_name.clone(),
            endpoint_type: self.endpoint_type,
            standard_key: self.standard_key,
            payload: self.payload.clone(),
            encrypted_nonce: self.encrypted_nonce.clone(),
            iv_value: self.iv_value.clone(),
            force_delete: self.force_delete,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// The CRN stored as resource ID, parsed
    pub fn parsed_id(&self) -> Result<Crn, KeyControllerError> {
        let id = self.id().ok_or_else(|| {
            KeyControllerError::InvalidRequest(
                "resource has no ID; create or import the key first".to_string(),
            )
        })?;
        Crn::parse(id)
    }

    /// First immutable field whose desired value differs from the record
    pub fn replacement_field(&self, desired: &KeySpec) -> Option<&'static str> {
        fn material_differs(current: &Option<SecureString>, desired: &Option<SecureString>) -> bool {
            match (exposed(current), exposed(desired)) {
                (Some(current), Some(desired)) => current != desired,
                _ => false,
            }
        }

        if !desired.instance_id.is_empty() && desired.instance_id != self.instance_id {
            return Some("instance_id");
        }
        if desired.key_name != self.key_name {
            return Some("key_name");
        }
        if desired.endpoint_type != self.endpoint_type {
            return Some("endpoint_type");
        }
        if desired.standard_key != self.standard_key {
            return Some("standard_key");
        }
        if material_differs(&self.payload, &desired.payload) {
            return Some("payload");
        }
        if material_differs(&self.encrypted_nonce, &desired.encrypted_nonce) {
            return Some("encrypted_nonce");
        }
        if material_differs(&self.iv_value, &desired.iv_value) {
            return Some("iv_value");
        }

        None
    }

    /// Overwrite the record from the remote key.
    ///
    /// `force_delete` and `endpoint_type` stay as configured: the CRN always
    /// names the public network, whichever endpoint created the key.
    pub(crate) fn apply_key(
        &mut self,
        key: &Key,
        key_id: &str,
        crn: &Crn,
        service: ServiceType,
        dashboard_url: String,
    ) {
        self.key_id = Some(key_id.to_string());
        self.standard_key = key.extractable;
        self.payload = key.payload.clone().map(SecureString::from);
        self.encrypted_nonce = key.encrypted_nonce.clone().map(SecureString::from);
        self.iv_value = key.iv.clone().map(SecureString::from);
        self.key_name = key.name.clone();
        self.crn = Some(key.crn.clone());
        self.instance_type = Some(service.as_str().to_string());
        if self.instance_id.is_empty() {
            self.instance_id = crn.instance_id().to_string();
        }
        self.resource_name = Some(key.name.clone());
        self.resource_crn = Some(key.crn.clone());
        self.resource_status = key.key_state().map(|state| state.to_string());
        self.resource_controller_url = Some(dashboard_url);
    }
}
