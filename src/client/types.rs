use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::api::KEY_MEDIA_TYPE;

/// Envelope used by the Key Protect API for both requests and responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyCollection<T> {
    #[serde(default)]
    pub metadata: CollectionMetadata,
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
}

impl<T> KeyCollection<T> {
    pub fn single(resource: T) -> Self {
        Self {
            metadata: CollectionMetadata {
                collection_type: KEY_MEDIA_TYPE.to_string(),
                collection_total: 1,
            },
            resources: vec![resource],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMetadata {
    #[serde(default)]
    pub collection_type: String,
    #[serde(default)]
    pub collection_total: usize,
}

/// A key as returned by the Key Protect / HPCS keys API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<u32>,
    /// true for standard keys, false for root keys
    #[serde(default)]
    pub extractable: bool,
    #[serde(default)]
    pub crn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imported: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<DateTime<Utc>>,
}

impl Key {
    pub fn key_state(&self) -> Option<KeyState> {
        self.state.map(KeyState::from)
    }
}

/// Remote key lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    PreActivation,
    Active,
    Suspended,
    Deactivated,
    Destroyed,
    Unknown(u32),
}

impl From<u32> for KeyState {
    fn from(code: u32) -> Self {
        match code {
            0 => KeyState::PreActivation,
            1 => KeyState::Active,
            2 => KeyState::Suspended,
            3 => KeyState::Deactivated,
            5 => KeyState::Destroyed,
            other => KeyState::Unknown(other),
        }
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyState::PreActivation => f.write_str("Pre-activation"),
            KeyState::Active => f.write_str("Active"),
            KeyState::Suspended => f.write_str("Suspended"),
            KeyState::Deactivated => f.write_str("Deactivated"),
            KeyState::Destroyed => f.write_str("Destroyed"),
            KeyState::Unknown(code) => write!(f, "Unknown({code})"),
        }
    }
}

/// Body of a key creation or import request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyRequest {
    #[serde(rename = "type")]
    pub key_type: String,
    pub name: String,
    pub extractable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
}

impl CreateKeyRequest {
    fn base(name: &str, extractable: bool) -> Self {
        Self {
            key_type: KEY_MEDIA_TYPE.to_string(),
            name: name.to_string(),
            extractable,
            payload: None,
            encrypted_nonce: None,
            iv: None,
        }
    }

    /// Generate a new standard (extractable) key
    pub fn standard(name: &str) -> Self {
        Self::base(name, true)
    }

    /// Import a standard key from base64 payload
    pub fn imported_standard(name: &str, payload: &str) -> Self {
        Self {
            payload: Some(payload.to_string()),
            ..Self::base(name, true)
        }
    }

    /// Generate a new root (non-extractable) key
    pub fn root(name: &str) -> Self {
        Self::base(name, false)
    }

    /// Import a root key; nonce and IV are only present for securely imported material
    pub fn imported_root(
        name: &str,
        payload: &str,
        encrypted_nonce: Option<&str>,
        iv: Option<&str>,
    ) -> Self {
        Self {
            payload: Some(payload.to_string()),
            encrypted_nonce: encrypted_nonce.map(str::to_string),
            iv: iv.map(str::to_string),
            ..Self::base(name, false)
        }
    }
}

/// KMS API hosts of an HPCS instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HpcsEndpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub kms: KmsHosts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KmsHosts {
    #[serde(default)]
    pub public: String,
    #[serde(default)]
    pub private: String,
}

/// Service instance as reported by the resource controller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub crn: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub resource_group_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_body_shape() {
        let request = CreateKeyRequest::imported_root("root-1", "cGF5bG9hZA==", Some("bm9uY2U="), Some("aXY="));
        let body = serde_json::to_value(KeyCollection::single(request)).unwrap();

        assert_eq!(
            body,
            json!({
                "metadata": {
                    "collectionType": "application/vnd.ibm.kms.key+json",
                    "collectionTotal": 1
                },
                "resources": [{
                    "type": "application/vnd.ibm.kms.key+json",
                    "name": "root-1",
                    "extractable": false,
                    "payload": "cGF5bG9hZA==",
                    "encryptedNonce": "bm9uY2U=",
                    "iv": "aXY="
                }]
            })
        );
    }

    #[test]
    fn test_generated_key_request_omits_material() {
        let body = serde_json::to_value(CreateKeyRequest::standard("std-1")).unwrap();
        assert_eq!(body["extractable"], json!(true));
        assert!(body.get("payload").is_none());
        assert!(body.get("encryptedNonce").is_none());
        assert!(body.get("iv").is_none());
    }

    #[test]
    fn test_key_decodes_from_api_response() {
        let key: Key = serde_json::from_value(json!({
            "type": "application/vnd.ibm.kms.key+json",
            "id": "k1",
            "name": "my-key",
            "state": 1,
            "extractable": false,
            "crn": "crn:v1:bluemix:public:kms:us-south:a/acct:inst:key:k1",
            "imported": false,
            "creationDate": "2024-03-04T10:11:12Z",
            "algorithmType": "AES"
        }))
        .unwrap();

        assert_eq!(key.id, "k1");
        assert_eq!(key.key_state(), Some(KeyState::Active));
        assert!(!key.extractable);
        assert!(key.payload.is_none());
        assert!(key.creation_date.is_some());
    }

    #[test]
    fn test_key_state_names() {
        assert_eq!(KeyState::from(0).to_string(), "Pre-activation");
        assert_eq!(KeyState::from(5).to_string(), "Destroyed");
        assert_eq!(KeyState::from(9).to_string(), "Unknown(9)");
    }
}
