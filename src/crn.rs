use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{SERVICE_HPCS, SERVICE_KMS};
use crate::errors::KeyControllerError;

/// Minimum number of colon-separated segments a usable CRN carries
const MIN_SEGMENTS: usize = 8;

/// Key-management service family behind an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    /// Hyper Protect Crypto Services
    HsCrypto,
    /// Standard Key Protect
    Kms,
}

impl ServiceType {
    pub fn from_service_name(name: &str) -> Result<Self, KeyControllerError> {
        match name {
            SERVICE_HPCS => Ok(ServiceType::HsCrypto),
            SERVICE_KMS => Ok(ServiceType::Kms),
            other => Err(KeyControllerError::UnsupportedService(format!(
                "'{other}' is not one of {SERVICE_HPCS}, {SERVICE_KMS}"
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::HsCrypto => SERVICE_HPCS,
            ServiceType::Kms => SERVICE_KMS,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network visibility of the endpoint used to reach an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointType {
    #[default]
    Public,
    Private,
}

impl EndpointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::Public => "public",
            EndpointType::Private => "private",
        }
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointType {
    type Err = KeyControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(EndpointType::Public),
            "private" => Ok(EndpointType::Private),
            other => Err(KeyControllerError::InvalidRequest(format!(
                "endpoint_type must be one of public, private (got '{other}')"
            ))),
        }
    }
}

/// Cloud Resource Name, split once into its colon-separated segments.
///
/// Only positional access is provided: index 3 is read as endpoint
/// visibility, index 4 as the service name, and the third-to-last and last
/// segments as the instance ID and resource (key) ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crn {
    raw: String,
    segments: Vec<String>,
}

impl Crn {
    pub fn parse(raw: &str) -> Result<Self, KeyControllerError> {
        let segments: Vec<String> = raw.split(':').map(str::to_string).collect();

        if segments.len() < MIN_SEGMENTS {
            return Err(KeyControllerError::InvalidCrn(format!(
                "'{raw}' has {} segments, expected at least {MIN_SEGMENTS}",
                segments.len()
            )));
        }
        if segments[0] != "crn" {
            return Err(KeyControllerError::InvalidCrn(format!(
                "'{raw}' does not start with 'crn:'"
            )));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Segment 3, e.g. "public"
    pub fn visibility(&self) -> &str {
        &self.segments[3]
    }

    /// Segment 4, e.g. "kms" or "hs-crypto"
    pub fn service_name(&self) -> &str {
        &self.segments[4]
    }

    pub fn service_type(&self) -> Result<ServiceType, KeyControllerError> {
        ServiceType::from_service_name(self.service_name())
    }

    /// Anything other than a literal "public" visibility selects the private endpoint
    pub fn endpoint_type(&self) -> EndpointType {
        if self.visibility() == "public" {
            EndpointType::Public
        } else {
            EndpointType::Private
        }
    }

    pub fn instance_id(&self) -> &str {
        &self.segments[self.segments.len() - 3]
    }

    pub fn key_id(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// The CRN with a trailing `:key:<key_id>` removed, if present
    pub fn without_key_suffix(&self, key_id: &str) -> &str {
        let suffix = format!(":key:{key_id}");
        self.raw.strip_suffix(suffix.as_str()).unwrap_or(&self.raw)
    }
}

impl FromStr for Crn {
    type Err = KeyControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Crn::parse(s)
    }
}

impl fmt::Display for Crn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
