/// Service names found at CRN segment index 4
pub const SERVICE_HPCS: &str = "hs-crypto";
pub const SERVICE_KMS: &str = "kms";

/// Key Protect REST API
pub mod api {
    /// Path of the keys collection, relative to the service host
    pub const KEYS_PATH: &str = "/api/v2/keys";

    /// Media type used for key resources and collections
    pub const KEY_MEDIA_TYPE: &str = "application/vnd.ibm.kms.key+json";

    /// Header carrying the target service instance ID
    pub const INSTANCE_HEADER: &str = "Bluemix-Instance";

    /// Ask the service to echo the affected resource back
    pub const PREFER_REPRESENTATION: &str = "return=representation";

    /// Host label prefix of a private (service network) endpoint
    pub const PRIVATE_HOST_PREFIX: &str = "private.";
}

/// IBM Cloud console
pub mod dashboard {
    /// Path under the console base URL where KMS instances are shown
    pub const KMS_SERVICES_PATH: &str = "/services/kms/";

    /// Appended after the escaped instance CRN (an escaped "::")
    pub const CRN_SUFFIX: &str = "%3A%3A";
}

/// Default configuration values
pub mod defaults {
    pub const REGION: &str = "us-south";
    pub const RESOURCE_CONTROLLER_URL: &str = "https://resource-controller.cloud.ibm.com";
    pub const CONSOLE_URL: &str = "https://cloud.ibm.com";
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
    pub const CREATE_TIMEOUT_SECS: u64 = 600;
    pub const UPDATE_TIMEOUT_SECS: u64 = 600;
    pub const STATE_FILE: &str = "kms-key.state.json";
    pub const LOG_LEVEL: &str = "info";
    pub const IAM_TOKEN_ENV: &str = "IC_IAM_TOKEN";

    /// Regional Key Protect endpoint
    pub fn kms_base_url(region: &str) -> String {
        format!("https://{region}.kms.cloud.ibm.com")
    }

    /// Regional HPCS broker used for endpoint lookup
    pub fn hpcs_endpoint_url(region: &str) -> String {
        format!("https://{region}.broker.hs-crypto.cloud.ibm.com/crypto_v2")
    }
}
