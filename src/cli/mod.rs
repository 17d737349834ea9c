use clap::{Parser, Subcommand};

use crate::constants::defaults::{IAM_TOKEN_ENV, STATE_FILE};
use crate::crn::EndpointType;
use crate::resource::KeySpec;
use crate::utils::SecureString;

#[derive(Parser)]
#[command(name = "kms-key-controller")]
#[command(about = "Manage the lifecycle of IBM Key Protect and Hyper Protect Crypto Services keys")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate or import a key and record it in the state file
    Create(CreateArgs),
    /// Refresh the recorded key from the service
    Read,
    /// Change settings of the recorded key
    Update(UpdateArgs),
    /// Delete the recorded key
    Delete,
    /// Check whether the recorded key still exists
    Exists,
    /// Adopt an existing key by CRN into the state file
    Import(ImportArgs),
    /// Exists, then Read; forgets the key when it is gone
    Refresh,
}

#[derive(Parser)]
pub struct GlobalArgs {
    /// Configuration file path (TOML)
    #[arg(short, long, env = "KMS_CONFIG", global = true)]
    pub config: Option<String>,

    /// IBM Cloud region
    #[arg(long, env = "IC_REGION", global = true)]
    pub region: Option<String>,

    /// Key Protect base URL (defaults to the regional endpoint)
    #[arg(long, env = "KMS_BASE_URL", global = true)]
    pub kms_base_url: Option<String>,

    /// HPCS broker URL used to look up instance endpoints
    #[arg(long, env = "HPCS_ENDPOINT_URL", global = true)]
    pub hpcs_endpoint_url: Option<String>,

    /// Resource controller URL
    #[arg(long, env = "RESOURCE_CONTROLLER_URL", global = true)]
    pub resource_controller_url: Option<String>,

    /// Console base URL used for dashboard links
    #[arg(long, global = true)]
    pub console_url: Option<String>,

    /// IAM bearer token (will be prompted securely if not provided)
    /// Setting this via CLI argument is NOT recommended for security
    #[arg(long, env = IAM_TOKEN_ENV, hide_env_values = true, global = true)]
    pub iam_token: Option<String>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, global = true)]
    pub request_timeout: Option<u64>,

    /// Log level
    #[arg(long, env = "RUST_LOG", global = true)]
    pub log_level: Option<String>,

    /// JSON file holding the managed key record
    #[arg(long, env = "KMS_STATE_FILE", default_value = STATE_FILE, global = true)]
    pub state: String,
}

#[derive(Parser)]
pub struct CreateArgs {
    /// GUID of the Key Protect or HPCS instance
    #[arg(long)]
    pub instance_id: String,

    /// Name of the key
    #[arg(long)]
    pub key_name: String,

    /// "public" or "private"
    #[arg(long, default_value = "public")]
    pub endpoint_type: EndpointType,

    /// Create a standard (extractable) key instead of a root key
    #[arg(long)]
    pub standard_key: bool,

    /// Base64 key material to import
    #[arg(long, env = "KMS_KEY_PAYLOAD", hide_env_values = true)]
    pub payload: Option<String>,

    /// Base64 nonce for an imported root key
    #[arg(long)]
    pub encrypted_nonce: Option<String>,

    /// Base64 IV for an imported root key
    #[arg(long)]
    pub iv_value: Option<String>,

    /// Delete the key even when other resources still reference it
    #[arg(long)]
    pub force_delete: bool,
}

impl CreateArgs {
    pub fn into_spec(self) -> KeySpec {
        KeySpec {
            instance_id: self.instance_id,
            key_name: self.key_name,
            endpoint_type: self.endpoint_type,
            standard_key: self.standard_key,
            payload: self.payload.map(SecureString::from),
            encrypted_nonce: self.encrypted_nonce.map(SecureString::from),
            iv_value: self.iv_value.map(SecureString::from),
            force_delete: self.force_delete,
        }
    }
}

/// Desired values; anything left out keeps the recorded value.
#[derive(Parser)]
pub struct UpdateArgs {
    /// New force_delete setting ("true" or "false")
    #[arg(long)]
    pub force_delete: Option<bool>,

    /// Desired key name (cannot change in place)
    #[arg(long)]
    pub key_name: Option<String>,

    /// Desired endpoint type (cannot change in place)
    #[arg(long)]
    pub endpoint_type: Option<EndpointType>,

    /// Desired key kind (cannot change in place)
    #[arg(long)]
    pub standard_key: Option<bool>,
}

impl UpdateArgs {
    /// Overlay the requested values on the recorded spec
    pub fn desired(&self, mut current: KeySpec) -> KeySpec {
        if let Some(force_delete) = self.force_delete {
            current.force_delete = force_delete;
        }
        if let Some(key_name) = &self.key_name {
            current.key_name = key_name.clone();
        }
        if let Some(endpoint_type) = self.endpoint_type {
            current.endpoint_type = endpoint_type;
        }
        if let Some(standard_key) = self.standard_key {
            current.standard_key = standard_key;
        }
        current
    }
}

#[derive(Parser)]
pub struct ImportArgs {
    /// CRN of the existing key
    pub crn: String,
}
