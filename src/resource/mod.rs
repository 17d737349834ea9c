pub mod controller;
pub mod data;
pub mod endpoint;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{dashboard_url, KeyResource};
pub use data::{KeyResourceData, KeySpec};
pub use endpoint::{hpcs_keys_url, kms_keys_url, private_base_url, EndpointResolver};
