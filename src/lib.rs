pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod crn;
pub mod errors;
pub mod key_management;
pub mod resource;
pub mod session;
pub mod utils;

pub use config::Config;
pub use crn::{Crn, EndpointType, ServiceType};
pub use errors::KeyControllerError;
pub use resource::{KeyResource, KeyResourceData, KeySpec};
pub use session::ClientSession;

// Re-export CLI types for main.rs
pub use cli::*;
