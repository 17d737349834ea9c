pub mod service;
pub mod state;

pub use service::KeyManagementService;
pub use state::StateFile;
