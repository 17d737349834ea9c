pub mod loader;
pub mod session;
pub mod types;
pub mod validation;

// Re-export main types for easier access
pub use types::*;
