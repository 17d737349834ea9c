pub mod credentials;
pub mod secure_string;

pub use credentials::{get_iam_token_securely, prompt_for_iam_token};
pub use secure_string::SecureString;
