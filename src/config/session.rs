use super::types::Config;
use crate::errors::KeyControllerError;
use crate::session::ClientSession;
use crate::utils::{get_iam_token_securely, SecureString};

impl Config {
    /// Get the IAM token from configuration or prompt for it
    pub fn get_iam_token(&self) -> Result<SecureString, KeyControllerError> {
        get_iam_token_securely(
            self.session.iam_token.clone(),
            "Enter IBM Cloud IAM token: ",
        )
        .map_err(|e| KeyControllerError::Config(format!("Failed to get IAM token: {e}")))
    }

    /// Create the client session from configuration
    pub fn create_session(&self) -> Result<ClientSession, KeyControllerError> {
        let token = self.get_iam_token()?;
        ClientSession::from_config(&self.session, token)
    }
}
