use anyhow::Result;
use rpassword::prompt_password;
use tracing::{info, warn};

use super::SecureString;

/// Securely prompt for an IAM bearer token
pub fn prompt_for_iam_token(prompt_message: &str) -> Result<SecureString> {
    warn!("🔐 Prompting for IAM token securely...");

    let token = prompt_password(prompt_message)?;
    let token = normalize_bearer_token(token);

    if token.is_empty() {
        return Err(anyhow::anyhow!("IAM token cannot be empty"));
    }

    info!("✅ IAM token received securely");
    Ok(token)
}

/// Get the IAM token from configuration/environment or prompt the user
pub fn get_iam_token_securely(
    provided_token: Option<String>,
    prompt_message: &str,
) -> Result<SecureString> {
    match provided_token {
        Some(token) => {
            warn!("⚠️  SECURITY WARNING: IAM token provided via CLI argument, config file or environment");
            warn!("⚠️  Tokens passed this way may be visible in process lists or shell history");

            let token = normalize_bearer_token(token);
            if token.is_empty() {
                return Err(anyhow::anyhow!("Provided IAM token cannot be empty"));
            }

            Ok(token)
        }
        None => prompt_for_iam_token(prompt_message),
    }
}

/// Strip a leading "Bearer " so the token can be passed straight to `bearer_auth`
fn normalize_bearer_token(token: String) -> SecureString {
    let trimmed = token.trim_start();
    let stripped = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))
        .unwrap_or(trimmed);

    let secure = SecureString::from(stripped.trim());
    drop(SecureString::new(token));
    secure
}
