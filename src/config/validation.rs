use tracing::warn;
use url::Url;

use super::types::Config;
use crate::errors::KeyControllerError;

impl Config {
    /// Validate the configuration settings
    pub fn validate(&self) -> Result<(), KeyControllerError> {
        self.validate_session()?;
        self.validate_timeouts()?;
        Ok(())
    }

    fn validate_session(&self) -> Result<(), KeyControllerError> {
        let session = &self.session;

        if session.region.trim().is_empty() {
            return Err(KeyControllerError::Config(
                "Region cannot be empty".to_string(),
            ));
        }

        // The Key Protect base may be given as a bare host
        let kms_base = session.kms_base_url();
        let kms_base = if kms_base.contains("://") {
            kms_base
        } else {
            format!("https://{kms_base}")
        };
        validate_url("kms_base_url", &kms_base)?;
        validate_url("hpcs_endpoint_url", &session.hpcs_endpoint_url())?;
        validate_url("resource_controller_url", &session.resource_controller_url)?;
        validate_url("console_url", &session.console_url)?;

        if session.request_timeout_secs == 0 {
            return Err(KeyControllerError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(token) = &session.iam_token {
            if token.trim().is_empty() {
                return Err(KeyControllerError::Config(
                    "iam_token is set but empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    fn validate_timeouts(&self) -> Result<(), KeyControllerError> {
        if self.timeouts.create_secs == 0 || self.timeouts.update_secs == 0 {
            return Err(KeyControllerError::Config(
                "Create and update timeouts must be greater than zero".to_string(),
            ));
        }

        if self.timeouts.create_secs < self.session.request_timeout_secs {
            warn!(
                "⚠️  Create timeout ({}s) is shorter than the per-request timeout ({}s)",
                self.timeouts.create_secs, self.session.request_timeout_secs
            );
        }

        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<(), KeyControllerError> {
    let url = Url::parse(value)
        .map_err(|e| KeyControllerError::Config(format!("Invalid {field} '{value}': {e}")))?;

    if url.scheme() != "https" {
        warn!("⚠️  {} uses '{}' instead of https", field, url.scheme());
    }

    Ok(())
}
