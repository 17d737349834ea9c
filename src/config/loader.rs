use anyhow::Result;
use std::fs;

use super::types::*;
use crate::cli::GlobalArgs;
use crate::errors::KeyControllerError;

impl Config {
    /// Load configuration from CLI arguments and optional config file
    pub fn load(cli: &GlobalArgs) -> Result<Self> {
        let file_config = match &cli.config {
            Some(config_path) => Self::load_from_file(config_path)?,
            None => Self::default(),
        };

        Ok(Self::merge_cli_overrides(file_config, cli))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(config_path: &str) -> Result<Self, KeyControllerError> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            KeyControllerError::Config(format!("Failed to read config file {config_path}: {e}"))
        })?;

        toml::from_str(&config_content)
            .map_err(|e| KeyControllerError::Config(format!("Failed to parse config file: {e}")))
    }

    /// Explicit CLI arguments (and their environment variables) override file values
    fn merge_cli_overrides(mut config: Self, cli: &GlobalArgs) -> Self {
        if let Some(region) = &cli.region {
            config.session.region = region.clone();
        }
        if let Some(url) = &cli.kms_base_url {
            config.session.kms_base_url = Some(url.clone());
        }
        if let Some(url) = &cli.hpcs_endpoint_url {
            config.session.hpcs_endpoint_url = Some(url.clone());
        }
        if let Some(url) = &cli.resource_controller_url {
            config.session.resource_controller_url = url.clone();
        }
        if let Some(url) = &cli.console_url {
            config.session.console_url = url.clone();
        }
        if cli.iam_token.is_some() {
            config.session.iam_token = cli.iam_token.clone();
        }
        if let Some(secs) = cli.request_timeout {
            config.session.request_timeout_secs = secs;
        }
        if let Some(level) = &cli.log_level {
            config.logging.level = level.clone();
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        global: GlobalArgs,
    }

    fn args(extra: &[&str]) -> GlobalArgs {
        let mut argv = vec!["kms-key-controller"];
        argv.extend_from_slice(extra);
        TestCli::parse_from(argv).global
    }

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load(&args(&["--iam-token", "t"])).unwrap();
        assert_eq!(config.session.region, "us-south");
        assert_eq!(
            config.session.kms_base_url(),
            "https://us-south.kms.cloud.ibm.com"
        );
        assert_eq!(config.timeouts.create_secs, 600);
    }

    #[test]
    fn test_file_values_and_cli_precedence() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[session]
region = "eu-de"
console_url = "https://test.cloud.ibm.com"

[timeouts]
create_secs = 120

[logging]
level = "debug"
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = Config::load(&args(&["--config", &path, "--region", "us-east"])).unwrap();

        assert_eq!(config.session.region, "us-east");
        assert_eq!(config.session.console_url, "https://test.cloud.ibm.com");
        assert_eq!(
            config.session.hpcs_endpoint_url(),
            "https://us-east.broker.hs-crypto.cloud.ibm.com/crypto_v2"
        );
        assert_eq!(config.timeouts.create_secs, 120);
        assert_eq!(config.timeouts.update_secs, 600);
    }

    #[test]
    fn test_explicit_log_level_wins() {
        let config = Config::load(&args(&["--log-level", "kms_key_controller=trace"])).unwrap();
        assert_eq!(config.logging.level, "kms_key_controller=trace");
    }

    #[test]
    fn test_unreadable_file_is_config_error() {
        let err = Config::load_from_file("/nonexistent/kms.toml").unwrap_err();
        assert!(matches!(err, KeyControllerError::Config(_)));
    }
}
