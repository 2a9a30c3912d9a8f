//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::secret::SecretRef;

const REDACTED: &str = "********";

/// Dump the current configuration to stdout, hiding literal passwords.
pub fn dump(config: &ClientConfig, path: &Path) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(&redacted(config))
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);
    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<()> {
    #[cfg(feature = "gradescope")]
    if config.portal.is_some() {
        let portal = config
            .portal_config()
            .map_err(|e| ClientError::Config(format!("invalid [portal] section: {}", e)))?;
        println!(
            "Portal settings are valid ({} course(s)).",
            portal.course_ids.len()
        );
    }

    #[cfg(feature = "google")]
    if config.google.is_some() {
        config
            .google_config()
            .map_err(|e| ClientError::Config(format!("invalid [google] section: {}", e)))?;
        println!("Google credentials are valid.");
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> ClientResult<()> {
    println!("config: {}", path.display());
    Ok(())
}

fn redacted(config: &ClientConfig) -> ClientConfig {
    let mut config = config.clone();

    #[cfg(feature = "gradescope")]
    if let Some(ref mut portal) = config.portal {
        redact(&mut portal.password);
    }
    #[cfg(feature = "google")]
    if let Some(ref mut google) = config.google {
        redact(&mut google.client_secret);
    }

    config
}

fn redact(value: &mut Option<String>) {
    if let Some(v) = value
        && !SecretRef::parse(v.as_str()).is_reference()
    {
        *v = REDACTED.to_string();
    }
}
