//! `duesync auth google`: run the OAuth flow and store tokens.

use std::path::{Path, PathBuf};

use duesync_providers::google::{GoogleAuth, OAuthCredentials};
use tracing::{info, warn};

use crate::config::{ClientConfig, GoogleSettings};
use crate::error::{ClientError, ClientResult};

/// Where the credentials were resolved from.
#[derive(Debug, PartialEq)]
enum CredentialSource {
    /// `--client-id`/`--client-secret` or `--credentials-file`
    Cli,
    /// Already in config.toml
    Config,
}

/// Authenticates with Google and stores the tokens.
///
/// Credentials given on the command line are written to `config_path` so
/// later runs find them. With `force`, stored tokens are dropped first.
pub async fn google(
    client_id: Option<String>,
    client_secret: Option<String>,
    credentials_file: Option<PathBuf>,
    force: bool,
    config: &ClientConfig,
    config_path: &Path,
) -> ClientResult<()> {
    let settings = config.google.clone().unwrap_or_default();
    let (credentials, source) =
        resolve_google_credentials(client_id, client_secret, credentials_file, &settings)?;

    // Calendar, time zone and token path still come from config.toml.
    let google_config = GoogleSettings {
        client_id: Some(credentials.client_id.clone()),
        client_secret: Some(credentials.client_secret.clone()),
        credentials_file: None,
        ..settings
    }
    .to_provider_config()
    .map_err(|e| ClientError::Config(format!("invalid Google credentials: {}", e)))?;

    let mut auth = GoogleAuth::new(google_config)?;

    if force {
        auth.logout()?;
    } else if auth.load()?.is_valid() {
        persist(config_path, &credentials, &source);
        println!("Already authenticated with Google Calendar.");
        println!("Use --force to re-authenticate.");
        return Ok(());
    }

    println!("Starting Google Calendar authentication...");
    println!();
    println!("A browser window will open for you to authorize access.");
    println!("If the browser doesn't open, check the terminal for a URL to copy.");
    println!();

    if force {
        auth.consent().await?;
    } else {
        auth.ensure_valid(true).await?;
    }

    persist(config_path, &credentials, &source);

    info!("Google authentication successful");
    println!("Authentication successful!");
    println!("Tokens saved to {}", auth.config().token_path.display());

    Ok(())
}

fn persist(config_path: &Path, credentials: &OAuthCredentials, source: &CredentialSource) {
    if *source == CredentialSource::Config {
        return;
    }
    match save_credentials(config_path, &credentials.client_id, &credentials.client_secret) {
        Ok(()) => println!("Credentials saved to {}", config_path.display()),
        Err(e) => warn!("could not save credentials to {}: {}", config_path.display(), e),
    }
}

/// Writes the client id and secret under `[google]`, keeping the rest of
/// the file (comments included) as it was.
fn save_credentials(config_path: &Path, client_id: &str, client_secret: &str) -> ClientResult<()> {
    let content = if config_path.exists() {
        std::fs::read_to_string(config_path)?
    } else {
        String::new()
    };

    let mut doc = content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| ClientError::Config(format!("could not parse config: {}", e)))?;

    if !doc.contains_key("google") {
        doc["google"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    let google = doc["google"]
        .as_table_mut()
        .ok_or_else(|| ClientError::Config("`google` in config is not a table".to_string()))?;
    google["client_id"] = toml_edit::value(client_id);
    google["client_secret"] = toml_edit::value(client_secret);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, doc.to_string())?;
    Ok(())
}

/// Resolves Google credentials.
///
/// Priority (highest to lowest):
/// 1. `--client-id` + `--client-secret`
/// 2. `--credentials-file`
/// 3. `[google]` in config.toml
fn resolve_google_credentials(
    cli_client_id: Option<String>,
    cli_client_secret: Option<String>,
    cli_credentials_file: Option<PathBuf>,
    settings: &GoogleSettings,
) -> ClientResult<(OAuthCredentials, CredentialSource)> {
    match (cli_client_id, cli_client_secret) {
        (Some(id), Some(secret)) => {
            return Ok((OAuthCredentials::new(id, secret), CredentialSource::Cli));
        }
        (None, None) => {}
        _ => {
            return Err(ClientError::Config(
                "both --client-id and --client-secret are required when providing credentials directly"
                    .to_string(),
            ));
        }
    }

    if let Some(ref path) = cli_credentials_file {
        let creds = OAuthCredentials::from_file(path).map_err(|e| {
            ClientError::Config(format!(
                "failed to load credentials from {}: {}",
                path.display(),
                e
            ))
        })?;
        return Ok((creds, CredentialSource::Cli));
    }

    let creds = settings.resolve_credentials().map_err(|e| {
        ClientError::Config(format!(
            "{}\n\nCredentials can also be passed with --client-id/--client-secret, \
             --credentials-file, or GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET",
            e
        ))
    })?;
    Ok((creds, CredentialSource::Config))
}
