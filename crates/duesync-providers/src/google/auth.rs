//! Acquiring a usable Google access token.
//!
//! [`GoogleAuth`] drives the token set through its states: stored tokens are
//! loaded and classified, an expired token is refreshed, and anything else
//! goes through browser consent. Only a `Valid` token leaves this module.

use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};

use super::config::GoogleConfig;
use super::oauth::OAuthClient;
use super::tokens::{AuthState, TokenInfo, TokenStorage};

pub struct GoogleAuth {
    config: GoogleConfig,
    storage: TokenStorage,
    oauth: OAuthClient,
    state: AuthState,
}

impl GoogleAuth {
    /// Creates the authenticator. Nothing is read from disk until [`load`](Self::load).
    pub fn new(config: GoogleConfig) -> ProviderResult<Self> {
        config.validate().map_err(ProviderError::configuration)?;

        let storage = TokenStorage::new(&config.token_path);
        let oauth = OAuthClient::new(config.credentials.clone(), config.timeout)?;

        Ok(Self {
            config,
            storage,
            oauth,
            state: AuthState::Unauthenticated,
        })
    }

    /// Replaces the OAuth client (used to point the token endpoint elsewhere).
    pub fn with_oauth_client(mut self, oauth: OAuthClient) -> Self {
        self.oauth = oauth;
        self
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn config(&self) -> &GoogleConfig {
        &self.config
    }

    /// Loads stored tokens and classifies them.
    pub fn load(&mut self) -> ProviderResult<&AuthState> {
        let stored = self.storage.load()?;
        self.state = AuthState::classify(stored, &self.config.scopes);
        debug!("stored Google tokens are {}", self.state.name());
        Ok(&self.state)
    }

    /// Refreshes an expired access token. The state is left untouched on failure.
    pub async fn refresh(&mut self) -> ProviderResult<()> {
        let mut tokens = match &self.state {
            AuthState::Expired(tokens) => tokens.clone(),
            other => {
                return Err(ProviderError::internal(format!(
                    "cannot refresh tokens in state {}",
                    other.name()
                )));
            }
        };

        let refresh_token = tokens.refresh_token.clone().ok_or_else(|| {
            ProviderError::authentication("no refresh token stored, consent required")
        })?;

        debug!("refreshing expired access token");
        let (access_token, expires_in) = self.oauth.refresh_token(&refresh_token).await?;
        tokens.update_access_token(access_token, expires_in);

        self.storage.save(&tokens)?;
        self.state = AuthState::Valid(tokens);
        Ok(())
    }

    /// Runs browser consent from any state and stores the new tokens.
    pub async fn consent(&mut self) -> ProviderResult<()> {
        info!("starting Google authorization");
        let tokens = self
            .oauth
            .authorize(&self.config.scopes, self.config.loopback_port_range)
            .await?;

        self.storage.save(&tokens)?;
        self.state = AuthState::Valid(tokens);
        info!("Google authorization complete");
        Ok(())
    }

    /// Drops stored tokens so the next run asks for consent again.
    pub fn logout(&mut self) -> ProviderResult<()> {
        self.storage.clear()?;
        self.state = AuthState::Unauthenticated;
        Ok(())
    }

    /// Returns a valid token, refreshing or asking for consent as needed.
    ///
    /// With `interactive == false` the browser is never opened and a missing
    /// or unrefreshable token is an authentication error.
    pub async fn ensure_valid(&mut self, interactive: bool) -> ProviderResult<TokenInfo> {
        self.load()?;

        if self.state.can_refresh() {
            match self.refresh().await {
                Ok(()) => {}
                Err(e) if interactive => {
                    warn!("token refresh failed, asking for consent again: {}", e);
                    self.consent().await?;
                }
                Err(e) => return Err(e),
            }
        }

        if !self.state.is_valid() {
            if !interactive {
                return Err(ProviderError::authentication(
                    "not authenticated with Google, run 'duesync auth google'",
                ));
            }
            self.consent().await?;
        }

        match &self.state {
            AuthState::Valid(tokens) => Ok(tokens.clone()),
            other => Err(ProviderError::internal(format!(
                "unexpected auth state {} after authorization",
                other.name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;
    use crate::google::config::OAuthCredentials;
    use chrono::{Duration as ChronoDuration, Utc};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> OAuthCredentials {
        OAuthCredentials::new("test-client.apps.googleusercontent.com", "test-secret")
    }

    fn config(dir: &tempfile::TempDir) -> GoogleConfig {
        GoogleConfig::new(credentials()).with_token_path(dir.path().join("tokens.json"))
    }

    fn stored(config: &GoogleConfig, expired: bool, refresh: Option<&str>) -> TokenInfo {
        let mut tokens = TokenInfo::new(
            "stored-access",
            refresh.map(String::from),
            Some(3600),
            config.scopes.clone(),
        );
        if expired {
            tokens.expires_at = Some(Utc::now() - ChronoDuration::minutes(10));
        }
        TokenStorage::new(&config.token_path).save(&tokens).unwrap();
        tokens
    }

    #[tokio::test]
    async fn valid_tokens_are_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        stored(&config, false, Some("r"));

        let mut auth = GoogleAuth::new(config).unwrap();
        let tokens = auth.ensure_valid(false).await.unwrap();
        assert_eq!(tokens.access_token, "stored-access");
        assert!(auth.state().is_valid());
    }

    #[tokio::test]
    async fn expired_tokens_are_refreshed_and_saved() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "refreshed-access",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        stored(&config, true, Some("r-1"));

        let oauth = OAuthClient::new(credentials(), Duration::from_secs(5))
            .unwrap()
            .with_token_url(format!("{}/token", server.uri()));
        let mut auth = GoogleAuth::new(config.clone())
            .unwrap()
            .with_oauth_client(oauth);

        assert_eq!(auth.load().unwrap().name(), "expired");

        let tokens = auth.ensure_valid(false).await.unwrap();
        assert_eq!(tokens.access_token, "refreshed-access");
        assert_eq!(tokens.refresh_token.as_deref(), Some("r-1"));

        let on_disk = TokenStorage::new(&config.token_path).load().unwrap().unwrap();
        assert_eq!(on_disk.access_token, "refreshed-access");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_expired_state() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        stored(&config, true, Some("revoked"));

        let oauth = OAuthClient::new(credentials(), Duration::from_secs(5))
            .unwrap()
            .with_token_url(format!("{}/token", server.uri()));
        let mut auth = GoogleAuth::new(config).unwrap().with_oauth_client(oauth);

        let err = auth.ensure_valid(false).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Authentication);
        assert_eq!(auth.state().name(), "expired");
    }

    #[tokio::test]
    async fn missing_tokens_need_consent() {
        let dir = tempfile::tempdir().unwrap();
        let mut auth = GoogleAuth::new(config(&dir)).unwrap();

        let err = auth.ensure_valid(false).await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::Authentication);
        assert!(err.message().contains("duesync auth google"));
    }

    #[tokio::test]
    async fn expired_without_refresh_token_needs_consent() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        stored(&config, true, None);

        let mut auth = GoogleAuth::new(config).unwrap();
        assert!(auth.ensure_valid(false).await.is_err());
    }

    #[test]
    fn logout_clears_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        stored(&config, false, None);

        let mut auth = GoogleAuth::new(config.clone()).unwrap();
        assert!(auth.load().unwrap().is_valid());

        auth.logout().unwrap();
        assert_eq!(auth.state(), &AuthState::Unauthenticated);
        assert!(!config.token_path.exists());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GoogleConfig::new(OAuthCredentials::new("nope", "secret"));
        let err = GoogleAuth::new(config).err().unwrap();
        assert_eq!(err.code(), ProviderErrorCode::Configuration);
    }
}
