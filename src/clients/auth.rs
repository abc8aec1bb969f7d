use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use rspotify::Credentials;
use serde::Deserialize;

use crate::clients::{
    entities::{AccessToken, TokenSource},
    errors::{Error, Result},
};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Deserialize, Debug)]
struct ClientCredentialsResponse {
    access_token: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct AnonymousSessionResponse {
    access_token: String,
}

/// One way of getting a catalog token. Strategies are tried in order by
/// [`TokenAcquirer`] until one succeeds.
#[async_trait]
pub trait TokenStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, http: &Client) -> Result<AccessToken>;
}

/// Application-level `client_credentials` exchange against the accounts service
pub struct ClientCredentialsStrategy {
    credentials: Option<Credentials>,
    token_url: String,
}

impl ClientCredentialsStrategy {
    pub fn new(credentials: Option<Credentials>, accounts_url: &str) -> Self {
        ClientCredentialsStrategy {
            credentials,
            token_url: format!("{}/api/token", accounts_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl TokenStrategy for ClientCredentialsStrategy {
    fn name(&self) -> &'static str {
        "client-credentials"
    }

    async fn attempt(&self, http: &Client) -> Result<AccessToken> {
        let Some((id, secret)) = self.credentials.as_ref().and_then(|creds| {
            let secret = creds.secret.as_deref().filter(|s| !s.is_empty())?;
            (!creds.id.is_empty()).then_some((creds.id.as_str(), secret))
        }) else {
            return Err(Error::ConfigurationError(
                "Spotify client id/secret are not configured".into(),
            ));
        };

        let response = http
            .post(&self.token_url)
            .basic_auth(id, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "token endpoint answered {status}"
            )));
        }

        let body: ClientCredentialsResponse = response.json().await?;
        non_empty(body.access_token, TokenSource::ClientCredentials)
    }
}

/// Credential-less session token from the public web player
pub struct AnonymousSessionStrategy {
    session_url: String,
}

impl AnonymousSessionStrategy {
    pub fn new(web_player_url: &str) -> Self {
        AnonymousSessionStrategy {
            session_url: format!(
                "{}/get_access_token?reason=transport&productType=web_player",
                web_player_url.trim_end_matches('/')
            ),
        }
    }
}

#[async_trait]
impl TokenStrategy for AnonymousSessionStrategy {
    fn name(&self) -> &'static str {
        "anonymous-session"
    }

    async fn attempt(&self, http: &Client) -> Result<AccessToken> {
        let response = http
            .get(&self.session_url)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "web player session endpoint answered {status}"
            )));
        }

        let body: AnonymousSessionResponse = response.json().await?;
        non_empty(body.access_token, TokenSource::AnonymousSession)
    }
}

fn non_empty(token: String, source: TokenSource) -> Result<AccessToken> {
    if token.is_empty() {
        Err(Error::UpstreamUnavailable("empty access token".into()))
    } else {
        Ok(AccessToken::new(token, source))
    }
}

pub struct TokenAcquirer {
    http: Client,
    strategies: Vec<Box<dyn TokenStrategy>>,
}

impl TokenAcquirer {
    pub fn new(http: Client, strategies: Vec<Box<dyn TokenStrategy>>) -> Self {
        TokenAcquirer { http, strategies }
    }

    /// Credentialed exchange first, anonymous web player session second
    pub fn with_default_strategies(
        http: Client,
        credentials: Option<Credentials>,
        accounts_url: &str,
        web_player_url: &str,
    ) -> Self {
        TokenAcquirer::new(
            http,
            vec![
                Box::new(ClientCredentialsStrategy::new(credentials, accounts_url)),
                Box::new(AnonymousSessionStrategy::new(web_player_url)),
            ],
        )
    }

    // Fetched fresh for every request, nothing is cached between calls
    pub async fn acquire(&self) -> Result<AccessToken> {
        for strategy in &self.strategies {
            debug!("Requesting access token via {}", strategy.name());
            match strategy.attempt(&self.http).await {
                Ok(token) => {
                    debug!("Obtained access token via {}", strategy.name());
                    return Ok(token);
                }
                Err(e) => warn!("Token strategy {} failed: {e}", strategy.name()),
            }
        }
        Err(Error::Unauthenticated)
    }
}
