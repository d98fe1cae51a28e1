use async_trait::async_trait;
use chrono::Utc;
use reelfetch_config::TraktConfig;
use reelfetch_models::Credential;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AuthFlowError;
use crate::traits::{AuthorizationFlow, CodePrompt};

#[derive(Debug, Serialize, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: u64,
    #[serde(default)]
    created_at: Option<i64>,
}

impl From<TokenResponse> for Credential {
    fn from(token: TokenResponse) -> Self {
        Credential {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            created_at: token.created_at.unwrap_or_else(|| Utc::now().timestamp()),
            expires_in: token.expires_in,
        }
    }
}

/// OAuth authorization-code flow against Trakt.
///
/// A refresh first tries the `refresh_token` grant and falls back to a new
/// interactive authorization when the provider rejects it.
pub struct TraktAuthorizer {
    http: Client,
    config: TraktConfig,
    prompt: Arc<dyn CodePrompt>,
}

impl TraktAuthorizer {
    pub fn new(http: Client, config: TraktConfig, prompt: Arc<dyn CodePrompt>) -> Self {
        Self { http, config, prompt }
    }

    pub fn authorization_url(&self) -> Result<String, AuthFlowError> {
        let client_id = self.config.client_id()?;
        Ok(format!(
            "{}?response_type=code&client_id={}&redirect_uri={}",
            self.config.authorize_url,
            urlencoding::encode(client_id),
            urlencoding::encode(&self.config.redirect_uri)
        ))
    }

    fn token_url(&self) -> String {
        format!("{}/oauth/token", self.config.api_url.trim_end_matches('/'))
    }

    async fn request_token(&self, grant: serde_json::Value) -> Result<Credential, AuthFlowError> {
        let response = self
            .http
            .post(self.token_url())
            .json(&grant)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthFlowError::Rejected { status, body });
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.into())
    }

    pub async fn refresh_with_token(&self, refresh_token: &str) -> Result<Credential, AuthFlowError> {
        let grant = serde_json::json!({
            "refresh_token": refresh_token,
            "client_id": self.config.client_id()?,
            "client_secret": self.config.client_secret()?,
            "redirect_uri": self.config.redirect_uri,
            "grant_type": "refresh_token"
        });
        self.request_token(grant).await
    }

    pub async fn exchange_code(&self, code: &str) -> Result<Credential, AuthFlowError> {
        if code.trim().is_empty() {
            return Err(AuthFlowError::EmptyCode);
        }
        let grant = serde_json::json!({
            "code": code.trim(),
            "client_id": self.config.client_id()?,
            "client_secret": self.config.client_secret()?,
            "redirect_uri": self.config.redirect_uri,
            "grant_type": "authorization_code"
        });
        self.request_token(grant).await
    }
}

#[async_trait]
impl AuthorizationFlow for TraktAuthorizer {
    async fn refresh(&self, current: &Credential) -> Result<Credential, AuthFlowError> {
        if !current.refresh_token.is_empty() {
            match self.refresh_with_token(&current.refresh_token).await {
                Ok(credential) => {
                    info!(operation = "trakt_refresh", "Refreshed Trakt token with refresh grant");
                    return Ok(credential);
                }
                Err(AuthFlowError::Config(e)) => return Err(AuthFlowError::Config(e)),
                Err(e) => {
                    warn!(operation = "trakt_refresh", error = %e, "Refresh grant failed, starting new authorization");
                }
            }
        }
        self.authorize_new().await
    }

    async fn authorize_new(&self) -> Result<Credential, AuthFlowError> {
        let url = self.authorization_url()?;
        // The prompt blocks on the terminal, keep it off the async workers
        let prompt = Arc::clone(&self.prompt);
        let code = tokio::task::spawn_blocking(move || prompt.prompt_code(&url))
            .await
            .map_err(std::io::Error::other)??;
        let credential = self.exchange_code(&code).await?;
        info!(operation = "trakt_authorize", "Obtained new Trakt token");
        Ok(credential)
    }
}
