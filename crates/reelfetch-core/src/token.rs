//! Watch-history credential lifecycle.
//!
//! A credential is "expired" once its expiry falls within the safety margin
//! of the current time, even if the provider would still accept it. Refresh
//! attempts are serialized so concurrent callers never race on the token file.

use chrono::{DateTime, Duration, Utc};
use reelfetch_config::{CredentialFileError, CredentialStore};
use reelfetch_models::Credential;
use reelfetch_sources::{AuthFlowError, AuthorizationFlow};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Valid,
    Expired,
}

pub fn classify(credential: &Credential, now: DateTime<Utc>, margin: Duration) -> TokenState {
    if credential.is_valid_at(now, margin) {
        TokenState::Valid
    } else {
        TokenState::Expired
    }
}

#[derive(Debug, Error)]
pub enum CredentialRefreshError {
    #[error(transparent)]
    File(#[from] CredentialFileError),
    #[error("credential expires at {expires_at} and needs refreshing; run `reelfetch auth trakt`")]
    Expired { expires_at: DateTime<Utc> },
    #[error("credential needs refreshing but no authorization flow is available")]
    RefreshUnavailable,
    #[error(transparent)]
    Flow(#[from] AuthFlowError),
}

pub struct TokenRefresher {
    store: CredentialStore,
    margin: Duration,
    flow: Option<Arc<dyn AuthorizationFlow>>,
    lock: Mutex<()>,
}

impl TokenRefresher {
    /// A refresher that can only report on the stored credential.
    pub fn new(store: CredentialStore, margin: Duration) -> Self {
        Self {
            store,
            margin,
            flow: None,
            lock: Mutex::new(()),
        }
    }

    pub fn with_flow(mut self, flow: Arc<dyn AuthorizationFlow>) -> Self {
        self.flow = Some(flow);
        self
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn margin(&self) -> Duration {
        self.margin
    }

    /// The stored credential if it is still valid. Never contacts the provider.
    pub async fn current(&self) -> Result<Credential, CredentialRefreshError> {
        self.current_at(Utc::now()).await
    }

    pub async fn current_at(&self, now: DateTime<Utc>) -> Result<Credential, CredentialRefreshError> {
        let _guard = self.lock.lock().await;
        let credential = self.store.load()?;
        match classify(&credential, now, self.margin) {
            TokenState::Valid => Ok(credential),
            TokenState::Expired => Err(CredentialRefreshError::Expired {
                expires_at: credential.expires_at(),
            }),
        }
    }

    /// Return a valid credential, refreshing and persisting it first if it
    /// has entered the safety margin.
    pub async fn ensure_fresh(&self) -> Result<Credential, CredentialRefreshError> {
        self.ensure_fresh_at(Utc::now()).await
    }

    pub async fn ensure_fresh_at(&self, now: DateTime<Utc>) -> Result<Credential, CredentialRefreshError> {
        // Held across load, check, refresh and save
        let _guard = self.lock.lock().await;

        let credential = self.store.load()?;
        if classify(&credential, now, self.margin) == TokenState::Valid {
            debug!(expires_at = %credential.expires_at(), "Credential still valid");
            return Ok(credential);
        }

        let flow = self.flow.as_ref().ok_or(CredentialRefreshError::RefreshUnavailable)?;

        info!(
            operation = "token_refresh",
            expires_at = %credential.expires_at(),
            "Credential within safety margin, refreshing"
        );
        let refreshed = flow.refresh(&credential).await?;
        self.store.save(&refreshed)?;

        if classify(&refreshed, now, self.margin) == TokenState::Expired {
            warn!(
                expires_at = %refreshed.expires_at(),
                "Refreshed credential is already inside the safety margin"
            );
        }
        info!(operation = "token_refresh", expires_at = %refreshed.expires_at(), "Credential refreshed");
        Ok(refreshed)
    }

    /// Run the full authorization flow and persist the result, replacing
    /// whatever credential was stored.
    pub async fn authorize_new(&self) -> Result<Credential, CredentialRefreshError> {
        let _guard = self.lock.lock().await;
        let flow = self.flow.as_ref().ok_or(CredentialRefreshError::RefreshUnavailable)?;

        let credential = flow.authorize_new().await?;
        self.store.save(&credential)?;
        info!(operation = "token_authorize", expires_at = %credential.expires_at(), "Stored new credential");
        Ok(credential)
    }
}
