use async_trait::async_trait;
use chrono::NaiveDate;
use reelfetch_models::{Credential, MediaReference, PrimaryMetadata, SecondaryMetadata, WatchedItem};
use crate::error::{AuthFlowError, FetchError, SinkError};

/// Plot-oriented metadata lookup.
#[async_trait]
pub trait PrimaryProvider: Send + Sync {
    async fn fetch_primary(&self, reference: &MediaReference) -> Result<PrimaryMetadata, FetchError>;
}

/// Canonical-title metadata lookup.
#[async_trait]
pub trait SecondaryProvider: Send + Sync {
    async fn fetch_secondary(&self, reference: &MediaReference) -> Result<SecondaryMetadata, FetchError>;
}

/// Watch-history append using an already-valid credential.
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn record_watch(&self, credential: &Credential, item: &WatchedItem) -> Result<(), SinkError>;
}

/// Tracking spreadsheet that receives one row per lookup.
#[async_trait]
pub trait SheetSink: Send + Sync {
    fn sink_name(&self) -> &str;

    async fn append_row(&self, title: &str, date: NaiveDate) -> Result<(), SinkError>;
}

/// Obtains new token material from the watch-history provider.
///
/// Implementations may need a human in the loop, so callers must never
/// drive this from a request-serving path.
#[async_trait]
pub trait AuthorizationFlow: Send + Sync {
    /// Replace an expiring credential.
    async fn refresh(&self, current: &Credential) -> Result<Credential, AuthFlowError>;

    /// Run a full authorization with no prior credential.
    async fn authorize_new(&self) -> Result<Credential, AuthFlowError>;
}

/// Out-of-band channel that shows the operator an authorization URL and
/// reads back the code they were given.
pub trait CodePrompt: Send + Sync {
    fn prompt_code(&self, authorize_url: &str) -> std::io::Result<String>;
}
