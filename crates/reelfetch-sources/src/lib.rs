pub mod error;
pub mod http;
pub mod omdb;
pub mod sheets;
pub mod tmdb;
pub mod traits;
pub mod trakt;

pub use error::{AuthFlowError, FetchError, FetchErrorKind, Provider, SinkError};
pub use http::build_http_client;
pub use omdb::OmdbClient;
pub use sheets::{CsvSheet, WebhookSheet};
pub use tmdb::TmdbClient;
pub use traits::{AuthorizationFlow, CodePrompt, HistorySink, PrimaryProvider, SecondaryProvider, SheetSink};
pub use trakt::{TraktAuthorizer, TraktClient};
