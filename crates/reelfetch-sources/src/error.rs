use reelfetch_config::ConfigError;
use std::fmt;
use thiserror::Error;

/// Which metadata integration a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Plot-oriented provider
    Omdb,
    /// Canonical-title provider
    Tmdb,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Omdb => "omdb",
            Provider::Tmdb => "tmdb",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum FetchErrorKind {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("provider reported an error: {0}")]
    Rejected(String),
    #[error("no matching title")]
    NoMatch,
}

/// A metadata lookup against one provider failed.
#[derive(Debug, Error)]
#[error("{provider} lookup failed: {kind}")]
pub struct FetchError {
    pub provider: Provider,
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(provider: Provider, kind: impl Into<FetchErrorKind>) -> Self {
        Self {
            provider,
            kind: kind.into(),
        }
    }

    pub fn transport(provider: Provider, err: reqwest::Error) -> Self {
        Self::new(provider, FetchErrorKind::Transport(err))
    }

    pub fn malformed(provider: Provider, what: impl Into<String>) -> Self {
        Self::new(provider, FetchErrorKind::Malformed(what.into()))
    }

    /// True when the lookup never reached the network because a key was missing.
    pub fn is_config(&self) -> bool {
        matches!(self.kind, FetchErrorKind::Config(_))
    }
}

/// A spreadsheet or watch-history write failed.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("write rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("spreadsheet write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The OAuth exchange with the watch-history provider failed.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("authorization code cannot be empty")]
    EmptyCode,
    #[error("failed to read authorization code: {0}")]
    Prompt(#[from] std::io::Error),
}
