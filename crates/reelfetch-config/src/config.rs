use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration problems surfaced when a component first needs a value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0} (set it in config.toml or the environment)")]
    MissingKey(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub trakt: TraktConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub sheets: Option<SheetsConfig>,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Plot-oriented metadata provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OmdbConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_omdb_base_url")]
    pub base_url: String,
}

/// Canonical-title metadata provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_tmdb_language")]
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(default = "default_trakt_api_url")]
    pub api_url: String,
    #[serde(default = "default_trakt_authorize_url")]
    pub authorize_url: String,
    #[serde(default = "default_trakt_redirect_uri")]
    pub redirect_uri: String,
    /// Credentials expiring within this window are refreshed ahead of time
    #[serde(default = "default_safety_margin_hours")]
    pub safety_margin_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout applied to every outbound call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Where lookups are appended as spreadsheet rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SheetsConfig {
    Csv { path: PathBuf },
    Webhook { url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_true")]
    pub auth_enabled: bool,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: i64,
    #[serde(default)]
    pub log_to_sheets: bool,
    #[serde(default)]
    pub log_to_trakt: bool,
}

fn default_omdb_base_url() -> String {
    "https://www.omdbapi.com".to_string()
}

fn default_tmdb_base_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_tmdb_language() -> String {
    "en-US".to_string()
}

fn default_trakt_api_url() -> String {
    "https://api.trakt.tv".to_string()
}

fn default_trakt_authorize_url() -> String {
    "https://trakt.tv/oauth/authorize".to_string()
}

fn default_trakt_redirect_uri() -> String {
    "urn:ietf:wg:oauth:2.0:oob".to_string()
}

/// Upper bound for hour-valued settings (ten years).
pub const MAX_DURATION_HOURS: i64 = 24 * 365 * 10;

fn default_safety_margin_hours() -> i64 {
    48
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("reelfetch/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_session_ttl_hours() -> i64 {
    24 * 7
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_omdb_base_url(),
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tmdb_base_url(),
            language: default_tmdb_language(),
        }
    }
}

impl Default for TraktConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_url: default_trakt_api_url(),
            authorize_url: default_trakt_authorize_url(),
            redirect_uri: default_trakt_redirect_uri(),
            safety_margin_hours: default_safety_margin_hours(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            auth_enabled: default_true(),
            session_ttl_hours: default_session_ttl_hours(),
            log_to_sheets: false,
            log_to_trakt: false,
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingKey(name))
}

impl OmdbConfig {
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        required(&self.api_key, "OMDB_API_KEY")
    }
}

impl TmdbConfig {
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        required(&self.api_key, "TMDB_API_KEY")
    }
}

impl TraktConfig {
    pub fn client_id(&self) -> Result<&str, ConfigError> {
        required(&self.client_id, "TRAKT_CLIENT_ID")
    }

    pub fn client_secret(&self) -> Result<&str, ConfigError> {
        required(&self.client_secret, "TRAKT_CLIENT_SECRET")
    }

    pub fn safety_margin(&self) -> chrono::Duration {
        chrono::Duration::hours(self.safety_margin_hours.clamp(0, MAX_DURATION_HOURS))
    }
}

impl ServerConfig {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours.clamp(1, MAX_DURATION_HOURS))
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load `config.toml` if present (defaults otherwise) and layer the
    /// process environment on top.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment-style overrides. `lookup` maps a variable name to
    /// its value; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("OMDB_API_KEY") {
            self.omdb.api_key = Some(key);
        }
        if let Some(key) = get("TMDB_API_KEY") {
            self.tmdb.api_key = Some(key);
        }
        if let Some(id) = get("TRAKT_CLIENT_ID") {
            self.trakt.client_id = Some(id);
        }
        if let Some(secret) = get("TRAKT_CLIENT_SECRET") {
            self.trakt.client_secret = Some(secret);
        }
        if let Some(url) = get("REELFETCH_SHEETS_WEBHOOK") {
            self.sheets = Some(SheetsConfig::Webhook { url });
        }
    }

    /// Structural checks only; missing API keys are reported on first use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid("http.timeout_secs must be greater than zero".to_string()));
        }
        if !(0..=MAX_DURATION_HOURS).contains(&self.trakt.safety_margin_hours) {
            return Err(ConfigError::Invalid(format!(
                "trakt.safety_margin_hours must be between 0 and {}",
                MAX_DURATION_HOURS
            )));
        }
        if !(1..=MAX_DURATION_HOURS).contains(&self.server.session_ttl_hours) {
            return Err(ConfigError::Invalid(format!(
                "server.session_ttl_hours must be between 1 and {}",
                MAX_DURATION_HOURS
            )));
        }
        if let Some(SheetsConfig::Webhook { url }) = &self.sheets {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!("sheets webhook url is not http(s): {}", url)));
            }
        }
        Ok(())
    }
}
