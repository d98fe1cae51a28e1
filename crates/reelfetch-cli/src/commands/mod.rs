pub mod auth;
pub mod config;
pub mod lookup;
pub mod prompts;
pub mod serve;
pub mod users;

use color_eyre::Result;
use reelfetch_config::{Config, CredentialStore, PathManager};
use reelfetch_core::TokenRefresher;
use reelfetch_sources::{build_http_client, TraktAuthorizer};
use reqwest::Client;
use std::sync::Arc;

/// Config file (or defaults) plus environment overrides.
pub fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    Config::load(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

pub fn http_client(config: &Config) -> Result<Client> {
    build_http_client(&config.http).map_err(|e| color_eyre::eyre::eyre!("Failed to build HTTP client: {}", e))
}

/// Token refresher backed by the credential file. With `interactive`, an
/// expiring token can be refreshed and the operator may be asked for a code.
pub fn token_refresher(paths: &PathManager, config: &Config, http: Client, interactive: bool) -> TokenRefresher {
    let store = CredentialStore::new(paths.credential_file());
    let refresher = TokenRefresher::new(store, config.trakt.safety_margin());
    if interactive {
        let flow = TraktAuthorizer::new(http, config.trakt.clone(), Arc::new(prompts::DialoguerCodePrompt));
        refresher.with_flow(Arc::new(flow))
    } else {
        refresher
    }
}
