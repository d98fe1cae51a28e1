use super::lookup::sheet_sink;
use super::{http_client, load_config, token_refresher};
use crate::output::Output;
use color_eyre::Result;
use reelfetch_config::{PathManager, UserTable};
use reelfetch_core::{LookupRecorder, LookupService, RecordOptions};
use reelfetch_server::{AppState, SessionStore};
use reelfetch_sources::TraktClient;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run_serve(bind: Option<String>, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create data directories: {}", e))?;
    let config = load_config(&paths)?;
    let http = http_client(&config)?;

    let users = UserTable::load(&paths.users_file())
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load users from {}: {}", paths.users_file().display(), e))?;
    if config.server.auth_enabled && users.is_empty() {
        warn!(path = %paths.users_file().display(), "Login is enabled but no users exist; run `reelfetch users add`");
    }

    let mut recorder = LookupRecorder::new();
    if config.server.log_to_sheets {
        recorder = recorder.with_sheet(sheet_sink(&paths, &config, http.clone()));
    }
    if config.server.log_to_trakt {
        // Never prompts: an expiring token is reported, not refreshed
        let refresher = token_refresher(&paths, &config, http.clone(), false);
        let sink = TraktClient::new(http.clone(), config.trakt.clone());
        recorder = recorder.with_history(Arc::new(sink), Arc::new(refresher));
    }

    let record_options = RecordOptions {
        sheets: config.server.log_to_sheets,
        history: config.server.log_to_trakt,
        refresh: false,
    };

    let state = AppState::new(
        LookupService::from_config(&config, http),
        recorder,
        record_options,
        users,
        SessionStore::new(config.server.session_ttl()),
        config.server.auth_enabled,
    );

    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    info!(
        bind = %bind,
        auth_enabled = config.server.auth_enabled,
        log_to_sheets = config.server.log_to_sheets,
        log_to_trakt = config.server.log_to_trakt,
        "Starting server"
    );
    output.info(format!("Serving on http://{}/imdb/", bind));

    reelfetch_server::serve(state, &bind).await?;
    Ok(())
}
