use super::{http_client, load_config, token_refresher};
use crate::output::Output;
use crate::AuthCommands;
use color_eyre::Result;
use reelfetch_config::PathManager;
use reelfetch_core::{classify, TokenState};
use serde_json::json;

pub async fn run_auth(cmd: AuthCommands, output: &Output) -> Result<()> {
    match cmd {
        AuthCommands::Trakt { new } => refresh_trakt(new, output).await,
    }
}

async fn refresh_trakt(from_scratch: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config = load_config(&paths)?;
    let http = http_client(&config)?;
    let refresher = token_refresher(&paths, &config, http, true);

    let before = if refresher.store().exists() && !from_scratch {
        Some(refresher.store().load()?)
    } else {
        None
    };

    let credential = match &before {
        Some(_) => refresher.ensure_fresh().await?,
        None => {
            output.info(format!(
                "No stored token at {}; starting authorization",
                refresher.store().path().display()
            ));
            refresher.authorize_new().await?
        }
    };

    let refreshed = before.as_ref() != Some(&credential);
    let expires_at = credential.expires_at();
    let state = classify(&credential, chrono::Utc::now(), refresher.margin());

    match output.format() {
        crate::output::OutputFormat::Human => {
            if refreshed {
                output.success(format!("Trakt token saved; expires {}", expires_at.to_rfc3339()));
            } else {
                output.success(format!("Trakt token still valid; expires {}", expires_at.to_rfc3339()));
            }
            if state == TokenState::Expired {
                output.warn("The new token already falls inside the safety margin");
            }
        }
        _ => output.json(&json!({
            "refreshed": refreshed,
            "expires_at": expires_at.to_rfc3339(),
            "path": refresher.store().path().display().to_string(),
        })),
    }
    Ok(())
}
