use super::load_config;
use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use reelfetch_config::{Config, CredentialStore, PathManager, SheetsConfig};
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    let config_file = paths.config_file();
    if !config_file.exists() {
        output.warn(format!(
            "Configuration file not found at {}; showing defaults and environment",
            config_file.display()
        ));
    }

    let config = load_config(&paths)?;
    let secret = |value: &Option<String>| display_secret(value.as_deref(), full);

    let credential = CredentialStore::new(paths.credential_file());
    let token_status = match credential.load() {
        Ok(c) => format!("expires {}", c.expires_at().to_rfc3339()),
        Err(e) => e.to_string(),
    };

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut paths_table = section("Files");
            paths_table.add_row(vec![Cell::new("Config"), Cell::new(config_file.display())]);
            paths_table.add_row(vec![Cell::new("Trakt token"), Cell::new(paths.credential_file().display())]);
            paths_table.add_row(vec![Cell::new("Users"), Cell::new(paths.users_file().display())]);
            println!("{}\n", paths_table);

            let mut providers = section("Metadata providers");
            providers.add_row(vec![Cell::new("OMDb API key"), Cell::new(secret(&config.omdb.api_key))]);
            providers.add_row(vec![Cell::new("OMDb URL"), Cell::new(&config.omdb.base_url)]);
            providers.add_row(vec![Cell::new("TMDB API key"), Cell::new(secret(&config.tmdb.api_key))]);
            providers.add_row(vec![Cell::new("TMDB URL"), Cell::new(&config.tmdb.base_url)]);
            providers.add_row(vec![Cell::new("Timeout"), Cell::new(format!("{}s", config.http.timeout_secs))]);
            println!("{}\n", providers);

            let mut trakt = section("Trakt");
            trakt.add_row(vec![Cell::new("Client ID"), Cell::new(secret(&config.trakt.client_id))]);
            trakt.add_row(vec![Cell::new("Client Secret"), Cell::new(secret(&config.trakt.client_secret))]);
            trakt.add_row(vec![
                Cell::new("Safety margin"),
                Cell::new(format!("{}h", config.trakt.safety_margin_hours)),
            ]);
            trakt.add_row(vec![Cell::new("Token"), Cell::new(&token_status)]);
            println!("{}\n", trakt);

            let mut server = section("Server");
            server.add_row(vec![Cell::new("Bind"), Cell::new(&config.server.bind)]);
            server.add_row(vec![Cell::new("Login required"), Cell::new(check(config.server.auth_enabled))]);
            server.add_row(vec![Cell::new("Log to spreadsheet"), Cell::new(check(config.server.log_to_sheets))]);
            server.add_row(vec![Cell::new("Log to Trakt"), Cell::new(check(config.server.log_to_trakt))]);
            server.add_row(vec![Cell::new("Spreadsheet"), Cell::new(describe_sheets(&config, &paths))]);
            println!("{}", server);
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_file.display().to_string(),
                "omdb": { "api_key": secret(&config.omdb.api_key), "base_url": &config.omdb.base_url },
                "tmdb": { "api_key": secret(&config.tmdb.api_key), "base_url": &config.tmdb.base_url },
                "trakt": {
                    "client_id": secret(&config.trakt.client_id),
                    "client_secret": secret(&config.trakt.client_secret),
                    "safety_margin_hours": config.trakt.safety_margin_hours,
                    "token": token_status,
                },
                "server": {
                    "bind": &config.server.bind,
                    "auth_enabled": config.server.auth_enabled,
                    "log_to_sheets": config.server.log_to_sheets,
                    "log_to_trakt": config.server.log_to_trakt,
                    "sheets": describe_sheets(&config, &paths),
                },
            }));
        }
    }

    Ok(())
}

fn section(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn check(enabled: bool) -> String {
    if enabled {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

fn describe_sheets(config: &Config, paths: &PathManager) -> String {
    match &config.sheets {
        Some(SheetsConfig::Csv { path }) => format!("csv: {}", path.display()),
        Some(SheetsConfig::Webhook { url }) => format!("webhook: {}", mask_string(url)),
        None => format!("csv (default): {}", paths.default_sheet_file().display()),
    }
}

fn display_secret(value: Option<&str>, full: bool) -> String {
    match value {
        Some(v) if full => v.to_string(),
        Some(v) => mask_string(v),
        None => "<not set>".to_string(),
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}***{tail}")
}
