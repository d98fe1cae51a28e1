use clap::{ArgAction, Parser, Subcommand};
use commands::{auth, config, lookup, serve, users};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelfetch")]
#[command(about = "ReelFetch - Merged movie metadata from OMDb and TMDB")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a title once and print the merged record
    #[command(long_about = "Fetch metadata for an IMDb title URL from OMDb and TMDB and print the merged record. INPUT may also be the legacy 'title\\n[summary\\n]url' payload.")]
    Lookup {
        /// Title URL, e.g. https://www.imdb.com/title/tt0111161/
        input: String,

        /// Append the title to the tracking spreadsheet
        #[arg(long, action = ArgAction::SetTrue)]
        sheets: bool,

        /// Add the title to Trakt watch history (refreshes the token if needed)
        #[arg(long, action = ArgAction::SetTrue)]
        trakt: bool,
    },
    /// Manage watch-history credentials
    Auth {
        #[command(subcommand)]
        cmd: AuthCommands,
    },
    /// Run the HTTP service
    #[command(long_about = "Serve the lookup routes. Unless disabled in config.toml, callers must log in with a user created by 'reelfetch users add'.")]
    Serve {
        /// Address to listen on (overrides [server].bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Write logs to this file (rotated daily) instead of stderr
        #[arg(long, value_name = "PATH")]
        log_file: Option<std::path::PathBuf>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Manage login users for the HTTP service
    Users {
        #[command(subcommand)]
        cmd: UsersCommands,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Refresh the Trakt token if it expires within the safety margin
    #[command(long_about = "Check the stored Trakt token and refresh it when it is within the configured safety margin of expiry. Falls back to the interactive authorization-code flow if the refresh grant is rejected.")]
    Trakt {
        /// Ignore any stored token and authorize from scratch
        #[arg(long, action = ArgAction::SetTrue)]
        new: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    Show {
        /// Show full configuration including masked secrets
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Add a user or reset their password
    Add {
        username: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Serve { log_file, .. } => log_file.clone(),
        _ => None,
    };
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Lookup { input, sheets, trakt } => lookup::run_lookup(&input, sheets, trakt, &output).await,
        Commands::Auth { cmd } => auth::run_auth(cmd, &output).await,
        Commands::Serve { bind, .. } => serve::run_serve(bind, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output),
        Commands::Users { cmd } => users::run_users(cmd, &output),
    }
}
