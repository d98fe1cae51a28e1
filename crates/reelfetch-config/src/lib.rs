pub mod config;
pub mod credentials;
pub mod paths;
pub mod users;

pub use config::{Config, ConfigError, HttpConfig, OmdbConfig, ServerConfig, SheetsConfig, TmdbConfig, TraktConfig};
pub use credentials::{CredentialFileError, CredentialStore};
pub use paths::{PathManager, container_base_path};
pub use users::UserTable;
