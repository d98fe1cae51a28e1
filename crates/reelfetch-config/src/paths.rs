use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("REELFETCH_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

#[derive(Debug, Clone)]
pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("reelfetch");

        Ok(Self::rooted_at(base_dir))
    }

    pub fn from_docker_env() -> Self {
        // In containers config files sit at the base level, data/logs in subdirs
        Self::rooted_at(container_base_path())
    }

    /// Lay out all paths under an explicit directory.
    pub fn rooted_at(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
            config_dir: base,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Persisted watch-history OAuth token.
    pub fn credential_file(&self) -> PathBuf {
        self.config_dir.join("trakt_token.json")
    }

    /// Login users for the HTTP service.
    pub fn users_file(&self) -> PathBuf {
        self.config_dir.join("users.toml")
    }

    /// Default location of the local tracking spreadsheet.
    pub fn default_sheet_file(&self) -> PathBuf {
        self.data_dir.join("watched.csv")
    }

    pub fn server_log_file(&self) -> PathBuf {
        self.log_dir.join("reelfetch.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // The container base directory is created in the Containerfile, so its
        // presence indicates Docker
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        // Otherwise, use platform-specific paths (e.g., ~/.config/reelfetch on Linux)
        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted_layout() {
        let paths = PathManager::rooted_at("/srv/reelfetch");
        assert_eq!(paths.config_file(), PathBuf::from("/srv/reelfetch/config.toml"));
        assert_eq!(paths.credential_file(), PathBuf::from("/srv/reelfetch/trakt_token.json"));
        assert_eq!(paths.users_file(), PathBuf::from("/srv/reelfetch/users.toml"));
        assert_eq!(paths.default_sheet_file(), PathBuf::from("/srv/reelfetch/data/watched.csv"));
        assert_eq!(paths.server_log_file(), PathBuf::from("/srv/reelfetch/logs/reelfetch.log"));
    }
}
