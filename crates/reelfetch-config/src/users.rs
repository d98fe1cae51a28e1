use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Login users for the HTTP service, stored as username → bcrypt hash.
///
/// ```toml
/// [users]
/// alice = "$2b$12$..."
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserTable {
    #[serde(default)]
    users: BTreeMap<String, String>,
}

impl UserTable {
    /// A missing file yields an empty table (nobody can log in).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Users file not found, no logins will succeed");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Hash `password` and store it for `username`, replacing any previous entry.
    pub fn set_password(&mut self, username: &str, password: &str) -> Result<()> {
        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        self.insert_hash(username, hash);
        Ok(())
    }

    pub fn insert_hash(&mut self, username: &str, hash: String) {
        self.users.insert(username.to_string(), hash);
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(hash) => bcrypt::verify(password, hash).unwrap_or(false),
            None => false,
        }
    }
}
