use reelfetch_models::Credential;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CredentialFileError {
    #[error("credential file not found at {0}")]
    Missing(PathBuf),
    #[error("credential file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("credential file {path} has an expiry outside the representable range")]
    OutOfRange { path: PathBuf },
    #[error("credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// JSON-file persistence for the watch-history token.
///
/// The file holds the provider's token response verbatim. Writes go to a
/// sibling temp file which is then renamed over the original, so a crash
/// mid-write leaves the previous credential intact.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Credential, CredentialFileError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CredentialFileError::Missing(self.path.clone()));
            }
            Err(source) => {
                return Err(CredentialFileError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let credential: Credential = serde_json::from_str(&content).map_err(|source| CredentialFileError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        if credential.checked_expires_at().is_none() {
            return Err(CredentialFileError::OutOfRange {
                path: self.path.clone(),
            });
        }
        Ok(credential)
    }

    pub fn save(&self, credential: &Credential) -> Result<(), CredentialFileError> {
        let io_err = |source| CredentialFileError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(credential).map_err(|source| CredentialFileError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // Atomic write: write to temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).map_err(io_err)?;
        std::fs::rename(&temp_path, &self.path).map_err(io_err)?;

        debug!(path = %self.path.display(), "Saved credential");
        Ok(())
    }
}
