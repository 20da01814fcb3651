//! Persistent storage for the session.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{Session, SessionError};

/// Where the session survives between runs.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, SessionError>;

    async fn save(&self, session: &Session) -> Result<(), SessionError>;

    async fn clear(&self) -> Result<(), SessionError>;
}

/// JSON file on disk, the terminal counterpart of browser local storage.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(session)?;

        // Write atomically: write to temp file, then rename
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage, nothing is written to disk.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new(initial: Option<Session>) -> Self {
        Self {
            session: Mutex::new(initial),
        }
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.session.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.session.lock().await = None;
        Ok(())
    }
}
