//! Persisted session storage.
//!
//! The record keeps the opaque token and the serialized user profile as
//! separate entries so a damaged profile never takes the token with it.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::user::User;
use crate::session::Session;

/// Serialized session record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    /// Kept as raw JSON so a malformed profile degrades soft instead of
    /// discarding the token with it
    pub user: Value,
}

impl StoredSession {
    pub fn new(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            user: serde_json::to_value(&session.user).unwrap_or(Value::Null),
        }
    }

    /// Parse the stored profile, failing soft on malformed data
    pub fn parse_user(&self) -> Option<User> {
        match serde_json::from_value(self.user.clone()) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Stored user profile is malformed: {}", e);
                None
            }
        }
    }
}

/// Backing storage for the session record
pub trait SessionStore: Send + Sync {
    fn load(&self) -> AppResult<Option<StoredSession>>;
    fn save(&self, session: &StoredSession) -> AppResult<()>;
    fn clear(&self) -> AppResult<()>;
}

/// Session store writing a JSON file under the user's data directory
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store under the platform data dir, e.g. `~/.local/share/libris` on Linux
    pub fn open_default() -> AppResult<Self> {
        let dirs = ProjectDirs::from("org", "libris", "libris").ok_or_else(|| {
            AppError::Storage(io::Error::new(
                io::ErrorKind::NotFound,
                "no home directory available",
            ))
        })?;
        Ok(Self::at(dirs.data_dir().join("session.json")))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AppResult<Option<StoredSession>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(stored) => Ok(Some(stored)),
            Err(e) => {
                // An unreadable file means no session rather than a hard error
                tracing::warn!("Persisted session file is unreadable: {}", e);
                Ok(None)
            }
        }
    }

    fn save(&self, session: &StoredSession) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| AppError::Storage(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AppResult<Option<StoredSession>> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn save(&self, session: &StoredSession) -> AppResult<()> {
        *self.inner.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> AppResult<()> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}
