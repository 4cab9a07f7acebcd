//! Session storage for the admin shell
//!
//! The shell only needs to remember the last login; where it lives is up to
//! the [`SessionStore`] implementation.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};

use auth::models::AuthSession;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Holds at most one session
pub trait SessionStore: Send + Sync {
    fn set(&self, session: &AuthSession) -> ClientResult<()>;

    fn get(&self) -> ClientResult<Option<AuthSession>>;

    /// Forget the session; clearing an empty store is not an error
    fn clear(&self) -> ClientResult<()>;
}

/// Session kept for the lifetime of the process
#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<AuthSession>>,
}

impl SessionStore for MemorySessionStore {
    fn set(&self, session: &AuthSession) -> ClientResult<()> {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn get(&self) -> ClientResult<Option<AuthSession>> {
        Ok(self
            .session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

/// Session persisted as JSON so it survives between invocations
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.photofolio/session.json`
    pub fn default_path() -> ClientResult<PathBuf> {
        let home = env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .ok_or(ClientError::NoHomeDirectory)?;

        Ok(Path::new(&home).join(".photofolio").join("session.json"))
    }
}

impl SessionStore for FileSessionStore {
    fn set(&self, session: &AuthSession) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(session)?)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn get(&self) -> ClientResult<Option<AuthSession>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::models::{PublicUser, Role};

    fn session() -> AuthSession {
        let user: PublicUser = serde_json::from_value(serde_json::json!({
            "id": 1,
            "username": "admin",
            "email": "admin@example.com",
            "role": "admin",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
        }))
        .unwrap();

        AuthSession {
            user,
            token: "header.payload.signature".to_string(),
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::default();
        assert!(store.get().unwrap().is_none());

        store.set(&session()).unwrap();
        let loaded = store.get().unwrap().unwrap();
        assert_eq!(loaded.user.role, Role::Admin);

        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileSessionStore::new(&path).set(&session()).unwrap();

        let reopened = FileSessionStore::new(&path);
        let loaded = reopened.get().unwrap().unwrap();
        assert_eq!(loaded.token, "header.payload.signature");
        assert_eq!(loaded.user.username, "admin");
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileSessionStore::new(&path);

        store.clear().unwrap();
        store.set(&session()).unwrap();
        store.clear().unwrap();

        assert!(store.get().unwrap().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"not json").unwrap();

        let result = FileSessionStore::new(&path).get();
        assert!(matches!(result, Err(ClientError::Session(_))));
    }
}
