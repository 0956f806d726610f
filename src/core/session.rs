//! Session context - the signed-in user and their bearer token
//!
//! The session is an explicit value handed to the gateway and views rather
//! than process-wide state. [`SessionHandle::sign_in`] starts it and
//! [`SessionHandle::sign_out`] tears it down; the CLI additionally persists
//! it between invocations through [`SessionStore`].

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

use crate::core::role::Role;
use crate::entities::user::User;

/// Errors reading or writing the persisted session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to parse session file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Authentication state for one console session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User, token: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            token: Some(token.into()),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared, cloneable handle to the current session
#[derive(Debug, Clone, Default)]
pub struct SessionHandle(Arc<RwLock<Session>>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(RwLock::new(session)))
    }

    /// Copy of the current session
    pub fn snapshot(&self) -> Session {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn token(&self) -> Option<String> {
        self.snapshot().token
    }

    pub fn role(&self) -> Option<Role> {
        self.snapshot().role()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    pub fn sign_in(&self, user: User, token: impl Into<String>) {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Session::signed_in(user, token);
    }

    pub fn sign_out(&self) {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Session::anonymous();
    }
}

/// On-disk persistence for the CLI session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session, if any
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let session = serde_yml::from_str(&contents).map_err(|e| SessionError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_yml::to_string(session).map_err(|e| SessionError::Parse {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let mut file = open_private(&self.path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }

    /// Remove the saved session; missing files are fine
    pub fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Open for writing, readable by the owner only on unix
fn open_private(path: &Path) -> std::io::Result<std::fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let file = options.open(path)?;
    // An existing file keeps its old mode
    #[cfg(unix)]
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            name: "Sarah".to_string(),
            email: "sarah@mill.example".to_string(),
            role,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_handle_sign_in_and_out() {
        let handle = SessionHandle::default();
        assert!(!handle.is_authenticated());
        assert_eq!(handle.role(), None);

        handle.sign_in(user(Role::SamplingHead), "tok");
        assert_eq!(handle.token().as_deref(), Some("tok"));
        assert_eq!(handle.role(), Some(Role::SamplingHead));

        let clone = handle.clone();
        clone.sign_out();
        assert!(!handle.is_authenticated());
    }

    #[test]
    fn test_store_roundtrip_and_clear() {
        let tmp = tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("nested/session.yaml"));
        assert!(store.load().unwrap().is_none());

        let session = Session::signed_in(user(Role::Admin), "tok");
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_session_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempdir().unwrap();
        let path = tmp.path().join("session.yaml");
        std::fs::write(&path, "stale").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = SessionStore::new(&path);
        store
            .save(&Session::signed_in(user(Role::Admin), "secret-token"))
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().unwrap().token(), Some("secret-token"));
    }

    #[test]
    fn test_store_reports_corrupt_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("session.yaml");
        std::fs::write(&path, "user: [unterminated").unwrap();

        let err = SessionStore::new(&path).load().unwrap_err();
        assert!(matches!(err, SessionError::Parse { .. }));
    }
}
