//! Credential holder shared by the HTTP client and the UI.
//!
//! A [`Session`] owns the bearer token, the view the user is on, and the
//! store the token is persisted to. When the backend rejects the token the
//! client calls [`Session::handle_unauthorized`]; the session clears itself
//! and notifies its observer instead of driving navigation directly.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token file {path} is malformed: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the bearer token lives between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.token).clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *lock(&self.token) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *lock(&self.token) = None;
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    access_token: String,
}

/// JSON file holding `{"access_token": "..."}`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        let file: TokenFile = serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(file.access_token).filter(|token| !token.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let body = serde_json::to_string(&TokenFile {
            access_token: token.to_string(),
        })
        .map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, body).map_err(|err| self.io_error(err))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryReason {
    /// The backend answered 401 outside the login view.
    Unauthorized,
    Logout,
}

type ExpiryObserver = Box<dyn Fn(ExpiryReason) + Send + Sync>;

struct SessionState {
    token: Option<String>,
    view: View,
}

pub struct Session {
    state: Mutex<SessionState>,
    store: Box<dyn TokenStore>,
    observer: Option<ExpiryObserver>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("Session")
            .field("authenticated", &state.token.is_some())
            .field("view", &state.view)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Build a session from whatever token the store already holds.
    ///
    /// A stored token puts the session on the chat view; otherwise it starts
    /// on the login view. A malformed stored token is treated as absent so that logging in or
    /// out can replace it.
    pub fn new(store: impl TokenStore + 'static) -> Result<Self, StoreError> {
        let token = match store.load() {
            Ok(token) => token,
            Err(err @ StoreError::Json { .. }) => {
                tracing::warn!("Ignoring unreadable stored token: {}", err);
                None
            }
            Err(err) => return Err(err),
        };
        let view = if token.is_some() {
            View::Chat
        } else {
            View::Login
        };

        Ok(Self {
            state: Mutex::new(SessionState { token, view }),
            store: Box::new(store),
            observer: None,
        })
    }

    /// In-memory session with no credential, starting on the login view.
    pub fn anonymous() -> Self {
        Self {
            state: Mutex::new(SessionState {
                token: None,
                view: View::Login,
            }),
            store: Box::new(MemoryTokenStore::new()),
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: impl Fn(ExpiryReason) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn token(&self) -> Option<String> {
        lock(&self.state).token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        lock(&self.state).token.is_some()
    }

    pub fn view(&self) -> View {
        lock(&self.state).view
    }

    pub fn set_view(&self, view: View) {
        lock(&self.state).view = view;
    }

    /// Store a freshly issued token and move to the chat view.
    pub fn sign_in(&self, token: &str) -> Result<(), StoreError> {
        self.store.save(token)?;

        let mut state = lock(&self.state);
        state.token = Some(token.to_string());
        state.view = View::Chat;
        Ok(())
    }

    /// Explicit logout. Always ends on the login view.
    pub fn logout(&self) -> Result<(), StoreError> {
        {
            let mut state = lock(&self.state);
            state.token = None;
            state.view = View::Login;
        }

        self.store.clear()?;
        self.notify(ExpiryReason::Logout);
        Ok(())
    }

    /// React to a 401 from the backend.
    ///
    /// Returns `true` when the credential was dropped. On the login view a 401
    /// only means bad credentials, so nothing changes there.
    pub fn handle_unauthorized(&self) -> bool {
        {
            let mut state = lock(&self.state);
            if state.view == View::Login {
                return false;
            }
            state.token = None;
            state.view = View::Login;
        }

        tracing::warn!("Unauthorized response, clearing stored credential");
        if let Err(err) = self.store.clear() {
            tracing::warn!("Failed to clear token store: {}", err);
        }
        self.notify(ExpiryReason::Unauthorized);
        true
    }

    fn notify(&self, reason: ExpiryReason) {
        if let Some(observer) = &self.observer {
            observer(reason);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
