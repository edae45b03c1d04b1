//! Session token storage and the context every flow goes through
//!
//! The token lives in a single slot keyed [`TOKEN_KEY`]. Nothing reads or
//! writes that slot directly: flows hold a [`SessionContext`], which pairs the
//! store with the [`Navigator`] so that eviction and redirection always
//! happen together.

use crate::routes::{self, Route};
use devclub_core::{Error, Result};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Storage key of the bearer token slot
pub const TOKEN_KEY: &str = "adminToken";

/// Persistence for the single token slot
///
/// Last write wins; implementations do not coordinate between processes.
pub trait TokenStore: Send + Sync {
    /// Current token, if any
    fn get(&self) -> Option<String>;

    /// Replace the token
    fn set(&self, token: &str) -> Result<()>;

    /// Remove the token
    fn clear(&self) -> Result<()>;
}

/// Token slot held in memory only
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot.lock().clone()
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.slot.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// Token slot persisted as a JSON object on disk
///
/// The file mirrors browser local storage: a flat string map in which only
/// [`TOKEN_KEY`] is used. A missing or unreadable file reads as "no token".
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), "Ignoring unreadable session file: {}", e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), "Cannot read session file: {}", e);
                BTreeMap::new()
            }
        }
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(map)?)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.read_map().remove(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut map = self.read_map();
        map.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_map(&map)
    }

    fn clear(&self) -> Result<()> {
        let mut map = self.read_map();
        if map.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_map(&map)
    }
}

/// Receiver of route transitions
pub trait Navigator: Send + Sync {
    /// Move to `route`
    fn navigate(&self, route: Route);

    /// Route currently shown
    fn current(&self) -> Route;
}

/// Navigator that records every transition
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    /// Start at `route`
    pub fn starting_at(route: Route) -> Self {
        Self {
            history: Mutex::new(vec![route]),
        }
    }

    /// Every route visited, oldest first
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().clone()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::starting_at(Route::Home)
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        debug!(to = %route, "Navigating");
        self.history.lock().push(route);
    }

    fn current(&self) -> Route {
        self.history.lock().last().copied().unwrap_or(Route::Home)
    }
}

/// Token store plus navigator, shared by the API client and every flow
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .field("route", &self.navigator.current())
            .finish()
    }
}

impl SessionContext {
    /// Bundle a store and a navigator
    pub fn new(store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    /// Current bearer token
    pub fn token(&self) -> Option<String> {
        self.store.get()
    }

    /// Whether a token is present; says nothing about its validity
    pub fn is_authenticated(&self) -> bool {
        self.store.get().is_some()
    }

    /// Persist a freshly issued token
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn establish(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(Error::Authentication("No access token received".to_string()));
        }
        self.store.set(token)?;
        info!("Session established");
        Ok(())
    }

    /// Log out: drop the token
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn end(&self) -> Result<()> {
        self.store.clear()?;
        info!("Session ended");
        Ok(())
    }

    /// React to a 401: drop the token and go to the admin login page
    ///
    /// Store failures are logged rather than returned; the redirect happens
    /// regardless.
    pub fn evict(&self) {
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear session token: {}", e);
        }
        warn!("Session evicted, redirecting to {}", Route::AdminLogin);
        self.navigator.navigate(Route::AdminLogin);
    }

    /// Navigate to `route`
    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    /// Navigate to `route` through the admin guard, returning where it landed
    pub fn enter(&self, route: Route) -> Route {
        let landed = routes::guard(route, self.is_authenticated());
        self.navigator.navigate(landed);
        landed
    }

    /// Route currently shown
    pub fn current_route(&self) -> Route {
        self.navigator.current()
    }
}

/// Liveness flag for a screen awaiting a response
///
/// Clones share the flag. A late response checks [`MountGuard::is_mounted`]
/// before touching screen state.
#[derive(Debug, Clone)]
pub struct MountGuard {
    mounted: Arc<AtomicBool>,
}

impl MountGuard {
    /// A mounted screen
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the screen as gone
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    /// Whether the screen is still shown
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}
