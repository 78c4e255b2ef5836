//! Application state management

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::Config;
use crate::session::PageSession;
use crate::settings::SettingsStore;
use crate::storage::AnnotationGateway;
use crate::textgen::TextGenService;

/// A registered page session, locked independently of the registry.
pub type SessionHandle = Arc<Mutex<PageSession>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    gateway: Arc<dyn AnnotationGateway>,
    textgen: TextGenService,
    settings: SettingsStore,
    /// Open page sessions by id. The registry lock is held only to look up
    /// or mutate the map; session work happens under the per-session mutex.
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn AnnotationGateway>, textgen: TextGenService) -> Self {
        let settings = SettingsStore::new(gateway.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                textgen,
                settings,
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the persistence gateway
    pub fn gateway(&self) -> &Arc<dyn AnnotationGateway> {
        &self.inner.gateway
    }

    /// Get the text-generation service
    pub fn textgen(&self) -> &TextGenService {
        &self.inner.textgen
    }

    /// Get the settings repository
    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }

    /// Register a freshly opened session, returning its id.
    pub fn insert_session(&self, session: PageSession) -> Uuid {
        let id = Uuid::new_v4();
        self.inner
            .sessions
            .write()
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub fn session(&self, id: &Uuid) -> Option<SessionHandle> {
        self.inner.sessions.read().get(id).cloned()
    }

    /// Drop a session from the registry. In-flight work on the handle is
    /// simply abandoned, matching page-unload semantics.
    pub fn remove_session(&self, id: &Uuid) -> bool {
        self.inner.sessions.write().remove(id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.inner.sessions.read().len()
    }
}
