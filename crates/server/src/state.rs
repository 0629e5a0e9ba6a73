//! Shared application state

use std::sync::Arc;

use advisor_catalog::Catalog;
use advisor_config::Settings;

use crate::session::SessionManager;

/// State shared by all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub catalog: Arc<Catalog>,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(settings: Settings, catalog: Arc<Catalog>) -> Self {
        let sessions = Arc::new(SessionManager::new(settings.clone(), catalog.clone()));

        Self {
            settings,
            catalog,
            sessions,
        }
    }
}
