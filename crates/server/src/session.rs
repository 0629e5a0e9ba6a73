//! Session management
//!
//! One advisor instance per session; sessions expire after inactivity and
//! are reaped by a background cleanup task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;

use advisor_agent::ProductAdvisor;
use advisor_catalog::Catalog;
use advisor_config::Settings;
use advisor_core::{Route, UiBridge};

use crate::ServerError;

/// UI bridge for HTTP-hosted sessions.
///
/// There is no browser to drive, so navigations and toasts are recorded and
/// handed to the client with the next response.
#[derive(Default)]
pub struct StorefrontBridge {
    notifications: Mutex<Vec<String>>,
    last_navigation: Mutex<Option<String>>,
}

impl StorefrontBridge {
    /// Drain the notifications accumulated since the last call.
    pub fn drain_notifications(&self) -> Vec<String> {
        std::mem::take(&mut *self.notifications.lock())
    }

    /// The most recent navigation, if any.
    pub fn last_navigation(&self) -> Option<String> {
        self.last_navigation.lock().clone()
    }
}

#[async_trait]
impl UiBridge for StorefrontBridge {
    async fn navigate(&self, route: &Route) -> advisor_core::Result<()> {
        tracing::debug!(route = %route, "session navigation");
        *self.last_navigation.lock() = Some(route.as_path());
        Ok(())
    }

    async fn notify(&self, message: &str) -> advisor_core::Result<()> {
        self.notifications.lock().push(message.to_string());
        Ok(())
    }
}

/// Session state
pub struct Session {
    /// Session ID
    pub id: String,
    /// Advisor instance
    pub advisor: Arc<ProductAdvisor>,
    /// Bridge collecting UI side effects for the client
    pub bridge: Arc<StorefrontBridge>,
    /// Creation time
    pub created_at: Instant,
    /// Last activity
    pub last_activity: RwLock<Instant>,
}

impl Session {
    /// Create a new session with an opened advisor panel.
    pub fn new(id: impl Into<String>, settings: &Settings, catalog: Arc<Catalog>) -> Self {
        let bridge = Arc::new(StorefrontBridge::default());
        let advisor = Arc::new(ProductAdvisor::new(
            settings.advisor.clone(),
            settings.remote.clone(),
            catalog,
            bridge.clone(),
        ));
        advisor.open();

        Self {
            id: id.into(),
            advisor,
            bridge,
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    /// Is the advisor panel still open
    pub fn is_active(&self) -> bool {
        self.advisor.is_open()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("last_activity", &self.last_activity)
            .finish_non_exhaustive()
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    settings: Settings,
    catalog: Arc<Catalog>,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    pub fn new(settings: Settings, catalog: Arc<Catalog>) -> Self {
        let session_timeout = Duration::from_secs(settings.server.session_timeout_secs);
        let cleanup_interval = Duration::from_secs(settings.server.cleanup_interval_secs);

        Self {
            sessions: RwLock::new(HashMap::new()),
            settings,
            catalog,
            session_timeout,
            cleanup_interval,
        }
    }

    /// Start a background task that periodically closes and removes expired
    /// sessions. Returns a shutdown sender for the task.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = manager.cleanup_expired().await;
                        if removed > 0 {
                            tracing::info!(
                                "session cleanup: removed {} expired sessions ({} remaining)",
                                removed,
                                manager.count()
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a new session.
    pub async fn create(&self) -> Result<Arc<Session>, ServerError> {
        if self.count() >= self.settings.server.max_sessions {
            // Reclaim capacity from expired sessions before giving up.
            self.cleanup_expired().await;

            if self.count() >= self.settings.server.max_sessions {
                return Err(ServerError::Session("max sessions reached".to_string()));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(&id, &self.settings, self.catalog.clone()));
        self.sessions.write().insert(id.clone(), session.clone());

        tracing::info!("created session: {}", id);

        Ok(session)
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Close and remove a session.
    pub async fn remove(&self, id: &str) {
        let session = self.sessions.write().remove(id);
        if let Some(session) = session {
            session.advisor.close().await;
            tracing::info!("removed session: {}", id);
        }
    }

    /// Get active session count
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// List all session IDs
    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Close and remove expired sessions, returning how many went away.
    pub async fn cleanup_expired(&self) -> usize {
        let expired: Vec<Arc<Session>> = {
            let mut sessions = self.sessions.write();
            let ids: Vec<String> = sessions
                .iter()
                .filter(|(_, s)| s.is_expired(self.session_timeout))
                .map(|(id, _)| id.clone())
                .collect();
            ids.iter().filter_map(|id| sessions.remove(id)).collect()
        };

        for session in &expired {
            session.advisor.close().await;
            tracing::info!("expired session: {}", session.id);
        }

        expired.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_catalog::sample_catalog;

    fn manager(max_sessions: usize) -> SessionManager {
        let mut settings = Settings::default();
        settings.server.max_sessions = max_sessions;
        SessionManager::new(settings, Arc::new(sample_catalog()))
    }

    #[tokio::test]
    async fn test_session_creation() {
        let manager = manager(10);
        let session = manager.create().await.unwrap();

        assert!(session.is_active());
        assert!(!session.is_expired(Duration::from_secs(60)));
        assert_eq!(manager.count(), 1);
    }

    #[tokio::test]
    async fn test_session_get_and_remove() {
        let manager = manager(10);
        let session = manager.create().await.unwrap();
        let id = session.id.clone();

        assert!(manager.get(&id).is_some());

        manager.remove(&id).await;
        assert!(manager.get(&id).is_none());
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_capacity_limit() {
        let manager = manager(1);
        manager.create().await.unwrap();

        let err = manager.create().await.unwrap_err();
        assert!(matches!(err, ServerError::Session(_)));
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let mut settings = Settings::default();
        settings.server.session_timeout_secs = 0;
        let manager = SessionManager::new(settings, Arc::new(sample_catalog()));

        let session = manager.create().await.unwrap();
        *session.last_activity.write() = Instant::now() - Duration::from_secs(5);

        let removed = manager.cleanup_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(manager.count(), 0);
    }

    #[tokio::test]
    async fn test_storefront_bridge_records_side_effects() {
        let bridge = StorefrontBridge::default();
        bridge.notify("1x Northern Lights").await.unwrap();
        bridge.navigate(&Route::Cart).await.unwrap();

        assert_eq!(bridge.drain_notifications().len(), 1);
        assert!(bridge.drain_notifications().is_empty());
        assert_eq!(bridge.last_navigation().as_deref(), Some("/cart"));
    }
}
