//! Application state.

use std::sync::Arc;

use geosight_core::{LocationAnalyzer, Session, SessionEvent};
use tokio::sync::RwLock;

/// Application state shared across handlers.
///
/// Holds the single session of this local app. The lock is only taken to
/// read or reduce the session, never across a call to the analyzer.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn LocationAnalyzer>,
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn LocationAnalyzer>) -> Self {
        Self {
            analyzer,
            session: Arc::new(RwLock::new(Session::default())),
        }
    }

    /// Current session snapshot.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Reduce the session with one event and return the new snapshot.
    pub async fn apply(&self, event: SessionEvent) -> Session {
        let mut session = self.session.write().await;
        *session = std::mem::take(&mut *session).reduce(event);
        session.clone()
    }
}
