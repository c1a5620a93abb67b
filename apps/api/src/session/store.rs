use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::session::context::Session;

/// In-memory registry of live sessions.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new());
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::clone(&session));
        info!("Created session {}", session.id);
        session
    }

    /// Lookups count as activity and reset the session's idle clock.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        let session = self.sessions.read().await.get(&id).cloned()?;
        session.touch();
        Some(session)
    }

    /// Returns whether the session existed. In-flight requests keep their `Arc` alive.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!("Discarded session {id}");
        }
        removed
    }

    /// Drops sessions untouched for at least `idle_ttl`. A session mid-generate is kept.
    pub async fn evict_idle(&self, idle_ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = session.is_generating() || session.idle_for() < idle_ttl;
            if !keep {
                info!("Evicted idle session {id}");
            }
            keep
        });
        before - sessions.len()
    }

    /// Runs `evict_idle` on a fixed interval until the handle is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, idle_ttl: Duration) -> JoinHandle<()> {
        let period = (idle_ttl / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = self.evict_idle(idle_ttl).await;
                if evicted > 0 {
                    let remaining = self.len().await;
                    debug!(evicted, remaining, "Session sweep");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
