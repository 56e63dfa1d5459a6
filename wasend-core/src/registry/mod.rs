//! In-memory session registry.
//!
//! Applications that own their sessions directly can register them here
//! instead of implementing [`SessionRegistry`] themselves.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::session::{SessionRegistry, WaSession};

/// Sessions indexed by id behind a tokio `RwLock`.
#[derive(Default)]
pub struct InMemorySessionRegistry {
    sessions: RwLock<HashMap<String, Arc<dyn WaSession>>>,
}

impl InMemorySessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session, replacing any previous session with the same id.
    ///
    /// Returns the replaced session.
    pub async fn insert(
        &self,
        id: impl Into<String>,
        session: Arc<dyn WaSession>,
    ) -> Option<Arc<dyn WaSession>> {
        let id = id.into();
        debug!(session_id = %id, "registering session");
        self.sessions.write().await.insert(id, session)
    }

    /// Remove a session.
    pub async fn remove(&self, id: &str) -> Option<Arc<dyn WaSession>> {
        self.sessions.write().await.remove(id)
    }

    /// List registered session ids, sorted.
    pub async fn list(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no sessions are registered.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn get_session(&self, session_id: &str) -> Option<Arc<dyn WaSession>> {
        self.sessions.read().await.get(session_id).cloned()
    }
}
