use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use skybook_core::{LocationDirectory, SearchSettings};
use skybook_order::{Collaborators, PaymentSession, PaymentSettings};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<LocationDirectory>,
    pub search: SearchSettings,
    pub payment: PaymentSettings,
    pub collaborators: Collaborators,
    sessions: Arc<RwLock<HashMap<Uuid, Arc<PaymentSession>>>>,
}

impl AppState {
    pub fn new(
        directory: Arc<LocationDirectory>,
        search: SearchSettings,
        payment: PaymentSettings,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            directory,
            search,
            payment,
            collaborators,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert_session(&self, session: Arc<PaymentSession>) {
        self.sessions.write().await.insert(session.id(), session);
    }

    pub async fn session(&self, id: Uuid) -> Result<Arc<PaymentSession>, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFoundError(format!("Payment session {} not found", id)))
    }

    pub async fn remove_session(&self, id: Uuid) -> Result<Arc<PaymentSession>, AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFoundError(format!("Payment session {} not found", id)))
    }

    /// Drops sessions that are finished or abandoned.
    pub async fn evict_expired(&self) -> usize {
        let candidates: Vec<Arc<PaymentSession>> = self.sessions.read().await.values().cloned().collect();
        let mut expired = Vec::new();
        for session in candidates {
            if session.is_expired().await {
                expired.push(session.id());
            }
        }
        if expired.is_empty() {
            return 0;
        }

        let mut sessions = self.sessions.write().await;
        for id in &expired {
            sessions.remove(id);
        }
        info!(evicted = expired.len(), remaining = sessions.len(), "Evicted expired payment sessions");
        expired.len()
    }

    pub fn spawn_session_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                state.evict_expired().await;
            }
        })
    }
}
