//! Session storage selected by `server.session_backend`.

use async_trait::async_trait;
use std::time::Duration;
use tower_sessions::MemoryStore;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, ExpiredDeletion, SessionStore};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::{debug, warn};

use crate::config::SessionBackend;
use crate::db::Store;

#[derive(Debug, Clone)]
pub enum AppSessionStore {
    Database(SqliteStore),
    Memory(MemoryStore),
}

impl AppSessionStore {
    /// Builds the configured store. The database variant shares the catalog's pool
    /// and creates its table on first use.
    pub async fn build(backend: SessionBackend, store: &Store) -> anyhow::Result<Self> {
        match backend {
            SessionBackend::Database => {
                let sessions = SqliteStore::new(store.sqlite_pool().clone());
                sessions.migrate().await?;
                Ok(Self::Database(sessions))
            }
            SessionBackend::Memory => Ok(Self::Memory(MemoryStore::default())),
        }
    }

    /// Periodically removes expired database sessions. Memory sessions are skipped.
    pub fn spawn_expired_cleanup(&self, period: Duration) {
        let Self::Database(sessions) = self else {
            return;
        };

        let sessions = sessions.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                match sessions.delete_expired().await {
                    Ok(()) => debug!("Expired sessions removed"),
                    Err(e) => warn!("Failed to delete expired sessions: {e}"),
                }
            }
        });
    }
}

#[async_trait]
impl SessionStore for AppSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        match self {
            Self::Database(s) => s.create(record).await,
            Self::Memory(s) => s.create(record).await,
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        match self {
            Self::Database(s) => s.save(record).await,
            Self::Memory(s) => s.save(record).await,
        }
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        match self {
            Self::Database(s) => s.load(session_id).await,
            Self::Memory(s) => s.load(session_id).await,
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        match self {
            Self::Database(s) => s.delete(session_id).await,
            Self::Memory(s) => s.delete(session_id).await,
        }
    }
}
