use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::models::subject::Subject;
use crate::store::{Record, StoreError, TableStore, LIST_TABLE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    List,
    Questions(Subject),
}

impl CacheKey {
    /// Every table the cache snapshots. Refreshes always cover the whole
    /// set, so no key can lag behind another.
    pub const TRACKED: [CacheKey; 5] = [
        CacheKey::List,
        CacheKey::Questions(Subject::Toan),
        CacheKey::Questions(Subject::Ly),
        CacheKey::Questions(Subject::Hoa),
        CacheKey::Questions(Subject::Trung),
    ];

    pub fn table(&self) -> &'static str {
        match self {
            CacheKey::List => LIST_TABLE,
            CacheKey::Questions(subject) => subject.sheet_name(),
        }
    }
}

struct Snapshot {
    tables: HashMap<&'static str, Vec<Record>>,
    refreshed_at: Instant,
}

/// TTL snapshot of the quiz tables. A `get` against a fresh snapshot never
/// touches the store; a stale or missing snapshot triggers one refresh of
/// every tracked table under the write lock. Store failures during refresh
/// propagate to the caller instead of degrading to empty data.
#[derive(Clone)]
pub struct QuizCache {
    store: Arc<dyn TableStore>,
    ttl: Duration,
    snapshot: Arc<RwLock<Option<Snapshot>>>,
}

impl QuizCache {
    pub fn new(store: Arc<dyn TableStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            snapshot: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get(&self, key: CacheKey) -> Result<Vec<Record>, StoreError> {
        {
            let guard = self.snapshot.read().await;
            if let Some(snapshot) = guard.as_ref() {
                if snapshot.refreshed_at.elapsed() < self.ttl {
                    return Ok(snapshot.tables.get(key.table()).cloned().unwrap_or_default());
                }
            }
        }

        let mut guard = self.snapshot.write().await;
        // Another request may have refreshed while this one waited.
        if let Some(snapshot) = guard.as_ref() {
            if snapshot.refreshed_at.elapsed() < self.ttl {
                return Ok(snapshot.tables.get(key.table()).cloned().unwrap_or_default());
            }
        }

        let fresh = self.refresh_all().await?;
        let records = fresh.tables.get(key.table()).cloned().unwrap_or_default();
        *guard = Some(fresh);
        Ok(records)
    }

    async fn refresh_all(&self) -> Result<Snapshot, StoreError> {
        let started = Instant::now();
        let mut tables = HashMap::new();
        for key in CacheKey::TRACKED {
            let records = self.store.read_table(key.table()).await?;
            tables.insert(key.table(), records);
        }
        info!(
            tables = CacheKey::TRACKED.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "quiz cache refreshed"
        );
        Ok(Snapshot {
            tables,
            refreshed_at: Instant::now(),
        })
    }

    pub async fn invalidate(&self) {
        let mut guard = self.snapshot.write().await;
        *guard = None;
        debug!("quiz cache invalidated");
    }
}
