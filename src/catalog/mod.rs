//! Course catalog: the record store, its text chunks, and the primary vector
//! index, published together as one immutable snapshot.

pub mod chunk;
pub mod store;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::error::CourseError;
use crate::llm::embeddings::Encoder;
use crate::models::CourseRecord;
use crate::search::vector::SearchIndex;
use chunk::Chunk;
use store::CourseStore;

/// Records, chunks and vectors of one catalog load. `records[i]`, `chunks[i]`
/// and index position `i` always describe the same course.
#[derive(Debug, Default)]
pub struct CatalogSnapshot {
    records: Vec<CourseRecord>,
    chunks: Vec<Chunk>,
    index: SearchIndex,
    loaded_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    pub fn records(&self) -> &[CourseRecord] {
        &self.records
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Owns the current snapshot and rebuilds it on demand.
///
/// Reload builds a complete new snapshot before swapping the shared reference,
/// so readers holding the old `Arc` never see a half-built index.
pub struct CatalogService {
    store: Arc<dyn CourseStore>,
    encoder: Arc<dyn Encoder>,
    embed_timeout: Duration,
    current: RwLock<Arc<CatalogSnapshot>>,
    reload_lock: tokio::sync::Mutex<()>,
}

impl CatalogService {
    /// Service with an empty snapshot; call [`CatalogService::reload`] to populate it.
    pub fn new(store: Arc<dyn CourseStore>, encoder: Arc<dyn Encoder>, embed_timeout: Duration) -> Self {
        Self {
            store,
            encoder,
            embed_timeout,
            current: RwLock::new(Arc::new(CatalogSnapshot::default())),
            reload_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn CourseStore> {
        &self.store
    }

    /// Current snapshot; stays valid for the caller even if a reload swaps it out.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.current.read().clone()
    }

    /// Fetch, chunk and embed the whole catalog, then publish it.
    ///
    /// On failure the previous snapshot stays in place. Returns the course count.
    pub async fn reload(&self) -> Result<usize, CourseError> {
        let _guard = self.reload_lock.lock().await;
        self.rebuild().await
    }

    /// Snapshot of a successfully loaded catalog.
    ///
    /// While no load has succeeded yet, one is attempted here, and its error is
    /// returned so an unreachable store is never mistaken for an empty catalog.
    pub async fn loaded(&self) -> Result<Arc<CatalogSnapshot>, CourseError> {
        let snapshot = self.snapshot();
        if snapshot.loaded_at().is_some() {
            return Ok(snapshot);
        }

        let _guard = self.reload_lock.lock().await;
        // another request may have finished the load while we waited
        let snapshot = self.snapshot();
        if snapshot.loaded_at().is_some() {
            return Ok(snapshot);
        }

        tracing::warn!("Catalog not loaded yet, loading on demand");
        self.rebuild().await?;
        Ok(self.snapshot())
    }

    /// Caller holds `reload_lock`.
    async fn rebuild(&self) -> Result<usize, CourseError> {
        let records = self.store.fetch_all().await?;
        let chunks = chunk::format_all(&records);

        let index = tokio::time::timeout(
            self.embed_timeout,
            SearchIndex::build(self.encoder.as_ref(), &chunks),
        )
        .await
        .map_err(|_| {
            CourseError::embedding(format!(
                "catalog embedding timed out after {}s",
                self.embed_timeout.as_secs()
            ))
        })??;

        let snapshot = Arc::new(CatalogSnapshot {
            records,
            chunks,
            index,
            loaded_at: Some(Utc::now()),
        });
        let count = snapshot.len();

        *self.current.write() = snapshot;
        tracing::info!("Catalog loaded: {count} course(s)");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use store::{JsonFileStore, MemoryStore};

    struct LenEncoder;

    #[async_trait]
    impl Encoder for LenEncoder {
        async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CourseError> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    /// Length encoder that can be switched off mid-test.
    #[derive(Default)]
    struct SwitchEncoder {
        down: AtomicBool,
    }

    #[async_trait]
    impl Encoder for SwitchEncoder {
        async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CourseError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(CourseError::embedding("connection refused"));
            }
            LenEncoder.encode(texts).await
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn store() -> Arc<dyn CourseStore> {
        Arc::new(MemoryStore::new(vec![
            json!({"name": "Rust", "tags": ["rust"]}),
            json!({"name": "Go", "tags": ["go"]}),
        ]))
    }

    #[tokio::test]
    async fn test_new_service_starts_empty() {
        let service = CatalogService::new(store(), Arc::new(LenEncoder), Duration::from_secs(1));
        let snap = service.snapshot();
        assert!(snap.is_empty());
        assert!(snap.loaded_at().is_none());
    }

    #[tokio::test]
    async fn test_reload_builds_parallel_arrays() {
        let service = CatalogService::new(store(), Arc::new(LenEncoder), Duration::from_secs(1));
        assert_eq!(service.reload().await.unwrap(), 2);

        let snap = service.snapshot();
        assert_eq!(snap.records().len(), 2);
        assert_eq!(snap.chunks().len(), 2);
        assert_eq!(snap.index().len(), 2);
        assert!(snap.chunks()[1].text.starts_with("Course: Go"));
        assert!(snap.loaded_at().is_some());
    }

    #[tokio::test]
    async fn test_reload_swaps_without_touching_held_snapshot() {
        let service = CatalogService::new(store(), Arc::new(LenEncoder), Duration::from_secs(1));
        service.reload().await.unwrap();
        let before = service.snapshot();

        service
            .store()
            .insert(vec![json!({"name": "Zig", "tags": ["zig"]})])
            .await
            .unwrap();
        service.reload().await.unwrap();

        assert_eq!(before.len(), 2);
        assert_eq!(service.snapshot().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let encoder = Arc::new(SwitchEncoder::default());
        let service = CatalogService::new(store(), encoder.clone(), Duration::from_secs(1));
        service.reload().await.unwrap();
        let loaded_at = service.snapshot().loaded_at();

        service
            .store()
            .insert(vec![json!({"name": "Zig", "tags": ["zig"]})])
            .await
            .unwrap();
        encoder.down.store(true, Ordering::SeqCst);
        let err = service.reload().await.unwrap_err();

        assert!(matches!(err, CourseError::EmbeddingUnavailable(_)));
        let snap = service.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.index().len(), 2);
        assert_eq!(snap.loaded_at(), loaded_at);
    }

    #[tokio::test]
    async fn test_loaded_reports_unreachable_store() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn CourseStore> = Arc::new(JsonFileStore::new(dir.path().join("missing.json")));
        let service = CatalogService::new(store, Arc::new(LenEncoder), Duration::from_secs(1));

        let err = service.loaded().await.unwrap_err();
        assert!(matches!(err, CourseError::StoreUnavailable(_)));
        assert!(service.snapshot().loaded_at().is_none());
    }

    #[tokio::test]
    async fn test_loaded_loads_on_demand_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.json");
        let store: Arc<dyn CourseStore> = Arc::new(JsonFileStore::new(&path));
        let service = CatalogService::new(store, Arc::new(LenEncoder), Duration::from_secs(1));
        assert!(service.loaded().await.is_err());

        std::fs::write(&path, r#"[{"name": "Rust", "tags": ["rust"]}]"#).unwrap();
        let first = service.loaded().await.unwrap();
        assert_eq!(first.len(), 1);

        // already loaded: the same snapshot comes back without another fetch
        std::fs::write(&path, "[]").unwrap();
        let second = service.loaded().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_loaded_empty_catalog_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("courses.json");
        std::fs::write(&path, "[]").unwrap();
        let store: Arc<dyn CourseStore> = Arc::new(JsonFileStore::new(&path));
        let service = CatalogService::new(store, Arc::new(LenEncoder), Duration::from_secs(1));

        let snap = service.loaded().await.unwrap();
        assert!(snap.is_empty());
        assert!(snap.loaded_at().is_some());
    }
}
