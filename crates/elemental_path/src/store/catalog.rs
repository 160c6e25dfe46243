//! Catalog store contract and its implementations.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use elemental_grid::Element;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::db::{DbError, ElementRepository};

/// Local store holding the element catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync + std::fmt::Debug {
    /// Every stored element, in catalog order.
    async fn get_all(&self) -> Result<Vec<Element>, DbError>;

    /// Inserts elements, silently skipping ones already present.
    /// Returns how many rows were inserted.
    async fn insert_if_absent(&self, elements: Vec<Element>) -> Result<usize, DbError>;

    /// Number of stored elements.
    async fn count(&self) -> Result<usize, DbError>;
}

#[async_trait]
impl CatalogStore for ElementRepository {
    async fn get_all(&self) -> Result<Vec<Element>, DbError> {
        let repository = self.clone();
        tokio::task::spawn_blocking(move || repository.load_elements()).await?
    }

    async fn insert_if_absent(&self, elements: Vec<Element>) -> Result<usize, DbError> {
        let repository = self.clone();
        tokio::task::spawn_blocking(move || repository.insert_if_absent(&elements)).await?
    }

    async fn count(&self) -> Result<usize, DbError> {
        let repository = self.clone();
        tokio::task::spawn_blocking(move || repository.count_elements()).await?
    }
}

/// In-process catalog store, kept sorted by atomic number like the SQLite one.
///
/// Counts every insert call so callers can assert how often seeding ran.
#[derive(Debug, Default, Clone)]
pub struct MemoryCatalogStore {
    elements: Arc<RwLock<Vec<Element>>>,
    insert_calls: Arc<AtomicUsize>,
}

impl MemoryCatalogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `elements`.
    pub fn with_elements(mut elements: Vec<Element>) -> Self {
        elements.sort_by_key(|e| *e.atomic_number());
        Self {
            elements: Arc::new(RwLock::new(elements)),
            insert_calls: Arc::default(),
        }
    }

    /// How many times [`CatalogStore::insert_if_absent`] was called.
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn get_all(&self) -> Result<Vec<Element>, DbError> {
        Ok(self.elements.read().await.clone())
    }

    #[instrument(skip(self, elements), fields(elements = elements.len()))]
    async fn insert_if_absent(&self, elements: Vec<Element>) -> Result<usize, DbError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let mut stored = self.elements.write().await;
        let mut inserted = 0;
        for element in elements {
            let clash = stored.iter().any(|existing| {
                existing.atomic_number() == element.atomic_number() || existing.position() == element.position()
            });
            if !clash {
                stored.push(element);
                inserted += 1;
            }
        }
        stored.sort_by_key(|e| *e.atomic_number());
        debug!(inserted, "Memory catalog insert");
        Ok(inserted)
    }

    async fn count(&self) -> Result<usize, DbError> {
        Ok(self.elements.read().await.len())
    }
}
