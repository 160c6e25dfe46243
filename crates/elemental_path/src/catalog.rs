//! Element catalog backed by a [`CatalogStore`].

use std::sync::Arc;

use elemental_grid::{Element, ElementGrid, InvariantViolation};
use futures::Stream;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::db::DbError;
use crate::seed::seed_elements;
use crate::store::CatalogStore;

/// Failure to provide a usable catalog.
#[derive(Debug, Clone, derive_more::Display)]
pub enum CatalogError {
    /// The backing store failed.
    #[display("Catalog store failure: {}", _0)]
    Store(DbError),

    /// The stored data breaks a grid invariant.
    #[display("Catalog invariant violated: {}", _0)]
    Invariant(InvariantViolation),
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Invariant(err) => Some(err),
        }
    }
}

impl From<DbError> for CatalogError {
    fn from(err: DbError) -> Self {
        Self::Store(err)
    }
}

impl From<InvariantViolation> for CatalogError {
    fn from(err: InvariantViolation) -> Self {
        Self::Invariant(err)
    }
}

/// Shared, read-only element catalog.
///
/// The first call to [`ElementCatalog::grid`] seeds the store if it is empty,
/// loads it and validates it; every clone of the catalog shares that one
/// result. Concurrent first callers wait on the same initialization.
#[derive(Debug, Clone)]
pub struct ElementCatalog {
    store: Arc<dyn CatalogStore>,
    seed: Arc<Vec<Element>>,
    grid: Arc<OnceCell<Arc<ElementGrid>>>,
}

impl ElementCatalog {
    /// Creates a catalog seeded from the built-in periodic table.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self::with_seed(store, seed_elements())
    }

    /// Creates a catalog with a custom seed table.
    #[instrument(skip(store, seed), fields(seed = seed.len()))]
    pub fn with_seed(store: Arc<dyn CatalogStore>, seed: Vec<Element>) -> Self {
        info!("Creating ElementCatalog");
        Self {
            store,
            seed: Arc::new(seed),
            grid: Arc::new(OnceCell::new()),
        }
    }

    /// Number of elements in the backing store.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the store fails.
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<usize, CatalogError> {
        Ok(self.store.count().await?)
    }

    /// Inserts `rows` only if the store is empty. Returns rows inserted.
    ///
    /// Inserts ignore conflicts, so racing callers never duplicate rows.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Store`] if the store fails.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn seed_if_empty(&self, rows: &[Element]) -> Result<usize, CatalogError> {
        let existing = self.store.count().await?;
        if existing > 0 {
            debug!(existing, "Catalog already seeded");
            return Ok(0);
        }
        let inserted = self.store.insert_if_absent(rows.to_vec()).await?;
        info!(inserted, "Catalog seeded");
        Ok(inserted)
    }

    /// The validated catalog, initialized once.
    ///
    /// A failed initialization is not cached; the next call retries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if seeding or loading fails, or if the stored
    /// data violates a grid invariant.
    #[instrument(skip(self))]
    pub async fn grid(&self) -> Result<Arc<ElementGrid>, CatalogError> {
        let grid = self
            .grid
            .get_or_try_init(|| async {
                self.seed_if_empty(&self.seed).await?;
                let elements = self.store.get_all().await?;
                let grid = ElementGrid::new(elements)?;
                Ok::<_, CatalogError>(Arc::new(grid))
            })
            .await?;
        Ok(Arc::clone(grid))
    }

    /// Every element in catalog order.
    ///
    /// Each call yields a fresh stream over the same immutable catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if the catalog cannot be initialized.
    pub async fn all(&self) -> Result<impl Stream<Item = Element> + Send + 'static, CatalogError> {
        let grid = self.grid().await?;
        Ok(futures::stream::iter(grid.elements().to_vec()))
    }
}
