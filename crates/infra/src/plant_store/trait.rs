use thiserror::Error;

use nursery_plants::{NewPlant, Plant, PlantId};

/// Storage-layer failure.
///
/// None of these are caused by client input; the API reports them as a
/// generic server error and logs the detail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A write targeted a row that is not (or no longer) present.
    #[error("plant {0} does not exist")]
    Missing(PlantId),

    /// The database rejected or failed an operation.
    #[error("database error: {0}")]
    Database(String),

    /// The store cannot be used at all (poisoned lock, closed pool).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Source of request-scoped units of work.
///
/// ## Transaction boundary
///
/// Every request opens exactly one unit of work with `begin()`. Reads and
/// writes go through it; nothing becomes visible to other units of work until
/// `commit()` succeeds. Dropping the unit of work instead discards all of its
/// writes, which is how every early-return error path rolls back.
///
/// Concurrent units of work are not coordinated beyond what the backend does
/// natively: the last commit wins.
#[async_trait::async_trait]
pub trait PlantStore: Send + Sync {
    /// Open a new unit of work.
    async fn begin(&self) -> Result<Box<dyn PlantUnitOfWork>, StoreError>;
}

/// One request-scoped transaction over the plants table.
#[async_trait::async_trait]
pub trait PlantUnitOfWork: Send {
    /// All plants, ordered by id.
    async fn find_all(&mut self) -> Result<Vec<Plant>, StoreError>;

    async fn find_by_id(&mut self, id: PlantId) -> Result<Option<Plant>, StoreError>;

    /// Insert a plant; the store assigns `id` and the default stock flag.
    async fn insert(&mut self, plant: NewPlant) -> Result<Plant, StoreError>;

    /// Overwrite the stored row with `plant`.
    async fn update(&mut self, plant: &Plant) -> Result<(), StoreError>;

    async fn delete(&mut self, id: PlantId) -> Result<(), StoreError>;

    /// Make every write of this unit of work durable.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

