use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use nursery_plants::{NewPlant, Plant, PlantId};

use super::r#trait::{PlantStore, PlantUnitOfWork, StoreError};

type Table = BTreeMap<PlantId, Plant>;

/// In-memory plant store.
///
/// Intended for tests/dev. Each unit of work reads from a snapshot taken at
/// `begin()` plus its own writes, and replays its writes onto the shared
/// table on commit.
#[derive(Debug, Clone)]
pub struct InMemoryPlantStore {
    table: Arc<RwLock<Table>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryPlantStore {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for InMemoryPlantStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PlantStore for InMemoryPlantStore {
    async fn begin(&self) -> Result<Box<dyn PlantUnitOfWork>, StoreError> {
        let snapshot = self
            .table
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?
            .clone();

        Ok(Box::new(InMemoryUnitOfWork {
            table: self.table.clone(),
            next_id: self.next_id.clone(),
            view: snapshot,
            staged: Vec::new(),
        }))
    }
}

#[derive(Debug)]
enum Staged {
    Insert(Plant),
    Update(Plant),
    Delete(PlantId),
}

struct InMemoryUnitOfWork {
    table: Arc<RwLock<Table>>,
    next_id: Arc<AtomicI64>,
    view: Table,
    staged: Vec<Staged>,
}

#[async_trait::async_trait]
impl PlantUnitOfWork for InMemoryUnitOfWork {
    async fn find_all(&mut self) -> Result<Vec<Plant>, StoreError> {
        Ok(self.view.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: PlantId) -> Result<Option<Plant>, StoreError> {
        Ok(self.view.get(&id).cloned())
    }

    async fn insert(&mut self, plant: NewPlant) -> Result<Plant, StoreError> {
        // Ids are handed out even if this unit of work is later discarded,
        // so an id is never issued twice.
        let id = PlantId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let plant = Plant::from_new(id, plant);

        self.view.insert(id, plant.clone());
        self.staged.push(Staged::Insert(plant.clone()));
        Ok(plant)
    }

    async fn update(&mut self, plant: &Plant) -> Result<(), StoreError> {
        let Some(row) = self.view.get_mut(&plant.id) else {
            return Err(StoreError::Missing(plant.id));
        };
        *row = plant.clone();
        self.staged.push(Staged::Update(plant.clone()));
        Ok(())
    }

    async fn delete(&mut self, id: PlantId) -> Result<(), StoreError> {
        if self.view.remove(&id).is_none() {
            return Err(StoreError::Missing(id));
        }
        self.staged.push(Staged::Delete(id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        let mut table = this
            .table
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        for op in this.staged {
            match op {
                Staged::Insert(plant) => {
                    table.insert(plant.id, plant);
                }
                // A row deleted by a concurrent commit stays deleted.
                Staged::Update(plant) => {
                    if let Some(row) = table.get_mut(&plant.id) {
                        *row = plant;
                    }
                }
                Staged::Delete(id) => {
                    table.remove(&id);
                }
            }
        }
        Ok(())
    }
}
