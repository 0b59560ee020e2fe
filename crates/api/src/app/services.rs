use std::sync::Arc;

use nursery_infra::{
    AppConfig, InMemoryPlantStore, PlantStore, PlantUnitOfWork, SqlitePlantStore, StoreError,
};

/// Per-request context: the storage handle every handler works through.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn PlantStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn PlantStore>) -> Self {
        Self { store }
    }

    /// Open the unit of work for one request.
    pub async fn begin(&self) -> Result<Box<dyn PlantUnitOfWork>, StoreError> {
        self.store.begin().await
    }
}

/// Select and initialize the plant store described by `config`.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let store: Arc<dyn PlantStore> = if config.use_persistent_stores {
        let store = SqlitePlantStore::connect(&config.database_url, config.max_connections).await?;
        tracing::info!(database_url = %config.database_url, "using sqlite plant store");
        Arc::new(store)
    } else {
        tracing::info!("using in-memory plant store");
        Arc::new(InMemoryPlantStore::new())
    };

    Ok(AppServices::new(store))
}
