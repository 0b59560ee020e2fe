//! Infrastructure layer: plant storage backends and configuration.

pub mod config;
pub mod plant_store;

pub use config::{AppConfig, ConfigError};
pub use plant_store::{
    InMemoryPlantStore, PlantStore, PlantUnitOfWork, SqlitePlantStore, StoreError,
};
