//! Plant persistence boundary.
//!
//! Handlers never touch a connection directly. They open a unit of work,
//! run their reads and writes through it, and commit. A unit of work that is
//! dropped without `commit()` leaves no trace.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemoryPlantStore;
pub use r#trait::{PlantStore, PlantUnitOfWork, StoreError};
pub use sqlite::SqlitePlantStore;
