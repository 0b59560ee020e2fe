//! Plants domain module.
//!
//! This crate contains the rules for the plant catalog, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage): which fields a
//! creation payload must carry, which fields may change afterwards, and the
//! error taxonomy surfaced to clients.

pub mod error;
pub mod id;
pub mod plant;
pub mod request;

pub use error::{PlantError, PlantResult};
pub use id::PlantId;
pub use plant::{NewPlant, Plant, PlantPatch, DEFAULT_IN_STOCK};
pub use request::{
    is_json_content_type, parse_create_body, parse_patch_body, CreatePlantRequest,
    PatchPlantRequest,
};
