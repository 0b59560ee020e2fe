//! Plant error model.

use thiserror::Error;

/// Result type used across the plants domain.
pub type PlantResult<T> = Result<T, PlantError>;

/// Client-facing failures of a plant operation.
///
/// The `Display` text of each variant is the exact message returned to the
/// client in the `{"error": ...}` body.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlantError {
    /// A creation (or patch) payload is missing required fields or carries
    /// values of the wrong type.
    #[error("Invalid data")]
    InvalidPayload,

    /// No plant exists under the requested id.
    #[error("Plant not found")]
    NotFound,

    /// The request body was not declared as JSON.
    #[error("Invalid content type")]
    InvalidContentType,

    /// The request body was empty, malformed, or `null`.
    #[error("No JSON data provided")]
    NoBody,
}
