//! Plant identifier.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::PlantError;

/// Surrogate key of a plant row.
///
/// Assigned by the store on insert and never reused after the row is deleted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(i64);

impl PlantId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for PlantId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for PlantId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<PlantId> for i64 {
    fn from(value: PlantId) -> Self {
        value.0
    }
}

/// Parses a path segment into an id.
///
/// Only plain non-negative integers are accepted. Anything else cannot name a
/// plant, so it is reported as `NotFound` rather than a separate parse error.
impl FromStr for PlantId {
    type Err = PlantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PlantError::NotFound);
        }
        s.parse::<i64>().map(Self).map_err(|_| PlantError::NotFound)
    }
}
