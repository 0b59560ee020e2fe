use serde::{Deserialize, Serialize};

use crate::id::PlantId;

/// Stock flag given to a plant whose creation payload does not set one.
pub const DEFAULT_IN_STOCK: bool = true;

/// A persisted plant row.
///
/// `name`, `image` and `price` are fixed at creation; `is_in_stock` is the
/// only field a client can change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub is_in_stock: bool,
}

impl Plant {
    /// Materialize a new plant once the store has assigned its id.
    pub fn from_new(id: PlantId, new: NewPlant) -> Self {
        Self {
            id,
            name: new.name,
            image: new.image,
            price: new.price,
            is_in_stock: DEFAULT_IN_STOCK,
        }
    }

    /// Apply a validated patch. Returns `true` if any field changed.
    pub fn apply(&mut self, patch: &PlantPatch) -> bool {
        match patch.is_in_stock {
            Some(v) if v != self.is_in_stock => {
                self.is_in_stock = v;
                true
            }
            _ => false,
        }
    }
}

/// Validated creation input (no id yet, stock flag left to the store).
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlant {
    pub name: String,
    pub image: String,
    pub price: f64,
}

/// Validated update input. Absent fields leave the plant untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlantPatch {
    pub is_in_stock: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fern() -> Plant {
        Plant::from_new(
            PlantId::new(1),
            NewPlant {
                name: "Fern".to_string(),
                image: "fern.jpg".to_string(),
                price: 9.99,
            },
        )
    }

    #[test]
    fn new_plants_get_default_stock_flag() {
        let plant = fern();
        assert_eq!(plant.id, PlantId::new(1));
        assert_eq!(plant.is_in_stock, DEFAULT_IN_STOCK);
    }

    #[test]
    fn patch_changes_only_stock_flag() {
        let mut plant = fern();
        let before = plant.clone();

        let changed = plant.apply(&PlantPatch {
            is_in_stock: Some(!DEFAULT_IN_STOCK),
        });

        assert!(changed);
        assert_eq!(plant.is_in_stock, !DEFAULT_IN_STOCK);
        assert_eq!(plant.id, before.id);
        assert_eq!(plant.name, before.name);
        assert_eq!(plant.image, before.image);
        assert_eq!(plant.price, before.price);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut plant = fern();
        let before = plant.clone();
        assert!(!plant.apply(&PlantPatch::default()));
        assert_eq!(plant, before);
    }

    #[test]
    fn serializes_flat_object() {
        let json = serde_json::to_value(fern()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "name": "Fern",
                "image": "fern.jpg",
                "price": 9.99,
                "is_in_stock": true,
            })
        );
    }
}
