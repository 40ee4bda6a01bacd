use serde::{Deserialize, Serialize};

/// Identifies an item type in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

/// Identifies a building template in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingTypeId(pub u32);

/// Identifies a recipe in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecipeId(pub u32);

/// Identifies a technology in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TechId(pub u32);

/// Identifies a region template in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionTypeId(pub u32);

/// Identifies an activated region instance, in activation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u32);

/// Identifies a placed building instance. Allocated from a monotonic
/// per-state counter, so later buildings always have larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_equality() {
        let a = ItemId(0);
        let b = ItemId(0);
        let c = ItemId(1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn building_id_ordering_follows_counter() {
        assert!(BuildingId(0) < BuildingId(1));
        assert!(BuildingId(41) < BuildingId(42));
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ItemId(0), "iron-ore");
        map.insert(ItemId(1), "iron-plate");
        assert_eq!(map[&ItemId(0)], "iron-ore");
    }
}
