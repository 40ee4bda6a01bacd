//! Mutable per-region state: resource nodes, placed buildings, and slot
//! accounting.

use crate::fixed::Fixed64;
use crate::id::*;
use serde::{Deserialize, Serialize};

/// A depletable deposit of one item type. Cloned from the region template
/// at activation; lives exactly as long as its region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub item: ItemId,
    /// Remaining extractable quantity. Monotonically non-increasing.
    pub amount: Fixed64,
    /// Base extraction rate in units per second.
    pub rate: Fixed64,
}

/// One placed building instance. Owned by exactly one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub type_id: BuildingTypeId,
    pub active: bool,
    /// Weighted seconds of work applied toward the current production
    /// cycle, in [0, cycle time) between cycles. Measured in seconds
    /// rather than a normalized fraction so that dyadic delta-times
    /// accumulate exactly.
    pub progress: Fixed64,
    /// For mining buildings: index into the owning region's node list.
    /// Indices are stable for the building's lifetime.
    pub node_index: Option<usize>,
    /// For production buildings: the recipe being crafted.
    pub recipe: Option<RecipeId>,
}

/// A spatial/economic unit with fixed slot capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub region_type: RegionTypeId,
    pub name: String,
    pub slots_total: u32,
    pub slots_used: u32,
    /// Insertion order. Building ids ascend, which fixes the tick order.
    pub buildings: Vec<Building>,
    pub nodes: Vec<ResourceNode>,
}

impl Region {
    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    pub fn slots_free(&self) -> u32 {
        self.slots_total - self.slots_used
    }
}
