//! The single owned aggregate of all mutable simulation state.
//!
//! Nothing here is global: the driver constructs a [`GameState`] (usually
//! through [`crate::engine::Engine`]) and every operation threads it
//! explicitly. Single-threaded stepping; no locking discipline is needed
//! because nothing executes concurrently.

use crate::action::ActionError;
use crate::catalog::Catalog;
use crate::fixed::Fixed64;
use crate::id::*;
use crate::ledger::Ledger;
use crate::region::{Region, ResourceNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The single technology currently being researched, with its progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResearchJob {
    pub tech: TechId,
    /// Weighted seconds of research applied while the job is live;
    /// reaching the technology's research time completes it.
    pub progress: Fixed64,
}

/// All mutable simulation state: regions, the ledger, and research.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub current_region: RegionId,
    /// Activated regions, in activation order. Never removed.
    pub regions: Vec<Region>,
    pub ledger: Ledger,
    pub researched: BTreeSet<TechId>,
    /// At most one research in progress; `Some` only while progress is
    /// short of the research time. On completion the tech moves atomically
    /// into `researched`.
    pub research: Option<ResearchJob>,
    next_building_id: u64,
}

impl GameState {
    /// Fresh state with a ledger seeded from the catalog's items and no
    /// regions activated yet.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            current_region: RegionId(0),
            regions: Vec::new(),
            ledger: Ledger::seeded(catalog),
            researched: BTreeSet::new(),
            research: None,
            next_building_id: 0,
        }
    }

    /// Clone a region template into a live region. The first activated
    /// region becomes current.
    pub fn activate_region(
        &mut self,
        catalog: &Catalog,
        region_type: RegionTypeId,
    ) -> Result<RegionId, ActionError> {
        let def = catalog
            .region(region_type)
            .ok_or(ActionError::UnknownRegionType(region_type))?;
        let id = RegionId(self.regions.len() as u32);
        self.regions.push(Region {
            id,
            region_type,
            name: def.name.clone(),
            slots_total: def.slots_total,
            slots_used: 0,
            buildings: Vec::new(),
            nodes: def
                .nodes
                .iter()
                .map(|n| ResourceNode {
                    item: n.item,
                    amount: n.amount,
                    rate: n.rate,
                })
                .collect(),
        });
        if self.regions.len() == 1 {
            self.current_region = id;
        }
        Ok(id)
    }

    /// Switch the region that build/set-recipe actions target.
    pub fn set_current_region(&mut self, id: RegionId) -> Result<(), ActionError> {
        if (id.0 as usize) < self.regions.len() {
            self.current_region = id;
            Ok(())
        } else {
            Err(ActionError::UnknownRegion(id))
        }
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0 as usize)
    }

    pub fn current_region(&self) -> Option<&Region> {
        self.regions.get(self.current_region.0 as usize)
    }

    pub(crate) fn current_region_index(&self) -> Option<usize> {
        let index = self.current_region.0 as usize;
        (index < self.regions.len()).then_some(index)
    }

    pub fn is_researched(&self, tech: TechId) -> bool {
        self.researched.contains(&tech)
    }

    /// Allocate the next building instance id. Process-lifetime monotonic.
    pub(crate) fn next_building_id(&mut self) -> BuildingId {
        let id = BuildingId(self.next_building_id);
        self.next_building_id += 1;
        id
    }
}
