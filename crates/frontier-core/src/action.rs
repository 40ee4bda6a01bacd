//! User-facing action mutators: build, set-recipe, research, and region
//! activation. Not part of the tick loop.
//!
//! Every action validates first and mutates only after all checks pass, so
//! a rejected action leaves the state untouched. Rejections are ordinary
//! [`ActionError`] results -- expected, recoverable, never a panic.

use crate::engine::Engine;
use crate::fixed::Fixed64;
use crate::id::*;
use crate::state::ResearchJob;

/// Why a user action was rejected. Returning one of these guarantees no
/// state was mutated.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown building type {0:?}")]
    UnknownBuildingType(BuildingTypeId),
    #[error("unknown recipe {0:?}")]
    UnknownRecipe(RecipeId),
    #[error("unknown technology {0:?}")]
    UnknownTech(TechId),
    #[error("unknown region template {0:?}")]
    UnknownRegionType(RegionTypeId),
    #[error("region {0:?} has not been activated")]
    UnknownRegion(RegionId),
    #[error("no region has been activated")]
    NoActiveRegion,
    #[error("technology {0:?} must be researched first")]
    TechLocked(TechId),
    #[error("cannot afford the cost")]
    Unaffordable,
    #[error("not enough free building slots")]
    SlotsFull,
    #[error("resource node index {0} does not exist in the current region")]
    BadNodeIndex(usize),
    #[error("no building with instance id {0:?} in the current region")]
    NoSuchBuilding(BuildingId),
    #[error("technology {0:?} is already researched")]
    AlreadyResearched(TechId),
    #[error("prerequisite {prereq:?} of {tech:?} is not researched")]
    PrerequisiteNotMet { tech: TechId, prereq: TechId },
}

impl Engine {
    /// Place a building in the current region, optionally bound to a
    /// resource node and/or assigned a recipe. On success the full cost is
    /// deducted atomically and the new instance id is returned.
    pub fn build(
        &mut self,
        type_id: BuildingTypeId,
        node_index: Option<usize>,
        recipe: Option<RecipeId>,
    ) -> Result<BuildingId, ActionError> {
        let def = self
            .catalog
            .building(type_id)
            .ok_or(ActionError::UnknownBuildingType(type_id))?;
        if let Some(tech) = self.catalog.building_requirement(type_id)
            && !self.state.is_researched(tech)
        {
            return Err(ActionError::TechLocked(tech));
        }
        if let Some(recipe_id) = recipe {
            self.check_recipe_unlocked(recipe_id)?;
        }

        let region_index = self
            .state
            .current_region_index()
            .ok_or(ActionError::NoActiveRegion)?;
        let region = &self.state.regions[region_index];
        if let Some(index) = node_index
            && index >= region.nodes.len()
        {
            return Err(ActionError::BadNodeIndex(index));
        }
        if region.slots_used + def.slot_cost > region.slots_total {
            return Err(ActionError::SlotsFull);
        }
        if !self.state.ledger.can_afford(&def.cost) {
            return Err(ActionError::Unaffordable);
        }

        // All checks passed; mutate.
        for &(item, quantity) in &def.cost {
            self.state.ledger.debit(item, quantity);
        }
        let id = self.state.next_building_id();
        let region = &mut self.state.regions[region_index];
        region.slots_used += def.slot_cost;
        region.buildings.push(crate::region::Building {
            id,
            type_id,
            active: true,
            progress: Fixed64::ZERO,
            node_index,
            recipe,
        });
        Ok(id)
    }

    /// Assign a recipe to a building in the current region. Switching
    /// discards any in-flight cycle progress.
    pub fn set_recipe(
        &mut self,
        building: BuildingId,
        recipe: RecipeId,
    ) -> Result<(), ActionError> {
        self.check_recipe_unlocked(recipe)?;
        let region_index = self
            .state
            .current_region_index()
            .ok_or(ActionError::NoActiveRegion)?;
        let building = self.state.regions[region_index]
            .building_mut(building)
            .ok_or(ActionError::NoSuchBuilding(building))?;
        building.recipe = Some(recipe);
        building.progress = Fixed64::ZERO;
        Ok(())
    }

    /// Start researching a technology. Replaces any research in progress;
    /// the abandoned job's progress is discarded. No queueing.
    pub fn research(&mut self, tech: TechId) -> Result<(), ActionError> {
        let def = self
            .catalog
            .tech(tech)
            .ok_or(ActionError::UnknownTech(tech))?;
        if self.state.is_researched(tech) {
            return Err(ActionError::AlreadyResearched(tech));
        }
        for &prereq in &def.prerequisites {
            if !self.state.is_researched(prereq) {
                return Err(ActionError::PrerequisiteNotMet { tech, prereq });
            }
        }
        self.state.research = Some(ResearchJob {
            tech,
            progress: Fixed64::ZERO,
        });
        Ok(())
    }

    /// Activate a region from its catalog template.
    pub fn activate_region(&mut self, region_type: RegionTypeId) -> Result<RegionId, ActionError> {
        self.state.activate_region(&self.catalog, region_type)
    }

    /// Switch the region that build/set-recipe actions target.
    pub fn set_current_region(&mut self, id: RegionId) -> Result<(), ActionError> {
        self.state.set_current_region(id)
    }

    fn check_recipe_unlocked(&self, recipe: RecipeId) -> Result<(), ActionError> {
        if self.catalog.recipe(recipe).is_none() {
            return Err(ActionError::UnknownRecipe(recipe));
        }
        if let Some(tech) = self.catalog.recipe_requirement(recipe)
            && !self.state.is_researched(tech)
        {
            return Err(ActionError::TechLocked(tech));
        }
        Ok(())
    }
}
