//! The immutable content catalog: items, recipes, buildings, technologies,
//! and region templates.
//!
//! Built through [`CatalogBuilder`] in two phases: registration, then
//! finalization. Finalization validates every cross-reference, so the tick
//! engine can look entries up without defensive existence checks -- a
//! dangling id reaching the engine is a content bug, not a runtime
//! condition to recover from.

use crate::fixed::{Fixed64, Seconds};
use crate::id::*;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Broad item classification. The kind determines the default storage
/// capacity a fresh ledger entry gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Energy,
    Material,
    SciencePack,
}

impl ItemKind {
    /// Default ledger storage ceiling for items of this kind.
    pub fn default_capacity(self) -> Fixed64 {
        match self {
            ItemKind::Energy => Fixed64::from_num(10_000),
            ItemKind::Material => Fixed64::from_num(1_000),
            ItemKind::SciencePack => Fixed64::from_num(200),
        }
    }
}

/// An item type definition.
#[derive(Debug, Clone)]
pub struct ItemDef {
    pub name: String,
    pub kind: ItemKind,
}

/// An (item, quantity) pair used for recipe entries and costs.
pub type Amount = (ItemId, Fixed64);

/// A conversion rule: ingredients in, results out, over a fixed cycle time.
#[derive(Debug, Clone)]
pub struct RecipeDef {
    pub name: String,
    pub ingredients: Vec<Amount>,
    pub results: Vec<Amount>,
    /// Seconds for one full cycle at building speed 1.0. Always positive.
    pub time: Seconds,
}

/// What a building does each tick. Closed set; the engine matches
/// exhaustively instead of comparing category strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingKind {
    Mining,
    Production,
    Research,
    Inert,
}

/// A building template definition.
#[derive(Debug, Clone)]
pub struct BuildingDef {
    pub name: String,
    pub kind: BuildingKind,
    /// Multiplier on extraction rate, crafting speed, or research speed.
    pub speed: Fixed64,
    /// Deducted atomically when the building is placed.
    pub cost: Vec<Amount>,
    /// Region slots occupied by one instance.
    pub slot_cost: u32,
}

/// A one-time unlock gated by research progress and science consumption.
#[derive(Debug, Clone)]
pub struct TechDef {
    pub name: String,
    /// Seconds to complete at research speed 1.0. Always positive.
    pub research_time: Seconds,
    /// Total science consumed over the full research duration, per item.
    pub cost: Vec<Amount>,
    pub prerequisites: Vec<TechId>,
    pub unlocks_buildings: Vec<BuildingTypeId>,
    pub unlocks_recipes: Vec<RecipeId>,
}

/// A depletable resource deposit in a region template.
#[derive(Debug, Clone)]
pub struct NodeDef {
    pub item: ItemId,
    /// Total extractable quantity.
    pub amount: Fixed64,
    /// Base extraction rate in units per second.
    pub rate: Fixed64,
}

/// A region template, cloned into a live region at activation time.
#[derive(Debug, Clone)]
pub struct RegionDef {
    pub name: String,
    pub slots_total: u32,
    pub nodes: Vec<NodeDef>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemId),
    #[error("invalid recipe reference: {0:?}")]
    InvalidRecipeRef(RecipeId),
    #[error("invalid building reference: {0:?}")]
    InvalidBuildingRef(BuildingTypeId),
    #[error("invalid technology reference: {0:?}")]
    InvalidTechRef(TechId),
    #[error("recipe {0:?} has a non-positive cycle time")]
    NonPositiveCycleTime(RecipeId),
    #[error("technology {0:?} has a non-positive research time")]
    NonPositiveResearchTime(TechId),
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for constructing an immutable [`Catalog`].
/// Two-phase lifecycle: registration, then finalization via [`build`].
///
/// [`build`]: CatalogBuilder::build
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    buildings: Vec<BuildingDef>,
    building_name_to_id: HashMap<String, BuildingTypeId>,
    techs: Vec<TechDef>,
    tech_name_to_id: HashMap<String, TechId>,
    regions: Vec<RegionDef>,
    region_name_to_id: HashMap<String, RegionTypeId>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item type. Returns its id.
    pub fn register_item(&mut self, name: &str, kind: ItemKind) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        self.items.push(ItemDef {
            name: name.to_string(),
            kind,
        });
        self.item_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a recipe. Returns its id.
    pub fn register_recipe(
        &mut self,
        name: &str,
        ingredients: Vec<Amount>,
        results: Vec<Amount>,
        time: Seconds,
    ) -> RecipeId {
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(RecipeDef {
            name: name.to_string(),
            ingredients,
            results,
            time,
        });
        self.recipe_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a building template. Returns its id.
    pub fn register_building(
        &mut self,
        name: &str,
        kind: BuildingKind,
        speed: Fixed64,
        cost: Vec<Amount>,
        slot_cost: u32,
    ) -> BuildingTypeId {
        let id = BuildingTypeId(self.buildings.len() as u32);
        self.buildings.push(BuildingDef {
            name: name.to_string(),
            kind,
            speed,
            cost,
            slot_cost,
        });
        self.building_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a technology. Returns its id. Prerequisites may reference
    /// technologies registered later; references are checked at finalization.
    pub fn register_tech(&mut self, name: &str, def: TechDef) -> TechId {
        let id = TechId(self.techs.len() as u32);
        self.tech_name_to_id.insert(name.to_string(), id);
        self.techs.push(def);
        id
    }

    /// Register a region template. Returns its id.
    pub fn register_region(
        &mut self,
        name: &str,
        slots_total: u32,
        nodes: Vec<NodeDef>,
    ) -> RegionTypeId {
        let id = RegionTypeId(self.regions.len() as u32);
        self.regions.push(RegionDef {
            name: name.to_string(),
            slots_total,
            nodes,
        });
        self.region_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Lookup item id by name.
    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    /// Lookup recipe id by name.
    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    /// Lookup building id by name.
    pub fn building_id(&self, name: &str) -> Option<BuildingTypeId> {
        self.building_name_to_id.get(name).copied()
    }

    /// Lookup technology id by name.
    pub fn tech_id(&self, name: &str) -> Option<TechId> {
        self.tech_name_to_id.get(name).copied()
    }

    /// Lookup region template id by name.
    pub fn region_id(&self, name: &str) -> Option<RegionTypeId> {
        self.region_name_to_id.get(name).copied()
    }

    fn check_item(&self, id: ItemId) -> Result<(), CatalogError> {
        if (id.0 as usize) < self.items.len() {
            Ok(())
        } else {
            Err(CatalogError::InvalidItemRef(id))
        }
    }

    /// Finalize and build the immutable catalog. Every cross-reference is
    /// validated here: recipe entries, building costs, tech costs,
    /// prerequisites and unlocks, and region node items.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        for (i, recipe) in self.recipes.iter().enumerate() {
            if recipe.time <= Fixed64::ZERO {
                return Err(CatalogError::NonPositiveCycleTime(RecipeId(i as u32)));
            }
            for &(item, _) in recipe.ingredients.iter().chain(recipe.results.iter()) {
                self.check_item(item)?;
            }
        }
        for building in &self.buildings {
            for &(item, _) in &building.cost {
                self.check_item(item)?;
            }
        }
        for (i, tech) in self.techs.iter().enumerate() {
            if tech.research_time <= Fixed64::ZERO {
                return Err(CatalogError::NonPositiveResearchTime(TechId(i as u32)));
            }
            for &(item, _) in &tech.cost {
                self.check_item(item)?;
            }
            for &prereq in &tech.prerequisites {
                if prereq.0 as usize >= self.techs.len() {
                    return Err(CatalogError::InvalidTechRef(prereq));
                }
            }
            for &building in &tech.unlocks_buildings {
                if building.0 as usize >= self.buildings.len() {
                    return Err(CatalogError::InvalidBuildingRef(building));
                }
            }
            for &recipe in &tech.unlocks_recipes {
                if recipe.0 as usize >= self.recipes.len() {
                    return Err(CatalogError::InvalidRecipeRef(recipe));
                }
            }
        }
        for region in &self.regions {
            for node in &region.nodes {
                self.check_item(node.item)?;
            }
        }

        // Invert the unlock lists: anything named by a technology's unlocks
        // requires that technology to be researched before it can be used.
        let mut building_requirement = HashMap::new();
        let mut recipe_requirement = HashMap::new();
        for (i, tech) in self.techs.iter().enumerate() {
            let tech_id = TechId(i as u32);
            for &building in &tech.unlocks_buildings {
                building_requirement.insert(building, tech_id);
            }
            for &recipe in &tech.unlocks_recipes {
                recipe_requirement.insert(recipe, tech_id);
            }
        }

        Ok(Catalog {
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            recipes: self.recipes,
            recipe_name_to_id: self.recipe_name_to_id,
            buildings: self.buildings,
            building_name_to_id: self.building_name_to_id,
            techs: self.techs,
            tech_name_to_id: self.tech_name_to_id,
            regions: self.regions,
            region_name_to_id: self.region_name_to_id,
            building_requirement,
            recipe_requirement,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable catalog. Frozen after build(). The simulation core only ever
/// reads from it.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemId>,
    recipes: Vec<RecipeDef>,
    recipe_name_to_id: HashMap<String, RecipeId>,
    buildings: Vec<BuildingDef>,
    building_name_to_id: HashMap<String, BuildingTypeId>,
    techs: Vec<TechDef>,
    tech_name_to_id: HashMap<String, TechId>,
    regions: Vec<RegionDef>,
    region_name_to_id: HashMap<String, RegionTypeId>,
    building_requirement: HashMap<BuildingTypeId, TechId>,
    recipe_requirement: HashMap<RecipeId, TechId>,
}

impl Catalog {
    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id.0 as usize)
    }

    pub fn recipe(&self, id: RecipeId) -> Option<&RecipeDef> {
        self.recipes.get(id.0 as usize)
    }

    pub fn building(&self, id: BuildingTypeId) -> Option<&BuildingDef> {
        self.buildings.get(id.0 as usize)
    }

    pub fn tech(&self, id: TechId) -> Option<&TechDef> {
        self.techs.get(id.0 as usize)
    }

    pub fn region(&self, id: RegionTypeId) -> Option<&RegionDef> {
        self.regions.get(id.0 as usize)
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    pub fn building_id(&self, name: &str) -> Option<BuildingTypeId> {
        self.building_name_to_id.get(name).copied()
    }

    pub fn tech_id(&self, name: &str) -> Option<TechId> {
        self.tech_name_to_id.get(name).copied()
    }

    pub fn region_id(&self, name: &str) -> Option<RegionTypeId> {
        self.region_name_to_id.get(name).copied()
    }

    /// The technology that must be researched before this building can be
    /// placed, if any.
    pub fn building_requirement(&self, id: BuildingTypeId) -> Option<TechId> {
        self.building_requirement.get(&id).copied()
    }

    /// The technology that must be researched before this recipe can be
    /// assigned, if any.
    pub fn recipe_requirement(&self, id: RecipeId) -> Option<TechId> {
        self.recipe_requirement.get(&id).copied()
    }

    /// Iterate every item with its id, in id order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &ItemDef)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, def)| (ItemId(i as u32), def))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    pub fn tech_count(&self) -> usize {
        self.techs.len()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}
