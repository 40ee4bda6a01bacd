//! Serde structs for the JSON content tables.
//!
//! Each table is one JSON document mapping string id to record. These
//! structs stay faithful to the on-disk shape; the loader resolves the
//! string references into typed catalog ids.

use serde::Deserialize;
use std::collections::BTreeMap;

/// A content table: string id to record. BTreeMap, so downstream id
/// assignment follows sorted-key order deterministically.
pub type Table<T> = BTreeMap<String, T>;

// ===========================================================================
// Items
// ===========================================================================

/// An item definition in `items.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub kind: ItemKindData,
}

/// Item classification. Drives the default storage capacity policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKindData {
    Energy,
    Material,
    SciencePack,
}

// ===========================================================================
// Recipes
// ===========================================================================

/// A recipe definition in `recipes.json`. Ingredient and result maps are
/// keyed by item id.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRecord {
    pub name: String,
    pub ingredients: BTreeMap<String, f64>,
    pub results: BTreeMap<String, f64>,
    /// Seconds for one full cycle at speed 1.0.
    pub time: f64,
}

// ===========================================================================
// Buildings
// ===========================================================================

/// A building definition in `buildings.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildingRecord {
    pub name: String,
    pub kind: BuildingKindData,
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default)]
    pub cost: BTreeMap<String, f64>,
    #[serde(default = "default_slots")]
    pub slots: u32,
}

fn default_speed() -> f64 {
    1.0
}

fn default_slots() -> u32 {
    1
}

/// What a building does each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildingKindData {
    Mining,
    Production,
    Research,
    Inert,
}

// ===========================================================================
// Technologies
// ===========================================================================

/// A technology definition in `technologies.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechRecord {
    pub name: String,
    /// Seconds to complete at research speed 1.0.
    pub research_time: f64,
    /// Total science consumed over the full duration, per item.
    #[serde(default)]
    pub cost: BTreeMap<String, f64>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub unlocks: UnlockRecord,
}

/// What completing a technology makes available.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnlockRecord {
    #[serde(default)]
    pub buildings: Vec<String>,
    #[serde(default)]
    pub recipes: Vec<String>,
}

// ===========================================================================
// Regions
// ===========================================================================

/// A region template in `regions.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRecord {
    pub name: String,
    pub slots_total: u32,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

/// A depletable resource deposit in a region template.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    #[serde(rename = "type")]
    pub item: String,
    pub amount: f64,
    pub rate: f64,
}

// ===========================================================================
// Units and enemies
// ===========================================================================
//
// These tables ride along in the content set for the integrity pass and
// for external consumers; the simulation core does not read them.

/// A unit definition in `units.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitRecord {
    pub name: String,
    #[serde(default)]
    pub cost: BTreeMap<String, f64>,
    pub health: f64,
    pub damage: f64,
    pub speed: f64,
}

/// An enemy definition in `enemies.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemyRecord {
    pub name: String,
    pub health: f64,
    pub damage: f64,
    #[serde(default)]
    pub drops: BTreeMap<String, f64>,
}

// ===========================================================================
// Content set
// ===========================================================================

/// The seven tables of one loaded content set.
#[derive(Debug, Clone)]
pub struct ContentSet {
    pub items: Table<ItemRecord>,
    pub recipes: Table<RecipeRecord>,
    pub buildings: Table<BuildingRecord>,
    pub technologies: Table<TechRecord>,
    pub regions: Table<RegionRecord>,
    pub units: Table<UnitRecord>,
    pub enemies: Table<EnemyRecord>,
}
