//! Shared fixtures for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so the helpers
//! are available to unit tests, the `tests/` suites, and benchmarks (via
//! the `test-utils` feature).
//!
//! The fixture catalog registers entries in a fixed order, so the id
//! helper functions below are stable by construction.

use crate::catalog::{BuildingKind, Catalog, CatalogBuilder, ItemKind, NodeDef, TechDef};
use crate::engine::Engine;
use crate::fixed::Fixed64;
use crate::id::*;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Fixture ids (registration order in `fixture_catalog`)
// ===========================================================================

pub fn iron_ore() -> ItemId {
    ItemId(0)
}
pub fn iron_plate() -> ItemId {
    ItemId(1)
}
pub fn gear() -> ItemId {
    ItemId(2)
}
pub fn energy_cell() -> ItemId {
    ItemId(3)
}
pub fn science_pack() -> ItemId {
    ItemId(4)
}

pub fn smelt_iron() -> RecipeId {
    RecipeId(0)
}
pub fn press_gear() -> RecipeId {
    RecipeId(1)
}
pub fn pack_science() -> RecipeId {
    RecipeId(2)
}

pub fn miner() -> BuildingTypeId {
    BuildingTypeId(0)
}
pub fn smelter() -> BuildingTypeId {
    BuildingTypeId(1)
}
pub fn lab() -> BuildingTypeId {
    BuildingTypeId(2)
}
pub fn monument() -> BuildingTypeId {
    BuildingTypeId(3)
}

pub fn automation() -> TechId {
    TechId(0)
}
pub fn logistics() -> TechId {
    TechId(1)
}

pub fn basin() -> RegionTypeId {
    RegionTypeId(0)
}

// ===========================================================================
// Catalog and engine fixtures
// ===========================================================================

/// A small but complete catalog: a mining chain, a locked recipe, a locked
/// building, and a starter region template.
pub fn fixture_catalog() -> Catalog {
    let mut b = CatalogBuilder::new();

    let ore = b.register_item("iron-ore", ItemKind::Material);
    let plate = b.register_item("iron-plate", ItemKind::Material);
    let gear = b.register_item("gear", ItemKind::Material);
    let cell = b.register_item("energy-cell", ItemKind::Energy);
    let pack = b.register_item("science-pack", ItemKind::SciencePack);

    b.register_recipe(
        "smelt-iron",
        vec![(ore, fixed(2.0))],
        vec![(plate, fixed(1.0))],
        fixed(4.0),
    );
    let press = b.register_recipe(
        "press-gear",
        vec![(plate, fixed(1.0))],
        vec![(gear, fixed(1.0))],
        fixed(2.0),
    );
    b.register_recipe(
        "pack-science",
        vec![(gear, fixed(1.0)), (plate, fixed(1.0))],
        vec![(pack, fixed(1.0))],
        fixed(5.0),
    );

    b.register_building(
        "miner",
        BuildingKind::Mining,
        fixed(1.0),
        vec![(plate, fixed(5.0))],
        1,
    );
    b.register_building(
        "smelter",
        BuildingKind::Production,
        fixed(1.0),
        vec![(plate, fixed(10.0))],
        1,
    );
    b.register_building(
        "lab",
        BuildingKind::Research,
        fixed(1.0),
        vec![(plate, fixed(20.0)), (gear, fixed(5.0))],
        2,
    );
    let monument = b.register_building(
        "monument",
        BuildingKind::Inert,
        fixed(1.0),
        vec![(plate, fixed(50.0))],
        1,
    );

    let automation = b.register_tech(
        "automation",
        TechDef {
            name: "Automation".to_string(),
            research_time: fixed(10.0),
            cost: vec![(pack, fixed(10.0))],
            prerequisites: vec![],
            unlocks_buildings: vec![],
            unlocks_recipes: vec![press],
        },
    );
    b.register_tech(
        "logistics",
        TechDef {
            name: "Logistics".to_string(),
            research_time: fixed(20.0),
            cost: vec![(pack, fixed(30.0))],
            prerequisites: vec![automation],
            unlocks_buildings: vec![monument],
            unlocks_recipes: vec![],
        },
    );

    b.register_region(
        "basin",
        10,
        vec![
            NodeDef {
                item: ore,
                amount: fixed(1000.0),
                rate: fixed(5.0),
            },
            NodeDef {
                item: cell,
                amount: fixed(500.0),
                rate: fixed(2.0),
            },
        ],
    );

    b.build().expect("fixture catalog must be valid")
}

/// An engine over the fixture catalog with the basin region activated.
pub fn engine_with_region() -> Engine {
    let mut engine = Engine::new(fixture_catalog());
    engine
        .activate_region(basin())
        .expect("fixture region must activate");
    engine
}

/// Seed the ledger with a stock of `amount`, with a generous ceiling so
/// capacity does not interfere with the scenario under test.
pub fn fund(engine: &mut Engine, item: ItemId, amount: f64) {
    engine
        .state
        .ledger
        .set_stock(item, fixed(amount), fixed(1_000_000.0));
}
