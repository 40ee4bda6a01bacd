//! The production tick engine: advances every active building by a
//! caller-supplied delta-time.
//!
//! # Dispatch
//!
//! Each tick visits regions in activation order and, within each region,
//! buildings in placement order. That total order is how ingredient
//! contention between buildings in the same tick resolves: earlier regions
//! first, then earlier placements. Every building is visited exactly once,
//! dispatching on [`BuildingKind`]:
//!
//! - **Mining** drains the bound resource node and credits the ledger by
//!   the same quantity, so node and ledger stay in lockstep.
//! - **Production** accrues cycle progress; a completed cycle exchanges a
//!   whole batch, or is discarded outright if any ingredient is short.
//! - **Research** accrues progress on the active technology while
//!   continuously draining its science cost, floored at zero. Unlike
//!   production there is no affordability gate; research can complete
//!   without ever having had full funds.
//!
//! Inactive buildings, [`BuildingKind::Inert`], and buildings missing
//! their kind's required binding are no-ops, never errors. A dangling
//! catalog reference, by contrast, aborts the tick with a [`TickFault`]:
//! load-time validation should have made it impossible.

use crate::catalog::{BuildingDef, BuildingKind, Catalog};
use crate::fixed::{Fixed64, Seconds};
use crate::id::*;
use crate::ledger::Ledger;
use crate::region::{Building, Region, ResourceNode};
use crate::state::{GameState, ResearchJob};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Faults
// ---------------------------------------------------------------------------

/// Data-integrity faults surfaced from the tick loop. These are content or
/// programming errors that the load-time validator is expected to catch;
/// the tick aborts rather than skipping over them.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TickFault {
    #[error("building instance references unknown building type {0:?}")]
    UnknownBuildingType(BuildingTypeId),
    #[error("building {building:?} is bound to resource node index {index}, which does not exist")]
    NodeIndexOutOfRange { building: BuildingId, index: usize },
    #[error("building instance references unknown recipe {0:?}")]
    UnknownRecipe(RecipeId),
    #[error("active research references unknown technology {0:?}")]
    UnknownTech(TechId),
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns the immutable catalog and the mutable game state, and exposes the
/// driver contract: `tick`, plus the action mutators in [`crate::action`].
#[derive(Debug)]
pub struct Engine {
    pub catalog: Catalog,
    pub state: GameState,
}

impl Engine {
    pub fn new(catalog: Catalog) -> Self {
        let state = GameState::new(&catalog);
        Self { catalog, state }
    }

    /// Advance the whole simulation by `dt` seconds. Every active building
    /// is updated exactly once, in deterministic order.
    pub fn tick(&mut self, dt: Seconds) -> Result<(), TickFault> {
        let catalog = &self.catalog;
        let GameState {
            regions,
            ledger,
            researched,
            research,
            ..
        } = &mut self.state;

        for region in regions.iter_mut() {
            let Region {
                buildings, nodes, ..
            } = region;
            for building in buildings.iter_mut() {
                if !building.active {
                    continue;
                }
                let def = catalog
                    .building(building.type_id)
                    .ok_or(TickFault::UnknownBuildingType(building.type_id))?;
                match def.kind {
                    BuildingKind::Mining => tick_mining(building, def, nodes, ledger, dt)?,
                    BuildingKind::Production => {
                        tick_production(catalog, building, def, ledger, dt)?;
                    }
                    BuildingKind::Research => {
                        tick_research(catalog, def, ledger, research, researched, dt)?;
                    }
                    BuildingKind::Inert => {}
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Mining
// ---------------------------------------------------------------------------

fn tick_mining(
    building: &mut Building,
    def: &BuildingDef,
    nodes: &mut [ResourceNode],
    ledger: &mut Ledger,
    dt: Seconds,
) -> Result<(), TickFault> {
    // An unbound miner is inert, not an error.
    let Some(index) = building.node_index else {
        return Ok(());
    };
    let node = nodes.get_mut(index).ok_or(TickFault::NodeIndexOutOfRange {
        building: building.id,
        index,
    })?;
    if node.amount <= Fixed64::ZERO {
        return Ok(());
    }

    // Bound by the node's remainder and by ledger headroom, so the quantity
    // leaving the node always equals the quantity entering the ledger. A
    // full ledger stalls the miner instead of destroying ore.
    let mined = (node.rate * def.speed * dt)
        .min(node.amount)
        .min(ledger.headroom(node.item));
    if mined > Fixed64::ZERO {
        node.amount -= mined;
        let stored = ledger.credit(node.item, mined);
        debug_assert_eq!(stored, mined);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Production
// ---------------------------------------------------------------------------

fn tick_production(
    catalog: &Catalog,
    building: &mut Building,
    def: &BuildingDef,
    ledger: &mut Ledger,
    dt: Seconds,
) -> Result<(), TickFault> {
    // A producer with no recipe assigned is inert.
    let Some(recipe_id) = building.recipe else {
        return Ok(());
    };
    let recipe = catalog
        .recipe(recipe_id)
        .ok_or(TickFault::UnknownRecipe(recipe_id))?;

    // Progress is weighted seconds of work, compared against the cycle
    // time directly. Dividing out a normalized rate would floor the
    // quotient (1/10 is not representable in Q32.32) and leave a cycle one
    // tick short of completing after exactly `time` seconds.
    building.progress += def.speed * dt;
    if building.progress >= recipe.time {
        if ledger.can_afford(&recipe.ingredients) {
            for &(item, quantity) in &recipe.ingredients {
                ledger.debit(item, quantity);
            }
            for &(item, quantity) in &recipe.results {
                let _ = ledger.credit(item, quantity);
            }
            // Keep fractional overshoot toward the next cycle.
            building.progress -= recipe.time;
        } else {
            // Fail fast: the finished cycle is discarded, not retried.
            building.progress = Fixed64::ZERO;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Research
// ---------------------------------------------------------------------------

fn tick_research(
    catalog: &Catalog,
    def: &BuildingDef,
    ledger: &mut Ledger,
    research: &mut Option<ResearchJob>,
    researched: &mut BTreeSet<TechId>,
    dt: Seconds,
) -> Result<(), TickFault> {
    // Labs idle unless a technology is being researched.
    let Some(job) = research.as_mut() else {
        return Ok(());
    };
    let tech = catalog
        .tech(job.tech)
        .ok_or(TickFault::UnknownTech(job.tech))?;

    // Same weighted-seconds accumulation as production: exact for dyadic
    // delta-times, so `research_time` seconds of ticking completes on the
    // boundary instead of one tick late.
    job.progress += def.speed * dt;

    // Continuous consumption: each science item drains proportionally to
    // the time advanced, floored at zero. No affordability gate.
    for &(item, total) in &tech.cost {
        let drain = total / tech.research_time * dt * def.speed;
        let _ = ledger.debit_clamped(item, drain);
    }

    if job.progress >= tech.research_time {
        researched.insert(job.tech);
        *research = None;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn mining_moves_ore_from_node_to_ledger() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        engine.build(miner(), Some(0), None).unwrap();

        engine.tick(fixed(2.0)).unwrap();

        // rate 5 * speed 1 * dt 2 = 10 units.
        assert_eq!(engine.state.ledger.amount(iron_ore()), fixed(10.0));
        assert_eq!(engine.state.regions[0].nodes[0].amount, fixed(990.0));
    }

    #[test]
    fn mining_is_clamped_by_node_remainder() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        engine.build(miner(), Some(0), None).unwrap();
        engine.state.regions[0].nodes[0].amount = fixed(3.0);

        engine.tick(fixed(2.0)).unwrap();

        assert_eq!(engine.state.ledger.amount(iron_ore()), fixed(3.0));
        assert_eq!(engine.state.regions[0].nodes[0].amount, fixed(0.0));

        // A depleted node yields nothing further.
        engine.tick(fixed(2.0)).unwrap();
        assert_eq!(engine.state.ledger.amount(iron_ore()), fixed(3.0));
    }

    #[test]
    fn mining_is_clamped_by_ledger_headroom() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        engine.build(miner(), Some(0), None).unwrap();
        engine.state.ledger.set_stock(iron_ore(), fixed(996.0), fixed(1000.0));

        engine.tick(fixed(2.0)).unwrap();

        // Only 4 units of headroom; the node keeps the rest.
        assert_eq!(engine.state.ledger.amount(iron_ore()), fixed(1000.0));
        assert_eq!(engine.state.regions[0].nodes[0].amount, fixed(996.0));
    }

    #[test]
    fn unbound_miner_is_inert() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        engine.build(miner(), None, None).unwrap();
        engine.tick(fixed(5.0)).unwrap();
        assert_eq!(engine.state.ledger.amount(iron_ore()), fixed(0.0));
    }

    #[test]
    fn inactive_building_is_inert() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        let id = engine.build(miner(), Some(0), None).unwrap();
        engine.state.regions[0].building_mut(id).unwrap().active = false;

        engine.tick(fixed(5.0)).unwrap();
        assert_eq!(engine.state.ledger.amount(iron_ore()), fixed(0.0));
        assert_eq!(engine.state.regions[0].nodes[0].amount, fixed(1000.0));
    }

    #[test]
    fn production_exchanges_one_batch_per_cycle() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        fund(&mut engine, iron_ore(), 10.0);
        engine.build(smelter(), None, Some(smelt_iron())).unwrap();

        // smelt_iron: 2 ore -> 1 plate over 4 seconds at speed 1.
        for _ in 0..4 {
            engine.tick(fixed(1.0)).unwrap();
        }

        // Plate stock: 100 funded - 10 smelter cost + 1 smelted.
        assert_eq!(engine.state.ledger.amount(iron_ore()), fixed(8.0));
        assert_eq!(engine.state.ledger.amount(iron_plate()), fixed(91.0));
    }

    #[test]
    fn production_preserves_fractional_overshoot() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        fund(&mut engine, iron_ore(), 100.0);
        let id = engine.build(smelter(), None, Some(smelt_iron())).unwrap();

        // 4.5 seconds of a 4-second cycle: one batch fires, half a second
        // of work carries toward the next cycle.
        engine.tick(fixed(4.5)).unwrap();

        let building = engine.state.regions[0].building(id).unwrap();
        assert_eq!(building.progress, fixed(0.5));
        assert_eq!(engine.state.ledger.amount(iron_plate()), fixed(91.0));
    }

    #[test]
    fn production_discards_cycle_when_ingredients_short() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        fund(&mut engine, iron_ore(), 1.0); // needs 2
        let id = engine.build(smelter(), None, Some(smelt_iron())).unwrap();

        engine.tick(fixed(4.5)).unwrap();

        // Fail-fast reset: progress back to zero, nothing exchanged, the
        // partial ore untouched.
        let building = engine.state.regions[0].building(id).unwrap();
        assert_eq!(building.progress, fixed(0.0));
        assert_eq!(engine.state.ledger.amount(iron_ore()), fixed(1.0));
        assert_eq!(engine.state.ledger.amount(iron_plate()), fixed(90.0));
    }

    #[test]
    fn producer_without_recipe_is_inert() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        let id = engine.build(smelter(), None, None).unwrap();
        engine.tick(fixed(10.0)).unwrap();
        assert_eq!(engine.state.regions[0].building(id).unwrap().progress, fixed(0.0));
    }

    #[test]
    fn research_progresses_and_completes() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        fund(&mut engine, gear(), 100.0);
        fund(&mut engine, science_pack(), 100.0);
        engine.build(lab(), None, None).unwrap();
        engine.research(automation()).unwrap();

        // automation: 10 seconds, cost 10 science packs.
        for _ in 0..9 {
            engine.tick(fixed(1.0)).unwrap();
            assert!(engine.state.research.is_some());
        }
        engine.tick(fixed(1.0)).unwrap();

        assert!(engine.state.is_researched(automation()));
        assert!(engine.state.research.is_none());
        // 10 packs drained continuously over the 10 seconds.
        assert_eq!(engine.state.ledger.amount(science_pack()), fixed(90.0));
    }

    #[test]
    fn production_cycle_completes_on_exact_boundary() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        fund(&mut engine, gear(), 10.0);
        // pack-science runs a 5-second cycle; 1/5 has no exact Q32.32
        // representation, so a normalized accrual would finish late.
        engine.build(smelter(), None, Some(pack_science())).unwrap();

        for _ in 0..5 {
            engine.tick(fixed(1.0)).unwrap();
        }

        assert_eq!(engine.state.ledger.amount(science_pack()), fixed(1.0));
    }

    #[test]
    fn research_completes_after_exact_research_time() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        fund(&mut engine, gear(), 100.0);
        fund(&mut engine, science_pack(), 100.0);
        engine.build(lab(), None, None).unwrap();
        engine.research(automation()).unwrap();

        // 40 quarter-second ticks sum to exactly the 10-second research
        // time; the technology must land on that boundary, not one tick
        // later from rounding in the accrual.
        for _ in 0..39 {
            engine.tick(fixed(0.25)).unwrap();
            assert!(engine.state.research.is_some());
        }
        engine.tick(fixed(0.25)).unwrap();

        assert!(engine.state.is_researched(automation()));
        assert!(engine.state.research.is_none());
    }

    #[test]
    fn research_consumption_floors_at_zero() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        fund(&mut engine, gear(), 100.0);
        fund(&mut engine, science_pack(), 1.0); // far short of 10
        engine.build(lab(), None, None).unwrap();
        engine.research(automation()).unwrap();

        for _ in 0..10 {
            engine.tick(fixed(1.0)).unwrap();
        }

        // The tech still completes; the ledger never went negative.
        assert!(engine.state.is_researched(automation()));
        assert_eq!(engine.state.ledger.amount(science_pack()), fixed(0.0));
    }

    #[test]
    fn lab_idles_without_active_research() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        fund(&mut engine, gear(), 100.0);
        fund(&mut engine, science_pack(), 50.0);
        engine.build(lab(), None, None).unwrap();

        engine.tick(fixed(10.0)).unwrap();
        assert_eq!(engine.state.ledger.amount(science_pack()), fixed(50.0));
    }

    #[test]
    fn two_labs_stack_progress_and_consumption() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 200.0);
        fund(&mut engine, gear(), 100.0);
        fund(&mut engine, science_pack(), 100.0);
        engine.build(lab(), None, None).unwrap();
        engine.build(lab(), None, None).unwrap();

        engine.research(automation()).unwrap();
        for _ in 0..5 {
            engine.tick(fixed(1.0)).unwrap();
        }

        // Two labs at speed 1 halve the wall-clock research time.
        assert!(engine.state.is_researched(automation()));
        assert_eq!(engine.state.ledger.amount(science_pack()), fixed(90.0));
    }

    #[test]
    fn dangling_recipe_reference_faults_the_tick() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        let id = engine.build(smelter(), None, None).unwrap();
        // Corrupt the instance behind the actions' backs.
        engine.state.regions[0].building_mut(id).unwrap().recipe = Some(RecipeId(99));

        assert_eq!(
            engine.tick(fixed(1.0)).unwrap_err(),
            TickFault::UnknownRecipe(RecipeId(99))
        );
    }

    #[test]
    fn dangling_node_index_faults_the_tick() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        let id = engine.build(miner(), Some(0), None).unwrap();
        engine.state.regions[0].building_mut(id).unwrap().node_index = Some(9);

        assert!(matches!(
            engine.tick(fixed(1.0)).unwrap_err(),
            TickFault::NodeIndexOutOfRange { index: 9, .. }
        ));
    }

    #[test]
    fn contention_resolves_in_building_id_order() {
        let mut engine = engine_with_region();
        fund(&mut engine, iron_plate(), 100.0);
        // Two smelters, ore for only one batch. The earlier id wins; the
        // later one discards its cycle.
        fund(&mut engine, iron_ore(), 2.0);
        let first = engine.build(smelter(), None, Some(smelt_iron())).unwrap();
        let second = engine.build(smelter(), None, Some(smelt_iron())).unwrap();

        engine.tick(fixed(4.0)).unwrap();

        // Plate stock: 100 funded - 20 for two smelters + 1 smelted.
        assert_eq!(engine.state.ledger.amount(iron_ore()), fixed(0.0));
        assert_eq!(engine.state.ledger.amount(iron_plate()), fixed(81.0));
        let first = engine.state.regions[0].building(first).unwrap();
        let second = engine.state.regions[0].building(second).unwrap();
        assert_eq!(first.progress, fixed(0.0));
        assert_eq!(second.progress, fixed(0.0));
    }
}
