//! Frontier Core -- the simulation engine for the Expansion Front economy.
//!
//! This crate provides the immutable content catalog, the resource ledger,
//! the region/resource-node model, and the tick engine that converts
//! resource nodes and recipes into resource deltas over discrete time steps.
//!
//! # Stepping Model
//!
//! There is no background scheduler. An external driver calls
//! [`engine::Engine::tick`] synchronously with an explicit delta-time in
//! seconds; the engine visits every active building exactly once per tick,
//! dispatching on [`catalog::BuildingKind`]:
//!
//! 1. **Mining** -- drain the bound resource node, credit the ledger.
//! 2. **Production** -- accrue cycle progress; on completion exchange a
//!    batch of ingredients for results.
//! 3. **Research** -- accrue progress on the active technology while
//!    continuously draining its science cost.
//!
//! All mutable state lives in one explicitly owned [`state::GameState`]
//! aggregate; nothing is global and nothing executes concurrently.
//!
//! # Key Types
//!
//! - [`engine::Engine`] -- owns the catalog and game state; exposes the
//!   driver contract (`tick`, `build`, `set_recipe`, `research`).
//! - [`catalog::Catalog`] -- immutable tables of items, recipes, buildings,
//!   technologies, and region templates (frozen at startup).
//! - [`ledger::Ledger`] -- current/max stock per item id.
//! - [`region::Region`] -- resource nodes, buildings, slot accounting.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic math.

pub mod action;
pub mod catalog;
pub mod engine;
pub mod fixed;
pub mod id;
pub mod ledger;
pub mod region;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
