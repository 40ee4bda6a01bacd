//! Frontier Data -- JSON content tables for the Expansion Front simulation.
//!
//! Three layers, leaf to root:
//!
//! - [`schema`] -- serde structs matching the on-disk table shapes, one
//!   JSON document per concern, each a mapping from string id to record.
//! - [`validate`] -- the integrity pass: every cross-reference (tech
//!   prerequisites, recipe entries, region node items, building and unit
//!   costs, enemy drops) must resolve to an existing record.
//! - [`loader`] -- reads a content directory, runs the integrity pass,
//!   resolves string ids into typed ids, and builds the immutable
//!   [`frontier_core::catalog::Catalog`].
//!
//! The simulation core assumes this pipeline has run; it performs no
//! defensive existence checks of its own while ticking.

pub mod loader;
pub mod schema;
pub mod validate;

pub use loader::{DataLoadError, build_catalog, load_dir};
pub use schema::ContentSet;
