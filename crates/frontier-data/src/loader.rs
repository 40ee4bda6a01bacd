//! Reads a content directory into a [`ContentSet`] and resolves it into
//! the immutable [`Catalog`].
//!
//! A content directory holds seven tables, one JSON document each:
//! `items.json`, `recipes.json`, `buildings.json`, `technologies.json`,
//! `regions.json`, `units.json`, `enemies.json`. Every table is required,
//! even if empty.
//!
//! Id assignment is deterministic: records are registered in sorted-key
//! order, so the same content directory always yields the same typed ids.

use crate::schema::{
    BuildingKindData, ContentSet, ItemKindData, Table,
};
use crate::validate::{self, IntegrityReport};
use frontier_core::catalog::{
    Amount, BuildingKind, Catalog, CatalogBuilder, CatalogError, ItemKind, NodeDef, TechDef,
};
use frontier_core::fixed::f64_to_fixed64;
use frontier_core::id::TechId;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("missing content table '{table}.json' in {dir}")]
    MissingTable { table: &'static str, dir: String },
    #[error("failed to parse {file}: {detail}")]
    Parse { file: String, detail: String },
    #[error("{table}/{id}: unresolved {kind} reference '{name}'")]
    UnresolvedRef {
        table: &'static str,
        id: String,
        kind: &'static str,
        name: String,
    },
    #[error(transparent)]
    Integrity(#[from] IntegrityReport),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("i/o error reading content table: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn read_table<T: DeserializeOwned>(
    dir: &Path,
    table: &'static str,
) -> Result<Table<T>, DataLoadError> {
    let path = dir.join(format!("{table}.json"));
    if !path.is_file() {
        return Err(DataLoadError::MissingTable {
            table,
            dir: dir.display().to_string(),
        });
    }
    let text = std::fs::read_to_string(&path)?;
    serde_json::from_str(&text).map_err(|e| DataLoadError::Parse {
        file: path.display().to_string(),
        detail: e.to_string(),
    })
}

/// Read the seven content tables from `dir`. Shapes are checked here;
/// cross-references are not until [`build_catalog`].
pub fn load_dir(dir: impl AsRef<Path>) -> Result<ContentSet, DataLoadError> {
    let dir = dir.as_ref();
    Ok(ContentSet {
        items: read_table(dir, "items")?,
        recipes: read_table(dir, "recipes")?,
        buildings: read_table(dir, "buildings")?,
        technologies: read_table(dir, "technologies")?,
        regions: read_table(dir, "regions")?,
        units: read_table(dir, "units")?,
        enemies: read_table(dir, "enemies")?,
    })
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

fn resolve_amounts(
    builder: &CatalogBuilder,
    table: &'static str,
    id: &str,
    entries: &BTreeMap<String, f64>,
) -> Result<Vec<Amount>, DataLoadError> {
    entries
        .iter()
        .map(|(name, &qty)| {
            let item = builder
                .item_id(name)
                .ok_or_else(|| DataLoadError::UnresolvedRef {
                    table,
                    id: id.to_string(),
                    kind: "item",
                    name: name.clone(),
                })?;
            Ok((item, f64_to_fixed64(qty)))
        })
        .collect()
}

impl From<ItemKindData> for ItemKind {
    fn from(kind: ItemKindData) -> Self {
        match kind {
            ItemKindData::Energy => ItemKind::Energy,
            ItemKindData::Material => ItemKind::Material,
            ItemKindData::SciencePack => ItemKind::SciencePack,
        }
    }
}

impl From<BuildingKindData> for BuildingKind {
    fn from(kind: BuildingKindData) -> Self {
        match kind {
            BuildingKindData::Mining => BuildingKind::Mining,
            BuildingKindData::Production => BuildingKind::Production,
            BuildingKindData::Research => BuildingKind::Research,
            BuildingKindData::Inert => BuildingKind::Inert,
        }
    }
}

/// Resolve a content set into the immutable catalog.
///
/// Runs the integrity pass first and reports every finding at once, then
/// registers records table by table in sorted-key order. Technology
/// prerequisites may point forward in that order; their ids are
/// precomputed from the sorted key sequence before registration starts.
pub fn build_catalog(set: &ContentSet) -> Result<Catalog, DataLoadError> {
    let report = validate::check(set);
    if !report.is_empty() {
        return Err(report.into());
    }

    let mut builder = CatalogBuilder::new();

    for (id, item) in &set.items {
        builder.register_item(id, item.kind.into());
    }

    for (id, recipe) in &set.recipes {
        let ingredients = resolve_amounts(&builder, "recipes", id, &recipe.ingredients)?;
        let results = resolve_amounts(&builder, "recipes", id, &recipe.results)?;
        builder.register_recipe(id, ingredients, results, f64_to_fixed64(recipe.time));
    }

    for (id, building) in &set.buildings {
        let cost = resolve_amounts(&builder, "buildings", id, &building.cost)?;
        builder.register_building(
            id,
            building.kind.into(),
            f64_to_fixed64(building.speed),
            cost,
            building.slots,
        );
    }

    // Sorted-key position is the id each technology will receive.
    let tech_index: BTreeMap<&str, TechId> = set
        .technologies
        .keys()
        .enumerate()
        .map(|(i, key)| (key.as_str(), TechId(i as u32)))
        .collect();

    for (id, tech) in &set.technologies {
        let cost = resolve_amounts(&builder, "technologies", id, &tech.cost)?;
        let prerequisites = tech
            .prerequisites
            .iter()
            .map(|name| {
                tech_index.get(name.as_str()).copied().ok_or_else(|| {
                    DataLoadError::UnresolvedRef {
                        table: "technologies",
                        id: id.to_string(),
                        kind: "technology",
                        name: name.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let unlocks_buildings = tech
            .unlocks
            .buildings
            .iter()
            .map(|name| {
                builder.building_id(name).ok_or_else(|| {
                    DataLoadError::UnresolvedRef {
                        table: "technologies",
                        id: id.to_string(),
                        kind: "building",
                        name: name.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let unlocks_recipes = tech
            .unlocks
            .recipes
            .iter()
            .map(|name| {
                builder.recipe_id(name).ok_or_else(|| {
                    DataLoadError::UnresolvedRef {
                        table: "technologies",
                        id: id.to_string(),
                        kind: "recipe",
                        name: name.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        builder.register_tech(
            id,
            TechDef {
                name: tech.name.clone(),
                research_time: f64_to_fixed64(tech.research_time),
                cost,
                prerequisites,
                unlocks_buildings,
                unlocks_recipes,
            },
        );
    }

    for (id, region) in &set.regions {
        let nodes = region
            .nodes
            .iter()
            .map(|node| {
                let item = builder.item_id(&node.item).ok_or_else(|| {
                    DataLoadError::UnresolvedRef {
                        table: "regions",
                        id: id.to_string(),
                        kind: "item",
                        name: node.item.clone(),
                    }
                })?;
                Ok(NodeDef {
                    item,
                    amount: f64_to_fixed64(node.amount),
                    rate: f64_to_fixed64(node.rate),
                })
            })
            .collect::<Result<Vec<_>, DataLoadError>>()?;
        builder.register_region(id, region.slots_total, nodes);
    }

    Ok(builder.build()?)
}
