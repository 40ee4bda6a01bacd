//! The schema-integrity pass.
//!
//! Every cross-reference in a content set must resolve to an existing
//! record: technology prerequisites and unlocks, recipe ingredients and
//! results, region resource-node items, building and unit cost items, and
//! enemy drops. The pass collects every finding instead of stopping at
//! the first, so content authors get one complete report.
//!
//! The simulation core relies on this pass having run; a reference that
//! slips through surfaces later as a fatal tick fault, not a recoverable
//! error.

use crate::schema::ContentSet;
use std::collections::BTreeMap;
use std::fmt;

/// One integrity finding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("{table}/{id}: {field} references unknown item '{name}'")]
    UnknownItem {
        table: &'static str,
        id: String,
        field: &'static str,
        name: String,
    },
    #[error("technologies/{id}: unknown prerequisite '{name}'")]
    UnknownPrerequisite { id: String, name: String },
    #[error("technologies/{id}: unlock references unknown building '{name}'")]
    UnknownBuildingUnlock { id: String, name: String },
    #[error("technologies/{id}: unlock references unknown recipe '{name}'")]
    UnknownRecipeUnlock { id: String, name: String },
    #[error("{table}/{id}: time must be positive")]
    NonPositiveTime { table: &'static str, id: String },
}

/// Every finding for one content set. Empty means the set is sound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub errors: Vec<IntegrityError>,
}

impl IntegrityReport {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} integrity error(s):", self.errors.len())?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for IntegrityReport {}

/// Run the integrity pass over a content set.
pub fn check(set: &ContentSet) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    let mut check_items = |table: &'static str,
                           id: &str,
                           field: &'static str,
                           names: &BTreeMap<String, f64>,
                           report: &mut IntegrityReport| {
        for name in names.keys() {
            if !set.items.contains_key(name) {
                report.errors.push(IntegrityError::UnknownItem {
                    table,
                    id: id.to_string(),
                    field,
                    name: name.clone(),
                });
            }
        }
    };

    for (id, recipe) in &set.recipes {
        check_items("recipes", id, "ingredients", &recipe.ingredients, &mut report);
        check_items("recipes", id, "results", &recipe.results, &mut report);
        if recipe.time <= 0.0 {
            report.errors.push(IntegrityError::NonPositiveTime {
                table: "recipes",
                id: id.clone(),
            });
        }
    }

    for (id, building) in &set.buildings {
        check_items("buildings", id, "cost", &building.cost, &mut report);
    }

    for (id, tech) in &set.technologies {
        check_items("technologies", id, "cost", &tech.cost, &mut report);
        if tech.research_time <= 0.0 {
            report.errors.push(IntegrityError::NonPositiveTime {
                table: "technologies",
                id: id.clone(),
            });
        }
        for prereq in &tech.prerequisites {
            if !set.technologies.contains_key(prereq) {
                report.errors.push(IntegrityError::UnknownPrerequisite {
                    id: id.clone(),
                    name: prereq.clone(),
                });
            }
        }
        for building in &tech.unlocks.buildings {
            if !set.buildings.contains_key(building) {
                report.errors.push(IntegrityError::UnknownBuildingUnlock {
                    id: id.clone(),
                    name: building.clone(),
                });
            }
        }
        for recipe in &tech.unlocks.recipes {
            if !set.recipes.contains_key(recipe) {
                report.errors.push(IntegrityError::UnknownRecipeUnlock {
                    id: id.clone(),
                    name: recipe.clone(),
                });
            }
        }
    }

    for (id, region) in &set.regions {
        for node in &region.nodes {
            if !set.items.contains_key(&node.item) {
                report.errors.push(IntegrityError::UnknownItem {
                    table: "regions",
                    id: id.clone(),
                    field: "nodes",
                    name: node.item.clone(),
                });
            }
        }
    }

    for (id, unit) in &set.units {
        check_items("units", id, "cost", &unit.cost, &mut report);
    }

    for (id, enemy) in &set.enemies {
        check_items("enemies", id, "drops", &enemy.drops, &mut report);
    }

    report
}
