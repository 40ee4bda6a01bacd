//! The resource ledger: current and maximum stock for every item id.
//!
//! Credits clamp at the entry's maximum; plain debits assume the caller has
//! already checked affordability. Research consumption uses the clamped
//! debit, which floors at zero -- that asymmetry is deliberate and mirrored
//! by the tick engine.

use crate::catalog::Catalog;
use crate::fixed::Fixed64;
use crate::id::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current and maximum stock for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub current: Fixed64,
    pub max: Fixed64,
}

/// Item-keyed store of stock levels. BTreeMap so iteration order is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    entries: BTreeMap<ItemId, Stock>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger with one empty entry per catalog item, each at its
    /// kind's default capacity.
    pub fn seeded(catalog: &Catalog) -> Self {
        let mut ledger = Self::new();
        for (id, def) in catalog.items() {
            ledger.entries.insert(
                id,
                Stock {
                    current: Fixed64::ZERO,
                    max: def.kind.default_capacity(),
                },
            );
        }
        ledger
    }

    pub fn stock(&self, item: ItemId) -> Option<Stock> {
        self.entries.get(&item).copied()
    }

    /// Current quantity of an item. Missing entries read as zero.
    pub fn amount(&self, item: ItemId) -> Fixed64 {
        self.entries.get(&item).map_or(Fixed64::ZERO, |s| s.current)
    }

    /// Free capacity remaining for an item. Missing entries have none.
    pub fn headroom(&self, item: ItemId) -> Fixed64 {
        self.entries
            .get(&item)
            .map_or(Fixed64::ZERO, |s| s.max - s.current)
    }

    /// Overwrite an entry's stock and ceiling. For scenario setup.
    pub fn set_stock(&mut self, item: ItemId, current: Fixed64, max: Fixed64) {
        self.entries.insert(item, Stock { current, max });
    }

    /// Add to an entry, clamping at its maximum. Returns the quantity
    /// actually stored, which may be less than requested.
    #[must_use = "the stored quantity may be less than the credited quantity"]
    pub fn credit(&mut self, item: ItemId, amount: Fixed64) -> Fixed64 {
        let Some(stock) = self.entries.get_mut(&item) else {
            return Fixed64::ZERO;
        };
        let stored = amount.min(stock.max - stock.current).max(Fixed64::ZERO);
        stock.current += stored;
        stored
    }

    /// Remove a quantity the caller has already verified is available.
    pub fn debit(&mut self, item: ItemId, amount: Fixed64) {
        let Some(stock) = self.entries.get_mut(&item) else {
            debug_assert!(false, "debit of untracked item {item:?}");
            return;
        };
        debug_assert!(
            stock.current >= amount,
            "debit of {amount} exceeds stock {} for {item:?}",
            stock.current
        );
        stock.current -= amount;
    }

    /// Remove up to `amount`, flooring at zero. Returns the quantity
    /// actually drained.
    pub fn debit_clamped(&mut self, item: ItemId, amount: Fixed64) -> Fixed64 {
        let Some(stock) = self.entries.get_mut(&item) else {
            return Fixed64::ZERO;
        };
        let drained = amount.min(stock.current).max(Fixed64::ZERO);
        stock.current -= drained;
        drained
    }

    /// True when every cost entry is currently in stock.
    pub fn can_afford<'a>(&self, costs: impl IntoIterator<Item = &'a (ItemId, Fixed64)>) -> bool {
        costs
            .into_iter()
            .all(|&(item, quantity)| self.amount(item) >= quantity)
    }

    /// Iterate all entries in item-id order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, Stock)> + '_ {
        self.entries.iter().map(|(&id, &stock)| (id, stock))
    }
}
