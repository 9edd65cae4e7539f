use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::notifier::Notifier;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Items picked up during the session, in pickup order.
#[derive(Debug, Default)]
pub struct ItemLedger {
    collected: Vec<ItemId>,
    collected_changed: Notifier<ItemId>,
}

impl ItemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the item was already collected.
    pub fn collect(&mut self, item: ItemId) -> bool {
        if self.collected.contains(&item) {
            return false;
        }
        info!(item = %item, "item_collected");
        self.collected.push(item.clone());
        self.collected_changed.broadcast(&item);
        true
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.collected.iter().any(|collected| collected.0 == item)
    }

    pub fn collected(&self) -> &[ItemId] {
        &self.collected
    }

    pub fn on_collected(&self) -> &Notifier<ItemId> {
        &self.collected_changed
    }
}
