//! In-progress order lines
//!
//! Lines are keyed by menu name: adding a name that is already selected
//! bumps its quantity, removing a name drops the whole line.

use serde::Serialize;
use shared::models::OrderLine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedItem {
    pub name: String,
    /// Unit price in integer currency unit
    pub price: u64,
    pub quantity: u32,
    pub menu_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSelection {
    items: Vec<SelectedItem>,
}

impl OrderSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, name: &str, price: u64, menu_id: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.name == name) {
            item.quantity += 1;
            return;
        }
        self.items.push(SelectedItem {
            name: name.to_string(),
            price,
            quantity: 1,
            menu_id,
        });
    }

    /// Remove the line for `name` regardless of its quantity
    pub fn remove_item(&mut self, name: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.name != name);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[SelectedItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, name: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.name == name)
            .map_or(0, |i| i.quantity)
    }

    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .map(|i| i.price * u64::from(i.quantity))
            .sum()
    }

    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|i| OrderLine::new(i.menu_id, i.quantity))
            .collect()
    }

    /// Take submitted quantities off their lines, dropping lines that reach
    /// zero. Anything selected after the submission snapshot is kept.
    pub fn remove_submitted(&mut self, submitted: &[OrderLine]) {
        for line in submitted {
            if let Some(item) = self.items.iter_mut().find(|i| i.menu_id == line.menu_id) {
                item.quantity = item.quantity.saturating_sub(line.quantity);
            }
        }
        self.items.retain(|i| i.quantity > 0);
    }

    /// Clear the selection when the active place has no unpaid order, so a
    /// previous table's lines never show up on a newly selected one.
    ///
    /// Returns `true` if lines were dropped.
    pub fn sync_unpaid(&mut self, place_id: Option<i64>, unpaid_order_id: Option<i64>) -> bool {
        if place_id.is_some() && unpaid_order_id.is_none() && !self.items.is_empty() {
            tracing::debug!(?place_id, lines = self.items.len(), "No unpaid order, clearing selection");
            self.items.clear();
            return true;
        }
        false
    }
}
