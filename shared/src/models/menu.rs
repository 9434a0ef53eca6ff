//! Menu Item Model

use serde::{Deserialize, Serialize};

/// Footprint of an item inside one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeType {
    /// Occupies the whole cell exclusively
    Full,
    /// Occupies half a cell; two may share one
    Half,
}

/// A discrete cell of a layout grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for GridCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Menu item entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub menu_id: i64,
    pub category_id: i64,
    pub menu_name: String,
    /// Price in integer currency unit
    pub price: u64,
    /// Discount rate in percent (0-100)
    #[serde(default)]
    pub discount_rate: Option<f64>,
    #[serde(default)]
    pub color_code: Option<String>,
    pub size_type: SizeType,
    pub position_x: u32,
    pub position_y: u32,
}

impl MenuItem {
    pub fn cell(&self) -> GridCell {
        GridCell::new(self.position_x, self.position_y)
    }

    /// Price after the discount rate, rounded down
    pub fn discounted_price(&self) -> u64 {
        match self.discount_rate {
            Some(rate) if rate > 0.0 => {
                let rate = rate.min(100.0);
                (self.price as f64 * (100.0 - rate) / 100.0).floor() as u64
            }
            _ => self.price,
        }
    }
}

/// Body of `POST /menus` and `PATCH /menus`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuUpsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<i64>,
    pub category_id: i64,
    pub store_id: i64,
    pub menu_name: String,
    pub price: u64,
    pub color_code: String,
    pub size_type: SizeType,
    pub position_x: u32,
    pub position_y: u32,
}

impl MenuUpsert {
    pub fn cell(&self) -> GridCell {
        GridCell::new(self.position_x, self.position_y)
    }

    /// Update payload that keeps every field of `item` except its position
    pub fn moved(item: &MenuItem, store_id: i64, to: GridCell) -> Self {
        Self {
            menu_id: Some(item.menu_id),
            category_id: item.category_id,
            store_id,
            menu_name: item.menu_name.clone(),
            price: item.price,
            color_code: item
                .color_code
                .clone()
                .unwrap_or_else(|| "#FFFFFF".to_string()),
            size_type: item.size_type,
            position_x: to.x,
            position_y: to.y,
        }
    }
}
