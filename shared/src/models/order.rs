//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status
///
/// `Unpaid` is the only non-terminal state; the payment and refund
/// endpoints move an order out of it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Unpaid,
    Paid,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Unpaid)
    }
}

/// Order line (menu + quantity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub menu_id: i64,
    pub quantity: u32,
    /// Backend line-item id, present on lines read back from the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<i64>,
}

impl OrderLine {
    pub fn new(menu_id: i64, quantity: u32) -> Self {
        Self {
            menu_id,
            quantity,
            line_id: None,
        }
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    pub store_id: i64,
    pub place_id: i64,
    pub items: Vec<OrderLine>,
    /// Aggregate price in integer currency unit
    pub total_price: u64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Denormalized place name for the sales history view
    #[serde(default)]
    pub place_name: Option<String>,
}

impl Order {
    pub fn is_unpaid(&self) -> bool {
        self.status == OrderStatus::Unpaid
    }
}

/// Body of `POST /orders`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub store_id: i64,
    pub place_id: i64,
    pub items: Vec<OrderLine>,
}
