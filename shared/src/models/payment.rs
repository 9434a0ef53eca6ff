//! Payment Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::OrderLine;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Completed,
    PartiallyRefunded,
    Refunded,
    Cancelled,
}

/// Payment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub payment_id: i64,
    pub order_id: i64,
    /// Amount in integer currency unit
    pub amount: u64,
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PaymentStatus,
    pub paid_at: DateTime<Utc>,
}

/// Body of `POST /pay`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreate {
    pub order_id: i64,
    pub amount: u64,
    pub method: PaymentMethod,
}

/// Body of `PATCH /pay/{id}` (partial refund)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub items: Vec<OrderLine>,
}
