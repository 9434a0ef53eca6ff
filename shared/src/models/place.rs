//! Place Model (table / seat)

use serde::{Deserialize, Serialize};

use super::menu::{GridCell, SizeType};

/// Place entity (桌台)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub place_id: i64,
    pub store_id: i64,
    pub place_name: String,
    pub position_x: u32,
    pub position_y: u32,
    #[serde(default)]
    pub size_type: Option<SizeType>,
}

impl Place {
    pub fn cell(&self) -> GridCell {
        GridCell::new(self.position_x, self.position_y)
    }
}

/// Body of `POST /places` and `PATCH /places`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceUpsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<i64>,
    pub store_id: i64,
    pub place_name: String,
    pub position_x: u32,
    pub position_y: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_type: Option<SizeType>,
}

impl PlaceUpsert {
    pub fn cell(&self) -> GridCell {
        GridCell::new(self.position_x, self.position_y)
    }
}
