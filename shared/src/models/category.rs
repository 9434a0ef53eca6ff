//! Category Model

use serde::{Deserialize, Serialize};

/// Visual style of a category tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStyle {
    pub color_code: String,
    /// Fixed tab slot in the category bar, if pinned
    #[serde(default)]
    pub slot: Option<u32>,
}

impl Default for CategoryStyle {
    fn default() -> Self {
        Self {
            color_code: default_color_code(),
            slot: None,
        }
    }
}

fn default_color_code() -> String {
    "#FFFFFF".to_string()
}

/// Category entity (unique id per store)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "categoryId")]
    pub id: i64,
    pub store_id: i64,
    #[serde(rename = "categoryName")]
    pub name: String,
    #[serde(default)]
    pub style: CategoryStyle,
}

/// Create / update category payload
///
/// `category_id` is absent on create and required on update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub store_id: i64,
    pub category_name: String,
    pub color_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<u32>,
}
