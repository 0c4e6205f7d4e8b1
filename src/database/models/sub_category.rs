use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category_id: i64,
    pub row_version: i64,
}

/// A sub-category joined with the name of its parent category.
#[derive(FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category_id: i64,
    pub category_name: String,
    pub row_version: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_id: i64,
    #[serde(default)]
    pub row_version: Option<i64>,
}

impl SubCategoryInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>, category_id: i64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category_id,
            row_version: None,
        }
    }

    pub fn with_row_version(mut self, row_version: i64) -> Self {
        self.row_version = Some(row_version);
        self
    }
}
