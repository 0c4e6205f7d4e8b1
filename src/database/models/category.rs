use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,           // up to 100 chars
    pub description: String,    // up to 500 chars
    pub row_version: i64,
}

/// Payload for creating or fully replacing a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Version the caller last saw. Only read by updates.
    #[serde(default)]
    pub row_version: Option<i64>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            row_version: None,
        }
    }

    pub fn with_row_version(mut self, row_version: i64) -> Self {
        self.row_version = Some(row_version);
        self
    }
}
