use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An expense whose category or sub-category row no longer exists.
#[derive(FromRow, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanedExpense {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub sub_category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub total_expenses: i64,
    pub total_categories: i64,
    pub total_sub_categories: i64,
    pub orphaned_expenses: Vec<OrphanedExpense>,
    pub has_orphaned_data: bool,
}
