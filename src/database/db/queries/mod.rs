//! CRUD operations for categories, sub-categories and expenses.
//!
//! Every operation takes the pool explicitly. Writes run structural
//! validation first, then the reference checks, and only then touch the
//! tables. Updates are optimistic: the `UPDATE` only matches the row version
//! the caller observed, and a miss is resolved into `NotFound` or `Conflict`.

use sqlx::SqliteExecutor;

use crate::error::StoreError;

pub mod category;
pub mod diagnostics;
pub mod expense;
pub mod sub_category;

pub use category::*;
pub use diagnostics::*;
pub use expense::*;
pub use sub_category::*;

pub const INVALID_CATEGORY: &str = "Invalid CategoryId. Category does not exist.";
pub const INVALID_SUB_CATEGORY: &str =
    "Invalid SubCategoryId or SubCategory does not belong to the specified Category.";

/// Tables addressed by the shared helpers below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Table {
    Categories,
    SubCategories,
    Expenses,
}

impl Table {
    fn as_str(self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::SubCategories => "sub_categories",
            Table::Expenses => "expenses",
        }
    }

    /// Name used in messages returned to callers.
    pub(crate) fn entity(self) -> &'static str {
        match self {
            Table::Categories => "category",
            Table::SubCategories => "subcategory",
            Table::Expenses => "expense",
        }
    }
}

pub(crate) async fn row_exists<'e, E>(executor: E, table: Table, id: i64) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT COUNT(*) FROM {} WHERE id = ?", table.as_str());
    let count: i64 = sqlx::query_scalar(&sql).bind(id).fetch_one(executor).await?;
    Ok(count > 0)
}

/// Called when a versioned `UPDATE` matched no row. The row either vanished
/// (a concurrent delete) or moved on to a newer version.
pub(crate) async fn resolve_stale_update<'e, E>(executor: E, table: Table, id: i64) -> StoreError
where
    E: SqliteExecutor<'e>,
{
    match row_exists(executor, table, id).await {
        Ok(false) => StoreError::not_found(table.entity(), id),
        Ok(true) => {
            tracing::warn!(entity = table.entity(), id, "optimistic concurrency conflict");
            StoreError::modified_concurrently(table.entity())
        }
        Err(e) => StoreError::Storage(e),
    }
}

/// A write referencing a parent that disappeared after the checks passed.
pub(crate) fn reference_violation(err: sqlx::Error, message: &str) -> StoreError {
    let err = StoreError::from(err);
    if err.is_foreign_key_violation() {
        StoreError::Validation(message.to_string())
    } else {
        err
    }
}

/// A delete blocked by the schema's RESTRICT rule.
pub(crate) fn restrict_violation(err: sqlx::Error, table: Table, id: i64) -> StoreError {
    let err = StoreError::from(err);
    if err.is_foreign_key_violation() {
        StoreError::Conflict(format!(
            "The {} {} is still referenced by expenses and cannot be deleted.",
            table.entity(),
            id
        ))
    } else {
        err
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use sqlx::{Pool, Sqlite};

    use crate::database::db::{connection, migrate};
    use crate::database::models::{
        Category, CategoryInput, Expense, ExpenseInput, SubCategory, SubCategoryInput,
    };

    pub async fn pool() -> Pool<Sqlite> {
        let pool = connection::memory_pool().await.unwrap();
        migrate::run_migrations(&pool).await.unwrap();
        pool
    }

    pub fn day(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    pub async fn category(pool: &Pool<Sqlite>, name: &str) -> Category {
        super::create_category(pool, &CategoryInput::new(name, format!("{} expenses", name)))
            .await
            .unwrap()
    }

    pub async fn sub_category(pool: &Pool<Sqlite>, name: &str, category_id: i64) -> SubCategory {
        super::create_sub_category(
            pool,
            &SubCategoryInput::new(name, format!("{} purchases", name), category_id),
        )
        .await
        .unwrap()
    }

    pub async fn expense(
        pool: &Pool<Sqlite>,
        name: &str,
        amount: Decimal,
        category_id: i64,
        sub_category_id: i64,
    ) -> Expense {
        let input = ExpenseInput::new(
            name,
            "recorded in tests",
            amount,
            day(2024, 1, 14),
            category_id,
            sub_category_id,
        );
        super::create_expense(pool, &input).await.unwrap()
    }
}
