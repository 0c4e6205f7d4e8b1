use sqlx::{Pool, Sqlite};

use crate::database::models::{Diagnostics, OrphanedExpense};
use crate::error::StoreResult;

/*==========Diagnostics Queries=========== */

/// Read-only audit: table counts plus every expense whose category or
/// sub-category row is missing. Nothing is repaired.
pub async fn get_diagnostics(pool: &Pool<Sqlite>) -> StoreResult<Diagnostics> {
    // one read transaction so counts and orphans come from the same snapshot
    let mut tx = pool.begin().await?;

    let total_expenses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
        .fetch_one(&mut *tx)
        .await?;
    let total_categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&mut *tx)
        .await?;
    let total_sub_categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sub_categories")
        .fetch_one(&mut *tx)
        .await?;

    let orphaned_expenses = sqlx::query_as::<_, OrphanedExpense>(
        r#"
        SELECT e.id, e.name, e.category_id, e.sub_category_id
        FROM expenses e
        WHERE NOT EXISTS (SELECT 1 FROM categories c WHERE c.id = e.category_id)
           OR NOT EXISTS (SELECT 1 FROM sub_categories s WHERE s.id = e.sub_category_id)
        ORDER BY e.id ASC
        "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    let has_orphaned_data = !orphaned_expenses.is_empty();
    if has_orphaned_data {
        tracing::warn!(orphans = orphaned_expenses.len(), "orphaned expenses detected");
    }

    Ok(Diagnostics {
        total_expenses,
        total_categories,
        total_sub_categories,
        orphaned_expenses,
        has_orphaned_data,
    })
}
