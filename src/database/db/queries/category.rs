use sqlx::{Pool, Sqlite};

use super::{resolve_stale_update, restrict_violation, row_exists, Table};
use crate::database::models::{Category, CategoryInput};
use crate::database::validation::validate_category;
use crate::error::{StoreError, StoreResult};

/*==========Category Queries=========== */

pub async fn list_categories(pool: &Pool<Sqlite>) -> StoreResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, description, row_version
        FROM categories
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn get_category(pool: &Pool<Sqlite>, id: i64) -> StoreResult<Category> {
    find_category(pool, id)
        .await?
        .ok_or_else(|| StoreError::not_found("category", id))
}

async fn find_category(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, description, row_version
        FROM categories
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_category(pool: &Pool<Sqlite>, input: &CategoryInput) -> StoreResult<Category> {
    validate_category(input)?;

    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, description)
        VALUES (?, ?)
        RETURNING id, name, description, row_version
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .fetch_one(pool)
    .await?;

    tracing::info!(category_id = category.id, name = %category.name, "category created");
    Ok(category)
}

/// Replaces name and description. `input.row_version`, when given, is the
/// version the caller edited; otherwise the version read here is used.
pub async fn update_category(pool: &Pool<Sqlite>, id: i64, input: &CategoryInput) -> StoreResult<()> {
    validate_category(input)?;

    let current = get_category(pool, id).await?;
    let expected_version = input.row_version.unwrap_or(current.row_version);

    let result = sqlx::query(
        r#"
        UPDATE categories
        SET name = ?, description = ?, row_version = row_version + 1
        WHERE id = ? AND row_version = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(id)
    .bind(expected_version)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(resolve_stale_update(pool, Table::Categories, id).await);
    }

    tracing::info!(category_id = id, "category updated");
    Ok(())
}

/// Deletes a category together with its sub-categories. Refused while any
/// expense points at the category or at one of its sub-categories.
pub async fn delete_category(pool: &Pool<Sqlite>, id: i64) -> StoreResult<()> {
    let mut tx = pool.begin().await?;

    if !row_exists(&mut *tx, Table::Categories, id).await? {
        return Err(StoreError::not_found("category", id));
    }

    let blocking: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM expenses
        WHERE category_id = ?
           OR sub_category_id IN (SELECT id FROM sub_categories WHERE category_id = ?)
        "#,
    )
    .bind(id)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if blocking > 0 {
        return Err(StoreError::Conflict(format!(
            "The category {} still has {} expense(s). Delete or move them before deleting the category.",
            id, blocking
        )));
    }

    // sub_categories go with it through ON DELETE CASCADE
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| restrict_violation(e, Table::Categories, id))?;

    tx.commit().await?;

    tracing::info!(category_id = id, "category deleted");
    Ok(())
}
