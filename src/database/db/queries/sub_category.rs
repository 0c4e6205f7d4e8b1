use sqlx::{Pool, Sqlite, SqliteExecutor};

use super::{
    reference_violation, resolve_stale_update, restrict_violation, row_exists, Table, INVALID_CATEGORY,
};
use crate::database::models::{SubCategory, SubCategoryInput, SubCategoryView};
use crate::database::validation::validate_sub_category;
use crate::error::{StoreError, StoreResult};

/*==========SubCategory Queries=========== */

pub async fn list_sub_categories(pool: &Pool<Sqlite>) -> StoreResult<Vec<SubCategoryView>> {
    let rows = sqlx::query_as::<_, SubCategoryView>(
        r#"
        SELECT
            s.id,
            s.name,
            s.description,
            s.category_id,
            c.name AS category_name,
            s.row_version
        FROM sub_categories s
        JOIN categories c ON c.id = s.category_id
        ORDER BY s.id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_sub_category(pool: &Pool<Sqlite>, id: i64) -> StoreResult<SubCategoryView> {
    sqlx::query_as::<_, SubCategoryView>(
        r#"
        SELECT
            s.id,
            s.name,
            s.description,
            s.category_id,
            c.name AS category_name,
            s.row_version
        FROM sub_categories s
        JOIN categories c ON c.id = s.category_id
        WHERE s.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StoreError::not_found("subcategory", id))
}

/// Sub-categories filed under one category. Unknown ids yield an empty list.
pub async fn get_sub_categories_by_category(
    pool: &Pool<Sqlite>,
    category_id: i64,
) -> StoreResult<Vec<SubCategory>> {
    let rows = sqlx::query_as::<_, SubCategory>(
        r#"
        SELECT id, name, description, category_id, row_version
        FROM sub_categories
        WHERE category_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

async fn find_sub_category<'e, E>(executor: E, id: i64) -> Result<Option<SubCategory>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, SubCategory>(
        r#"
        SELECT id, name, description, category_id, row_version
        FROM sub_categories
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn create_sub_category(pool: &Pool<Sqlite>, input: &SubCategoryInput) -> StoreResult<SubCategory> {
    validate_sub_category(input)?;

    if !row_exists(pool, Table::Categories, input.category_id).await? {
        return Err(StoreError::Validation(INVALID_CATEGORY.to_string()));
    }

    let sub_category = sqlx::query_as::<_, SubCategory>(
        r#"
        INSERT INTO sub_categories (name, description, category_id)
        VALUES (?, ?, ?)
        RETURNING id, name, description, category_id, row_version
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.category_id)
    .fetch_one(pool)
    .await
    .map_err(|e| reference_violation(e, INVALID_CATEGORY))?;

    tracing::info!(
        sub_category_id = sub_category.id,
        category_id = sub_category.category_id,
        "subcategory created"
    );
    Ok(sub_category)
}

/// Full replace, including the parent category. A sub-category that already
/// has expenses cannot move to another category, since those expenses would
/// stop matching their own category. The checks share the write's transaction.
pub async fn update_sub_category(pool: &Pool<Sqlite>, id: i64, input: &SubCategoryInput) -> StoreResult<()> {
    validate_sub_category(input)?;

    let mut tx = pool.begin().await?;

    let current = find_sub_category(&mut *tx, id)
        .await?
        .ok_or_else(|| StoreError::not_found("subcategory", id))?;

    if !row_exists(&mut *tx, Table::Categories, input.category_id).await? {
        return Err(StoreError::Validation(INVALID_CATEGORY.to_string()));
    }

    if current.category_id != input.category_id {
        let recorded: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses WHERE sub_category_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if recorded > 0 {
            return Err(StoreError::Validation(format!(
                "The subcategory {} has {} expense(s) recorded under category {} and cannot be moved.",
                id, recorded, current.category_id
            )));
        }
    }

    let expected_version = input.row_version.unwrap_or(current.row_version);

    let result = sqlx::query(
        r#"
        UPDATE sub_categories
        SET name = ?, description = ?, category_id = ?, row_version = row_version + 1
        WHERE id = ? AND row_version = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.category_id)
    .bind(id)
    .bind(expected_version)
    .execute(&mut *tx)
    .await
    .map_err(|e| reference_violation(e, INVALID_CATEGORY))?;

    if result.rows_affected() == 0 {
        return Err(resolve_stale_update(&mut *tx, Table::SubCategories, id).await);
    }

    tx.commit().await?;

    tracing::info!(sub_category_id = id, category_id = input.category_id, "subcategory updated");
    Ok(())
}

pub async fn delete_sub_category(pool: &Pool<Sqlite>, id: i64) -> StoreResult<()> {
    let mut tx = pool.begin().await?;

    if !row_exists(&mut *tx, Table::SubCategories, id).await? {
        return Err(StoreError::not_found("subcategory", id));
    }

    let blocking: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses WHERE sub_category_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    if blocking > 0 {
        return Err(StoreError::Conflict(format!(
            "The subcategory {} still has {} expense(s). Delete or move them before deleting the subcategory.",
            id, blocking
        )));
    }

    sqlx::query("DELETE FROM sub_categories WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| restrict_violation(e, Table::SubCategories, id))?;

    tx.commit().await?;

    tracing::info!(sub_category_id = id, "subcategory deleted");
    Ok(())
}
