use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, SqliteConnection, SqliteExecutor};

use super::{reference_violation, resolve_stale_update, row_exists, Table, INVALID_CATEGORY, INVALID_SUB_CATEGORY};
use crate::database::models::{Expense, ExpenseInput, ExpenseView};
use crate::database::validation::{validate_expense, AMOUNT_SCALE};
use crate::error::{StoreError, StoreResult};

/*==========Expense Queries=========== */

// amounts are stored as TEXT with a fixed two-digit scale, half-cents round away from zero
fn amount_text(amount: Decimal) -> String {
    let mut amount = amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(AMOUNT_SCALE);
    amount.to_string()
}

fn decode_amount(row: &SqliteRow) -> Result<Decimal, sqlx::Error> {
    let amount_text: String = row.try_get("amount")?;
    Decimal::from_str(&amount_text)
        .map_err(|e| sqlx::Error::Decode(format!("Invalid Decimal format for amount: {}", e).into()))
}

fn expense_from_row(row: &SqliteRow) -> Result<Expense, sqlx::Error> {
    Ok(Expense {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        amount: decode_amount(row)?,
        date: row.try_get("date")?,
        category_id: row.try_get("category_id")?,
        sub_category_id: row.try_get("sub_category_id")?,
        row_version: row.try_get("row_version")?,
    })
}

fn expense_view_from_row(row: &SqliteRow) -> Result<ExpenseView, sqlx::Error> {
    Ok(ExpenseView {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        amount: decode_amount(row)?,
        date: row.try_get("date")?,
        category_id: row.try_get("category_id")?,
        sub_category_id: row.try_get("sub_category_id")?,
        category_name: row.try_get("category_name")?,
        sub_category_name: row.try_get("sub_category_name")?,
        row_version: row.try_get("row_version")?,
    })
}

/// Category first, then sub-category membership, so the most upstream
/// problem is the one reported. Runs on the writer's transaction so the
/// references cannot change before the row is written.
async fn check_references(conn: &mut SqliteConnection, category_id: i64, sub_category_id: i64) -> StoreResult<()> {
    if !row_exists(&mut *conn, Table::Categories, category_id).await? {
        return Err(StoreError::Validation(INVALID_CATEGORY.to_string()));
    }

    let owner: Option<i64> = sqlx::query_scalar("SELECT category_id FROM sub_categories WHERE id = ?")
        .bind(sub_category_id)
        .fetch_optional(&mut *conn)
        .await?;

    if owner != Some(category_id) {
        return Err(StoreError::Validation(INVALID_SUB_CATEGORY.to_string()));
    }

    Ok(())
}

/// Expenses joined with their category and sub-category names, newest first.
pub async fn list_expenses(pool: &Pool<Sqlite>) -> StoreResult<Vec<ExpenseView>> {
    sqlx::query(
        r#"
        SELECT
            e.id, e.name, e.description, e.amount, e.date,
            e.category_id, e.sub_category_id, e.row_version,
            c.name AS category_name,
            s.name AS sub_category_name
        FROM expenses e
        JOIN categories c ON c.id = e.category_id
        JOIN sub_categories s ON s.id = e.sub_category_id
        ORDER BY e.date DESC, e.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?
    .iter()
    .map(expense_view_from_row)
    .collect::<Result<Vec<ExpenseView>, sqlx::Error>>()
    .map_err(StoreError::from)
}

pub async fn get_expense(pool: &Pool<Sqlite>, id: i64) -> StoreResult<ExpenseView> {
    let row = sqlx::query(
        r#"
        SELECT
            e.id, e.name, e.description, e.amount, e.date,
            e.category_id, e.sub_category_id, e.row_version,
            COALESCE(c.name, '') AS category_name,
            COALESCE(s.name, '') AS sub_category_name
        FROM expenses e
        LEFT JOIN categories c ON c.id = e.category_id
        LEFT JOIN sub_categories s ON s.id = e.sub_category_id
        WHERE e.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| StoreError::not_found("expense", id))?;

    Ok(expense_view_from_row(&row)?)
}

async fn find_expense<'e, E>(executor: E, id: i64) -> Result<Option<Expense>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        SELECT id, name, description, amount, date, category_id, sub_category_id, row_version
        FROM expenses
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .map(|row| expense_from_row(&row))
    .transpose()
}

pub async fn create_expense(pool: &Pool<Sqlite>, input: &ExpenseInput) -> StoreResult<Expense> {
    validate_expense(input)?;

    let mut tx = pool.begin().await?;
    check_references(&mut tx, input.category_id, input.sub_category_id).await?;

    let row = sqlx::query(
        r#"
        INSERT INTO expenses (name, description, amount, date, category_id, sub_category_id)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, name, description, amount, date, category_id, sub_category_id, row_version
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(amount_text(input.amount))
    .bind(input.date)
    .bind(input.category_id)
    .bind(input.sub_category_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| reference_violation(e, INVALID_SUB_CATEGORY))?;

    let expense = expense_from_row(&row)?;
    tx.commit().await?;

    tracing::info!(
        expense_id = expense.id,
        category_id = expense.category_id,
        sub_category_id = expense.sub_category_id,
        amount = %expense.amount,
        "expense created"
    );
    Ok(expense)
}

pub async fn update_expense(pool: &Pool<Sqlite>, id: i64, input: &ExpenseInput) -> StoreResult<()> {
    validate_expense(input)?;

    let mut tx = pool.begin().await?;

    let current = find_expense(&mut *tx, id)
        .await?
        .ok_or_else(|| StoreError::not_found("expense", id))?;

    check_references(&mut tx, input.category_id, input.sub_category_id).await?;

    let expected_version = input.row_version.unwrap_or(current.row_version);

    let result = sqlx::query(
        r#"
        UPDATE expenses
        SET name = ?, description = ?, amount = ?, date = ?,
            category_id = ?, sub_category_id = ?, row_version = row_version + 1
        WHERE id = ? AND row_version = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(amount_text(input.amount))
    .bind(input.date)
    .bind(input.category_id)
    .bind(input.sub_category_id)
    .bind(id)
    .bind(expected_version)
    .execute(&mut *tx)
    .await
    .map_err(|e| reference_violation(e, INVALID_SUB_CATEGORY))?;

    if result.rows_affected() == 0 {
        return Err(resolve_stale_update(&mut *tx, Table::Expenses, id).await);
    }

    tx.commit().await?;

    tracing::info!(expense_id = id, "expense updated");
    Ok(())
}

pub async fn delete_expense(pool: &Pool<Sqlite>, id: i64) -> StoreResult<()> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::not_found("expense", id));
    }

    tracing::info!(expense_id = id, "expense deleted");
    Ok(())
}
