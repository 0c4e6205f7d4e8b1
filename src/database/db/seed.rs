use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::{Pool, Sqlite};

use crate::error::{StoreError, StoreResult};

struct SeedSubCategory {
    name: &'static str,
    description: &'static str,
    expenses: &'static [SeedExpense],
}

struct SeedExpense {
    name: &'static str,
    description: &'static str,
    cents: i64,
    date: (i32, u32, u32),
}

const SEED: &[(&str, &str, &[SeedSubCategory])] = &[
    (
        "Food & Dining",
        "Restaurants, groceries, and food-related expenses",
        &[
            SeedSubCategory {
                name: "Restaurants",
                description: "Dining out at restaurants",
                expenses: &[SeedExpense {
                    name: "Lunch at Pizza Place",
                    description: "Team lunch meeting",
                    cents: 4550,
                    date: (2024, 1, 15),
                }],
            },
            SeedSubCategory {
                name: "Groceries",
                description: "Food shopping and groceries",
                expenses: &[SeedExpense {
                    name: "Weekly Groceries",
                    description: "Grocery shopping for the week",
                    cents: 12075,
                    date: (2024, 1, 14),
                }],
            },
        ],
    ),
    (
        "Transportation",
        "Car, gas, public transport, and travel expenses",
        &[SeedSubCategory {
            name: "Gas",
            description: "Fuel for vehicles",
            expenses: &[SeedExpense {
                name: "Gas Fill-up",
                description: "Full tank of gas",
                cents: 6500,
                date: (2024, 1, 13),
            }],
        }],
    ),
    (
        "Entertainment",
        "Movies, games, and recreational activities",
        &[SeedSubCategory {
            name: "Movies",
            description: "Cinema and movie tickets",
            expenses: &[],
        }],
    ),
];

fn seed_date((year, month, day): (i32, u32, u32)) -> StoreResult<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| StoreError::Validation(format!("Invalid seed date {:04}-{:02}-{:02}", year, month, day)))
}

/// Fills an empty database with the starter categories, sub-categories and
/// expenses. Safe to call on every start: it does nothing once any category
/// exists. Returns whether rows were inserted.
pub async fn seed_database(pool: &Pool<Sqlite>) -> StoreResult<bool> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        tracing::debug!(categories = existing, "database already seeded");
        return Ok(false);
    }

    let (mut categories, mut sub_categories, mut expenses) = (0, 0, 0);

    for &(name, description, subs) in SEED {
        let category_id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, description) VALUES (?, ?) RETURNING id",
        )
        .bind(name)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;
        categories += 1;

        for sub in subs {
            let sub_category_id: i64 = sqlx::query_scalar(
                "INSERT INTO sub_categories (name, description, category_id) VALUES (?, ?, ?) RETURNING id",
            )
            .bind(sub.name)
            .bind(sub.description)
            .bind(category_id)
            .fetch_one(&mut *tx)
            .await?;
            sub_categories += 1;

            for expense in sub.expenses {
                sqlx::query(
                    r#"
                    INSERT INTO expenses (name, description, amount, date, category_id, sub_category_id)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(expense.name)
                .bind(expense.description)
                .bind(Decimal::new(expense.cents, 2).to_string())
                .bind(seed_date(expense.date)?)
                .bind(category_id)
                .bind(sub_category_id)
                .execute(&mut *tx)
                .await?;
                expenses += 1;
            }
        }
    }

    tx.commit().await?;

    tracing::info!(categories, sub_categories, expenses, "database seeded");
    Ok(true)
}
