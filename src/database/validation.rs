//! Structural checks run before any query touches the database.
//!
//! Every failing field is collected so the caller sees all problems in one
//! `StoreError::Validation` message.

use rust_decimal::Decimal;

use crate::database::models::{CategoryInput, ExpenseInput, SubCategoryInput};
use crate::error::{StoreError, StoreResult};

pub const CATEGORY_NAME_MAX: usize = 100;
pub const CATEGORY_DESCRIPTION_MAX: usize = 500;
pub const SUB_CATEGORY_NAME_MAX: usize = 100;
pub const SUB_CATEGORY_DESCRIPTION_MAX: usize = 500;
pub const EXPENSE_NAME_MAX: usize = 200;
pub const EXPENSE_DESCRIPTION_MAX: usize = 1000;

/// Amounts are stored rounded to two decimal places.
pub const AMOUNT_SCALE: u32 = 2;

/// Smallest amount accepted: one cent.
pub fn amount_min() -> Decimal {
    Decimal::new(1, AMOUNT_SCALE)
}

#[derive(Default)]
struct FieldErrors(Vec<String>);

impl FieldErrors {
    fn text(&mut self, field: &str, value: &str, max: usize) {
        if value.trim().is_empty() {
            self.0.push(format!("The {} field is required.", field));
        } else if value.chars().count() > max {
            self.0.push(format!(
                "The field {} must be a string with a maximum length of {}.",
                field, max
            ));
        }
    }

    fn reference(&mut self, field: &str, id: i64) {
        if id <= 0 {
            self.0.push(format!("The {} field is required.", field));
        }
    }

    fn amount(&mut self, amount: Decimal) {
        if amount < amount_min() {
            self.0.push("Amount must be greater than 0".to_string());
        }
    }

    fn finish(self) -> StoreResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(self.0.join(" ")))
        }
    }
}

pub fn validate_category(input: &CategoryInput) -> StoreResult<()> {
    let mut errors = FieldErrors::default();
    errors.text("Name", &input.name, CATEGORY_NAME_MAX);
    errors.text("Description", &input.description, CATEGORY_DESCRIPTION_MAX);
    errors.finish()
}

pub fn validate_sub_category(input: &SubCategoryInput) -> StoreResult<()> {
    let mut errors = FieldErrors::default();
    errors.text("Name", &input.name, SUB_CATEGORY_NAME_MAX);
    errors.text("Description", &input.description, SUB_CATEGORY_DESCRIPTION_MAX);
    errors.finish()
}

pub fn validate_expense(input: &ExpenseInput) -> StoreResult<()> {
    let mut errors = FieldErrors::default();
    errors.text("Name", &input.name, EXPENSE_NAME_MAX);
    errors.text("Description", &input.description, EXPENSE_DESCRIPTION_MAX);
    errors.amount(input.amount);
    errors.reference("CategoryId", input.category_id);
    errors.reference("SubCategoryId", input.sub_category_id);
    errors.finish()
}
