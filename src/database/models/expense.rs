use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// amount is stored as TEXT, so these are decoded by hand in the queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub category_id: i64,
    pub sub_category_id: i64,
    pub row_version: i64,
}

/// An expense joined with its category and sub-category names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDateTime,
    pub category_id: i64,
    pub sub_category_id: i64,
    pub category_name: String,
    pub sub_category_name: String,
    pub row_version: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub category_id: i64,
    #[serde(default)]
    pub sub_category_id: i64,
    #[serde(default)]
    pub row_version: Option<i64>,
}

impl ExpenseInput {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        date: NaiveDateTime,
        category_id: i64,
        sub_category_id: i64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            amount,
            date,
            category_id,
            sub_category_id,
            row_version: None,
        }
    }

    pub fn with_row_version(mut self, row_version: i64) -> Self {
        self.row_version = Some(row_version);
        self
    }
}

/// Expense dates arrive either as a plain timestamp (`2024-01-14T00:00:00`)
/// or as RFC 3339 with an offset (`2024-01-14T00:00:00.000Z`). Offset forms
/// are kept as their UTC wall-clock time.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        match raw.parse::<NaiveDateTime>() {
            Ok(naive) => Ok(naive),
            Err(_) => DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_utc()),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(|e| de::Error::custom(format!("invalid date `{}`: {}", raw, e)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;

    fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn plain_and_utc_dates_parse_to_the_same_time() {
        assert_eq!(timestamp::parse("2024-01-14T00:00:00").unwrap(), midnight(2024, 1, 14));
        assert_eq!(timestamp::parse("2024-01-14T00:00:00.000Z").unwrap(), midnight(2024, 1, 14));
        assert_eq!(timestamp::parse("2024-01-14T02:00:00+02:00").unwrap(), midnight(2024, 1, 14));
        assert!(timestamp::parse("14/01/2024").is_err());
    }

    #[test]
    fn input_accepts_browser_serialized_dates() {
        let input: ExpenseInput = serde_json::from_value(json!({
            "name": "Weekly Groceries",
            "description": "Grocery shopping for the week",
            "amount": 120.75,
            "date": "2024-01-14T00:00:00.000Z",
            "categoryId": 1,
            "subCategoryId": 2
        }))
        .unwrap();
        assert_eq!(input.date, midnight(2024, 1, 14));
        assert_eq!(input.row_version, None);

        let err = serde_json::from_value::<ExpenseInput>(json!({ "name": "x", "date": "yesterday" }))
            .unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }
}
