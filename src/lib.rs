//! Expense tracking backend.
//!
//! Three related tables (categories, sub-categories, expenses) behind
//! validated CRUD operations, an orphan diagnostics report and a thin axum
//! HTTP layer.

pub mod backend;
pub mod config;
pub mod database;
pub mod error;

pub use error::{StoreError, StoreResult};
