pub mod category;
pub mod sub_category;
pub mod expense;
pub mod diagnostics;

pub use category::{Category, CategoryInput};
pub use sub_category::{SubCategory, SubCategoryInput, SubCategoryView};
pub use expense::{Expense, ExpenseInput, ExpenseView};
pub use diagnostics::{Diagnostics, OrphanedExpense};
