pub mod category;
pub mod common;
pub mod expense;

pub use category::{Category, CategoryInfo, CATEGORIES};
pub use common::{Amounted, Displayable};
pub use expense::{parse_date, Expense, ExpensePatch, NewExpense};
