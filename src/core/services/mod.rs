pub mod analytics_service;
pub mod expense_service;

pub use analytics_service::{AnalyticsReport, AnalyticsService};
pub use expense_service::{ExpenseService, MonthView};

use crate::errors::ExpenseError;

pub type ServiceResult<T> = Result<T, ExpenseError>;
