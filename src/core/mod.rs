pub mod analytics;
pub mod charts;
pub mod format;
pub mod grouping;
pub mod period;
pub mod series;
pub mod services;
pub mod time;
pub mod utils;

pub use analytics::{percent_change, AnalyticsEngine, AnalyticsSnapshot, CategoryChange, CategoryStat};
pub use period::{PeriodKind, PeriodRange};
