#![doc(test(attr(deny(warnings))))]

//! Expense Core records everyday expenses and turns them into period
//! analytics: totals, per-category breakdowns, period-over-period changes
//! and chart-ready series.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod extraction;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use errors::ExpenseError;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
