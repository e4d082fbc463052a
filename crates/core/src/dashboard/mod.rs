//! Liquidity and runway derivations.
//!
//! Pure computations over balances already aggregated by the query
//! layer. The only floating-point value in the system (runway months)
//! is produced here.

pub mod runway;
pub mod types;

pub use runway::compute_runway;
pub use types::{MonthlyStats, RunwayMath, RunwayStatus};
