//! Dashboard domain types.

use arabella_shared::{Money, MoneyError};
use serde::{Deserialize, Serialize};

/// Health classification of a runway figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunwayStatus {
    /// Six months of runway or more.
    Healthy,
    /// Less than six months of runway.
    Warning,
    /// Less than three months of runway.
    Critical,
}

impl RunwayStatus {
    /// Returns the status as reported on the API boundary.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "HEALTHY",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RunwayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the deterministic runway computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunwayMath {
    /// Liquid assets minus short-term liabilities.
    pub available_funds: Money,
    /// Average expenses over the recent months that had any.
    pub average_monthly_expenses: Money,
    /// Months of runway; the one sanctioned float in the system.
    pub runway_months: f64,
    /// Days of runway, floored at 30 days per month.
    pub runway_days: i64,
    /// Health classification.
    pub status: RunwayStatus,
    /// Advisory message; only WARNING and CRITICAL carry one.
    pub message: Option<String>,
}

/// Income and expense statistics for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    /// Calendar month (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Sum of non-reversed INCOME amounts in the month.
    pub income: Money,
    /// Sum of non-reversed EXPENSE amounts in the month.
    pub expenses: Money,
    /// Income minus expenses.
    pub net_cash_flow: Money,
    /// Count of non-reversed transactions in the month, any kind.
    pub transaction_count: u64,
}

impl MonthlyStats {
    /// Builds monthly statistics, deriving the net cash flow.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if income minus expenses leaves
    /// the storage range.
    pub fn new(
        month: u32,
        year: i32,
        income: Money,
        expenses: Money,
        transaction_count: u64,
    ) -> Result<Self, MoneyError> {
        Ok(Self {
            month,
            year,
            income,
            expenses,
            net_cash_flow: income.checked_sub(expenses)?,
            transaction_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runway_status_strings() {
        assert_eq!(RunwayStatus::Healthy.to_string(), "HEALTHY");
        assert_eq!(RunwayStatus::Warning.to_string(), "WARNING");
        assert_eq!(RunwayStatus::Critical.to_string(), "CRITICAL");
    }

    #[test]
    fn test_monthly_stats_net_cash_flow() {
        let stats = MonthlyStats::new(
            3,
            2026,
            Money::parse("2000").unwrap(),
            Money::parse("1500").unwrap(),
            7,
        )
        .unwrap();

        assert_eq!(stats.net_cash_flow, Money::parse("500").unwrap());
        assert_eq!(stats.transaction_count, 7);
    }

    #[test]
    fn test_monthly_stats_negative_net() {
        let stats = MonthlyStats::new(
            1,
            2026,
            Money::parse("100").unwrap(),
            Money::parse("400").unwrap(),
            2,
        )
        .unwrap();

        assert_eq!(stats.net_cash_flow, Money::parse("-300").unwrap());
    }
}
