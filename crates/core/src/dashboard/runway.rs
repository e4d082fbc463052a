//! Deterministic runway computation.
//!
//! Runway answers "how many months of average recent expenses do the
//! liquid assets cover, net of short-term liabilities". The average is
//! taken over the current month and the two preceding months, counting
//! only months that recorded expenses.

use arabella_shared::{Money, MoneyError};

use super::types::{RunwayMath, RunwayStatus};

/// Months below which runway is CRITICAL.
pub const CRITICAL_THRESHOLD_MONTHS: f64 = 3.0;
/// Months below which runway is WARNING.
pub const WARNING_THRESHOLD_MONTHS: f64 = 6.0;
/// Fixed month length used to derive runway days.
const DAYS_PER_MONTH: f64 = 30.0;

const CRITICAL_MESSAGE: &str =
    "Runway is under 3 months. Increase income or reduce expenses immediately.";
const WARNING_MESSAGE: &str =
    "Runway is under 6 months. Consider building a larger emergency fund.";

/// Computes the runway figure from available funds and the expense
/// totals of the last three calendar months (most recent first or last,
/// order does not matter).
///
/// Months without expenses are excluded from the average. With no
/// expense data at all the runway is reported as zero and HEALTHY,
/// with no advisory message and no division performed.
///
/// # Errors
///
/// Returns [`MoneyError::Overflow`] if the expense totals overflow while
/// summing.
#[allow(clippy::cast_possible_truncation)]
pub fn compute_runway(
    available_funds: Money,
    recent_monthly_expenses: &[Money],
) -> Result<RunwayMath, MoneyError> {
    let mut total_expenses = Money::zero();
    let mut months_with_data: u32 = 0;

    for expenses in recent_monthly_expenses {
        if !expenses.is_zero() {
            total_expenses = total_expenses.checked_add(*expenses)?;
            months_with_data += 1;
        }
    }

    if months_with_data == 0 || total_expenses.is_zero() {
        return Ok(zero_runway(available_funds));
    }

    // total >= 0.0001 * months_with_data, so the average never rounds
    // to zero and the ratio below cannot divide by zero.
    let average = total_expenses.checked_div_scalar(months_with_data)?;
    let runway_months = available_funds.ratio(average)?;
    let runway_days = (runway_months * DAYS_PER_MONTH).floor() as i64;

    let (status, message) = if runway_months < CRITICAL_THRESHOLD_MONTHS {
        (RunwayStatus::Critical, Some(CRITICAL_MESSAGE.to_string()))
    } else if runway_months < WARNING_THRESHOLD_MONTHS {
        (RunwayStatus::Warning, Some(WARNING_MESSAGE.to_string()))
    } else {
        (RunwayStatus::Healthy, None)
    };

    Ok(RunwayMath {
        available_funds,
        average_monthly_expenses: average,
        runway_months,
        runway_days,
        status,
        message,
    })
}

fn zero_runway(available_funds: Money) -> RunwayMath {
    RunwayMath {
        available_funds,
        average_monthly_expenses: Money::zero(),
        runway_months: 0.0,
        runway_days: 0,
        status: RunwayStatus::Healthy,
        message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    #[test]
    fn test_critical_runway() {
        // liquid 800, no liabilities, expenses 500/400/300 over three months.
        let result = compute_runway(
            money("800"),
            &[money("500"), money("400"), money("300")],
        )
        .unwrap();

        assert_eq!(result.available_funds, money("800"));
        assert_eq!(result.average_monthly_expenses, money("400"));
        assert!((result.runway_months - 2.0).abs() < 1e-9);
        assert_eq!(result.runway_days, 60);
        assert_eq!(result.status, RunwayStatus::Critical);
        assert!(result.message.is_some());
    }

    #[test]
    fn test_no_expense_data_is_healthy_without_division() {
        let result = compute_runway(money("800"), &[Money::zero(); 3]).unwrap();

        assert_eq!(result.runway_months, 0.0);
        assert_eq!(result.runway_days, 0);
        assert_eq!(result.status, RunwayStatus::Healthy);
        assert!(result.message.is_none());
        assert!(result.average_monthly_expenses.is_zero());
    }

    #[test]
    fn test_empty_slice_is_healthy() {
        let result = compute_runway(money("800"), &[]).unwrap();
        assert_eq!(result.status, RunwayStatus::Healthy);
        assert_eq!(result.runway_days, 0);
    }

    #[test]
    fn test_zero_expense_months_excluded_from_average() {
        // Only one month has data; average is that month, not a third of it.
        let result = compute_runway(
            money("1000"),
            &[money("500"), Money::zero(), Money::zero()],
        )
        .unwrap();

        assert_eq!(result.average_monthly_expenses, money("500"));
        assert!((result.runway_months - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_warning_band() {
        // 2000 / 500 = 4 months: not critical, below six.
        let result = compute_runway(money("2000"), &[money("500")]).unwrap();
        assert_eq!(result.status, RunwayStatus::Warning);
        assert_eq!(result.runway_days, 120);
        assert!(result.message.is_some());
    }

    #[test]
    fn test_exactly_three_months_is_warning() {
        let result = compute_runway(money("1500"), &[money("500")]).unwrap();
        assert!((result.runway_months - 3.0).abs() < 1e-9);
        assert_eq!(result.status, RunwayStatus::Warning);
    }

    #[test]
    fn test_exactly_six_months_is_healthy() {
        let result = compute_runway(money("3000"), &[money("500")]).unwrap();
        assert!((result.runway_months - 6.0).abs() < 1e-9);
        assert_eq!(result.status, RunwayStatus::Healthy);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_negative_available_funds_is_critical() {
        let result = compute_runway(money("-100"), &[money("500")]).unwrap();
        assert!(result.runway_months < 0.0);
        assert_eq!(result.status, RunwayStatus::Critical);
    }

    #[test]
    fn test_fractional_months_floor_days() {
        // 1000 / 400 = 2.5 months -> 75 days.
        let result = compute_runway(money("1000"), &[money("400")]).unwrap();
        assert!((result.runway_months - 2.5).abs() < 1e-9);
        assert_eq!(result.runway_days, 75);
    }

    #[test]
    fn test_smallest_representable_expense_still_computes() {
        let result = compute_runway(
            money("800"),
            &[money("0.0001"), Money::zero(), Money::zero()],
        )
        .unwrap();
        assert_eq!(result.average_monthly_expenses, money("0.0001"));
        assert_eq!(result.status, RunwayStatus::Healthy);
    }
}
