//! Ledger domain types for posting, reversal, and updates.

use arabella_shared::{Money, MoneyError};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::{EntrySide, TransactionKind};

/// Input for posting a new transaction. The id is assigned inside the
/// posting unit of work.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    /// Owner of the transaction and every referenced account.
    pub owner_id: Uuid,
    /// Transaction kind; determines the entry-generation rule.
    pub kind: TransactionKind,
    /// Free-text description. Must be non-empty.
    pub description: String,
    /// Transaction amount. Strictly positive; direction is carried by
    /// the kind, never by the sign.
    pub amount: Money,
    /// Source account. Always required.
    pub account_from_id: Uuid,
    /// Destination account. Required iff kind is TRANSFER.
    pub account_to_id: Option<Uuid>,
    /// Category account. Required iff kind is INCOME or EXPENSE.
    pub category_id: Option<Uuid>,
    /// Business date of the transaction.
    pub transaction_date: DateTime<Utc>,
    /// Optional free-form notes.
    pub notes: Option<String>,
    /// Exchange rate to the base currency. Defaults to 1 when absent or
    /// zero.
    pub exchange_rate: Option<Money>,
}

impl NewTransaction {
    /// Returns the exchange rate with the default applied: a missing or
    /// zero rate is coerced to 1.
    #[must_use]
    pub fn effective_rate(&self) -> Money {
        match self.exchange_rate {
            Some(rate) if !rate.is_zero() => rate,
            _ => Money::one(),
        }
    }

    /// Returns `amount x effective rate`, the denormalized base-currency
    /// amount stored on the transaction row.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::Overflow`] if the product leaves the
    /// storage range.
    pub fn amount_in_base(&self) -> Result<Money, MoneyError> {
        self.amount.checked_mul(self.effective_rate())
    }
}

/// A journal entry about to be persisted. The transaction id is attached
/// at insertion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    /// Account the movement is registered against.
    pub account_id: Uuid,
    /// Debit or credit.
    pub side: EntrySide,
    /// Entry amount. Always positive; the side carries the sign.
    pub amount: Money,
    /// Business date of the entry.
    pub entry_date: DateTime<Utc>,
    /// Entry description.
    pub description: String,
}

/// A journal entry already on the ledger, as input to reversal.
#[derive(Debug, Clone)]
pub struct PostedEntry {
    /// Account the movement was registered against.
    pub account_id: Uuid,
    /// Debit or credit.
    pub side: EntrySide,
    /// Entry amount.
    pub amount: Money,
    /// Original entry description.
    pub description: String,
}

/// A signed balance change to apply to one real account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceDelta {
    /// The account whose cached balance changes.
    pub account_id: Uuid,
    /// Signed amount to add to the cached balance.
    pub amount: Money,
}

/// Debit/credit totals over a set of journal entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTotals {
    /// Sum of debit amounts.
    pub total_debit: Money,
    /// Sum of credit amounts.
    pub total_credit: Money,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

impl TransactionTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(total_debit: Money, total_credit: Money) -> Self {
        Self {
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        }
    }

    /// Returns debits minus credits as a raw decimal.
    #[must_use]
    pub fn difference(&self) -> rust_decimal::Decimal {
        self.total_debit.amount() - self.total_credit.amount()
    }
}

/// Fields a caller may attempt to change on an existing transaction.
///
/// Only description, notes, the reconciled flag, and the date are
/// mutable. The frozen fields are modeled here so the coordinator can
/// refuse the attempt with `ImmutableField` instead of silently
/// dropping it.
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    /// New description.
    pub description: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New reconciled flag.
    pub reconciled: Option<bool>,
    /// New business date.
    pub transaction_date: Option<DateTime<Utc>>,

    /// Frozen. Refused when present.
    pub amount: Option<Money>,
    /// Frozen. Refused when present.
    pub kind: Option<TransactionKind>,
    /// Frozen. Refused when present.
    pub account_from_id: Option<Uuid>,
    /// Frozen. Refused when present.
    pub account_to_id: Option<Uuid>,
    /// Frozen. Refused when present.
    pub category_id: Option<Uuid>,
    /// Frozen. Refused when present.
    pub exchange_rate: Option<Money>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_transaction() -> NewTransaction {
        NewTransaction {
            owner_id: Uuid::new_v4(),
            kind: TransactionKind::Expense,
            description: "Groceries".to_string(),
            amount: Money::parse("150.0000").unwrap(),
            account_from_id: Uuid::new_v4(),
            account_to_id: None,
            category_id: Some(Uuid::new_v4()),
            transaction_date: Utc::now(),
            notes: None,
            exchange_rate: None,
        }
    }

    #[test]
    fn test_effective_rate_defaults_to_one() {
        let tx = base_transaction();
        assert_eq!(tx.effective_rate(), Money::one());
    }

    #[test]
    fn test_effective_rate_coerces_zero_to_one() {
        let mut tx = base_transaction();
        tx.exchange_rate = Some(Money::zero());
        assert_eq!(tx.effective_rate(), Money::one());
    }

    #[test]
    fn test_effective_rate_keeps_explicit_rate() {
        let mut tx = base_transaction();
        tx.exchange_rate = Some(Money::parse("1.5").unwrap());
        assert_eq!(tx.effective_rate(), Money::parse("1.5").unwrap());
    }

    #[test]
    fn test_amount_in_base() {
        let mut tx = base_transaction();
        tx.exchange_rate = Some(Money::parse("1.5").unwrap());
        assert_eq!(
            tx.amount_in_base().unwrap(),
            Money::parse("225.0000").unwrap()
        );

        tx.exchange_rate = None;
        assert_eq!(tx.amount_in_base().unwrap(), tx.amount);
    }

    #[test]
    fn test_totals_balanced() {
        let totals = TransactionTotals::new(
            Money::parse("150").unwrap(),
            Money::parse("150").unwrap(),
        );
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), dec!(0));
    }

    #[test]
    fn test_totals_unbalanced() {
        let totals = TransactionTotals::new(
            Money::parse("150").unwrap(),
            Money::parse("100").unwrap(),
        );
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(50.0000));
    }
}
