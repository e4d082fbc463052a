//! Compensating-entry rules for reversal.
//!
//! Reversal never deletes ledger rows. It emits a second, independent
//! entry set with the sides swapped and applies the inverse cached-balance
//! deltas, leaving the original entries untouched for audit.

use arabella_shared::Money;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::catalog::TransactionKind;

use super::error::{LedgerError, LedgerResult};
use super::types::{BalanceDelta, EntryDraft, PostedEntry};

/// Description prefix stamped on every compensating entry.
pub const REVERSAL_PREFIX: &str = "REVERSAL: ";

/// Stateless service for building compensating entries.
pub struct ReversalService;

impl ReversalService {
    /// Builds the compensating entries for a set of original entries:
    /// same account, same amount, side swapped, description prefixed
    /// with `REVERSAL:`, dated at the time of reversal.
    #[must_use]
    pub fn reversing_entries(
        original: &[PostedEntry],
        reversed_at: DateTime<Utc>,
    ) -> Vec<EntryDraft> {
        original
            .iter()
            .map(|entry| EntryDraft {
                account_id: entry.account_id,
                side: entry.side.swapped(),
                amount: entry.amount,
                entry_date: reversed_at,
                description: format!("{REVERSAL_PREFIX}{}", entry.description),
            })
            .collect()
    }

    /// Derives the inverse cached-balance deltas for a reversal.
    ///
    /// Derived from the original transaction's kind and accounts, not
    /// from its entries, so nominal category accounts stay untouched:
    ///
    /// - EXPENSE: `from += amount`
    /// - INCOME: `from -= amount`
    /// - TRANSFER: `from += amount`, `to -= amount`
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] if a TRANSFER is missing its
    /// destination and [`LedgerError::UnsupportedKind`] for kinds
    /// without a posting rule.
    pub fn inverse_deltas(
        kind: TransactionKind,
        account_from_id: Uuid,
        account_to_id: Option<Uuid>,
        amount: Money,
    ) -> LedgerResult<Vec<BalanceDelta>> {
        let deltas = match kind {
            TransactionKind::Expense => vec![BalanceDelta {
                account_id: account_from_id,
                amount,
            }],
            TransactionKind::Income => vec![BalanceDelta {
                account_id: account_from_id,
                amount: amount.neg(),
            }],
            TransactionKind::Transfer => {
                let account_to_id = account_to_id.ok_or_else(|| {
                    LedgerError::Validation(
                        "account_to_id is required for TRANSFER transactions".to_string(),
                    )
                })?;
                vec![
                    BalanceDelta {
                        account_id: account_from_id,
                        amount,
                    },
                    BalanceDelta {
                        account_id: account_to_id,
                        amount: amount.neg(),
                    },
                ]
            }
            TransactionKind::DebtPayment => {
                return Err(LedgerError::UnsupportedKind(kind));
            }
        };

        Ok(deltas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntrySide;
    use crate::ledger::service::LedgerService;
    use crate::ledger::types::NewTransaction;
    use proptest::prelude::*;

    fn posted_pair(amount: &str) -> Vec<PostedEntry> {
        let money = Money::parse(amount).unwrap();
        vec![
            PostedEntry {
                account_id: Uuid::new_v4(),
                side: EntrySide::Debit,
                amount: money,
                description: "Expense: Groceries".to_string(),
            },
            PostedEntry {
                account_id: Uuid::new_v4(),
                side: EntrySide::Credit,
                amount: money,
                description: "Payment: Groceries".to_string(),
            },
        ]
    }

    #[test]
    fn test_reversing_entries_swap_sides() {
        let original = posted_pair("150.0000");
        let now = Utc::now();
        let reversed = ReversalService::reversing_entries(&original, now);

        assert_eq!(reversed.len(), 2);
        assert_eq!(reversed[0].side, EntrySide::Credit);
        assert_eq!(reversed[1].side, EntrySide::Debit);
        assert!(reversed.iter().all(|e| e.entry_date == now));
    }

    #[test]
    fn test_reversing_entries_preserve_account_and_amount() {
        let original = posted_pair("150.0000");
        let reversed = ReversalService::reversing_entries(&original, Utc::now());

        for (orig, rev) in original.iter().zip(&reversed) {
            assert_eq!(orig.account_id, rev.account_id);
            assert_eq!(orig.amount, rev.amount);
        }
    }

    #[test]
    fn test_reversing_entries_prefix_description() {
        let original = posted_pair("150.0000");
        let reversed = ReversalService::reversing_entries(&original, Utc::now());

        assert_eq!(reversed[0].description, "REVERSAL: Expense: Groceries");
        assert_eq!(reversed[1].description, "REVERSAL: Payment: Groceries");
    }

    #[test]
    fn test_reversing_entries_still_balance() {
        let original = posted_pair("150.0000");
        let reversed = ReversalService::reversing_entries(&original, Utc::now());
        assert!(LedgerService::check_balance(&reversed).is_ok());
    }

    #[test]
    fn test_inverse_deltas_expense() {
        let from = Uuid::new_v4();
        let amount = Money::parse("150.0000").unwrap();
        let deltas =
            ReversalService::inverse_deltas(TransactionKind::Expense, from, None, amount).unwrap();

        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].account_id, from);
        assert_eq!(deltas[0].amount, amount);
    }

    #[test]
    fn test_inverse_deltas_income() {
        let from = Uuid::new_v4();
        let amount = Money::parse("2000.0000").unwrap();
        let deltas =
            ReversalService::inverse_deltas(TransactionKind::Income, from, None, amount).unwrap();

        assert_eq!(deltas[0].amount, amount.neg());
    }

    #[test]
    fn test_inverse_deltas_transfer() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let amount = Money::parse("500.0000").unwrap();
        let deltas =
            ReversalService::inverse_deltas(TransactionKind::Transfer, from, Some(to), amount)
                .unwrap();

        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].account_id, from);
        assert_eq!(deltas[0].amount, amount);
        assert_eq!(deltas[1].account_id, to);
        assert_eq!(deltas[1].amount, amount.neg());
    }

    #[test]
    fn test_inverse_deltas_transfer_missing_destination() {
        let result = ReversalService::inverse_deltas(
            TransactionKind::Transfer,
            Uuid::new_v4(),
            None,
            Money::parse("1").unwrap(),
        );
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_inverse_deltas_self_transfer_nets_to_zero() {
        let account = Uuid::new_v4();
        let amount = Money::parse("500.0000").unwrap();
        let deltas = ReversalService::inverse_deltas(
            TransactionKind::Transfer,
            account,
            Some(account),
            amount,
        )
        .unwrap();

        let aggregated = LedgerService::aggregate_deltas(&deltas).unwrap();
        assert_eq!(aggregated.len(), 1);
        assert!(aggregated[0].amount.is_zero());
    }

    proptest! {
        /// Posting then reversing leaves every real balance at its
        /// pre-posting value: original and inverse deltas cancel per
        /// account.
        #[test]
        fn prop_inverse_deltas_cancel_original(
            cents in 1i64..1_000_000_000_000i64,
            kind_index in 0usize..3,
        ) {
            let kind = [
                TransactionKind::Income,
                TransactionKind::Expense,
                TransactionKind::Transfer,
            ][kind_index];

            let amount = Money::new(rust_decimal::Decimal::new(cents, 2)).unwrap();
            let needs_category =
                matches!(kind, TransactionKind::Income | TransactionKind::Expense);
            let tx = NewTransaction {
                owner_id: Uuid::new_v4(),
                kind,
                description: "Round trip".to_string(),
                amount,
                account_from_id: Uuid::new_v4(),
                account_to_id: matches!(kind, TransactionKind::Transfer).then(Uuid::new_v4),
                category_id: needs_category.then(Uuid::new_v4),
                transaction_date: Utc::now(),
                notes: None,
                exchange_rate: None,
            };

            let forward = LedgerService::balance_deltas(&tx).unwrap();
            let inverse = ReversalService::inverse_deltas(
                tx.kind,
                tx.account_from_id,
                tx.account_to_id,
                tx.amount,
            )
            .unwrap();

            let mut combined = forward;
            combined.extend(inverse);
            let aggregated = LedgerService::aggregate_deltas(&combined).unwrap();
            for delta in aggregated {
                prop_assert!(delta.amount.is_zero());
            }
        }
    }
}
