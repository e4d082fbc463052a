//! Entry generation and balance rules for the posting engine.
//!
//! This service contains the double-entry core: which accounts receive
//! which sides for each transaction kind, the cached-balance deltas on
//! real accounts, and the fundamental invariant that debits equal
//! credits. It is stateless and free of database dependencies; the
//! posting engine in `arabella-db` drives it inside a unit of work.

use arabella_shared::Money;

use crate::catalog::{EntrySide, TransactionKind};

use super::error::{LedgerError, LedgerResult};
use super::types::{BalanceDelta, EntryDraft, NewTransaction, TransactionTotals};

/// Stateless double-entry rule service.
pub struct LedgerService;

impl LedgerService {
    /// Generates the balanced journal entry pair for a transaction.
    ///
    /// | kind     | DEBIT       | CREDIT      |
    /// |----------|-------------|-------------|
    /// | EXPENSE  | category    | from        |
    /// | INCOME   | from        | category    |
    /// | TRANSFER | to          | from        |
    ///
    /// Category accounts appear in entries for auditability but are
    /// never balance-updated; see [`Self::balance_deltas`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] if a conditionally required
    /// account is missing and [`LedgerError::UnsupportedKind`] for kinds
    /// without a posting rule. Both indicate the caller skipped
    /// [`validation::validate_new`](super::validation::validate_new).
    pub fn generate_entries(tx: &NewTransaction) -> LedgerResult<Vec<EntryDraft>> {
        let entries = match tx.kind {
            TransactionKind::Expense => {
                let category_id = tx.category_id.ok_or_else(|| {
                    LedgerError::Validation(
                        "category_id is required for EXPENSE transactions".to_string(),
                    )
                })?;
                vec![
                    EntryDraft {
                        account_id: category_id,
                        side: EntrySide::Debit,
                        amount: tx.amount,
                        entry_date: tx.transaction_date,
                        description: format!("Expense: {}", tx.description),
                    },
                    EntryDraft {
                        account_id: tx.account_from_id,
                        side: EntrySide::Credit,
                        amount: tx.amount,
                        entry_date: tx.transaction_date,
                        description: format!("Payment: {}", tx.description),
                    },
                ]
            }
            TransactionKind::Income => {
                let category_id = tx.category_id.ok_or_else(|| {
                    LedgerError::Validation(
                        "category_id is required for INCOME transactions".to_string(),
                    )
                })?;
                vec![
                    EntryDraft {
                        account_id: tx.account_from_id,
                        side: EntrySide::Debit,
                        amount: tx.amount,
                        entry_date: tx.transaction_date,
                        description: format!("Income: {}", tx.description),
                    },
                    EntryDraft {
                        account_id: category_id,
                        side: EntrySide::Credit,
                        amount: tx.amount,
                        entry_date: tx.transaction_date,
                        description: format!("Revenue: {}", tx.description),
                    },
                ]
            }
            TransactionKind::Transfer => {
                let account_to_id = tx.account_to_id.ok_or_else(|| {
                    LedgerError::Validation(
                        "account_to_id is required for TRANSFER transactions".to_string(),
                    )
                })?;
                vec![
                    EntryDraft {
                        account_id: account_to_id,
                        side: EntrySide::Debit,
                        amount: tx.amount,
                        entry_date: tx.transaction_date,
                        description: format!("Transfer in: {}", tx.description),
                    },
                    EntryDraft {
                        account_id: tx.account_from_id,
                        side: EntrySide::Credit,
                        amount: tx.amount,
                        entry_date: tx.transaction_date,
                        description: format!("Transfer out: {}", tx.description),
                    },
                ]
            }
            TransactionKind::DebtPayment => {
                return Err(LedgerError::UnsupportedKind(tx.kind));
            }
        };

        Ok(entries)
    }

    /// Derives the cached-balance deltas for the real accounts a
    /// transaction touches.
    ///
    /// Deltas are derived from the transaction kind and accounts, not
    /// from the generated entries, so nominal category accounts never
    /// appear here.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::generate_entries`].
    pub fn balance_deltas(tx: &NewTransaction) -> LedgerResult<Vec<BalanceDelta>> {
        let deltas = match tx.kind {
            TransactionKind::Expense => vec![BalanceDelta {
                account_id: tx.account_from_id,
                amount: tx.amount.neg(),
            }],
            TransactionKind::Income => vec![BalanceDelta {
                account_id: tx.account_from_id,
                amount: tx.amount,
            }],
            TransactionKind::Transfer => {
                let account_to_id = tx.account_to_id.ok_or_else(|| {
                    LedgerError::Validation(
                        "account_to_id is required for TRANSFER transactions".to_string(),
                    )
                })?;
                vec![
                    BalanceDelta {
                        account_id: tx.account_from_id,
                        amount: tx.amount.neg(),
                    },
                    BalanceDelta {
                        account_id: account_to_id,
                        amount: tx.amount,
                    },
                ]
            }
            TransactionKind::DebtPayment => {
                return Err(LedgerError::UnsupportedKind(tx.kind));
            }
        };

        Ok(deltas)
    }

    /// Asserts the balance invariant over a generated entry set:
    /// the debit amounts and credit amounts must sum to the same total.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BalanceViolation`] when the sums differ.
    /// That is an engine bug, never a caller mistake.
    pub fn check_balance(entries: &[EntryDraft]) -> LedgerResult<TransactionTotals> {
        let mut total_debit = Money::zero();
        let mut total_credit = Money::zero();

        for entry in entries {
            match entry.side {
                EntrySide::Debit => total_debit = total_debit.checked_add(entry.amount)?,
                EntrySide::Credit => total_credit = total_credit.checked_add(entry.amount)?,
            }
        }

        let totals = TransactionTotals::new(total_debit, total_credit);
        if !totals.is_balanced {
            return Err(LedgerError::BalanceViolation {
                debit: totals.total_debit,
                credit: totals.total_credit,
            });
        }

        Ok(totals)
    }

    /// Combines deltas targeting the same account into one signed
    /// amount, preserving first-seen account order. A TRANSFER whose
    /// source and destination coincide nets to a zero delta.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidMoney`] if the combined amount
    /// overflows.
    pub fn aggregate_deltas(deltas: &[BalanceDelta]) -> LedgerResult<Vec<BalanceDelta>> {
        let mut aggregated: Vec<BalanceDelta> = Vec::with_capacity(deltas.len());

        for delta in deltas {
            if let Some(existing) = aggregated
                .iter_mut()
                .find(|d| d.account_id == delta.account_id)
            {
                existing.amount = existing.amount.checked_add(delta.amount)?;
            } else {
                aggregated.push(delta.clone());
            }
        }

        Ok(aggregated)
    }
}
