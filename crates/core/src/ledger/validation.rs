//! Pre-validation of transactions before any side effect.
//!
//! These checks run before the posting engine touches the database; a
//! failure here means no unit of work was ever opened.

use crate::catalog::TransactionKind;

use super::error::{LedgerError, LedgerResult};
use super::types::{NewTransaction, TransactionUpdate};

/// Validates a transaction against the posting preconditions, reporting
/// the first violated rule.
///
/// # Errors
///
/// Returns [`LedgerError::Validation`] on the first violated rule and
/// [`LedgerError::UnsupportedKind`] for kinds without a posting rule.
pub fn validate_new(tx: &NewTransaction) -> LedgerResult<()> {
    if !tx.amount.is_positive() {
        return Err(LedgerError::Validation(format!(
            "amount must be positive, got: {}",
            tx.amount
        )));
    }

    match tx.kind {
        TransactionKind::Transfer => {
            if tx.account_to_id.is_none() {
                return Err(LedgerError::Validation(
                    "account_to_id is required for TRANSFER transactions".to_string(),
                ));
            }
            if tx.category_id.is_some() {
                return Err(LedgerError::Validation(
                    "category_id must not be set for TRANSFER transactions".to_string(),
                ));
            }
        }
        TransactionKind::Income | TransactionKind::Expense => {
            if tx.category_id.is_none() {
                return Err(LedgerError::Validation(format!(
                    "category_id is required for {} transactions",
                    tx.kind
                )));
            }
            if tx.account_to_id.is_some() {
                return Err(LedgerError::Validation(format!(
                    "account_to_id must not be set for {} transactions",
                    tx.kind
                )));
            }
        }
        TransactionKind::DebtPayment => {
            return Err(LedgerError::UnsupportedKind(tx.kind));
        }
    }

    if tx.description.trim().is_empty() {
        return Err(LedgerError::Validation(
            "description is required".to_string(),
        ));
    }

    if let Some(rate) = tx.exchange_rate {
        // A zero rate is coerced to 1 by `effective_rate`; only negative
        // rates are rejected.
        if rate.is_negative() {
            return Err(LedgerError::Validation(format!(
                "exchange_rate must be positive, got: {rate}"
            )));
        }
    }

    Ok(())
}

/// Refuses updates that touch attributes frozen at posting time.
///
/// Only description, notes, the reconciled flag, and the business date
/// survive posting as mutable.
///
/// # Errors
///
/// Returns [`LedgerError::ImmutableField`] naming the first frozen field
/// the update attempts to change.
pub fn validate_update(update: &TransactionUpdate) -> LedgerResult<()> {
    if update.amount.is_some() {
        return Err(LedgerError::ImmutableField("amount"));
    }
    if update.kind.is_some() {
        return Err(LedgerError::ImmutableField("kind"));
    }
    if update.account_from_id.is_some() {
        return Err(LedgerError::ImmutableField("account_from_id"));
    }
    if update.account_to_id.is_some() {
        return Err(LedgerError::ImmutableField("account_to_id"));
    }
    if update.category_id.is_some() {
        return Err(LedgerError::ImmutableField("category_id"));
    }
    if update.exchange_rate.is_some() {
        return Err(LedgerError::ImmutableField("exchange_rate"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arabella_shared::Money;
    use chrono::Utc;
    use uuid::Uuid;

    fn expense() -> NewTransaction {
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

    fn transfer() -> NewTransaction {
        NewTransaction {
            kind: TransactionKind::Transfer,
            account_to_id: Some(Uuid::new_v4()),
            category_id: None,
            ..expense()
        }
    }

    #[test]
    fn test_valid_expense_passes() {
        assert!(validate_new(&expense()).is_ok());
    }

    #[test]
    fn test_valid_transfer_passes() {
        assert!(validate_new(&transfer()).is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut tx = expense();
        tx.amount = Money::zero();
        assert!(matches!(
            validate_new(&tx),
            Err(LedgerError::Validation(msg)) if msg.contains("amount")
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut tx = expense();
        tx.amount = Money::parse("-10").unwrap();
        assert!(matches!(validate_new(&tx), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_expense_without_category_rejected() {
        let mut tx = expense();
        tx.category_id = None;
        assert!(matches!(
            validate_new(&tx),
            Err(LedgerError::Validation(msg)) if msg.contains("category_id")
        ));
    }

    #[test]
    fn test_income_with_account_to_rejected() {
        let mut tx = expense();
        tx.kind = TransactionKind::Income;
        tx.account_to_id = Some(Uuid::new_v4());
        assert!(matches!(
            validate_new(&tx),
            Err(LedgerError::Validation(msg)) if msg.contains("account_to_id")
        ));
    }

    #[test]
    fn test_transfer_without_destination_rejected() {
        let mut tx = transfer();
        tx.account_to_id = None;
        assert!(matches!(
            validate_new(&tx),
            Err(LedgerError::Validation(msg)) if msg.contains("account_to_id")
        ));
    }

    #[test]
    fn test_transfer_with_category_rejected() {
        let mut tx = transfer();
        tx.category_id = Some(Uuid::new_v4());
        assert!(matches!(
            validate_new(&tx),
            Err(LedgerError::Validation(msg)) if msg.contains("category_id")
        ));
    }

    #[test]
    fn test_transfer_to_same_account_permitted() {
        // Syntactically valid; the balance delta nets to zero downstream.
        let mut tx = transfer();
        tx.account_to_id = Some(tx.account_from_id);
        assert!(validate_new(&tx).is_ok());
    }

    #[test]
    fn test_empty_description_rejected() {
        let mut tx = expense();
        tx.description = "   ".to_string();
        assert!(matches!(
            validate_new(&tx),
            Err(LedgerError::Validation(msg)) if msg.contains("description")
        ));
    }

    #[test]
    fn test_negative_exchange_rate_rejected() {
        let mut tx = expense();
        tx.exchange_rate = Some(Money::parse("-1").unwrap());
        assert!(matches!(
            validate_new(&tx),
            Err(LedgerError::Validation(msg)) if msg.contains("exchange_rate")
        ));
    }

    #[test]
    fn test_zero_exchange_rate_accepted() {
        let mut tx = expense();
        tx.exchange_rate = Some(Money::zero());
        assert!(validate_new(&tx).is_ok());
    }

    #[test]
    fn test_debt_payment_unsupported() {
        let mut tx = expense();
        tx.kind = TransactionKind::DebtPayment;
        assert!(matches!(
            validate_new(&tx),
            Err(LedgerError::UnsupportedKind(TransactionKind::DebtPayment))
        ));
    }

    #[test]
    fn test_update_mutable_fields_pass() {
        let update = TransactionUpdate {
            description: Some("Corrected description".to_string()),
            notes: Some("note".to_string()),
            reconciled: Some(true),
            transaction_date: Some(Utc::now()),
            ..TransactionUpdate::default()
        };
        assert!(validate_update(&update).is_ok());
    }

    #[test]
    fn test_update_frozen_fields_refused() {
        let cases: Vec<(TransactionUpdate, &str)> = vec![
            (
                TransactionUpdate {
                    amount: Some(Money::parse("10").unwrap()),
                    ..TransactionUpdate::default()
                },
                "amount",
            ),
            (
                TransactionUpdate {
                    kind: Some(TransactionKind::Income),
                    ..TransactionUpdate::default()
                },
                "kind",
            ),
            (
                TransactionUpdate {
                    account_from_id: Some(Uuid::new_v4()),
                    ..TransactionUpdate::default()
                },
                "account_from_id",
            ),
            (
                TransactionUpdate {
                    account_to_id: Some(Uuid::new_v4()),
                    ..TransactionUpdate::default()
                },
                "account_to_id",
            ),
            (
                TransactionUpdate {
                    category_id: Some(Uuid::new_v4()),
                    ..TransactionUpdate::default()
                },
                "category_id",
            ),
            (
                TransactionUpdate {
                    exchange_rate: Some(Money::parse("2").unwrap()),
                    ..TransactionUpdate::default()
                },
                "exchange_rate",
            ),
        ];

        for (update, field) in cases {
            match validate_update(&update) {
                Err(LedgerError::ImmutableField(name)) => assert_eq!(name, field),
                other => panic!("expected ImmutableField({field}), got {other:?}"),
            }
        }
    }
}
