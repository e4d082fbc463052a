//! Ledger error taxonomy.
//!
//! Every error carries a stable kind discriminator (`error_code`) plus a
//! human-readable message. The posting engine rolls back its unit of
//! work before any of these reach the caller.

use arabella_shared::MoneyError;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{CatalogType, TransactionKind};

/// Result type alias using [`LedgerError`].
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors surfaced by the posting engine, reversal engine, and query layer.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input violates a posting precondition. Carries the first violated
    /// rule.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The transaction kind exists in the catalog but has no posting rule.
    #[error("transaction kind {0} has no posting rule")]
    UnsupportedKind(TransactionKind),

    /// Referenced account does not exist, is inactive, or belongs to a
    /// different owner.
    #[error("account not found: {0}")]
    UnknownAccount(Uuid),

    /// Requested catalog value is not present and active.
    #[error("unknown catalog value '{value}' in {catalog_type}")]
    UnknownCatalogValue {
        /// The catalog family that was queried.
        catalog_type: CatalogType,
        /// The value that failed to resolve.
        value: String,
    },

    /// Update attempted on an attribute frozen at posting time.
    #[error("field '{0}' cannot be changed after posting")]
    ImmutableField(&'static str),

    /// Transaction does not exist.
    #[error("transaction not found: {0}")]
    NotFound(Uuid),

    /// Second reversal attempt on the same transaction.
    #[error("transaction {0} is already reversed")]
    AlreadyReversed(Uuid),

    /// Generated entries do not balance. This is an engine bug; the unit
    /// of work is rolled back and the failure logged as critical.
    #[error("journal entries do not balance: debit {debit}, credit {credit}")]
    BalanceViolation {
        /// Sum of generated debit amounts.
        debit: arabella_shared::Money,
        /// Sum of generated credit amounts.
        credit: arabella_shared::Money,
    },

    /// Monetary parsing or arithmetic failure.
    #[error(transparent)]
    InvalidMoney(#[from] MoneyError),

    /// Underlying database failure. The caller may retry idempotently
    /// iff the transaction id never surfaced.
    #[error("store failure: {0}")]
    Store(String),
}

impl LedgerError {
    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnsupportedKind(_) => "UNSUPPORTED_KIND",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::UnknownCatalogValue { .. } => "UNKNOWN_CATALOG_VALUE",
            Self::ImmutableField(_) => "IMMUTABLE_FIELD",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::BalanceViolation { .. } => "BALANCE_VIOLATION",
            Self::InvalidMoney(_) => "INVALID_MONEY",
            Self::Store(_) => "STORE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::UnsupportedKind(_)
            | Self::UnknownCatalogValue { .. }
            | Self::InvalidMoney(_) => 400,

            Self::ImmutableField(_) => 422,

            Self::UnknownAccount(_) | Self::NotFound(_) => 404,

            Self::AlreadyReversed(_) => 409,

            Self::BalanceViolation { .. } | Self::Store(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arabella_shared::Money;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::Validation("amount must be positive".into()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            LedgerError::UnsupportedKind(TransactionKind::DebtPayment).error_code(),
            "UNSUPPORTED_KIND"
        );
        assert_eq!(
            LedgerError::AlreadyReversed(Uuid::nil()).error_code(),
            "ALREADY_REVERSED"
        );
        assert_eq!(
            LedgerError::Store("connection reset".into()).error_code(),
            "STORE_FAILURE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            LedgerError::Validation("x".into()).http_status_code(),
            400
        );
        assert_eq!(
            LedgerError::ImmutableField("amount").http_status_code(),
            422
        );
        assert_eq!(LedgerError::NotFound(Uuid::nil()).http_status_code(), 404);
        assert_eq!(
            LedgerError::AlreadyReversed(Uuid::nil()).http_status_code(),
            409
        );
        assert_eq!(
            LedgerError::BalanceViolation {
                debit: Money::parse("100").unwrap(),
                credit: Money::parse("50").unwrap(),
            }
            .http_status_code(),
            500
        );
    }

    #[test]
    fn test_display_messages() {
        let err = LedgerError::BalanceViolation {
            debit: Money::parse("100").unwrap(),
            credit: Money::parse("50").unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "journal entries do not balance: debit 100.0000, credit 50.0000"
        );

        let err = LedgerError::UnknownCatalogValue {
            catalog_type: CatalogType::TransactionType,
            value: "REFUND".into(),
        };
        assert_eq!(
            err.to_string(),
            "unknown catalog value 'REFUND' in TRANSACTION_TYPE"
        );
    }
}
