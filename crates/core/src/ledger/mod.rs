//! Double-entry posting and reversal rules.
//!
//! Everything here is pure: validation of incoming transactions, the
//! entry-generation table, balance-delta derivation, the balance
//! invariant, and the compensating-entry rules for reversal. Persistence
//! and units of work live in the `arabella-db` crate.

pub mod error;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;

pub use error::{LedgerError, LedgerResult};
pub use reversal::ReversalService;
pub use service::LedgerService;
pub use types::{
    BalanceDelta, EntryDraft, NewTransaction, PostedEntry, TransactionTotals, TransactionUpdate,
};
