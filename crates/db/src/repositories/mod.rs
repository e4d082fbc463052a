//! Repository abstractions over the ledger schema.

pub mod account;
pub mod catalog;
pub mod dashboard;
pub mod journal_entry;
pub mod transaction;

pub use account::AccountRepository;
pub use catalog::CatalogRepository;
pub use dashboard::DashboardRepository;
pub use journal_entry::{EntryFilter, JournalEntryRepository};
pub use transaction::{TransactionFilter, TransactionRepository, TransactionWithEntries};
