//! `SeaORM` entities for the ledger schema.

pub mod accounts;
pub mod catalog_values;
pub mod currencies;
pub mod journal_entries;
pub mod transactions;
