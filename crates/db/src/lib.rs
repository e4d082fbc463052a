//! Database layer with `SeaORM` entities, repositories, and the
//! accounting engine.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ledger schema
//! - Repository abstractions for data access
//! - The posting and reversal engines (atomic units of work)
//! - The transaction coordinator consumed by the HTTP façade

pub mod engine;
pub mod entities;
pub mod repositories;
pub mod service;

pub use engine::AccountingEngine;
pub use repositories::{
    AccountRepository, CatalogRepository, DashboardRepository, JournalEntryRepository,
    TransactionRepository,
};
pub use service::TransactionService;

use arabella_core::ledger::LedgerError;
use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Wraps a database error as a store failure, keeping `sea-orm` types
/// out of the core error taxonomy.
pub(crate) fn store_err(err: DbErr) -> LedgerError {
    LedgerError::Store(err.to_string())
}
