//! Transaction coordinator.
//!
//! Thin façade over the accounting engine and the repositories; this is
//! the surface the external HTTP collaborator calls. Deleting a
//! transaction means reversing it, never removing rows.

use arabella_core::ledger::{LedgerResult, NewTransaction, TransactionTotals, TransactionUpdate};
use arabella_shared::{PageRequest, PageResponse};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::engine::AccountingEngine;
use crate::entities::transactions;
use crate::repositories::{
    JournalEntryRepository, TransactionFilter, TransactionRepository, TransactionWithEntries,
};

/// Coordinator exposing Create/Get/List/Update/Delete semantics.
#[derive(Clone)]
pub struct TransactionService {
    engine: AccountingEngine,
    transactions: TransactionRepository,
    entries: JournalEntryRepository,
}

impl TransactionService {
    /// Creates a new transaction coordinator.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            engine: AccountingEngine::new(db.clone()),
            transactions: TransactionRepository::new(db.clone()),
            entries: JournalEntryRepository::new(db),
        }
    }

    /// Posts a new transaction through the accounting engine.
    pub async fn create(&self, input: NewTransaction) -> LedgerResult<transactions::Model> {
        self.engine.post(input).await
    }

    /// Loads a transaction with its journal entries.
    pub async fn get(&self, id: Uuid) -> LedgerResult<TransactionWithEntries> {
        let transaction = self.transactions.find_by_id(id).await?;
        let entries = self.entries.find_by_transaction(id).await?;
        Ok(TransactionWithEntries {
            transaction,
            entries,
        })
    }

    /// Lists an owner's transactions with filters and pagination.
    pub async fn list(
        &self,
        owner_id: Uuid,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> LedgerResult<PageResponse<transactions::Model>> {
        let (rows, total) = self.transactions.list(owner_id, filter, page).await?;
        Ok(PageResponse::new(rows, page, total))
    }

    /// Updates the mutable fields of a transaction. Attempts to change
    /// amount, kind, accounts, category, or rate are refused.
    pub async fn update(
        &self,
        id: Uuid,
        update: TransactionUpdate,
    ) -> LedgerResult<transactions::Model> {
        self.transactions.update_mutable(id, update).await
    }

    /// Deletes a transaction by reversing it. Ledger rows are retained.
    pub async fn delete(&self, id: Uuid) -> LedgerResult<()> {
        self.engine.reverse(id).await
    }

    /// Verifies that a transaction's journal entries balance.
    pub async fn verify_balance(&self, id: Uuid) -> LedgerResult<TransactionTotals> {
        self.engine.verify_balance(id).await
    }
}
