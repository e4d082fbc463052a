//! Journal entry repository.
//!
//! Entries are the append-only audit trail: created by posting and
//! reversal, never updated or deleted. Besides the engine-facing reads,
//! this repository exposes the audit listings and the derived balances
//! used for nominal (category) accounts.

use arabella_core::catalog::EntrySide;
use arabella_core::ledger::{LedgerResult, TransactionTotals};
use arabella_shared::{Money, PageRequest};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::journal_entries;
use crate::store_err;

/// Filter options for audit listings.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by entry side.
    pub side: Option<EntrySide>,
    /// Filter by originating transaction.
    pub transaction_id: Option<Uuid>,
    /// Filter by account.
    pub account_id: Option<Uuid>,
    /// Filter by entry date range start.
    pub date_from: Option<DateTime<Utc>>,
    /// Filter by entry date range end.
    pub date_to: Option<DateTime<Utc>>,
}

impl EntryFilter {
    fn apply(&self, mut query: Select<journal_entries::Entity>) -> Select<journal_entries::Entity> {
        if let Some(side) = self.side {
            query = query.filter(journal_entries::Column::Side.eq(side.as_str()));
        }
        if let Some(transaction_id) = self.transaction_id {
            query = query.filter(journal_entries::Column::TransactionId.eq(transaction_id));
        }
        if let Some(account_id) = self.account_id {
            query = query.filter(journal_entries::Column::AccountId.eq(account_id));
        }
        if let Some(date_from) = self.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(date_from));
        }
        if let Some(date_to) = self.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(date_to));
        }
        query
    }
}

/// Journal entry repository for ledger audit reads.
#[derive(Debug, Clone)]
pub struct JournalEntryRepository {
    db: Arc<DatabaseConnection>,
}

impl JournalEntryRepository {
    /// Creates a new journal entry repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::from_arc(Arc::new(db))
    }

    pub(crate) const fn from_arc(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Loads every entry of a transaction: the original set, plus the
    /// compensating set if it was reversed. DEBIT rows first, then by id.
    pub async fn find_by_transaction(
        &self,
        transaction_id: Uuid,
    ) -> LedgerResult<Vec<journal_entries::Model>> {
        journal_entries::Entity::find()
            .filter(journal_entries::Column::TransactionId.eq(transaction_id))
            // "DEBIT" sorts after "CREDIT", so descending puts debits first.
            .order_by_desc(journal_entries::Column::Side)
            .order_by_asc(journal_entries::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(store_err)
    }

    /// Sums the debit amounts of a transaction.
    pub async fn sum_debits(&self, transaction_id: Uuid) -> LedgerResult<Money> {
        self.sum_side(transaction_id, EntrySide::Debit).await
    }

    /// Sums the credit amounts of a transaction.
    pub async fn sum_credits(&self, transaction_id: Uuid) -> LedgerResult<Money> {
        self.sum_side(transaction_id, EntrySide::Credit).await
    }

    /// Verifies the balance invariant of a transaction's entries.
    pub async fn verify_balance(&self, transaction_id: Uuid) -> LedgerResult<TransactionTotals> {
        let total_debit = self.sum_debits(transaction_id).await?;
        let total_credit = self.sum_credits(transaction_id).await?;
        Ok(TransactionTotals::new(total_debit, total_credit))
    }

    /// Derives an account's balance from its entries as
    /// debits minus credits, optionally up to a point in time.
    ///
    /// This is how balances of nominal (category) accounts are read;
    /// real accounts use the cached balance on the account row.
    pub async fn derived_balance(
        &self,
        account_id: Uuid,
        as_of: Option<DateTime<Utc>>,
    ) -> LedgerResult<Money> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::AccountId.eq(account_id));

        if let Some(as_of) = as_of {
            query = query.filter(journal_entries::Column::EntryDate.lte(as_of));
        }

        let entries = query.all(self.db.as_ref()).await.map_err(store_err)?;

        let mut balance = Decimal::ZERO;
        for entry in &entries {
            if entry.side == EntrySide::Debit.as_str() {
                balance += entry.amount;
            } else {
                balance -= entry.amount;
            }
        }

        Ok(Money::new(balance)?)
    }

    /// Lists an account's entries for the audit trail, newest first,
    /// with the total count computed before pagination.
    pub async fn list_by_account(
        &self,
        account_id: Uuid,
        filter: &EntryFilter,
        page: PageRequest,
    ) -> LedgerResult<(Vec<journal_entries::Model>, u64)> {
        let query = filter.apply(
            journal_entries::Entity::find()
                .filter(journal_entries::Column::AccountId.eq(account_id)),
        );
        self.paginate(query, page).await
    }

    /// Lists an owner's entries for the audit trail, newest first, with
    /// the total count computed before pagination.
    pub async fn list_by_owner(
        &self,
        owner_id: Uuid,
        filter: &EntryFilter,
        page: PageRequest,
    ) -> LedgerResult<(Vec<journal_entries::Model>, u64)> {
        let query = filter.apply(
            journal_entries::Entity::find()
                .filter(journal_entries::Column::OwnerId.eq(owner_id)),
        );
        self.paginate(query, page).await
    }

    async fn paginate(
        &self,
        query: Select<journal_entries::Entity>,
        page: PageRequest,
    ) -> LedgerResult<(Vec<journal_entries::Model>, u64)> {
        let total = query.clone().count(self.db.as_ref()).await.map_err(store_err)?;

        let entries = query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .limit(page.limit())
            .offset(page.offset())
            .all(self.db.as_ref())
            .await
            .map_err(store_err)?;

        Ok((entries, total))
    }

    async fn sum_side(&self, transaction_id: Uuid, side: EntrySide) -> LedgerResult<Money> {
        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::TransactionId.eq(transaction_id))
            .filter(journal_entries::Column::Side.eq(side.as_str()))
            .all(self.db.as_ref())
            .await
            .map_err(store_err)?;

        let total: Decimal = entries.iter().map(|e| e.amount).sum();
        Ok(Money::new(total)?)
    }
}
