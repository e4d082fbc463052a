//! Transaction repository.
//!
//! Reads, filtered listings, and the narrow mutable-field update. Row
//! creation and reversal belong to the accounting engine; nothing here
//! ever touches journal entries or cached balances.

use arabella_core::catalog::TransactionKind;
use arabella_core::ledger::{validation, LedgerError, LedgerResult, TransactionUpdate};
use arabella_shared::{Money, PageRequest};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{journal_entries, transactions};
use crate::store_err;

/// Filter options for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Filter by transaction kind.
    pub kind: Option<TransactionKind>,
    /// Filter by account, matching either the source or the destination.
    pub account_id: Option<Uuid>,
    /// Filter by category account.
    pub category_id: Option<Uuid>,
    /// Filter by date range start.
    pub date_from: Option<DateTime<Utc>>,
    /// Filter by date range end.
    pub date_to: Option<DateTime<Utc>>,
    /// Filter by reconciled flag.
    pub reconciled: Option<bool>,
}

/// A transaction with its journal entries.
#[derive(Debug, Clone)]
pub struct TransactionWithEntries {
    /// Transaction header.
    pub transaction: transactions::Model,
    /// Journal entries, debits first. Includes the compensating set if
    /// the transaction was reversed.
    pub entries: Vec<journal_entries::Model>,
}

/// Transaction repository for reads and mutable-field updates.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: Arc<DatabaseConnection>,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::from_arc(Arc::new(db))
    }

    pub(crate) const fn from_arc(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Loads a transaction by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the transaction does not
    /// exist.
    pub async fn find_by_id(&self, id: Uuid) -> LedgerResult<transactions::Model> {
        transactions::Entity::find_by_id(id)
            .filter(transactions::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(store_err)?
            .ok_or(LedgerError::NotFound(id))
    }

    /// Lists an owner's transactions with filters and pagination.
    ///
    /// The total count is computed before pagination; rows are ordered
    /// `transaction_date DESC, created_at DESC`.
    pub async fn list(
        &self,
        owner_id: Uuid,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> LedgerResult<(Vec<transactions::Model>, u64)> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .filter(transactions::Column::DeletedAt.is_null());

        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(
                Condition::any()
                    .add(transactions::Column::AccountFromId.eq(account_id))
                    .add(transactions::Column::AccountToId.eq(account_id)),
            );
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(transactions::Column::TransactionDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(transactions::Column::TransactionDate.lte(date_to));
        }
        if let Some(reconciled) = filter.reconciled {
            query = query.filter(transactions::Column::IsReconciled.eq(reconciled));
        }

        let total = query.clone().count(self.db.as_ref()).await.map_err(store_err)?;

        let rows = query
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .limit(page.limit())
            .offset(page.offset())
            .all(self.db.as_ref())
            .await
            .map_err(store_err)?;

        Ok((rows, total))
    }

    /// Applies a mutable-field update to a transaction.
    ///
    /// Amount, kind, accounts, category, and rate are frozen at posting
    /// time; an update naming any of them is refused before the row is
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ImmutableField`] for frozen fields and
    /// [`LedgerError::NotFound`] for missing transactions.
    pub async fn update_mutable(
        &self,
        id: Uuid,
        update: TransactionUpdate,
    ) -> LedgerResult<transactions::Model> {
        validation::validate_update(&update)?;

        let transaction = self.find_by_id(id).await?;
        let mut active: transactions::ActiveModel = transaction.into();

        if let Some(description) = update.description {
            active.description = Set(description);
        }
        if let Some(notes) = update.notes {
            active.notes = Set(Some(notes));
        }
        if let Some(reconciled) = update.reconciled {
            active.is_reconciled = Set(reconciled);
        }
        if let Some(transaction_date) = update.transaction_date {
            active.transaction_date = Set(transaction_date.into());
        }
        active.updated_at = Set(Utc::now().into());

        active.update(self.db.as_ref()).await.map_err(store_err)
    }

    /// Sums an owner's non-reversed INCOME and EXPENSE amounts for one
    /// calendar month, plus the count of all non-reversed rows in that
    /// month regardless of kind.
    pub async fn monthly_totals(
        &self,
        owner_id: Uuid,
        year: i32,
        month: u32,
    ) -> LedgerResult<(Money, Money, u64)> {
        let (start, end) = month_bounds(year, month).ok_or_else(|| {
            LedgerError::Validation(format!("invalid month: {year}-{month:02}"))
        })?;

        let rows = transactions::Entity::find()
            .filter(transactions::Column::OwnerId.eq(owner_id))
            .filter(transactions::Column::IsReversed.eq(false))
            .filter(transactions::Column::DeletedAt.is_null())
            .filter(transactions::Column::TransactionDate.gte(start))
            .filter(transactions::Column::TransactionDate.lte(end))
            .all(self.db.as_ref())
            .await
            .map_err(store_err)?;

        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;
        for row in &rows {
            match row.kind.as_str() {
                "INCOME" => income += row.amount,
                "EXPENSE" => expenses += row.amount,
                _ => {}
            }
        }

        Ok((
            Money::new(income)?,
            Money::new(expenses)?,
            rows.len() as u64,
        ))
    }
}

/// Returns the UTC bounds of a calendar month:
/// `[first day 00:00:00, last day 23:59:59]`.
#[must_use]
pub fn month_bounds(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    let next_month = first.checked_add_months(Months::new(1))?;
    let last = next_month - Duration::seconds(1);

    Some((Utc.from_utc_datetime(&first), Utc.from_utc_datetime(&last)))
}

/// Returns the calendar month `offset` months before the given instant.
#[must_use]
pub fn month_of(now: DateTime<Utc>, offset: u32) -> Option<(i32, u32)> {
    let date = now.date_naive().checked_sub_months(Months::new(offset))?;
    Some((date.year(), date.month()))
}
