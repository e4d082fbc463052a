//! The accounting engine.
//!
//! Every transaction enters the ledger through this engine: it
//! validates the input, generates the balanced journal entry pair,
//! asserts the balance invariant, and persists the transaction, its
//! entries, and the cached-balance updates in one unit of work.
//! Reversal runs through the same engine and never deletes a row.
//!
//! The unit of work is an explicit `begin()`/`commit()` pair; any error
//! returned before the commit drops the open transaction, which rolls
//! it back. No partial posting is ever observable.

use arabella_core::catalog::{AccountKind, CatalogType, TransactionKind};
use arabella_core::ledger::{
    validation, BalanceDelta, EntryDraft, LedgerError, LedgerResult, LedgerService, NewTransaction,
    PostedEntry, ReversalService, TransactionTotals,
};
use arabella_shared::Money;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::entities::{accounts, journal_entries, transactions};
use crate::repositories::{CatalogRepository, JournalEntryRepository};
use crate::store_err;

/// Atomic posting and reversal over the ledger store.
#[derive(Clone)]
pub struct AccountingEngine {
    db: Arc<DatabaseConnection>,
    catalog: CatalogRepository,
    entries: JournalEntryRepository,
}

impl AccountingEngine {
    /// Creates a new accounting engine.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let db = Arc::new(db);
        Self {
            catalog: CatalogRepository::from_arc(db.clone()),
            entries: JournalEntryRepository::from_arc(db.clone()),
            db,
        }
    }

    /// Posts a transaction: validates, generates the balanced entry
    /// pair, and persists transaction, entries, and balance updates
    /// atomically.
    ///
    /// # Errors
    ///
    /// Validation failures surface before any database contact. Inside
    /// the unit of work, [`LedgerError::UnknownAccount`] and
    /// [`LedgerError::BalanceViolation`] roll everything back; the
    /// transaction id never survives a failure.
    pub async fn post(&self, input: NewTransaction) -> LedgerResult<transactions::Model> {
        validation::validate_new(&input)?;

        self.catalog
            .resolve(CatalogType::TransactionType, input.kind.as_str())
            .await?;

        let amount_in_base = input.amount_in_base()?;
        let exchange_rate = input.effective_rate();

        let txn = self.db.begin().await.map_err(store_err)?;

        if let Some(category_id) = input.category_id {
            require_category_account(&txn, input.owner_id, category_id).await?;
        }

        let now = Utc::now();
        let transaction_id = Uuid::new_v4();
        let model = transactions::ActiveModel {
            id: Set(transaction_id),
            owner_id: Set(input.owner_id),
            kind: Set(input.kind.as_str().to_string()),
            description: Set(input.description.clone()),
            amount: Set(input.amount.amount()),
            amount_in_base: Set(amount_in_base.amount()),
            exchange_rate: Set(exchange_rate.amount()),
            account_from_id: Set(input.account_from_id),
            account_to_id: Set(input.account_to_id),
            category_id: Set(input.category_id),
            transaction_date: Set(input.transaction_date.into()),
            notes: Set(input.notes.clone()),
            is_reconciled: Set(false),
            is_reversed: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            deleted_at: Set(None),
        }
        .insert(&txn)
        .await
        .map_err(store_err)?;

        let drafts = LedgerService::generate_entries(&input)?;
        let totals = check_balance_logged(&drafts, transaction_id)?;

        insert_entries(&txn, input.owner_id, transaction_id, &drafts).await?;

        let deltas = LedgerService::aggregate_deltas(&LedgerService::balance_deltas(&input)?)?;
        for delta in &deltas {
            apply_delta(&txn, input.owner_id, delta).await?;
        }

        txn.commit().await.map_err(store_err)?;

        info!(
            transaction_id = %model.id,
            kind = %input.kind,
            amount = %input.amount,
            total_debit = %totals.total_debit,
            "transaction posted"
        );

        Ok(model)
    }

    /// Reverses a posted transaction by emitting compensating entries
    /// under the same transaction id and undoing the balance deltas.
    /// The original rows stay untouched except for the `reversed` flag.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] for missing transactions and
    /// [`LedgerError::AlreadyReversed`] on a second attempt.
    pub async fn reverse(&self, transaction_id: Uuid) -> LedgerResult<()> {
        let txn = self.db.begin().await.map_err(store_err)?;

        let transaction = transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::DeletedAt.is_null())
            .one(&txn)
            .await
            .map_err(store_err)?
            .ok_or(LedgerError::NotFound(transaction_id))?;

        if transaction.is_reversed {
            return Err(LedgerError::AlreadyReversed(transaction_id));
        }

        let kind: TransactionKind = transaction.kind.parse().map_err(LedgerError::Store)?;

        let original = journal_entries::Entity::find()
            .filter(journal_entries::Column::TransactionId.eq(transaction_id))
            .order_by_desc(journal_entries::Column::Side)
            .order_by_asc(journal_entries::Column::Id)
            .all(&txn)
            .await
            .map_err(store_err)?;

        let posted = original
            .iter()
            .map(|entry| {
                Ok(PostedEntry {
                    account_id: entry.account_id,
                    side: entry.side.parse().map_err(LedgerError::Store)?,
                    amount: Money::new(entry.amount)?,
                    description: entry.description.clone(),
                })
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        let reversed_at = Utc::now();
        let drafts = ReversalService::reversing_entries(&posted, reversed_at);
        insert_entries(&txn, transaction.owner_id, transaction_id, &drafts).await?;

        let amount = Money::new(transaction.amount)?;
        let deltas = LedgerService::aggregate_deltas(&ReversalService::inverse_deltas(
            kind,
            transaction.account_from_id,
            transaction.account_to_id,
            amount,
        )?)?;
        for delta in &deltas {
            apply_delta(&txn, transaction.owner_id, delta).await?;
        }

        let owner_id = transaction.owner_id;
        let mut active: transactions::ActiveModel = transaction.into();
        active.is_reversed = Set(true);
        active.updated_at = Set(reversed_at.into());
        active.update(&txn).await.map_err(store_err)?;

        txn.commit().await.map_err(store_err)?;

        info!(
            transaction_id = %transaction_id,
            owner_id = %owner_id,
            "transaction reversed"
        );

        Ok(())
    }

    /// Verifies the balance invariant of a transaction's journal
    /// entries: total debits, total credits, and whether they match.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the transaction does not
    /// exist.
    pub async fn verify_balance(&self, transaction_id: Uuid) -> LedgerResult<TransactionTotals> {
        transactions::Entity::find_by_id(transaction_id)
            .filter(transactions::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(store_err)?
            .ok_or(LedgerError::NotFound(transaction_id))?;

        self.entries.verify_balance(transaction_id).await
    }
}

/// Asserts the balance invariant, logging a violation as critical
/// before the unit of work rolls back.
fn check_balance_logged(
    drafts: &[EntryDraft],
    transaction_id: Uuid,
) -> LedgerResult<TransactionTotals> {
    match LedgerService::check_balance(drafts) {
        Ok(totals) => Ok(totals),
        Err(err) => {
            if let LedgerError::BalanceViolation { debit, credit } = &err {
                error!(
                    transaction_id = %transaction_id,
                    debit = %debit,
                    credit = %credit,
                    "generated journal entries do not balance; rolling back"
                );
            }
            Err(err)
        }
    }
}

/// Bulk-inserts journal entries inside the open unit of work.
async fn insert_entries(
    txn: &DatabaseTransaction,
    owner_id: Uuid,
    transaction_id: Uuid,
    drafts: &[EntryDraft],
) -> LedgerResult<()> {
    let now = Utc::now();
    let models: Vec<journal_entries::ActiveModel> = drafts
        .iter()
        .map(|draft| journal_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            transaction_id: Set(transaction_id),
            account_id: Set(draft.account_id),
            side: Set(draft.side.as_str().to_string()),
            amount: Set(draft.amount.amount()),
            entry_date: Set(draft.entry_date.into()),
            description: Set(draft.description.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            deleted_at: Set(None),
        })
        .collect();

    journal_entries::Entity::insert_many(models)
        .exec(txn)
        .await
        .map_err(store_err)?;

    Ok(())
}

/// Applies one signed balance delta to a real account inside the open
/// unit of work. Nominal (CATEGORY) accounts are never balance-updated.
async fn apply_delta(
    txn: &DatabaseTransaction,
    owner_id: Uuid,
    delta: &BalanceDelta,
) -> LedgerResult<()> {
    let account = accounts::Entity::find_by_id(delta.account_id)
        .filter(accounts::Column::OwnerId.eq(owner_id))
        .filter(accounts::Column::IsActive.eq(true))
        .filter(accounts::Column::DeletedAt.is_null())
        .one(txn)
        .await
        .map_err(store_err)?
        .ok_or(LedgerError::UnknownAccount(delta.account_id))?;

    let kind: AccountKind = account.kind.parse().map_err(LedgerError::Store)?;
    if !kind.is_real() {
        return Ok(());
    }

    let balance = Money::new(account.balance)?.checked_add(delta.amount)?;
    let mut active: accounts::ActiveModel = account.into();
    active.balance = Set(balance.amount());
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await.map_err(store_err)?;

    Ok(())
}

/// Verifies the category reference points at an active CATEGORY account
/// of the same owner.
async fn require_category_account(
    txn: &DatabaseTransaction,
    owner_id: Uuid,
    category_id: Uuid,
) -> LedgerResult<()> {
    let account = accounts::Entity::find_by_id(category_id)
        .filter(accounts::Column::OwnerId.eq(owner_id))
        .filter(accounts::Column::IsActive.eq(true))
        .filter(accounts::Column::DeletedAt.is_null())
        .one(txn)
        .await
        .map_err(store_err)?
        .ok_or(LedgerError::UnknownAccount(category_id))?;

    let kind: AccountKind = account.kind.parse().map_err(LedgerError::Store)?;
    if !matches!(kind, AccountKind::Category) {
        return Err(LedgerError::Validation(
            "category_id must reference a CATEGORY account".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arabella_core::catalog::EntrySide;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn expense_input() -> NewTransaction {
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

    fn catalog_row(value: &str) -> crate::entities::catalog_values::Model {
        let now = Utc::now().into();
        crate::entities::catalog_values::Model {
            id: Uuid::new_v4(),
            catalog_type: CatalogType::TransactionType.as_str().to_string(),
            value: value.to_string(),
            label: value.to_string(),
            description: None,
            display_order: 1,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn account_row(owner_id: Uuid, kind: AccountKind) -> accounts::Model {
        let now = Utc::now().into();
        accounts::Model {
            id: Uuid::new_v4(),
            owner_id,
            name: "Account".to_string(),
            kind: kind.as_str().to_string(),
            currency_id: Uuid::new_v4(),
            balance: dec!(1000.0000),
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn transaction_row(is_reversed: bool) -> transactions::Model {
        let now = Utc::now();
        transactions::Model {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            kind: "EXPENSE".to_string(),
            description: "Groceries".to_string(),
            amount: dec!(150.0000),
            amount_in_base: dec!(150.0000),
            exchange_rate: dec!(1.0000),
            account_from_id: Uuid::new_v4(),
            account_to_id: None,
            category_id: Some(Uuid::new_v4()),
            transaction_date: now.into(),
            notes: None,
            is_reconciled: false,
            is_reversed,
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    fn entry_row(
        transaction_id: Uuid,
        side: EntrySide,
        amount: rust_decimal::Decimal,
    ) -> journal_entries::Model {
        let now = Utc::now();
        journal_entries::Model {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            transaction_id,
            account_id: Uuid::new_v4(),
            side: side.as_str().to_string(),
            amount,
            entry_date: now.into(),
            description: "Expense: Groceries".to_string(),
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_post_rejects_invalid_input_before_any_query() {
        // No prepared results: validation must fail first.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let engine = AccountingEngine::new(db);

        let mut input = expense_input();
        input.amount = Money::zero();

        assert!(matches!(
            engine.post(input).await,
            Err(LedgerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_post_rejects_unseeded_catalog_kind() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<crate::entities::catalog_values::Model>::new()])
            .into_connection();
        let engine = AccountingEngine::new(db);

        assert!(matches!(
            engine.post(expense_input()).await,
            Err(LedgerError::UnknownCatalogValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_post_rejects_missing_category_account() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![catalog_row("EXPENSE")]])
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();
        let engine = AccountingEngine::new(db);

        let input = expense_input();
        let category_id = input.category_id.unwrap();

        assert!(matches!(
            engine.post(input).await,
            Err(LedgerError::UnknownAccount(id)) if id == category_id
        ));
    }

    #[tokio::test]
    async fn test_post_rejects_non_category_account_as_category() {
        let input = expense_input();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![catalog_row("EXPENSE")]])
            .append_query_results([vec![account_row(input.owner_id, AccountKind::Bank)]])
            .into_connection();
        let engine = AccountingEngine::new(db);

        assert!(matches!(
            engine.post(input).await,
            Err(LedgerError::Validation(msg)) if msg.contains("CATEGORY")
        ));
    }

    #[tokio::test]
    async fn test_reverse_missing_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<transactions::Model>::new()])
            .into_connection();
        let engine = AccountingEngine::new(db);

        let missing = Uuid::new_v4();
        assert!(matches!(
            engine.reverse(missing).await,
            Err(LedgerError::NotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn test_reverse_refuses_second_attempt() {
        let row = transaction_row(true);
        let id = row.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();
        let engine = AccountingEngine::new(db);

        assert!(matches!(
            engine.reverse(id).await,
            Err(LedgerError::AlreadyReversed(found)) if found == id
        ));
    }

    #[tokio::test]
    async fn test_verify_balance_missing_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<transactions::Model>::new()])
            .into_connection();
        let engine = AccountingEngine::new(db);

        assert!(matches!(
            engine.verify_balance(Uuid::new_v4()).await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_balance_reports_totals() {
        let row = transaction_row(false);
        let id = row.id;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .append_query_results([vec![entry_row(id, EntrySide::Debit, dec!(150.0000))]])
            .append_query_results([vec![entry_row(id, EntrySide::Credit, dec!(150.0000))]])
            .into_connection();
        let engine = AccountingEngine::new(db);

        let totals = engine.verify_balance(id).await.unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.total_debit, Money::parse("150.0000").unwrap());
    }
}
