//! Account repository.
//!
//! Accounts are soft-deleted and their cached balances are mutated
//! exclusively by the posting and reversal engines; this repository
//! only reads them.

use arabella_core::catalog::AccountKind;
use arabella_core::ledger::{LedgerError, LedgerResult};
use arabella_shared::Money;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::accounts;
use crate::store_err;

/// Account repository for ledger account reads.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: Arc<DatabaseConnection>,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::from_arc(Arc::new(db))
    }

    pub(crate) const fn from_arc(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Loads an account by id, ignoring soft-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownAccount`] if the account does not
    /// exist.
    pub async fn find_by_id(&self, id: Uuid) -> LedgerResult<accounts::Model> {
        accounts::Entity::find_by_id(id)
            .filter(accounts::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(store_err)?
            .ok_or(LedgerError::UnknownAccount(id))
    }

    /// Lists an owner's active accounts, newest first.
    pub async fn find_by_owner(&self, owner_id: Uuid) -> LedgerResult<Vec<accounts::Model>> {
        accounts::Entity::find()
            .filter(accounts::Column::OwnerId.eq(owner_id))
            .filter(accounts::Column::IsActive.eq(true))
            .filter(accounts::Column::DeletedAt.is_null())
            .order_by_desc(accounts::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(store_err)
    }

    /// Lists an owner's active accounts of one kind, newest first.
    pub async fn find_by_owner_and_kind(
        &self,
        owner_id: Uuid,
        kind: AccountKind,
    ) -> LedgerResult<Vec<accounts::Model>> {
        accounts::Entity::find()
            .filter(accounts::Column::OwnerId.eq(owner_id))
            .filter(accounts::Column::Kind.eq(kind.as_str()))
            .filter(accounts::Column::IsActive.eq(true))
            .filter(accounts::Column::DeletedAt.is_null())
            .order_by_desc(accounts::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(store_err)
    }

    /// Sums cached balances over the owner's active accounts matching
    /// any of the given kinds.
    pub async fn sum_balance_by_kinds(
        &self,
        owner_id: Uuid,
        kinds: &[AccountKind],
    ) -> LedgerResult<Money> {
        let kind_strings: Vec<&str> = kinds.iter().map(|k| k.as_str()).collect();

        let accounts = accounts::Entity::find()
            .filter(accounts::Column::OwnerId.eq(owner_id))
            .filter(accounts::Column::Kind.is_in(kind_strings))
            .filter(accounts::Column::IsActive.eq(true))
            .filter(accounts::Column::DeletedAt.is_null())
            .all(self.db.as_ref())
            .await
            .map_err(store_err)?;

        let total: Decimal = accounts.iter().map(|a| a.balance).sum();
        Ok(Money::new(total)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn account(kind: AccountKind, balance: Decimal) -> accounts::Model {
        let now = Utc::now().into();
        accounts::Model {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Checking".to_string(),
            kind: kind.as_str().to_string(),
            currency_id: Uuid::new_v4(),
            balance,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_sum_balance_by_kinds_folds_balances() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                account(AccountKind::Bank, dec!(1000.0000)),
                account(AccountKind::Cash, dec!(250.5000)),
            ]])
            .into_connection();

        let repo = AccountRepository::new(db);
        let total = repo
            .sum_balance_by_kinds(Uuid::new_v4(), &AccountKind::LIQUID_KINDS)
            .await
            .unwrap();

        assert_eq!(total, Money::parse("1250.5000").unwrap());
    }

    #[tokio::test]
    async fn test_sum_balance_with_no_accounts_is_zero() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();

        let repo = AccountRepository::new(db);
        let total = repo
            .sum_balance_by_kinds(Uuid::new_v4(), &AccountKind::ASSET_KINDS)
            .await
            .unwrap();

        assert!(total.is_zero());
    }

    #[tokio::test]
    async fn test_find_by_id_unknown_account() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<accounts::Model>::new()])
            .into_connection();

        let repo = AccountRepository::new(db);
        let missing = Uuid::new_v4();
        assert!(matches!(
            repo.find_by_id(missing).await,
            Err(LedgerError::UnknownAccount(id)) if id == missing
        ));
    }
}
