//! Catalog registry backed by the catalog values table.
//!
//! Catalog rows are seeded at bootstrap and stable for the process
//! lifetime, so resolved values are cached in memory without expiry.
//! The cache fills lazily on first access.

use std::sync::Arc;

use arabella_core::catalog::{CatalogType, CatalogValue};
use arabella_core::ledger::{LedgerError, LedgerResult};
use moka::sync::Cache;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::catalog_values;
use crate::store_err;

/// Number of catalog rows the cache can hold. The seeded catalog is far
/// smaller; this only bounds pathological growth.
const CACHE_CAPACITY: u64 = 256;

/// Read-only catalog registry with an in-memory cache.
#[derive(Clone)]
pub struct CatalogRepository {
    db: Arc<DatabaseConnection>,
    cache: Cache<String, Arc<CatalogValue>>,
}

impl CatalogRepository {
    /// Creates a new catalog repository with an empty cache.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::from_arc(Arc::new(db))
    }

    pub(crate) fn from_arc(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            cache: Cache::new(CACHE_CAPACITY),
        }
    }

    /// Resolves a catalog value, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownCatalogValue`] when the value is
    /// not present and active.
    pub async fn resolve(
        &self,
        catalog_type: CatalogType,
        value: &str,
    ) -> LedgerResult<CatalogValue> {
        let key = format!("{catalog_type}:{value}");
        if let Some(cached) = self.cache.get(&key) {
            return Ok((*cached).clone());
        }

        let row = catalog_values::Entity::find()
            .filter(catalog_values::Column::CatalogType.eq(catalog_type.as_str()))
            .filter(catalog_values::Column::Value.eq(value))
            .filter(catalog_values::Column::IsActive.eq(true))
            .filter(catalog_values::Column::DeletedAt.is_null())
            .one(self.db.as_ref())
            .await
            .map_err(store_err)?
            .ok_or_else(|| LedgerError::UnknownCatalogValue {
                catalog_type,
                value: value.to_string(),
            })?;

        let resolved = CatalogValue {
            catalog_type,
            value: row.value,
            label: row.label,
            display_order: row.display_order,
            is_active: row.is_active,
        };

        self.cache.insert(key, Arc::new(resolved.clone()));
        Ok(resolved)
    }

    /// Lists the active values of a catalog type in display order.
    pub async fn list(&self, catalog_type: CatalogType) -> LedgerResult<Vec<CatalogValue>> {
        let rows = catalog_values::Entity::find()
            .filter(catalog_values::Column::CatalogType.eq(catalog_type.as_str()))
            .filter(catalog_values::Column::IsActive.eq(true))
            .filter(catalog_values::Column::DeletedAt.is_null())
            .order_by_asc(catalog_values::Column::DisplayOrder)
            .order_by_asc(catalog_values::Column::Label)
            .all(self.db.as_ref())
            .await
            .map_err(store_err)?;

        Ok(rows
            .into_iter()
            .map(|row| CatalogValue {
                catalog_type,
                value: row.value,
                label: row.label,
                display_order: row.display_order,
                is_active: row.is_active,
            })
            .collect())
    }

    /// Lists the selectable account kinds.
    pub async fn account_types(&self) -> LedgerResult<Vec<CatalogValue>> {
        self.list(CatalogType::AccountType).await
    }

    /// Lists the selectable transaction kinds.
    pub async fn transaction_types(&self) -> LedgerResult<Vec<CatalogValue>> {
        self.list(CatalogType::TransactionType).await
    }
}
