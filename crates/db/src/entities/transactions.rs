//! `SeaORM` Entity for the transactions table.
//!
//! Amount, kind, accounts, category, and rate are frozen once the row
//! is posted; description, notes, the reconciled flag, and the date stay
//! mutable. Rows are never hard-deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub kind: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount_in_base: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub exchange_rate: Decimal,
    pub account_from_id: Uuid,
    pub account_to_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub transaction_date: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub is_reconciled: bool,
    pub is_reversed: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountFromId",
        to = "super::accounts::Column::Id"
    )]
    AccountFrom,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountToId",
        to = "super::accounts::Column::Id"
    )]
    AccountTo,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::CategoryId",
        to = "super::accounts::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::journal_entries::Entity")]
    JournalEntries,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
