//! Enumerated domain values backed by the system catalog.
//!
//! The catalog table is seeded at bootstrap and read-only afterwards;
//! these enums are the typed mirror of its rows. Every string that
//! crosses the storage boundary round-trips through `as_str`/`FromStr`.

use serde::{Deserialize, Serialize};

/// Catalog families recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogType {
    /// Account kinds (BANK, CASH, ...).
    AccountType,
    /// Accounting classifications (ASSET, LIABILITY, ...).
    AccountClassification,
    /// Transaction kinds (INCOME, EXPENSE, ...).
    TransactionType,
    /// Journal entry sides (DEBIT, CREDIT).
    EntrySide,
}

impl CatalogType {
    /// Returns the catalog type as stored in the catalog table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountType => "ACCOUNT_TYPE",
            Self::AccountClassification => "ACCOUNT_CLASSIFICATION",
            Self::TransactionType => "TRANSACTION_TYPE",
            Self::EntrySide => "ENTRY_SIDE",
        }
    }
}

impl std::fmt::Display for CatalogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CatalogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCOUNT_TYPE" => Ok(Self::AccountType),
            "ACCOUNT_CLASSIFICATION" => Ok(Self::AccountClassification),
            "TRANSACTION_TYPE" => Ok(Self::TransactionType),
            "ENTRY_SIDE" => Ok(Self::EntrySide),
            other => Err(format!("unknown catalog type: {other}")),
        }
    }
}

/// Account kinds.
///
/// All kinds except `Category` are **real** accounts whose balance is
/// cached on the account row. `Category` accounts are nominal
/// income/expense buckets whose balance is derived from journal entries
/// on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    /// Bank account.
    Bank,
    /// Physical cash.
    Cash,
    /// Credit card.
    CreditCard,
    /// Savings account.
    Savings,
    /// Investment account.
    Investment,
    /// Nominal income/expense bucket.
    Category,
}

impl AccountKind {
    /// Every account kind, in catalog display order.
    pub const ALL: [Self; 6] = [
        Self::Bank,
        Self::Cash,
        Self::CreditCard,
        Self::Savings,
        Self::Investment,
        Self::Category,
    ];

    /// Kinds counted as assets by the query layer.
    pub const ASSET_KINDS: [Self; 4] = [Self::Bank, Self::Cash, Self::Savings, Self::Investment];

    /// Kinds counted as liquid assets by the runway computation.
    pub const LIQUID_KINDS: [Self; 2] = [Self::Bank, Self::Cash];

    /// Returns the kind as stored in the catalog table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "BANK",
            Self::Cash => "CASH",
            Self::CreditCard => "CREDIT_CARD",
            Self::Savings => "SAVINGS",
            Self::Investment => "INVESTMENT",
            Self::Category => "CATEGORY",
        }
    }

    /// Returns true for accounts whose balance is cached on the row.
    #[must_use]
    pub const fn is_real(self) -> bool {
        !matches!(self, Self::Category)
    }

    /// Returns true for accounts counted as liquid assets (BANK, CASH).
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(self, Self::Bank | Self::Cash)
    }

    /// Returns true for accounts counted as liabilities (CREDIT_CARD).
    #[must_use]
    pub const fn is_liability(self) -> bool {
        matches!(self, Self::CreditCard)
    }

    /// Returns the accounting classification of a real account.
    ///
    /// Nominal `Category` accounts have no fixed classification; they
    /// classify as income or expense per the transactions that touch
    /// them, so this returns `None`.
    #[must_use]
    pub const fn classification(self) -> Option<AccountClassification> {
        match self {
            Self::Bank | Self::Cash | Self::Savings | Self::Investment => {
                Some(AccountClassification::Asset)
            }
            Self::CreditCard => Some(AccountClassification::Liability),
            Self::Category => None,
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BANK" => Ok(Self::Bank),
            "CASH" => Ok(Self::Cash),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "SAVINGS" => Ok(Self::Savings),
            "INVESTMENT" => Ok(Self::Investment),
            "CATEGORY" => Ok(Self::Category),
            other => Err(format!("unknown account kind: {other}")),
        }
    }
}

/// Accounting classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountClassification {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Income bucket.
    Income,
    /// Expense bucket.
    Expense,
}

impl AccountClassification {
    /// Returns the classification as stored in the catalog table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }
}

impl std::fmt::Display for AccountClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountClassification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSET" => Ok(Self::Asset),
            "LIABILITY" => Ok(Self::Liability),
            "EQUITY" => Ok(Self::Equity),
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(format!("unknown account classification: {other}")),
        }
    }
}

/// Transaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money enters a real account from an income category.
    Income,
    /// Money leaves a real account into an expense category.
    Expense,
    /// Money moves between two real accounts.
    Transfer,
    /// Debt payment. Present in the catalog but carries no posting rule
    /// yet; the posting engine rejects it.
    DebtPayment,
}

impl TransactionKind {
    /// Returns the kind as stored in the catalog table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
            Self::Transfer => "TRANSFER",
            Self::DebtPayment => "DEBT_PAYMENT",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            "TRANSFER" => Ok(Self::Transfer),
            "DEBT_PAYMENT" => Ok(Self::DebtPayment),
            other => Err(format!("unknown transaction kind: {other}")),
        }
    }
}

/// Journal entry side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntrySide {
    /// Debit entry.
    Debit,
    /// Credit entry.
    Credit,
}

impl EntrySide {
    /// Returns the side as stored in the catalog table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "DEBIT",
            Self::Credit => "CREDIT",
        }
    }

    /// Returns the opposite side. Reversal swaps every entry this way.
    #[must_use]
    pub const fn swapped(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

impl std::fmt::Display for EntrySide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntrySide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBIT" => Ok(Self::Debit),
            "CREDIT" => Ok(Self::Credit),
            other => Err(format!("unknown entry side: {other}")),
        }
    }
}

/// A resolved catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogValue {
    /// The catalog family this value belongs to.
    pub catalog_type: CatalogType,
    /// The stored value (e.g. "BANK").
    pub value: String,
    /// Human-readable label.
    pub label: String,
    /// Ordering hint for select options.
    pub display_order: i32,
    /// Whether the value is currently selectable.
    pub is_active: bool,
}
