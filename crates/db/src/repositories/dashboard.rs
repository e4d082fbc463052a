//! Dashboard queries: aggregate balances, monthly statistics, runway.
//!
//! All reads here are safe outside a writing unit of work;
//! snapshot-read isolation is sufficient. Aggregations assume the
//! caller keeps a single base currency view across accounts.

use std::collections::HashMap;

use arabella_core::catalog::AccountKind;
use arabella_core::dashboard::{compute_runway, MonthlyStats, RunwayStatus};
use arabella_core::ledger::{LedgerError, LedgerResult};
use arabella_shared::Money;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{accounts, currencies};
use crate::repositories::account::AccountRepository;
use crate::repositories::transaction::{month_of, TransactionRepository};
use crate::store_err;

/// Base currency reported on dashboard views.
// TODO: make the base currency configurable per owner.
const BASE_CURRENCY: &str = "USD";

const DEFAULT_CURRENCY_CODE: &str = "USD";
const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Number of months sampled for the expense average.
const RUNWAY_SAMPLE_MONTHS: u32 = 3;

/// One account's balance as shown on dashboard views.
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalance {
    /// Account id.
    pub id: Uuid,
    /// Account name.
    pub name: String,
    /// Account kind (BANK, CASH, ...).
    pub kind: String,
    /// Cached balance.
    pub balance: Money,
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Display symbol for the currency.
    pub currency_symbol: String,
    /// Whether the account is active.
    pub is_active: bool,
}

/// Complete dashboard view for one owner.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Sum of balances over BANK, CASH, SAVINGS, INVESTMENT accounts.
    pub total_assets: Money,
    /// Sum of balances over CREDIT_CARD accounts.
    pub total_liabilities: Money,
    /// Assets minus liabilities.
    pub net_worth: Money,
    /// Sum of balances over BANK and CASH accounts.
    pub liquid_assets: Money,
    /// Current-month income.
    pub monthly_income: Money,
    /// Current-month expenses.
    pub monthly_expenses: Money,
    /// Current-month income minus expenses.
    pub monthly_net_cash_flow: Money,
    /// Months of runway.
    pub runway_months: f64,
    /// Days of runway.
    pub runway_days: i64,
    /// Average monthly expenses backing the runway figure.
    pub average_monthly_expenses: Money,
    /// Per-account balances.
    pub account_balances: Vec<AccountBalance>,
    /// Timestamp the view was computed at.
    pub as_of: DateTime<Utc>,
    /// Base currency of the aggregates.
    pub base_currency: String,
}

/// Detailed runway view with per-kind account breakdowns.
#[derive(Debug, Clone, Serialize)]
pub struct RunwayReport {
    /// Sum of balances over BANK and CASH accounts.
    pub liquid_assets: Money,
    /// Sum of balances over CREDIT_CARD accounts.
    pub short_term_liabilities: Money,
    /// Liquid assets minus short-term liabilities.
    pub available_funds: Money,
    /// Average expenses over the recent months that had any.
    pub average_monthly_expenses: Money,
    /// Months of runway.
    pub runway_months: f64,
    /// Days of runway.
    pub runway_days: i64,
    /// Health classification.
    pub status: RunwayStatus,
    /// Advisory message; only WARNING and CRITICAL carry one.
    pub message: Option<String>,
    /// Timestamp the figure was computed at.
    pub calculation_date: DateTime<Utc>,
    /// Base currency of the aggregates.
    pub base_currency: String,
    /// Bank accounts feeding the liquid side.
    pub bank_accounts: Vec<AccountBalance>,
    /// Cash accounts feeding the liquid side.
    pub cash_accounts: Vec<AccountBalance>,
    /// Credit card accounts feeding the liability side.
    pub credit_card_accounts: Vec<AccountBalance>,
}

/// Dashboard repository for aggregate reads.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    db: DatabaseConnection,
    accounts: AccountRepository,
    transactions: TransactionRepository,
}

impl DashboardRepository {
    /// Creates a new dashboard repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            accounts: AccountRepository::new(db.clone()),
            transactions: TransactionRepository::new(db.clone()),
            db,
        }
    }

    /// Sum of balances over active BANK, CASH, SAVINGS, INVESTMENT
    /// accounts.
    pub async fn total_assets(&self, owner_id: Uuid) -> LedgerResult<Money> {
        self.accounts
            .sum_balance_by_kinds(owner_id, &AccountKind::ASSET_KINDS)
            .await
    }

    /// Sum of balances over active CREDIT_CARD accounts.
    pub async fn total_liabilities(&self, owner_id: Uuid) -> LedgerResult<Money> {
        self.accounts
            .sum_balance_by_kinds(owner_id, &[AccountKind::CreditCard])
            .await
    }

    /// Sum of balances over active BANK and CASH accounts.
    pub async fn liquid_assets(&self, owner_id: Uuid) -> LedgerResult<Money> {
        self.accounts
            .sum_balance_by_kinds(owner_id, &AccountKind::LIQUID_KINDS)
            .await
    }

    /// Assets minus liabilities.
    pub async fn net_worth(&self, owner_id: Uuid) -> LedgerResult<Money> {
        let assets = self.total_assets(owner_id).await?;
        let liabilities = self.total_liabilities(owner_id).await?;
        Ok(assets.checked_sub(liabilities)?)
    }

    /// Income and expense statistics for one calendar month.
    pub async fn monthly_stats(
        &self,
        owner_id: Uuid,
        month: u32,
        year: i32,
    ) -> LedgerResult<MonthlyStats> {
        let (income, expenses, count) = self
            .transactions
            .monthly_totals(owner_id, year, month)
            .await?;
        Ok(MonthlyStats::new(month, year, income, expenses, count)?)
    }

    /// Complete dashboard view for one owner.
    pub async fn dashboard(&self, owner_id: Uuid) -> LedgerResult<DashboardSummary> {
        let as_of = Utc::now();

        let total_assets = self.total_assets(owner_id).await?;
        let total_liabilities = self.total_liabilities(owner_id).await?;
        let net_worth = total_assets.checked_sub(total_liabilities)?;
        let liquid_assets = self.liquid_assets(owner_id).await?;

        let (year, month) = current_month(as_of, 0)?;
        let (monthly_income, monthly_expenses, _) = self
            .transactions
            .monthly_totals(owner_id, year, month)
            .await?;
        let monthly_net_cash_flow = monthly_income.checked_sub(monthly_expenses)?;

        let available = liquid_assets.checked_sub(total_liabilities)?;
        let expenses = self.recent_monthly_expenses(owner_id, as_of).await?;
        let runway = compute_runway(available, &expenses)?;

        let account_rows = self.accounts.find_by_owner(owner_id).await?;
        let account_balances = self.with_currencies(account_rows).await?;

        Ok(DashboardSummary {
            total_assets,
            total_liabilities,
            net_worth,
            liquid_assets,
            monthly_income,
            monthly_expenses,
            monthly_net_cash_flow,
            runway_months: runway.runway_months,
            runway_days: runway.runway_days,
            average_monthly_expenses: runway.average_monthly_expenses,
            account_balances,
            as_of,
            base_currency: BASE_CURRENCY.to_string(),
        })
    }

    /// Detailed runway view with status, message, and per-kind account
    /// breakdowns.
    pub async fn runway(&self, owner_id: Uuid) -> LedgerResult<RunwayReport> {
        let calculation_date = Utc::now();

        let liquid_assets = self.liquid_assets(owner_id).await?;
        let short_term_liabilities = self.total_liabilities(owner_id).await?;
        let available_funds = liquid_assets.checked_sub(short_term_liabilities)?;

        let expenses = self
            .recent_monthly_expenses(owner_id, calculation_date)
            .await?;
        let runway = compute_runway(available_funds, &expenses)?;

        let bank = self
            .accounts
            .find_by_owner_and_kind(owner_id, AccountKind::Bank)
            .await?;
        let cash = self
            .accounts
            .find_by_owner_and_kind(owner_id, AccountKind::Cash)
            .await?;
        let credit_cards = self
            .accounts
            .find_by_owner_and_kind(owner_id, AccountKind::CreditCard)
            .await?;

        Ok(RunwayReport {
            liquid_assets,
            short_term_liabilities,
            available_funds,
            average_monthly_expenses: runway.average_monthly_expenses,
            runway_months: runway.runway_months,
            runway_days: runway.runway_days,
            status: runway.status,
            message: runway.message,
            calculation_date,
            base_currency: BASE_CURRENCY.to_string(),
            bank_accounts: self.with_currencies(bank).await?,
            cash_accounts: self.with_currencies(cash).await?,
            credit_card_accounts: self.with_currencies(credit_cards).await?,
        })
    }

    /// Expense totals for the current month and the two preceding
    /// months, most recent first.
    async fn recent_monthly_expenses(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> LedgerResult<Vec<Money>> {
        let mut expenses = Vec::with_capacity(RUNWAY_SAMPLE_MONTHS as usize);
        for offset in 0..RUNWAY_SAMPLE_MONTHS {
            let (year, month) = current_month(now, offset)?;
            let (_, month_expenses, _) = self
                .transactions
                .monthly_totals(owner_id, year, month)
                .await?;
            expenses.push(month_expenses);
        }
        Ok(expenses)
    }

    /// Decorates account rows with their currency code and symbol.
    async fn with_currencies(
        &self,
        rows: Vec<accounts::Model>,
    ) -> LedgerResult<Vec<AccountBalance>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let currency_ids: Vec<Uuid> = rows.iter().map(|a| a.currency_id).collect();
        let currency_rows = currencies::Entity::find()
            .filter(currencies::Column::Id.is_in(currency_ids))
            .all(&self.db)
            .await
            .map_err(store_err)?;

        let by_id: HashMap<Uuid, &currencies::Model> =
            currency_rows.iter().map(|c| (c.id, c)).collect();

        rows.into_iter()
            .map(|account| {
                let (code, symbol) = by_id.get(&account.currency_id).map_or_else(
                    || {
                        (
                            DEFAULT_CURRENCY_CODE.to_string(),
                            DEFAULT_CURRENCY_SYMBOL.to_string(),
                        )
                    },
                    |c| (c.code.clone(), c.symbol.clone()),
                );

                Ok(AccountBalance {
                    id: account.id,
                    name: account.name,
                    kind: account.kind,
                    balance: Money::new(account.balance)?,
                    currency_code: code,
                    currency_symbol: symbol,
                    is_active: account.is_active,
                })
            })
            .collect()
    }
}

fn current_month(now: DateTime<Utc>, offset: u32) -> LedgerResult<(i32, u32)> {
    month_of(now, offset)
        .ok_or_else(|| LedgerError::Store("month arithmetic out of range".to_string()))
}
