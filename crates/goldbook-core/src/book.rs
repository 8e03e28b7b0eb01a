//! Book facade: loaded accounts and vouchers plus the reports built on them

use chrono::NaiveDate;
use goldbook_config::{Config, TimeRange};
use goldbook_store::{AccountRecord, BookFormat, BookRecords, ChequeRecord, SourceRef, VoucherRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use crate::cheques::{apply_transition, ChequeRegister};
use crate::engine::LedgerReport;
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{Account, ChequeDetails, Voucher};
use crate::period::{ledger_for_range, DateRange};
use crate::rules::LedgerScope;
use crate::statement::{build_statement, Statement};
use crate::summary::{type_summary, TypeSummary};
use crate::time::TimeContext;
use crate::types::{AccountType, ChequeStatus, PaymentMethod, VoucherType};

/// In-memory book data
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BookData {
    pub accounts: Vec<Account>,
    /// Stable-sorted by date
    pub vouchers: Vec<Voucher>,
}

/// Main book structure
pub struct Book {
    config: Config,
    source: SourceRef,
    data: Option<BookData>,
    entry: Option<PathBuf>,
    time_context: TimeContext,
}

fn invalid(message: String) -> CoreError {
    CoreError::InvalidFormat { message }
}

fn map_account(record: AccountRecord) -> CoreResult<Account> {
    let account_type = record
        .account_type
        .parse::<AccountType>()
        .map_err(|e| invalid(format!("account {}: {}", record.id, e)))?;
    Ok(Account {
        id: record.id,
        name: record.name,
        account_type,
        phone: record.phone,
        crn: record.crn,
        note: record.note,
    })
}

fn map_cheque(voucher_id: u64, record: ChequeRecord) -> CoreResult<ChequeDetails> {
    let status = match record.status {
        Some(status) => status
            .parse::<ChequeStatus>()
            .map_err(|e| invalid(format!("voucher {}: {}", voucher_id, e)))?,
        None => ChequeStatus::default(),
    };
    Ok(ChequeDetails {
        number: record.number,
        bank: record.bank,
        due_date: record.due_date,
        status,
    })
}

fn map_voucher(record: VoucherRecord, accounts: &HashMap<u64, AccountType>) -> CoreResult<Voucher> {
    let id = record.id;
    let voucher_type = record
        .voucher_type
        .parse::<VoucherType>()
        .map_err(|e| invalid(format!("voucher {}: {}", id, e)))?;
    if voucher_type == VoucherType::Bal {
        return Err(invalid(format!("voucher {}: BAL entries are generated, not stored", id)));
    }

    let owner_type = *accounts
        .get(&record.account_id)
        .ok_or(CoreError::AccountNotFound { id: record.account_id })?;
    let account_type = match record.account_type {
        Some(t) => t
            .parse::<AccountType>()
            .map_err(|e| invalid(format!("voucher {}: {}", id, e)))?,
        None => owner_type,
    };

    let amounts = [
        ("gold", Some(record.gold)),
        ("kwd", Some(record.kwd)),
        ("gold_rate", record.gold_rate),
        ("fixing_amount", record.fixing_amount),
    ];
    if let Some((field, _)) = amounts
        .iter()
        .find(|(_, value)| value.map_or(false, |v| v.is_sign_negative() && !v.is_zero()))
    {
        return Err(CoreError::ValidationError {
            message: format!("voucher {}: {} must be non-negative", id, field),
        });
    }

    let payment_method = record
        .payment_method
        .map(|m| m.parse::<PaymentMethod>())
        .transpose()
        .map_err(|e| invalid(format!("voucher {}: {}", id, e)))?;
    let cheque = record.cheque.map(|c| map_cheque(id, c)).transpose()?;

    Ok(Voucher {
        id,
        mvn: record.mvn,
        date: record.date,
        voucher_type,
        account_id: record.account_id,
        account_type,
        description: record.description,
        gold: record.gold,
        kwd: record.kwd,
        gold_rate: record.gold_rate,
        fixing_amount: record.fixing_amount,
        payment_method,
        cheque,
    })
}

/// Validate raw records and turn them into book data
pub fn map_records(records: BookRecords) -> CoreResult<BookData> {
    let mut accounts = Vec::with_capacity(records.accounts.len());
    let mut account_types = HashMap::new();
    for record in records.accounts {
        let account = map_account(record)?;
        if account_types.insert(account.id, account.account_type).is_some() {
            return Err(CoreError::ValidationError {
                message: format!("duplicate account id {}", account.id),
            });
        }
        accounts.push(account);
    }

    let mut seen = HashSet::new();
    let mut vouchers = Vec::with_capacity(records.vouchers.len());
    for record in records.vouchers {
        if !seen.insert(record.id) {
            return Err(CoreError::ValidationError {
                message: format!("duplicate voucher id {}", record.id),
            });
        }
        vouchers.push(map_voucher(record, &account_types)?);
    }
    // stable: same-day vouchers keep file order
    vouchers.sort_by_key(|v| v.date);

    Ok(BookData { accounts, vouchers })
}

impl Book {
    /// Create an empty book with config and source
    pub fn new(config: Config, source: SourceRef) -> Self {
        let time_context = TimeContext::new(config.time_range.default_range)
            .with_fiscal_year_start(config.time_range.fiscal_year_start);
        Self {
            config,
            source,
            data: None,
            entry: None,
            time_context,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the book from a file and its includes
    pub async fn load(&mut self, entry: PathBuf) -> CoreResult<()> {
        let result = self.source.load_file(entry.clone()).await;
        let records = self.check(result.map_err(CoreError::from), ErrorContext::new("load"))?;
        self.install(records)?;
        self.entry = Some(entry);
        Ok(())
    }

    /// Load the book from in-memory content
    pub async fn load_str(&mut self, content: &str, format: BookFormat) -> CoreResult<()> {
        let result = self.source.load_str(content, format).await;
        let records = self.check(result.map_err(CoreError::from), ErrorContext::new("load_str"))?;
        self.install(records)?;
        self.entry = None;
        Ok(())
    }

    /// Reload from the file last loaded
    pub async fn reload(&mut self) -> CoreResult<()> {
        match self.entry.clone() {
            Some(entry) => self.load(entry).await,
            None => Err(CoreError::NotLoaded),
        }
    }

    fn check<T>(&self, result: CoreResult<T>, context: ErrorContext) -> CoreResult<T> {
        if let Err(ref error) = result {
            DefaultErrorLogger.log_error(error, &context);
        }
        result
    }

    fn install(&mut self, records: BookRecords) -> CoreResult<()> {
        let data = self.check(map_records(records), ErrorContext::new("map_records"))?;
        log::info!(
            "Loaded {} accounts and {} vouchers",
            data.accounts.len(),
            data.vouchers.len()
        );
        self.data = Some(data);
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    fn data(&self) -> CoreResult<&BookData> {
        self.data.as_ref().ok_or(CoreError::NotLoaded)
    }

    // ==================== Accounts ====================

    pub fn accounts(&self) -> CoreResult<&[Account]> {
        Ok(&self.data()?.accounts)
    }

    pub fn account(&self, id: u64) -> CoreResult<&Account> {
        self.data()?
            .accounts
            .iter()
            .find(|a| a.id == id)
            .ok_or(CoreError::AccountNotFound { id })
    }

    pub fn search_accounts(&self, query: &str) -> CoreResult<Vec<&Account>> {
        Ok(self.data()?.accounts.iter().filter(|a| a.matches(query)).collect())
    }

    pub fn accounts_of_type(&self, account_type: AccountType) -> CoreResult<Vec<&Account>> {
        Ok(self
            .data()?
            .accounts
            .iter()
            .filter(|a| a.account_type == account_type)
            .collect())
    }

    // ==================== Vouchers ====================

    pub fn vouchers(&self) -> CoreResult<&[Voucher]> {
        Ok(&self.data()?.vouchers)
    }

    pub fn voucher(&self, id: u64) -> CoreResult<&Voucher> {
        self.data()?
            .vouchers
            .iter()
            .find(|v| v.id == id)
            .ok_or(CoreError::VoucherNotFound { id })
    }

    /// One account's vouchers in date order, same-day vouchers in file order
    pub fn vouchers_for_account(&self, account_id: u64) -> CoreResult<Vec<Voucher>> {
        self.account(account_id)?;
        Ok(self
            .data()?
            .vouchers
            .iter()
            .filter(|v| v.account_id == account_id)
            .cloned()
            .collect())
    }

    // ==================== Ledgers ====================

    fn ranged_context(operation: &str, range: &DateRange) -> ErrorContext {
        ErrorContext::new(operation).with_data("range", serde_json::json!(range))
    }

    /// Gold and currency balance sheet of one account
    pub fn account_ledger(&self, account_id: u64, range: &DateRange) -> CoreResult<LedgerReport> {
        let context = Self::ranged_context("account_ledger", range).with_account(account_id);
        let history = self.check(self.vouchers_for_account(account_id), context)?;
        Ok(ledger_for_range(&history, range, LedgerScope::Balance))
    }

    /// Gold-fixing ("open balance") ledger of a Market account
    pub fn open_balance_ledger(&self, account_id: u64, range: &DateRange) -> CoreResult<LedgerReport> {
        let context = Self::ranged_context("open_balance_ledger", range).with_account(account_id);
        let history = self.check(self.market_history(account_id), context)?;
        Ok(ledger_for_range(&history, range, LedgerScope::OpenBalance))
    }

    fn market_history(&self, account_id: u64) -> CoreResult<Vec<Voucher>> {
        let account = self.account(account_id)?;
        if account.account_type != AccountType::Market {
            return Err(CoreError::ValidationError {
                message: format!(
                    "open balance ledger needs a Market account, {} is {}",
                    account_id, account.account_type
                ),
            });
        }
        self.vouchers_for_account(account_id)
    }

    /// Locker gold across every account
    pub fn locker_ledger(&self, range: &DateRange) -> CoreResult<LedgerReport> {
        Ok(ledger_for_range(&self.data()?.vouchers, range, LedgerScope::Locker))
    }

    /// Closing balances of every account of one type
    pub fn type_summary(&self, account_type: AccountType, as_of: Option<NaiveDate>) -> CoreResult<TypeSummary> {
        let data = self.data()?;
        Ok(type_summary(account_type, &data.accounts, &data.vouchers, as_of))
    }

    // ==================== Statements ====================

    /// Paginated balance statement; `rows_per_page` overrides the config
    pub fn statement(
        &self,
        account_id: u64,
        range: &DateRange,
        rows_per_page: Option<usize>,
    ) -> CoreResult<Statement> {
        let report = self.account_ledger(account_id, range)?;
        self.paginate(Some(self.account(account_id)?), &report, rows_per_page)
    }

    /// Paginated gold-fixing statement of a Market account
    pub fn open_balance_statement(
        &self,
        account_id: u64,
        range: &DateRange,
        rows_per_page: Option<usize>,
    ) -> CoreResult<Statement> {
        let report = self.open_balance_ledger(account_id, range)?;
        self.paginate(Some(self.account(account_id)?), &report, rows_per_page)
    }

    /// Paginated locker gold statement for the whole workshop
    pub fn locker_statement(&self, range: &DateRange, rows_per_page: Option<usize>) -> CoreResult<Statement> {
        let report = self.locker_ledger(range)?;
        self.paginate(None, &report, rows_per_page)
    }

    fn paginate(
        &self,
        account: Option<&Account>,
        report: &LedgerReport,
        rows_per_page: Option<usize>,
    ) -> CoreResult<Statement> {
        let mut statement_config = self.config.statement.clone();
        if let Some(rows) = rows_per_page {
            statement_config.rows_per_page = rows;
            let context = ErrorContext::new("statement").with_data("rows_per_page", serde_json::json!(rows));
            self.check(statement_config.validate().map_err(CoreError::from), context)?;
        }
        Ok(build_statement(account, report, &self.config.ledger, &statement_config))
    }

    // ==================== Cheques ====================

    pub fn cheques(&self) -> CoreResult<ChequeRegister> {
        Ok(ChequeRegister::from_vouchers(&self.data()?.vouchers))
    }

    /// Change a cheque's status, returning the previous one
    pub fn set_cheque_status(&mut self, voucher_id: u64, status: ChequeStatus) -> CoreResult<ChequeStatus> {
        let data = self.data.as_mut().ok_or(CoreError::NotLoaded)?;
        let voucher = data
            .vouchers
            .iter_mut()
            .find(|v| v.id == voucher_id)
            .ok_or(CoreError::VoucherNotFound { id: voucher_id })?;
        if !voucher.is_cheque() {
            return Err(CoreError::ValidationError {
                message: format!("voucher {} was not paid by cheque", voucher_id),
            });
        }

        let context = ErrorContext::new("set_cheque_status")
            .with_account(voucher.account_id)
            .with_data("voucher_id", serde_json::json!(voucher_id));
        let reference = voucher.reference();
        let details = voucher.cheque.get_or_insert_with(|| ChequeDetails {
            number: reference,
            bank: None,
            due_date: None,
            status: ChequeStatus::Pending,
        });
        let previous = details.status;
        if let Err(error) = apply_transition(details, status) {
            DefaultErrorLogger.log_error(&error, &context);
            return Err(error);
        }
        log::info!("Cheque {} on voucher {}: {} -> {}", details.number, voucher_id, previous, status);
        Ok(previous)
    }

    // ==================== Time Context ====================

    pub fn time_context(&self) -> &TimeContext {
        &self.time_context
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.time_context.range = range;
    }

    /// Switch to a custom range, rejecting start after end
    pub fn set_custom_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> CoreResult<()> {
        DateRange::new(start, end)?;
        self.time_context = TimeContext::custom(start, end)
            .with_fiscal_year_start(self.config.time_range.fiscal_year_start);
        Ok(())
    }

    /// Date range selected by the time context as of today
    pub fn current_range(&self) -> CoreResult<DateRange> {
        self.time_context.current_range()
    }
}

// ==================== Book Operations ====================

/// Book operations trait
pub trait BookOperations {
    /// Get book summary
    fn summary(&self) -> CoreResult<BookSummary>;
}

/// Book summary
#[derive(Debug, Serialize, Deserialize)]
pub struct BookSummary {
    pub total_accounts: usize,
    pub total_vouchers: usize,
    pub accounts_by_type: BTreeMap<String, usize>,
    pub outstanding_cheques: usize,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}

impl BookOperations for Book {
    fn summary(&self) -> CoreResult<BookSummary> {
        let data = self.data()?;
        let mut accounts_by_type = BTreeMap::new();
        for account in &data.accounts {
            *accounts_by_type.entry(account.account_type.to_string()).or_insert(0) += 1;
        }
        Ok(BookSummary {
            total_accounts: data.accounts.len(),
            total_vouchers: data.vouchers.len(),
            accounts_by_type,
            outstanding_cheques: self.cheques()?.outstanding().len(),
            period_start: data.vouchers.first().map(|v| v.date),
            period_end: data.vouchers.last().map(|v| v.date),
        })
    }
}
