//! Printable statements
//!
//! A statement is a formatted, paginated projection of a [`LedgerReport`].
//! Every ledger row (boundary rows included) becomes one statement row;
//! pages hold a fixed number of rows and only the last page carries the
//! closing totals. The locker statement covers the whole workshop and has
//! no account in its header.

use goldbook_config::{LedgerConfig, StatementConfig};
use goldbook_utils::{format_amount, format_cell};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::{EntryKind, LedgerEntry, LedgerReport};
use crate::models::Account;
use crate::rules::LedgerScope;

const WORKSHOP_NAME: &str = "All accounts";

/// Statement heading, repeated on every page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementHeader {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<u64>,
    pub account_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    pub scope: LedgerScope,
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub currency: String,
    pub gold_unit: String,
}

/// One printed line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub date: String,
    pub reference: String,
    pub voucher_type: String,
    pub description: String,
    pub gold_debit: String,
    pub gold_credit: String,
    pub gold_balance: String,
    pub currency_debit: String,
    pub currency_credit: String,
    pub currency_balance: String,
}

/// Column totals printed under the last page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTotals {
    pub gold_debit: String,
    pub gold_credit: String,
    pub closing_gold: String,
    pub currency_debit: String,
    pub currency_credit: String,
    pub closing_currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementPage {
    /// 1-based page number
    pub number: usize,
    pub rows: Vec<StatementRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<StatementTotals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub header: StatementHeader,
    pub pages: Vec<StatementPage>,
    pub page_count: usize,
}

impl Statement {
    pub fn row_count(&self) -> usize {
        self.pages.iter().map(|p| p.rows.len()).sum()
    }
}

/// Formats amounts with the configured precision and separators
struct AmountFormatter<'a> {
    config: &'a LedgerConfig,
}

impl AmountFormatter<'_> {
    fn gold(&self, value: Decimal) -> String {
        format_amount(
            value,
            self.config.gold_decimal_places,
            &self.config.thousands_separator,
            &self.config.decimal_separator,
        )
    }

    fn currency(&self, value: Decimal) -> String {
        format_amount(
            value,
            self.config.currency_decimal_places,
            &self.config.thousands_separator,
            &self.config.decimal_separator,
        )
    }

    /// Debit/credit cells are blank when zero
    fn gold_cell(&self, value: Decimal) -> String {
        format_cell(
            value,
            self.config.gold_decimal_places,
            &self.config.thousands_separator,
            &self.config.decimal_separator,
        )
    }

    fn currency_cell(&self, value: Decimal) -> String {
        format_cell(
            value,
            self.config.currency_decimal_places,
            &self.config.thousands_separator,
            &self.config.decimal_separator,
        )
    }
}

/// Gold columns of an entry; the locker ledger prints locker movements there
fn gold_columns(scope: LedgerScope, entry: &LedgerEntry) -> (Decimal, Decimal, Decimal) {
    match scope {
        LedgerScope::Locker => (entry.locker_in, entry.locker_out, entry.balance.locker_gold),
        _ => (entry.gold_debit, entry.gold_credit, entry.balance.gold),
    }
}

fn format_row(fmt: &AmountFormatter<'_>, scope: LedgerScope, entry: &LedgerEntry) -> StatementRow {
    let (gold_debit, gold_credit, gold_balance) = gold_columns(scope, entry);
    let description = match entry.kind {
        EntryKind::Opening => "Opening balance".to_string(),
        EntryKind::Closing => "Closing balance".to_string(),
        EntryKind::Voucher => entry.description.clone().unwrap_or_default(),
    };
    let (currency_debit, currency_credit, currency_balance) = if scope == LedgerScope::Locker {
        (String::new(), String::new(), String::new())
    } else {
        (
            fmt.currency_cell(entry.currency_debit),
            fmt.currency_cell(entry.currency_credit),
            fmt.currency(entry.balance.currency),
        )
    };

    StatementRow {
        date: entry.date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default(),
        reference: entry.reference.clone().unwrap_or_default(),
        voucher_type: entry.voucher_type.to_string(),
        description,
        gold_debit: fmt.gold_cell(gold_debit),
        gold_credit: fmt.gold_cell(gold_credit),
        gold_balance: fmt.gold(gold_balance),
        currency_debit,
        currency_credit,
        currency_balance,
    }
}

fn format_totals(fmt: &AmountFormatter<'_>, report: &LedgerReport) -> StatementTotals {
    let totals = &report.totals;
    let (gold_debit, gold_credit, closing_gold) = match report.scope {
        LedgerScope::Locker => (totals.locker_in, totals.locker_out, report.closing.locker_gold),
        _ => (totals.gold_debit, totals.gold_credit, report.closing.gold),
    };
    StatementTotals {
        gold_debit: fmt.gold(gold_debit),
        gold_credit: fmt.gold(gold_credit),
        closing_gold: fmt.gold(closing_gold),
        currency_debit: fmt.currency(totals.currency_debit),
        currency_credit: fmt.currency(totals.currency_credit),
        closing_currency: fmt.currency(report.closing.currency),
    }
}

/// Build a paginated statement for one account's ledger, or for the
/// workshop locker when `account` is `None`
pub fn build_statement(
    account: Option<&Account>,
    report: &LedgerReport,
    ledger_config: &LedgerConfig,
    statement_config: &StatementConfig,
) -> Statement {
    let fmt = AmountFormatter { config: ledger_config };
    let rows_per_page = statement_config.rows_per_page.max(1);

    let header = StatementHeader {
        title: statement_config.title.clone(),
        account_id: account.map(|a| a.id),
        account_name: account.map_or_else(|| WORKSHOP_NAME.to_string(), |a| a.name.clone()),
        account_type: account.map(|a| a.account_type.to_string()),
        scope: report.scope,
        period_start: report.entries.first().and_then(|e| e.date).map(|d| d.to_string()),
        period_end: report.entries.last().and_then(|e| e.date).map(|d| d.to_string()),
        currency: ledger_config.currency.clone(),
        gold_unit: ledger_config.gold_unit.clone(),
    };

    let rows: Vec<StatementRow> = report
        .entries
        .iter()
        .map(|entry| format_row(&fmt, report.scope, entry))
        .collect();

    let mut pages: Vec<StatementPage> = rows
        .chunks(rows_per_page)
        .enumerate()
        .map(|(i, chunk)| StatementPage {
            number: i + 1,
            rows: chunk.to_vec(),
            totals: None,
        })
        .collect();

    if pages.is_empty() {
        pages.push(StatementPage {
            number: 1,
            rows: Vec::new(),
            totals: None,
        });
    }
    if let Some(last) = pages.last_mut() {
        last.totals = Some(format_totals(&fmt, report));
    }

    log::debug!(
        "{:?} statement for {}: {} rows on {} pages",
        report.scope,
        header.account_name,
        rows.len(),
        pages.len()
    );

    Statement {
        header,
        page_count: pages.len(),
        pages,
    }
}
