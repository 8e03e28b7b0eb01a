//! Raw record types as they appear in book files.
//!
//! Enumerated fields (`type`, `payment_method`, cheque `status`) are kept as
//! strings here; the core crate validates them when mapping records into
//! domain values.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One book file: optional includes plus accounts and vouchers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookFile {
    /// Other book files to load, relative to this file (glob patterns allowed)
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    #[serde(default)]
    pub vouchers: Vec<VoucherRecord>,
}

/// Account row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: u64,
    pub name: String,
    /// Market, Casting, Faceting, Project or Gold Fixing
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Commercial registration number
    #[serde(default)]
    pub crn: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Voucher row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherRecord {
    pub id: u64,
    /// Manual voucher number printed on the paper voucher
    #[serde(default)]
    pub mvn: Option<String>,
    pub date: NaiveDate,
    /// INV, REC or GFV
    #[serde(rename = "type")]
    pub voucher_type: String,
    pub account_id: u64,
    /// Defaults to the owning account's type when absent
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub gold: Decimal,
    #[serde(default)]
    pub kwd: Decimal,
    #[serde(default)]
    pub gold_rate: Option<Decimal>,
    #[serde(default)]
    pub fixing_amount: Option<Decimal>,
    /// cash or cheque
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub cheque: Option<ChequeRecord>,
}

/// Cheque details attached to a cheque receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChequeRecord {
    pub number: String,
    #[serde(default)]
    pub bank: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// pending, deposited, cleared, bounced or cancelled
    #[serde(default)]
    pub status: Option<String>,
}

/// Everything loaded from a book file and its includes, in file order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookRecords {
    pub accounts: Vec<AccountRecord>,
    pub vouchers: Vec<VoucherRecord>,
}

impl BookRecords {
    /// Append another set of records after these
    pub fn extend(&mut self, other: BookRecords) {
        self.accounts.extend(other.accounts);
        self.vouchers.extend(other.vouchers);
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.vouchers.is_empty()
    }
}
