//! Jewellery-workshop bookkeeping: sign rules, the ledger balance engine,
//! ranged ledgers, statements, type summaries and the cheque register.

pub mod book;
pub mod cheques;
pub mod engine;
pub mod error;
pub mod models;
pub mod period;
pub mod rules;
pub mod statement;
pub mod summary;
pub mod time;
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use book::{map_records, Book, BookData, BookOperations, BookSummary};
pub use cheques::{ChequeEntry, ChequeRegister, ChequeTotals, StatusTotal};
pub use engine::{compute_ledger, fold_balance, Balance, EntryKind, LedgerEntry, LedgerReport, Totals};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use models::{Account, ChequeDetails, Voucher};
pub use period::{ledger_by_slicing, ledger_for_range, opening_balance, DateRange};
pub use rules::{locker_effect, sign_rule, LedgerScope, LockerEffect, SignRule, VoucherFlags};
pub use statement::{build_statement, Statement, StatementPage, StatementRow};
pub use summary::{type_summary, AccountBalanceLine, TypeSummary};
pub use time::TimeContext;
pub use types::{AccountType, ChequeStatus, PaymentMethod, VoucherType};
