//! Cheque register
//!
//! Cheque receipts are tracked separately from the ledgers: a cheque's
//! status never changes balance arithmetic, only what the register reports
//! as outstanding.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};
use crate::models::{ChequeDetails, Voucher};
use crate::types::{AccountType, ChequeStatus};

/// Check a status change, returning the new status
pub fn transition(current: ChequeStatus, next: ChequeStatus) -> CoreResult<ChequeStatus> {
    if current.can_transition_to(next) {
        Ok(next)
    } else {
        Err(CoreError::InvalidChequeTransition { from: current, to: next })
    }
}

/// Move cheque details to `next`, leaving them untouched on failure
pub fn apply_transition(details: &mut ChequeDetails, next: ChequeStatus) -> CoreResult<()> {
    details.status = transition(details.status, next)?;
    Ok(())
}

/// One cheque in the register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChequeEntry {
    pub voucher_id: u64,
    pub account_id: u64,
    pub account_type: AccountType,
    /// Voucher date (date received)
    pub date: NaiveDate,
    pub number: String,
    pub bank: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub status: ChequeStatus,
}

impl ChequeEntry {
    fn from_voucher(voucher: &Voucher) -> Self {
        let (number, bank, due_date, status) = match &voucher.cheque {
            Some(c) => (c.number.clone(), c.bank.clone(), c.due_date, c.status),
            None => (voucher.reference(), None, None, ChequeStatus::Pending),
        };
        Self {
            voucher_id: voucher.id,
            account_id: voucher.account_id,
            account_type: voucher.account_type,
            date: voucher.date,
            number,
            bank,
            due_date,
            amount: voucher.kwd,
            status,
        }
    }

    /// Due date, falling back to the date received
    pub fn effective_due_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.date)
    }
}

/// Count and amount for one status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTotal {
    pub count: usize,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChequeTotals {
    pub by_status: BTreeMap<ChequeStatus, StatusTotal>,
    pub outstanding: StatusTotal,
}

/// All cheque receipts of a book
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChequeRegister {
    entries: Vec<ChequeEntry>,
}

impl ChequeRegister {
    /// Collect every voucher paid by cheque, in voucher order
    pub fn from_vouchers<'a>(vouchers: impl IntoIterator<Item = &'a Voucher>) -> Self {
        let entries = vouchers
            .into_iter()
            .filter(|v| v.is_cheque())
            .map(ChequeEntry::from_voucher)
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[ChequeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, voucher_id: u64) -> Option<&ChequeEntry> {
        self.entries.iter().find(|e| e.voucher_id == voucher_id)
    }

    pub fn by_status(&self, status: ChequeStatus) -> Vec<&ChequeEntry> {
        self.entries.iter().filter(|e| e.status == status).collect()
    }

    pub fn for_account(&self, account_id: u64) -> Vec<&ChequeEntry> {
        self.entries.iter().filter(|e| e.account_id == account_id).collect()
    }

    /// Pending or deposited cheques
    pub fn outstanding(&self) -> Vec<&ChequeEntry> {
        self.entries.iter().filter(|e| e.status.is_outstanding()).collect()
    }

    /// Outstanding cheques due on or before `today + days`, overdue ones
    /// included, earliest first
    pub fn due_within(&self, today: NaiveDate, days: i64) -> Vec<&ChequeEntry> {
        let horizon = today + Duration::days(days.max(0));
        let mut due: Vec<&ChequeEntry> = self
            .entries
            .iter()
            .filter(|e| e.status.is_outstanding() && e.effective_due_date() <= horizon)
            .collect();
        due.sort_by_key(|e| e.effective_due_date());
        due
    }

    pub fn totals(&self) -> ChequeTotals {
        let mut totals = ChequeTotals::default();
        for entry in &self.entries {
            let slot = totals.by_status.entry(entry.status).or_default();
            slot.count += 1;
            slot.amount += entry.amount;
            if entry.status.is_outstanding() {
                totals.outstanding.count += 1;
                totals.outstanding.amount += entry.amount;
            }
        }
        totals
    }

    /// Change one cheque's status in the register
    pub fn set_status(&mut self, voucher_id: u64, next: ChequeStatus) -> CoreResult<ChequeStatus> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.voucher_id == voucher_id)
            .ok_or(CoreError::VoucherNotFound { id: voucher_id })?;
        let previous = entry.status;
        entry.status = transition(previous, next)?;
        Ok(previous)
    }
}
