//! Ledger balance engine
//!
//! A single sequential fold over date-ordered vouchers. Each voucher's
//! contribution is decided by [`sign_rule`] and [`locker_effect`]; the engine
//! only accumulates. Input order is trusted: vouchers are processed exactly
//! as given, and a date going backwards is logged but never corrected.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::Voucher;
use crate::rules::{locker_effect, sign_rule, LedgerScope, LockerEffect, SignRule, VoucherFlags};
use crate::types::VoucherType;

/// Running balance state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub gold: Decimal,
    pub currency: Decimal,
    pub locker_gold: Decimal,
}

impl Balance {
    pub fn new(gold: Decimal, currency: Decimal) -> Self {
        Self {
            gold,
            currency,
            locker_gold: Decimal::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.gold.is_zero() && self.currency.is_zero() && self.locker_gold.is_zero()
    }
}

impl std::ops::Sub for Balance {
    type Output = Balance;

    fn sub(self, rhs: Balance) -> Balance {
        Balance {
            gold: self.gold - rhs.gold,
            currency: self.currency - rhs.currency,
            locker_gold: self.locker_gold - rhs.locker_gold,
        }
    }
}

/// Debit/credit totals for a ledger, boundary entries excluded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub gold_debit: Decimal,
    pub gold_credit: Decimal,
    pub currency_debit: Decimal,
    pub currency_credit: Decimal,
    pub locker_in: Decimal,
    pub locker_out: Decimal,
}

impl Totals {
    pub(crate) fn add(&mut self, entry: &LedgerEntry) {
        self.gold_debit += entry.gold_debit;
        self.gold_credit += entry.gold_credit;
        self.currency_debit += entry.currency_debit;
        self.currency_credit += entry.currency_credit;
        self.locker_in += entry.locker_in;
        self.locker_out += entry.locker_out;
    }

    /// Debits minus credits, one field per accumulator
    pub fn net(&self) -> Balance {
        Balance {
            gold: self.gold_debit - self.gold_credit,
            currency: self.currency_debit - self.currency_credit,
            locker_gold: self.locker_in - self.locker_out,
        }
    }
}

/// What produced a ledger row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Opening,
    Voucher,
    Closing,
}

/// One ledger row with the balance snapshot after it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub kind: EntryKind,
    pub date: Option<NaiveDate>,
    pub voucher_type: VoucherType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voucher_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rule: SignRule,
    pub gold_debit: Decimal,
    pub gold_credit: Decimal,
    pub currency_debit: Decimal,
    pub currency_credit: Decimal,
    pub locker_in: Decimal,
    pub locker_out: Decimal,
    pub balance: Balance,
}

impl LedgerEntry {
    /// Synthetic BAL row: zero movement, balance snapshot only
    pub(crate) fn boundary(kind: EntryKind, date: Option<NaiveDate>, balance: Balance) -> Self {
        Self {
            kind,
            date,
            voucher_type: VoucherType::Bal,
            voucher_id: None,
            reference: None,
            description: None,
            rule: SignRule::Ignore,
            gold_debit: Decimal::ZERO,
            gold_credit: Decimal::ZERO,
            currency_debit: Decimal::ZERO,
            currency_credit: Decimal::ZERO,
            locker_in: Decimal::ZERO,
            locker_out: Decimal::ZERO,
            balance,
        }
    }

    pub fn is_boundary(&self) -> bool {
        self.kind != EntryKind::Voucher
    }
}

/// Computed ledger: opening row, one row per voucher, closing row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerReport {
    pub scope: LedgerScope,
    pub opening: Balance,
    pub entries: Vec<LedgerEntry>,
    pub closing: Balance,
    pub totals: Totals,
}

impl LedgerReport {
    /// Rows produced by vouchers, boundaries excluded
    pub fn voucher_entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(|e| !e.is_boundary())
    }

    pub fn voucher_count(&self) -> usize {
        self.voucher_entries().count()
    }
}

/// Split a signed amount into (debit, credit) magnitudes
fn split(amount: Decimal) -> (Decimal, Decimal) {
    if amount.is_sign_negative() {
        (Decimal::ZERO, -amount)
    } else {
        (amount, Decimal::ZERO)
    }
}

/// Fold state: the balance so far and the last date seen
struct RunningBalance {
    scope: LedgerScope,
    balance: Balance,
    last_date: Option<NaiveDate>,
}

impl RunningBalance {
    fn new(opening: Balance, scope: LedgerScope) -> Self {
        Self {
            scope,
            balance: opening,
            last_date: None,
        }
    }

    /// Apply one voucher, returning the rule used plus signed deltas
    fn apply(&mut self, voucher: &Voucher) -> (SignRule, Balance) {
        if let Some(last) = self.last_date {
            if voucher.date < last {
                let context = ErrorContext::new("compute_ledger")
                    .with_account(voucher.account_id)
                    .with_data("voucher_id", serde_json::json!(voucher.id))
                    .with_data("previous_date", serde_json::json!(last.to_string()));
                DefaultErrorLogger.log_warning(
                    &format!(
                        "Voucher {} dated {} follows {}; input is not in date order",
                        voucher.reference(),
                        voucher.date,
                        last
                    ),
                    &context,
                );
            }
        }
        self.last_date = Some(voucher.date);

        let flags = VoucherFlags::of(voucher);
        let rule = sign_rule(self.scope, voucher.account_type, voucher.voucher_type, flags);
        let delta = rule.delta(voucher);
        let locker = if self.scope.tracks_locker() {
            locker_effect(voucher.account_type, voucher.voucher_type, flags)
        } else {
            LockerEffect::None
        };

        let change = Balance {
            gold: delta.gold,
            currency: delta.currency,
            locker_gold: locker.delta(voucher),
        };
        self.balance.gold += change.gold;
        self.balance.currency += change.currency;
        self.balance.locker_gold += change.locker_gold;
        (rule, change)
    }
}

/// Compute a ledger whose boundary rows are dated from the first and last
/// voucher.
pub fn compute_ledger(vouchers: &[Voucher], opening: Balance, scope: LedgerScope) -> LedgerReport {
    let start = vouchers.first().map(|v| v.date);
    let end = vouchers.last().map(|v| v.date);
    compute_ledger_between(vouchers, opening, scope, start, end)
}

/// Compute a ledger with explicit boundary row dates
pub fn compute_ledger_between(
    vouchers: &[Voucher],
    opening: Balance,
    scope: LedgerScope,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> LedgerReport {
    let mut running = RunningBalance::new(opening, scope);
    let mut totals = Totals::default();
    let mut entries = Vec::with_capacity(vouchers.len() + 2);

    entries.push(LedgerEntry::boundary(EntryKind::Opening, start, opening));

    for voucher in vouchers {
        let (rule, change) = running.apply(voucher);
        let (gold_debit, gold_credit) = split(change.gold);
        let (currency_debit, currency_credit) = split(change.currency);
        let (locker_in, locker_out) = split(change.locker_gold);

        let entry = LedgerEntry {
            kind: EntryKind::Voucher,
            date: Some(voucher.date),
            voucher_type: voucher.voucher_type,
            voucher_id: Some(voucher.id),
            reference: Some(voucher.reference()),
            description: voucher.description.clone(),
            rule,
            gold_debit,
            gold_credit,
            currency_debit,
            currency_credit,
            locker_in,
            locker_out,
            balance: running.balance,
        };
        totals.add(&entry);
        entries.push(entry);
    }

    let closing = running.balance;
    entries.push(LedgerEntry::boundary(EntryKind::Closing, end, closing));

    LedgerReport {
        scope,
        opening,
        entries,
        closing,
        totals,
    }
}

/// Closing balance only, without building rows
pub fn fold_balance<'a>(
    vouchers: impl IntoIterator<Item = &'a Voucher>,
    opening: Balance,
    scope: LedgerScope,
) -> Balance {
    let mut running = RunningBalance::new(opening, scope);
    for voucher in vouchers {
        running.apply(voucher);
    }
    running.balance
}
