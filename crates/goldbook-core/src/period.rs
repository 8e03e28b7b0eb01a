//! Date ranges and opening-balance synthesis
//!
//! A ranged ledger starts from the closing balance of everything strictly
//! before the range start. [`ledger_for_range`] computes that with two folds
//! (history before the start, then the displayed range) and is the
//! authoritative path. [`ledger_by_slicing`] folds the whole history once and
//! cuts the displayed window out of it; for date-sorted history both give
//! identical reports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{compute_ledger, compute_ledger_between, fold_balance, Balance, EntryKind, LedgerEntry, LedgerReport, Totals};
use crate::error::{CoreError, CoreResult};
use crate::models::Voucher;
use crate::rules::LedgerScope;

/// Inclusive date range, either side open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> CoreResult<Self> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(CoreError::InvalidDateRange { start, end });
            }
        }
        Ok(Self { start, end })
    }

    /// Unbounded on both sides
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// Whether `date` falls before the range start
    pub fn is_before(&self, date: NaiveDate) -> bool {
        self.start.map_or(false, |s| date < s)
    }
}

/// Closing balance of every voucher strictly before `start`. Zero when
/// `start` is `None` or nothing precedes it.
pub fn opening_balance(history: &[Voucher], start: Option<NaiveDate>, scope: LedgerScope) -> Balance {
    match start {
        Some(start) => fold_balance(history.iter().filter(|v| v.date < start), Balance::default(), scope),
        None => Balance::default(),
    }
}

/// Ledger for `range`: fold the history before the start into an opening
/// balance, then fold the vouchers inside the range.
///
/// Boundary rows carry the range dates when given, else the first and last
/// displayed voucher dates.
pub fn ledger_for_range(history: &[Voucher], range: &DateRange, scope: LedgerScope) -> LedgerReport {
    if range.is_unbounded() {
        return compute_ledger(history, Balance::default(), scope);
    }

    let opening = opening_balance(history, range.start, scope);
    let displayed: Vec<Voucher> = history
        .iter()
        .filter(|v| range.contains(v.date))
        .cloned()
        .collect();

    let start = range.start.or_else(|| displayed.first().map(|v| v.date));
    let end = range.end.or_else(|| displayed.last().map(|v| v.date));
    compute_ledger_between(&displayed, opening, scope, start, end)
}

/// Ledger for `range` taken from one fold over the whole history.
pub fn ledger_by_slicing(history: &[Voucher], range: &DateRange, scope: LedgerScope) -> LedgerReport {
    let full = compute_ledger(history, Balance::default(), scope);

    let mut opening = Balance::default();
    let mut rows: Vec<LedgerEntry> = Vec::new();
    for entry in full.entries.into_iter().filter(|e| e.kind == EntryKind::Voucher) {
        let Some(date) = entry.date else { continue };
        if range.is_before(date) {
            opening = entry.balance;
        } else if range.contains(date) {
            rows.push(entry);
        }
    }

    let mut totals = Totals::default();
    for row in &rows {
        totals.add(row);
    }
    let closing = rows.last().map(|r| r.balance).unwrap_or(opening);
    let start = range.start.or_else(|| rows.first().and_then(|r| r.date));
    let end = range.end.or_else(|| rows.last().and_then(|r| r.date));

    let mut entries = Vec::with_capacity(rows.len() + 2);
    entries.push(LedgerEntry::boundary(EntryKind::Opening, start, opening));
    entries.extend(rows);
    entries.push(LedgerEntry::boundary(EntryKind::Closing, end, closing));

    LedgerReport {
        scope,
        opening,
        entries,
        closing,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{arb_boundary, arb_sorted_vouchers, d, day, voucher};
    use crate::types::{AccountType, VoucherType};
    use proptest::prelude::*;

    fn history() -> Vec<Voucher> {
        vec![
            voucher(1, day(1), VoucherType::Inv, AccountType::Market, "10", "100"),
            voucher(2, day(5), VoucherType::Rec, AccountType::Market, "4", "30"),
            voucher(3, day(10), VoucherType::Inv, AccountType::Market, "2", "25"),
            voucher(4, day(20), VoucherType::Rec, AccountType::Market, "1", "5"),
        ]
    }

    #[test]
    fn test_date_range_validation() {
        assert!(DateRange::new(Some(day(2)), Some(day(1))).is_err());
        assert!(DateRange::new(Some(day(1)), Some(day(1))).is_ok());
        assert!(DateRange::new(None, Some(day(1))).is_ok());

        match DateRange::new(Some(day(3)), Some(day(2))) {
            Err(CoreError::InvalidDateRange { start, end }) => {
                assert_eq!(start, day(3));
                assert_eq!(end, day(2));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_date_range_contains() {
        let range = DateRange::new(Some(day(5)), Some(day(10))).unwrap();
        assert!(range.contains(day(5)));
        assert!(range.contains(day(10)));
        assert!(!range.contains(day(4)));
        assert!(!range.contains(day(11)));
        assert!(range.is_before(day(4)));
        assert!(DateRange::all().contains(day(400)));
    }

    #[test]
    fn test_opening_balance_excludes_start_date() {
        let opening = opening_balance(&history(), Some(day(5)), LedgerScope::Balance);
        assert_eq!(opening.gold, d("10"));
        assert_eq!(opening.currency, d("100"));
        assert_eq!(opening.locker_gold, d("-10"));
    }

    #[test]
    fn test_opening_balance_zero_without_prior_history() {
        assert!(opening_balance(&history(), None, LedgerScope::Balance).is_zero());
        assert!(opening_balance(&history(), Some(day(1)), LedgerScope::Balance).is_zero());
    }

    #[test]
    fn test_ledger_for_range_uses_prior_history() {
        let range = DateRange::new(Some(day(5)), Some(day(10))).unwrap();
        let report = ledger_for_range(&history(), &range, LedgerScope::Balance);

        assert_eq!(report.opening.gold, d("10"));
        assert_eq!(report.voucher_count(), 2);
        assert_eq!(report.closing.gold, d("8"));
        assert_eq!(report.closing.currency, d("95"));
        assert_eq!(report.entries[0].date, Some(day(5)));
        assert_eq!(report.entries.last().unwrap().date, Some(day(10)));
        assert_eq!(report.totals.gold_debit, d("2"));
        assert_eq!(report.totals.gold_credit, d("4"));
    }

    #[test]
    fn test_open_ended_range_dates_boundaries_from_vouchers() {
        let range = DateRange::new(Some(day(3)), None).unwrap();
        let report = ledger_for_range(&history(), &range, LedgerScope::Balance);
        assert_eq!(report.entries[0].date, Some(day(3)));
        assert_eq!(report.entries.last().unwrap().date, Some(day(20)));
    }

    #[test]
    fn test_empty_range_carries_opening_to_closing() {
        let range = DateRange::new(Some(day(11)), Some(day(19))).unwrap();
        let report = ledger_for_range(&history(), &range, LedgerScope::Balance);
        assert_eq!(report.voucher_count(), 0);
        assert_eq!(report.closing, report.opening);
        assert_eq!(report.opening.gold, d("8"));
        assert_eq!(report, ledger_by_slicing(&history(), &range, LedgerScope::Balance));
    }

    proptest! {
        #[test]
        fn prop_two_pass_matches_slicing(
            vouchers in arb_sorted_vouchers(40),
            a in arb_boundary(),
            b in arb_boundary(),
        ) {
            let (start, end) = match (a, b) {
                (Some(a), Some(b)) if a > b => (Some(b), Some(a)),
                other => other,
            };
            let range = DateRange::new(start, end).unwrap();
            for scope in [LedgerScope::Balance, LedgerScope::OpenBalance, LedgerScope::Locker] {
                let two_pass = ledger_for_range(&vouchers, &range, scope);
                let sliced = ledger_by_slicing(&vouchers, &range, scope);
                prop_assert_eq!(&two_pass, &sliced);
                prop_assert_eq!(two_pass.totals.net(), two_pass.closing - two_pass.opening);
                prop_assert_eq!(two_pass.opening, opening_balance(&vouchers, start, scope));
            }
        }
    }
}
