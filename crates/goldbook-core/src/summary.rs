//! Per-type balance summary: one closing balance line per account

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{fold_balance, Balance};
use crate::models::{Account, Voucher};
use crate::rules::LedgerScope;
use crate::types::AccountType;

/// Closing balances of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalanceLine {
    pub account_id: u64,
    pub account_name: String,
    pub balance: Balance,
    /// Gold-fixing ledger closing, Market accounts only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_balance: Option<Balance>,
    pub voucher_count: usize,
    pub last_activity: Option<NaiveDate>,
}

/// Balances of every account of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub account_type: AccountType,
    pub as_of: Option<NaiveDate>,
    pub lines: Vec<AccountBalanceLine>,
    pub totals: Balance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_balance_totals: Option<Balance>,
}

impl TypeSummary {
    /// Lines with any non-zero balance
    pub fn non_zero_lines(&self) -> impl Iterator<Item = &AccountBalanceLine> {
        self.lines.iter().filter(|l| !l.balance.is_zero())
    }
}

fn add(total: &mut Balance, balance: &Balance) {
    total.gold += balance.gold;
    total.currency += balance.currency;
    total.locker_gold += balance.locker_gold;
}

/// Summarise every account of `account_type` up to and including `as_of`.
///
/// `vouchers` must be date-sorted; each account folds its own vouchers in
/// that order. Lines follow account order.
pub fn type_summary(
    account_type: AccountType,
    accounts: &[Account],
    vouchers: &[Voucher],
    as_of: Option<NaiveDate>,
) -> TypeSummary {
    let tracks_open_balance = account_type == AccountType::Market;
    let mut totals = Balance::default();
    let mut open_totals = Balance::default();
    let mut lines = Vec::new();

    for account in accounts.iter().filter(|a| a.account_type == account_type) {
        let owned: Vec<&Voucher> = vouchers
            .iter()
            .filter(|v| v.account_id == account.id)
            .filter(|v| as_of.map_or(true, |d| v.date <= d))
            .collect();

        let balance = fold_balance(owned.iter().copied(), Balance::default(), LedgerScope::Balance);
        let open_balance = if tracks_open_balance {
            let open = fold_balance(owned.iter().copied(), Balance::default(), LedgerScope::OpenBalance);
            add(&mut open_totals, &open);
            Some(open)
        } else {
            None
        };
        add(&mut totals, &balance);

        lines.push(AccountBalanceLine {
            account_id: account.id,
            account_name: account.name.clone(),
            balance,
            open_balance,
            voucher_count: owned.len(),
            last_activity: owned.iter().map(|v| v.date).max(),
        });
    }

    TypeSummary {
        account_type,
        as_of,
        lines,
        totals,
        open_balance_totals: tracks_open_balance.then_some(open_totals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{d, day, voucher};
    use crate::types::VoucherType;

    fn accounts() -> Vec<Account> {
        vec![
            Account::new(1, "Al Noor", AccountType::Market),
            Account::new(2, "Star Casting", AccountType::Casting),
            Account::new(3, "Gulf Jewels", AccountType::Market),
        ]
    }

    fn vouchers() -> Vec<Voucher> {
        vec![
            voucher(1, day(1), VoucherType::Inv, AccountType::Market, "10", "50").with_account(1),
            voucher(2, day(2), VoucherType::Inv, AccountType::Casting, "4", "8").with_account(2),
            voucher(3, day(3), VoucherType::Inv, AccountType::Market, "6", "20").with_account(3),
            voucher(4, day(4), VoucherType::Rec, AccountType::Market, "2", "0")
                .with_account(1)
                .with_gold_rate(d("19")),
        ]
    }

    #[test]
    fn test_market_summary() {
        let summary = type_summary(AccountType::Market, &accounts(), &vouchers(), None);
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].account_name, "Al Noor");
        assert_eq!(summary.lines[0].balance.gold, d("8"));
        assert_eq!(summary.lines[0].voucher_count, 2);
        assert_eq!(summary.lines[0].last_activity, Some(day(4)));
        assert_eq!(summary.lines[0].open_balance.unwrap().currency, d("38"));
        assert_eq!(summary.totals.gold, d("14"));
        assert_eq!(summary.totals.currency, d("70"));
        assert_eq!(summary.open_balance_totals.unwrap().gold, d("2"));
    }

    #[test]
    fn test_as_of_is_inclusive() {
        let summary = type_summary(AccountType::Market, &accounts(), &vouchers(), Some(day(3)));
        assert_eq!(summary.lines[0].balance.gold, d("10"));
        assert_eq!(summary.lines[1].balance.gold, d("6"));
        assert_eq!(summary.totals.gold, d("16"));
    }

    #[test]
    fn test_workshop_summary_has_no_open_balance() {
        let summary = type_summary(AccountType::Casting, &accounts(), &vouchers(), None);
        assert_eq!(summary.lines.len(), 1);
        assert!(summary.lines[0].open_balance.is_none());
        assert!(summary.open_balance_totals.is_none());
        assert_eq!(summary.totals.locker_gold, d("-4"));
    }

    #[test]
    fn test_idle_accounts_listed_with_zero_balance() {
        let summary = type_summary(AccountType::Market, &accounts(), &vouchers(), Some(day(1)));
        assert_eq!(summary.lines.len(), 2);
        assert!(summary.lines[1].balance.is_zero());
        assert_eq!(summary.non_zero_lines().count(), 1);
    }
}
