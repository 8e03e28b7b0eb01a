//! Sign rules: which running balances a voucher moves, and in which direction.
//!
//! Every ledger view (account balance sheet, Market open-balance ledger,
//! locker gold) goes through [`sign_rule`] and [`locker_effect`], so the
//! table lives in exactly one place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Voucher;
use crate::types::{AccountType, VoucherType};

/// Which ledger a computation produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerScope {
    /// Per-account gold and currency balance sheet
    Balance,
    /// Market gold-fixing ("open balance") ledger
    OpenBalance,
    /// Workshop locker gold only
    Locker,
}

impl LedgerScope {
    /// Whether the locker gold accumulator moves in this scope
    pub fn tracks_locker(&self) -> bool {
        matches!(self, LedgerScope::Balance | LedgerScope::Locker)
    }
}

impl std::str::FromStr for LedgerScope {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "balance" => Ok(LedgerScope::Balance),
            "open-balance" => Ok(LedgerScope::OpenBalance),
            "locker" => Ok(LedgerScope::Locker),
            _ => Err(format!("Invalid ledger scope: {}", s)),
        }
    }
}

impl std::fmt::Display for LedgerScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerScope::Balance => write!(f, "balance"),
            LedgerScope::OpenBalance => write!(f, "open-balance"),
            LedgerScope::Locker => write!(f, "locker"),
        }
    }
}

/// Voucher properties that alter the rule choice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoucherFlags {
    /// Market receipt carrying a gold rate
    pub gold_fixing: bool,
    /// Paid by cheque
    pub cheque: bool,
}

impl VoucherFlags {
    pub fn of(voucher: &Voucher) -> Self {
        Self {
            gold_fixing: voucher.is_gold_fixing(),
            cheque: voucher.is_cheque(),
        }
    }
}

/// Effect of one voucher on the gold and currency balances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignRule {
    /// gold +, currency +
    Debit,
    /// gold -, currency -
    Credit,
    /// gold + only
    GoldReceipt,
    /// gold +, fixing amount + (currency column)
    Fixing,
    /// no movement
    Ignore,
}

/// Signed change to the gold and currency balances
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delta {
    pub gold: Decimal,
    pub currency: Decimal,
}

impl SignRule {
    /// Signed gold/currency change this rule applies for `voucher`
    pub fn delta(&self, voucher: &Voucher) -> Delta {
        match self {
            SignRule::Debit => Delta {
                gold: voucher.gold,
                currency: voucher.kwd,
            },
            SignRule::Credit => Delta {
                gold: -voucher.gold,
                currency: -voucher.kwd,
            },
            SignRule::GoldReceipt => Delta {
                gold: voucher.gold,
                currency: Decimal::ZERO,
            },
            SignRule::Fixing => Delta {
                gold: voucher.gold,
                currency: voucher.effective_fixing_amount(),
            },
            SignRule::Ignore => Delta::default(),
        }
    }
}

/// Pick the sign rule for a voucher in a given ledger scope.
///
/// | Account type                 | INV    | REC          | REC (fixing)         | GFV    |
/// |------------------------------|--------|--------------|----------------------|--------|
/// | Market                       | Debit  | Credit       | Credit / Fixing (*)  | Ignore |
/// | Casting / Faceting / Project | Debit  | Credit       | -                    | Ignore |
/// | Gold Fixing                  | Ignore | GoldReceipt  | -                    | Credit |
///
/// (*) `Credit` on the balance sheet, `Fixing` on the open-balance ledger.
/// The open-balance ledger ignores everything except Market fixing receipts,
/// and the locker scope ignores gold and currency entirely.
pub fn sign_rule(
    scope: LedgerScope,
    account_type: AccountType,
    voucher_type: VoucherType,
    flags: VoucherFlags,
) -> SignRule {
    match scope {
        LedgerScope::Locker => SignRule::Ignore,
        LedgerScope::OpenBalance => match (account_type, voucher_type) {
            (AccountType::Market, VoucherType::Rec) if flags.gold_fixing => SignRule::Fixing,
            _ => SignRule::Ignore,
        },
        LedgerScope::Balance => match (account_type, voucher_type) {
            (AccountType::GoldFixing, VoucherType::Rec) => SignRule::GoldReceipt,
            (AccountType::GoldFixing, VoucherType::Gfv) => SignRule::Credit,
            (AccountType::GoldFixing, _) => SignRule::Ignore,
            (_, VoucherType::Inv) => SignRule::Debit,
            (_, VoucherType::Rec) => SignRule::Credit,
            (_, VoucherType::Gfv) | (_, VoucherType::Bal) => SignRule::Ignore,
        },
    }
}

/// Effect of one voucher on the locker gold balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockerEffect {
    /// Gold enters the locker
    Deposit,
    /// Gold leaves the locker
    Withdraw,
    None,
}

impl LockerEffect {
    /// Signed locker change for `voucher`
    pub fn delta(&self, voucher: &Voucher) -> Decimal {
        match self {
            LockerEffect::Deposit => voucher.gold,
            LockerEffect::Withdraw => -voucher.gold,
            LockerEffect::None => Decimal::ZERO,
        }
    }
}

/// Locker gold rule. Invoices take gold out of the locker, receipts bring it
/// back. Cheque receipts on Market accounts never touch the locker, Gold
/// Fixing accounts only deposit, and GFV vouchers never move locker gold.
pub fn locker_effect(account_type: AccountType, voucher_type: VoucherType, flags: VoucherFlags) -> LockerEffect {
    match (account_type, voucher_type) {
        (_, VoucherType::Gfv) | (_, VoucherType::Bal) => LockerEffect::None,
        (AccountType::Market, VoucherType::Rec) if flags.cheque => LockerEffect::None,
        (AccountType::GoldFixing, VoucherType::Inv) => LockerEffect::None,
        (_, VoucherType::Inv) => LockerEffect::Withdraw,
        (_, VoucherType::Rec) => LockerEffect::Deposit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const NONE: VoucherFlags = VoucherFlags { gold_fixing: false, cheque: false };
    const FIXING: VoucherFlags = VoucherFlags { gold_fixing: true, cheque: false };
    const CHEQUE: VoucherFlags = VoucherFlags { gold_fixing: false, cheque: true };

    #[test]
    fn test_market_balance_rules() {
        let s = LedgerScope::Balance;
        assert_eq!(sign_rule(s, AccountType::Market, VoucherType::Inv, NONE), SignRule::Debit);
        assert_eq!(sign_rule(s, AccountType::Market, VoucherType::Rec, NONE), SignRule::Credit);
        assert_eq!(sign_rule(s, AccountType::Market, VoucherType::Rec, FIXING), SignRule::Credit);
        assert_eq!(sign_rule(s, AccountType::Market, VoucherType::Gfv, NONE), SignRule::Ignore);
    }

    #[test]
    fn test_workshop_balance_rules() {
        for account_type in [AccountType::Casting, AccountType::Faceting, AccountType::Project] {
            let s = LedgerScope::Balance;
            assert_eq!(sign_rule(s, account_type, VoucherType::Inv, NONE), SignRule::Debit);
            assert_eq!(sign_rule(s, account_type, VoucherType::Rec, NONE), SignRule::Credit);
            assert_eq!(sign_rule(s, account_type, VoucherType::Gfv, NONE), SignRule::Ignore);
        }
    }

    #[test]
    fn test_gold_fixing_balance_rules() {
        let s = LedgerScope::Balance;
        assert_eq!(sign_rule(s, AccountType::GoldFixing, VoucherType::Rec, NONE), SignRule::GoldReceipt);
        assert_eq!(sign_rule(s, AccountType::GoldFixing, VoucherType::Gfv, NONE), SignRule::Credit);
        assert_eq!(sign_rule(s, AccountType::GoldFixing, VoucherType::Inv, NONE), SignRule::Ignore);
    }

    #[test]
    fn test_open_balance_scope_only_counts_fixing_receipts() {
        let s = LedgerScope::OpenBalance;
        assert_eq!(sign_rule(s, AccountType::Market, VoucherType::Rec, FIXING), SignRule::Fixing);
        assert_eq!(sign_rule(s, AccountType::Market, VoucherType::Rec, NONE), SignRule::Ignore);
        assert_eq!(sign_rule(s, AccountType::Market, VoucherType::Inv, FIXING), SignRule::Ignore);
        assert_eq!(sign_rule(s, AccountType::Casting, VoucherType::Rec, FIXING), SignRule::Ignore);
    }

    #[test]
    fn test_balance_marker_never_moves_anything() {
        for account_type in AccountType::ALL {
            assert_eq!(
                sign_rule(LedgerScope::Balance, account_type, VoucherType::Bal, NONE),
                SignRule::Ignore
            );
            assert_eq!(locker_effect(account_type, VoucherType::Bal, NONE), LockerEffect::None);
        }
    }

    #[test]
    fn test_locker_rules() {
        assert_eq!(locker_effect(AccountType::Market, VoucherType::Inv, NONE), LockerEffect::Withdraw);
        assert_eq!(locker_effect(AccountType::Market, VoucherType::Rec, NONE), LockerEffect::Deposit);
        assert_eq!(locker_effect(AccountType::Market, VoucherType::Rec, CHEQUE), LockerEffect::None);
        assert_eq!(locker_effect(AccountType::Casting, VoucherType::Rec, CHEQUE), LockerEffect::Deposit);
        assert_eq!(locker_effect(AccountType::Project, VoucherType::Inv, NONE), LockerEffect::Withdraw);
        assert_eq!(locker_effect(AccountType::GoldFixing, VoucherType::Rec, NONE), LockerEffect::Deposit);
        assert_eq!(locker_effect(AccountType::GoldFixing, VoucherType::Inv, NONE), LockerEffect::None);
    }

    #[test]
    fn test_gfv_never_moves_locker() {
        for account_type in AccountType::ALL {
            for flags in [NONE, FIXING, CHEQUE] {
                assert_eq!(locker_effect(account_type, VoucherType::Gfv, flags), LockerEffect::None);
            }
        }
    }

    #[test]
    fn test_fixing_delta_uses_fixing_amount() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let v = Voucher::new(1, date, VoucherType::Rec, AccountType::Market, Decimal::from(2), Decimal::from(7))
            .with_gold_rate(Decimal::from(20));
        let delta = SignRule::Fixing.delta(&v);
        assert_eq!(delta.gold, Decimal::from(2));
        assert_eq!(delta.currency, Decimal::from(40));

        let credit = SignRule::Credit.delta(&v);
        assert_eq!(credit.gold, Decimal::from(-2));
        assert_eq!(credit.currency, Decimal::from(-7));
    }

    #[test]
    fn test_scope_from_str() {
        assert_eq!("open-balance".parse::<LedgerScope>(), Ok(LedgerScope::OpenBalance));
        assert_eq!("Open_Balance".parse::<LedgerScope>(), Ok(LedgerScope::OpenBalance));
        assert_eq!("locker".parse::<LedgerScope>(), Ok(LedgerScope::Locker));
        assert!("fixing".parse::<LedgerScope>().is_err());
        assert_eq!(LedgerScope::OpenBalance.to_string(), "open-balance");
    }
}
