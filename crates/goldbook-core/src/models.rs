//! Core data models: accounts and vouchers

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{AccountType, ChequeStatus, PaymentMethod, VoucherType};

/// Account information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub name: String,
    pub account_type: AccountType,
    pub phone: Option<String>,
    /// Commercial registration number
    pub crn: Option<String>,
    pub note: Option<String>,
}

impl Account {
    pub fn new(id: u64, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id,
            name: name.into(),
            account_type,
            phone: None,
            crn: None,
            note: None,
        }
    }

    /// Case-insensitive match on name, phone or CRN
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.phone.as_deref().map_or(false, |p| p.contains(&query))
            || self.crn.as_deref().map_or(false, |c| c.to_lowercase().contains(&query))
    }
}

/// Cheque details attached to a cheque receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChequeDetails {
    pub number: String,
    pub bank: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: ChequeStatus,
}

/// Voucher (transaction record). Amounts are stored as magnitudes; the
/// engine decides the sign from the account and voucher type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: u64,
    /// Manual voucher number
    pub mvn: Option<String>,
    pub date: NaiveDate,
    pub voucher_type: VoucherType,
    pub account_id: u64,
    pub account_type: AccountType,
    pub description: Option<String>,
    /// Gold weight
    pub gold: Decimal,
    /// Currency amount (KWD)
    pub kwd: Decimal,
    pub gold_rate: Option<Decimal>,
    /// Stored `gold * gold_rate`
    pub fixing_amount: Option<Decimal>,
    pub payment_method: Option<PaymentMethod>,
    pub cheque: Option<ChequeDetails>,
}

impl Voucher {
    /// Create a voucher with only the fields the engine needs
    pub fn new(
        id: u64,
        date: NaiveDate,
        voucher_type: VoucherType,
        account_type: AccountType,
        gold: Decimal,
        kwd: Decimal,
    ) -> Self {
        Self {
            id,
            mvn: None,
            date,
            voucher_type,
            account_id: 0,
            account_type,
            description: None,
            gold,
            kwd,
            gold_rate: None,
            fixing_amount: None,
            payment_method: None,
            cheque: None,
        }
    }

    pub fn with_account(mut self, account_id: u64) -> Self {
        self.account_id = account_id;
        self
    }

    pub fn with_gold_rate(mut self, rate: Decimal) -> Self {
        self.gold_rate = Some(rate);
        self
    }

    pub fn with_fixing_amount(mut self, amount: Decimal) -> Self {
        self.fixing_amount = Some(amount);
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// A Market receipt carrying a gold rate is a gold-fixing receipt
    pub fn is_gold_fixing(&self) -> bool {
        self.account_type == AccountType::Market
            && self.voucher_type == VoucherType::Rec
            && self.gold_rate.is_some()
    }

    pub fn is_cheque(&self) -> bool {
        self.payment_method == Some(PaymentMethod::Cheque)
    }

    /// Fixing amount: the stored value when present and non-zero, otherwise
    /// `gold * gold_rate`, otherwise zero.
    pub fn effective_fixing_amount(&self) -> Decimal {
        match self.fixing_amount {
            Some(amount) if !amount.is_zero() => amount,
            _ => self
                .gold_rate
                .map(|rate| self.gold * rate)
                .unwrap_or(Decimal::ZERO),
        }
    }

    /// Reference printed on statements: manual number if any, else the id
    pub fn reference(&self) -> String {
        self.mvn.clone().unwrap_or_else(|| self.id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_fixing_amount_computed_from_rate() {
        let v = Voucher::new(1, date(), VoucherType::Rec, AccountType::Market, d("2"), Decimal::ZERO)
            .with_gold_rate(d("20"));
        assert!(v.is_gold_fixing());
        assert_eq!(v.effective_fixing_amount(), d("40"));
    }

    #[test]
    fn test_stored_fixing_amount_preferred() {
        let v = Voucher::new(1, date(), VoucherType::Rec, AccountType::Market, d("2"), Decimal::ZERO)
            .with_gold_rate(d("20"))
            .with_fixing_amount(d("39.5"));
        assert_eq!(v.effective_fixing_amount(), d("39.5"));

        let zero_stored = v.clone().with_fixing_amount(Decimal::ZERO);
        assert_eq!(zero_stored.effective_fixing_amount(), d("40"));
    }

    #[test]
    fn test_missing_rate_degrades_to_zero() {
        let v = Voucher::new(1, date(), VoucherType::Rec, AccountType::Market, d("2"), Decimal::ZERO);
        assert!(!v.is_gold_fixing());
        assert_eq!(v.effective_fixing_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_gold_fixing_requires_market_receipt() {
        let casting = Voucher::new(1, date(), VoucherType::Rec, AccountType::Casting, d("2"), Decimal::ZERO)
            .with_gold_rate(d("20"));
        assert!(!casting.is_gold_fixing());

        let invoice = Voucher::new(2, date(), VoucherType::Inv, AccountType::Market, d("2"), Decimal::ZERO)
            .with_gold_rate(d("20"));
        assert!(!invoice.is_gold_fixing());
    }

    #[test]
    fn test_reference_prefers_manual_number() {
        let mut v = Voucher::new(42, date(), VoucherType::Inv, AccountType::Market, d("1"), d("1"));
        assert_eq!(v.reference(), "42");
        v.mvn = Some("M-0042".to_string());
        assert_eq!(v.reference(), "M-0042");
    }

    #[test]
    fn test_account_matches() {
        let mut account = Account::new(1, "Al Noor Jewellers", AccountType::Market);
        account.phone = Some("96550001234".to_string());
        account.crn = Some("CR-7781".to_string());
        assert!(account.matches("noor"));
        assert!(account.matches("5000"));
        assert!(account.matches("cr-77"));
        assert!(!account.matches("casting"));
    }
}
