//! Basic enumerations for accounts, vouchers and cheques

use serde::{Deserialize, Serialize};

/// Account type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountType {
    /// Customers buying finished jewellery
    Market,
    /// Casting workshop
    Casting,
    /// Stone setting and faceting workshop
    Faceting,
    /// Project (custom order) accounts
    Project,
    /// Bullion supplier gold is fixed against
    #[serde(rename = "Gold Fixing")]
    GoldFixing,
}

impl AccountType {
    /// Every account type, in display order
    pub const ALL: [AccountType; 5] = [
        AccountType::Market,
        AccountType::Casting,
        AccountType::Faceting,
        AccountType::Project,
        AccountType::GoldFixing,
    ];

    /// Casting, Faceting and Project share one sign table
    pub fn is_workshop(&self) -> bool {
        matches!(self, AccountType::Casting | AccountType::Faceting | AccountType::Project)
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match normalized.as_str() {
            "market" => Ok(AccountType::Market),
            "casting" => Ok(AccountType::Casting),
            "faceting" => Ok(AccountType::Faceting),
            "project" => Ok(AccountType::Project),
            "goldfixing" => Ok(AccountType::GoldFixing),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Market => write!(f, "Market"),
            AccountType::Casting => write!(f, "Casting"),
            AccountType::Faceting => write!(f, "Faceting"),
            AccountType::Project => write!(f, "Project"),
            AccountType::GoldFixing => write!(f, "Gold Fixing"),
        }
    }
}

/// Voucher type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoucherType {
    /// Invoice
    Inv,
    /// Receipt
    Rec,
    /// Gold-fixing voucher
    Gfv,
    /// Opening/closing balance marker, produced by the engine only
    Bal,
}

impl std::str::FromStr for VoucherType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INV" => Ok(VoucherType::Inv),
            "REC" => Ok(VoucherType::Rec),
            "GFV" => Ok(VoucherType::Gfv),
            "BAL" => Ok(VoucherType::Bal),
            _ => Err(format!("Invalid voucher type: {}", s)),
        }
    }
}

impl std::fmt::Display for VoucherType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoucherType::Inv => write!(f, "INV"),
            VoucherType::Rec => write!(f, "REC"),
            VoucherType::Gfv => write!(f, "GFV"),
            VoucherType::Bal => write!(f, "BAL"),
        }
    }
}

/// How a receipt was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Cheque,
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "cheque" | "check" => Ok(PaymentMethod::Cheque),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Cheque => write!(f, "cheque"),
        }
    }
}

/// Cheque status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChequeStatus {
    /// Received, not yet banked
    Pending,
    /// Handed to the bank
    Deposited,
    /// Funds received
    Cleared,
    /// Returned unpaid
    Bounced,
    /// Voided before deposit
    Cancelled,
}

impl Default for ChequeStatus {
    fn default() -> Self {
        ChequeStatus::Pending
    }
}

impl ChequeStatus {
    /// Whether a cheque may move from this status to `next`
    pub fn can_transition_to(&self, next: ChequeStatus) -> bool {
        use ChequeStatus::*;
        matches!(
            (*self, next),
            (Pending, Deposited)
                | (Pending, Bounced)
                | (Pending, Cancelled)
                | (Deposited, Cleared)
                | (Deposited, Bounced)
                | (Bounced, Deposited)
        )
    }

    /// Cleared and cancelled cheques never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChequeStatus::Cleared | ChequeStatus::Cancelled)
    }

    /// Money not yet in the bank
    pub fn is_outstanding(&self) -> bool {
        matches!(self, ChequeStatus::Pending | ChequeStatus::Deposited)
    }
}

impl std::str::FromStr for ChequeStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ChequeStatus::Pending),
            "deposited" => Ok(ChequeStatus::Deposited),
            "cleared" => Ok(ChequeStatus::Cleared),
            "bounced" | "returned" => Ok(ChequeStatus::Bounced),
            "cancelled" | "canceled" => Ok(ChequeStatus::Cancelled),
            _ => Err(format!("Invalid cheque status: {}", s)),
        }
    }
}

impl std::fmt::Display for ChequeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChequeStatus::Pending => write!(f, "pending"),
            ChequeStatus::Deposited => write!(f, "deposited"),
            ChequeStatus::Cleared => write!(f, "cleared"),
            ChequeStatus::Bounced => write!(f, "bounced"),
            ChequeStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}
