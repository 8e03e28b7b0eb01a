//! Shared test helpers and proptest strategies

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::engine::Balance;
use crate::models::Voucher;
use crate::types::{AccountType, PaymentMethod, VoucherType};

pub fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Day `n` of January 2024; larger values roll into later months
pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i64::from(n) - 1)
}

pub fn voucher(
    id: u64,
    date: NaiveDate,
    voucher_type: VoucherType,
    account_type: AccountType,
    gold: &str,
    kwd: &str,
) -> Voucher {
    Voucher::new(id, date, voucher_type, account_type, d(gold), d(kwd)).with_account(1)
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000).prop_map(|n| Decimal::new(n, 3))
}

fn arb_account_type() -> impl Strategy<Value = AccountType> {
    prop::sample::select(AccountType::ALL.to_vec())
}

fn arb_voucher_type() -> impl Strategy<Value = VoucherType> {
    prop::sample::select(vec![VoucherType::Inv, VoucherType::Rec, VoucherType::Gfv])
}

prop_compose! {
    fn arb_voucher()(
        day_offset in 0u32..400,
        account_type in arb_account_type(),
        voucher_type in arb_voucher_type(),
        gold in arb_amount(),
        kwd in arb_amount(),
        rate in prop::option::of((1i64..40_000).prop_map(|n| Decimal::new(n, 3))),
        stored_fixing in prop::option::weighted(0.3, arb_amount()),
        cheque in any::<bool>(),
    ) -> Voucher {
        let mut v = Voucher::new(0, day(day_offset + 1), voucher_type, account_type, gold, kwd)
            .with_account(1)
            .with_payment_method(if cheque { PaymentMethod::Cheque } else { PaymentMethod::Cash });
        v.gold_rate = rate;
        v.fixing_amount = stored_fixing;
        v
    }
}

/// Up to `max` vouchers, stable-sorted by date, ids assigned in order
pub fn arb_sorted_vouchers(max: usize) -> impl Strategy<Value = Vec<Voucher>> {
    prop::collection::vec(arb_voucher(), 0..=max).prop_map(|mut vouchers| {
        vouchers.sort_by_key(|v| v.date);
        for (i, v) in vouchers.iter_mut().enumerate() {
            v.id = i as u64 + 1;
        }
        vouchers
    })
}

pub fn arb_opening() -> impl Strategy<Value = Balance> {
    (-1_000_000i64..1_000_000, -1_000_000i64..1_000_000, -1_000_000i64..1_000_000).prop_map(
        |(gold, currency, locker)| Balance {
            gold: Decimal::new(gold, 3),
            currency: Decimal::new(currency, 3),
            locker_gold: Decimal::new(locker, 3),
        },
    )
}

/// A date somewhere in or around the range `arb_sorted_vouchers` covers
pub fn arb_boundary() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((0u32..420).prop_map(day))
}
