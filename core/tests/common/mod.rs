//! Record builders shared by the integration tests.
#![allow(dead_code)]

use fico_core::records::{
    ApplicationRecord, BureauRecord, CreditCardBalanceRecord, InstallmentRecord,
};

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn app(customer_id: i64, target: u8) -> ApplicationRecord {
    ApplicationRecord { customer_id, target }
}

pub fn payment(customer_id: i64, scheduled: f64, entry: Option<f64>) -> InstallmentRecord {
    InstallmentRecord {
        customer_id,
        prev_loan_id: Some(customer_id * 10),
        days_instalment: Some(scheduled),
        days_entry_payment: entry,
    }
}

pub fn trade_line(customer_id: i64, status: &str, credit: f64, debt: f64, days_credit: f64) -> BureauRecord {
    BureauRecord {
        customer_id,
        credit_active: Some(status.to_string()),
        amt_credit_sum: Some(credit),
        amt_credit_debt: Some(debt),
        days_credit: Some(days_credit),
    }
}

pub fn statement(customer_id: i64, balance: f64, limit: f64) -> CreditCardBalanceRecord {
    CreditCardBalanceRecord {
        customer_id,
        balance: Some(balance),
        credit_limit: Some(limit),
    }
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub fn assert_approx(actual: Option<f64>, expected: f64, what: &str) {
    let value = actual.unwrap_or_else(|| panic!("{what} is null, expected {expected}"));
    assert!(approx(value, expected), "{what}: expected {expected}, got {value}");
}
