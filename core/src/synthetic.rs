//! Synthetic input generator.
//!
//! Produces a reproducible, HomeCredit-shaped snapshot from a seed so the
//! pipeline can be exercised end to end without the real extracts. The mix
//! deliberately includes thin-file customers, missing payment entries,
//! closed accounts, zero-credit lines and zero-limit cards.

use crate::{
    records::{
        ApplicationRecord, BureauRecord, CreditCardBalanceRecord, CreditCardSource,
        InstallmentRecord,
    },
    rng::{RngBank, StreamRng, StreamSlot},
    source::InputSnapshot,
    types::CustomerId,
};

pub const FIRST_CUSTOMER_ID: CustomerId = 100_001;

const DEFAULT_RATE:           f64 = 0.08;
const NO_INSTALLMENTS_RATE:   f64 = 0.10;
const NO_BUREAU_RATE:         f64 = 0.15;
const MISSING_ENTRY_RATE:     f64 = 0.03;
const LATE_PAYMENT_RATE:      f64 = 0.25;
const ZERO_CREDIT_LINE_RATE:  f64 = 0.05;
const MISSING_DEBT_RATE:      f64 = 0.10;
const ACTIVE_RATE:            f64 = 0.40;
const CARD_LIMITS: [f64; 4] = [0.0, 45_000.0, 90_000.0, 135_000.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticInputs {
    pub seed:                 u64,
    pub customers:            usize,
    /// Share of customers holding a credit card, when the table is included.
    pub credit_card_coverage: f64,
    pub include_credit_card:  bool,
}

impl SyntheticInputs {
    pub fn new(seed: u64, customers: usize) -> Self {
        Self {
            seed,
            customers,
            credit_card_coverage: 0.35,
            include_credit_card: true,
        }
    }

    pub fn without_credit_card(mut self) -> Self {
        self.include_credit_card = false;
        self
    }

    pub fn customer_ids(&self) -> impl Iterator<Item = CustomerId> {
        (0..self.customers as i64).map(|i| FIRST_CUSTOMER_ID + i)
    }

    pub fn generate(&self) -> InputSnapshot {
        let bank = RngBank::new(self.seed);
        let applications = self.applications(&mut bank.for_stream(StreamSlot::Application));
        let installments = self.installments(&mut bank.for_stream(StreamSlot::Installments));
        let bureau = self.bureau(&mut bank.for_stream(StreamSlot::Bureau));
        let credit_card = if self.include_credit_card {
            CreditCardSource::Present(self.credit_card(&mut bank.for_stream(StreamSlot::CreditCard)))
        } else {
            CreditCardSource::Absent
        };

        log::debug!(
            "Generated synthetic inputs: {} applications, {} installments, {} trade lines, credit card {}",
            applications.len(),
            installments.len(),
            bureau.len(),
            credit_card.label()
        );
        InputSnapshot::new(applications, installments, bureau, credit_card)
    }

    fn applications(&self, rng: &mut StreamRng) -> Vec<ApplicationRecord> {
        self.customer_ids()
            .map(|customer_id| ApplicationRecord {
                customer_id,
                target: u8::from(rng.chance(DEFAULT_RATE)),
            })
            .collect()
    }

    fn installments(&self, rng: &mut StreamRng) -> Vec<InstallmentRecord> {
        let mut rows = Vec::new();
        let mut next_prev_id: i64 = 1_000_000;

        for customer_id in self.customer_ids() {
            if rng.chance(NO_INSTALLMENTS_RATE) {
                continue;
            }
            for _ in 0..rng.range_i64(1, 3) {
                next_prev_id += 1;
                let first_due = -(rng.range_i64(60, 2_400) as f64);
                for k in 0..rng.range_i64(1, 12) {
                    let scheduled = first_due + 30.0 * k as f64;
                    let entry = if rng.chance(MISSING_ENTRY_RATE) {
                        None
                    } else if rng.chance(LATE_PAYMENT_RATE) {
                        Some(scheduled + rng.range_i64(1, 60) as f64)
                    } else {
                        Some(scheduled - rng.range_i64(0, 10) as f64)
                    };
                    rows.push(InstallmentRecord {
                        customer_id,
                        prev_loan_id:       Some(next_prev_id),
                        days_instalment:    Some(scheduled),
                        days_entry_payment: entry,
                    });
                }
            }
        }
        rows
    }

    fn bureau(&self, rng: &mut StreamRng) -> Vec<BureauRecord> {
        let mut rows = Vec::new();
        for customer_id in self.customer_ids() {
            if rng.chance(NO_BUREAU_RATE) {
                continue;
            }
            for _ in 0..rng.range_i64(1, 6) {
                let credit = if rng.chance(ZERO_CREDIT_LINE_RATE) {
                    0.0
                } else {
                    cents(rng.pareto(5_000.0, 1.5).min(5_000_000.0))
                };
                let debt = if rng.chance(MISSING_DEBT_RATE) {
                    None
                } else {
                    Some(cents(credit * rng.uniform(0.0, 1.2)))
                };
                let status = if rng.chance(ACTIVE_RATE) {
                    "Active"
                } else if rng.chance(0.9) {
                    "Closed"
                } else {
                    "Sold"
                };
                rows.push(BureauRecord {
                    customer_id,
                    credit_active:   Some(status.into()),
                    amt_credit_sum:  Some(credit),
                    amt_credit_debt: debt,
                    days_credit:     Some(-(rng.range_i64(1, 2_900) as f64)),
                });
            }
        }
        rows
    }

    fn credit_card(&self, rng: &mut StreamRng) -> Vec<CreditCardBalanceRecord> {
        let mut rows = Vec::new();
        for customer_id in self.customer_ids() {
            if !rng.chance(self.credit_card_coverage) {
                continue;
            }
            let limit = CARD_LIMITS[rng.next_u64_below(CARD_LIMITS.len() as u64) as usize];
            for _ in 0..rng.range_i64(3, 12) {
                let balance = cents(rng.uniform(0.0, (limit * 1.3).max(500.0)));
                rows.push(CreditCardBalanceRecord {
                    customer_id,
                    balance:      Some(balance),
                    credit_limit: Some(limit),
                });
            }
        }
        rows
    }
}

fn cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
