//! Repayment history: payment-behaviour summary per customer.
//!
//! Lateness (DPD) of one payment event is
//! `max(0, DAYS_ENTRY_PAYMENT - DAYS_INSTALMENT)`, with a missing entry
//! offset read as 0. Early payment earns no credit.

use crate::{
    aggregator::Aggregator,
    records::InstallmentRecord,
    source::InputSnapshot,
    stats::{Extremes, Mean},
    types::{CustomerId, CustomerIndex},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentSummary {
    pub customer_id:   CustomerId,
    pub dpd_mean:      Option<f64>,
    pub dpd_max:       Option<f64>,
    pub on_time_ratio: f64,
    pub num_payments:  u64,
}

/// Days past due for one payment event.
///
/// A missing entry offset counts as day 0, so an unrecorded payment is
/// never penalised. A missing schedule leaves the lateness undefined.
pub fn lateness(days_entry_payment: Option<f64>, days_instalment: Option<f64>) -> Option<f64> {
    let entry = days_entry_payment.filter(|d| !d.is_nan()).unwrap_or(0.0);
    days_instalment
        .filter(|d| !d.is_nan())
        .map(|scheduled| (entry - scheduled).max(0.0))
}

/// On-time iff lateness is exactly zero. Undefined lateness is not on time.
pub fn is_on_time(lateness: Option<f64>) -> bool {
    lateness == Some(0.0)
}

#[derive(Default)]
struct RepaymentAcc {
    dpd:      Extremes,
    on_time:  Mean,
    payments: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RepaymentAggregator;

impl RepaymentAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, installments: &[InstallmentRecord]) -> CustomerIndex<RepaymentSummary> {
        let mut groups: CustomerIndex<RepaymentAcc> = CustomerIndex::new();

        for event in installments {
            let dpd = lateness(event.days_entry_payment, event.days_instalment);
            let acc = groups.entry(event.customer_id).or_default();
            acc.dpd.push(dpd);
            acc.on_time.push(Some(if is_on_time(dpd) { 1.0 } else { 0.0 }));
            if event.prev_loan_id.is_some() {
                acc.payments += 1;
            }
        }

        groups
            .into_iter()
            .map(|(customer_id, acc)| {
                let summary = RepaymentSummary {
                    customer_id,
                    dpd_mean:      acc.dpd.mean(),
                    dpd_max:       acc.dpd.max(),
                    on_time_ratio: acc.on_time.value().unwrap_or(0.0),
                    num_payments:  acc.payments,
                };
                (customer_id, summary)
            })
            .collect()
    }
}

impl Aggregator for RepaymentAggregator {
    type Summary = RepaymentSummary;

    fn name(&self) -> &'static str {
        "repayment"
    }

    fn aggregate(&self, snapshot: &InputSnapshot) -> CustomerIndex<RepaymentSummary> {
        self.summarize(&snapshot.installments)
    }
}
