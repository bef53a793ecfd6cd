//! Amounts owed: exposure and utilization per customer.
//!
//! Bureau trade lines give summed credit, summed debt, the active-account
//! count and the bureau utilization. The optional credit-card table adds a
//! card utilization built from mean balance over mean limit. Both ratios
//! are null on a zero denominator and clipped to the configured cap.
//!
//! The card column is joined onto the bureau summary, so it exists only
//! for customers with at least one trade line.

use crate::{
    aggregator::Aggregator,
    config::{PipelineConfig, DEFAULT_ACTIVE_STATUS, DEFAULT_UTILIZATION_CAP},
    records::{BureauRecord, CreditCardBalanceRecord, CreditCardSource},
    source::InputSnapshot,
    stats::{clip_upper, ratio, Mean, Sum},
    types::{CustomerId, CustomerIndex},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndebtednessSummary {
    pub customer_id:             CustomerId,
    pub amt_credit_sum:          f64,
    pub amt_credit_sum_debt:     f64,
    pub active_accounts:         u64,
    pub total_utilization:       Option<f64>,
    pub credit_card_utilization: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct IndebtednessAggregator {
    utilization_cap: f64,
    active_status:   String,
}

impl Default for IndebtednessAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_UTILIZATION_CAP, DEFAULT_ACTIVE_STATUS)
    }
}

#[derive(Default)]
struct BureauAcc {
    credit: Sum,
    debt:   Sum,
    active: u64,
}

#[derive(Default)]
struct CardAcc {
    balance: Mean,
    limit:   Mean,
}

impl IndebtednessAggregator {
    pub fn new(utilization_cap: f64, active_status: impl Into<String>) -> Self {
        Self { utilization_cap, active_status: active_status.into() }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.utilization_cap, config.active_status.clone())
    }

    /// 1 iff the trade line's status is the active category.
    pub fn is_active(&self, line: &BureauRecord) -> bool {
        line.credit_active.as_deref() == Some(self.active_status.as_str())
    }

    /// Debt over credit, null on zero credit, clipped to the cap.
    pub fn utilization(&self, debt: f64, credit: f64) -> Option<f64> {
        clip_upper(ratio(debt, credit), self.utilization_cap)
    }

    pub fn summarize(
        &self,
        bureau: &[BureauRecord],
        credit_card: &CreditCardSource,
    ) -> CustomerIndex<IndebtednessSummary> {
        let mut groups: CustomerIndex<BureauAcc> = CustomerIndex::new();
        for line in bureau {
            let acc = groups.entry(line.customer_id).or_default();
            acc.credit.push(line.amt_credit_sum);
            acc.debt.push(line.amt_credit_debt);
            if self.is_active(line) {
                acc.active += 1;
            }
        }

        let card_utilization = match credit_card {
            CreditCardSource::Present(rows) => self.card_utilization(rows),
            CreditCardSource::Absent        => CustomerIndex::new(),
        };

        groups
            .into_iter()
            .map(|(customer_id, acc)| {
                let credit = acc.credit.value();
                let debt = acc.debt.value();
                let summary = IndebtednessSummary {
                    customer_id,
                    amt_credit_sum:          credit,
                    amt_credit_sum_debt:     debt,
                    active_accounts:         acc.active,
                    total_utilization:       self.utilization(debt, credit),
                    credit_card_utilization: card_utilization.get(&customer_id).copied().flatten(),
                };
                (customer_id, summary)
            })
            .collect()
    }

    /// Mean balance over mean limit per customer across all statements.
    pub fn card_utilization(
        &self,
        statements: &[CreditCardBalanceRecord],
    ) -> CustomerIndex<Option<f64>> {
        let mut groups: CustomerIndex<CardAcc> = CustomerIndex::new();
        for statement in statements {
            let acc = groups.entry(statement.customer_id).or_default();
            acc.balance.push(statement.balance);
            acc.limit.push(statement.credit_limit);
        }

        groups
            .into_iter()
            .map(|(customer_id, acc)| {
                let util = match (acc.balance.value(), acc.limit.value()) {
                    (Some(balance), Some(limit)) => self.utilization(balance, limit),
                    _ => None,
                };
                (customer_id, util)
            })
            .collect()
    }
}

impl Aggregator for IndebtednessAggregator {
    type Summary = IndebtednessSummary;

    fn name(&self) -> &'static str {
        "indebtedness"
    }

    fn aggregate(&self, snapshot: &InputSnapshot) -> CustomerIndex<IndebtednessSummary> {
        self.summarize(&snapshot.bureau, &snapshot.credit_card)
    }
}
