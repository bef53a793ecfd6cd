//! Credit history length: account ages per customer.

use crate::{
    aggregator::Aggregator,
    config::{PipelineConfig, DEFAULT_DAYS_PER_MONTH},
    records::BureauRecord,
    source::InputSnapshot,
    stats::Extremes,
    types::{CustomerId, CustomerIndex},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturitySummary {
    pub customer_id:            CustomerId,
    /// Smallest account age. The column keeps its historical header
    /// `oldest_account_m`.
    pub oldest_account_months:  Option<f64>,
    /// Largest account age, written as `newest_account_m`.
    pub newest_account_months:  Option<f64>,
    pub average_account_months: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct MaturityAggregator {
    days_per_month: f64,
}

impl Default for MaturityAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_DAYS_PER_MONTH)
    }
}

impl MaturityAggregator {
    pub fn new(days_per_month: f64) -> Self {
        Self { days_per_month }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.days_per_month)
    }

    /// Opening offsets are negative before the reference date; the sign is
    /// dropped so ages are never negative.
    pub fn account_age_months(&self, days_credit: f64) -> f64 {
        days_credit.abs() / self.days_per_month
    }

    pub fn summarize(&self, bureau: &[BureauRecord]) -> CustomerIndex<MaturitySummary> {
        let mut groups: CustomerIndex<Extremes> = CustomerIndex::new();
        for line in bureau {
            let age = line.days_credit.map(|d| self.account_age_months(d));
            groups.entry(line.customer_id).or_default().push(age);
        }

        groups
            .into_iter()
            .map(|(customer_id, ages)| {
                let summary = MaturitySummary {
                    customer_id,
                    oldest_account_months:  ages.min(),
                    newest_account_months:  ages.max(),
                    average_account_months: ages.mean(),
                };
                (customer_id, summary)
            })
            .collect()
    }
}

impl Aggregator for MaturityAggregator {
    type Summary = MaturitySummary;

    fn name(&self) -> &'static str {
        "maturity"
    }

    fn aggregate(&self, snapshot: &InputSnapshot) -> CustomerIndex<MaturitySummary> {
        self.summarize(&snapshot.bureau)
    }
}
