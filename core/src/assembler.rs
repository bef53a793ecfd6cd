//! Feature assembler: joins the three summaries onto the application
//! universe, applies the fill policy, and derives the thin-file flag.
//!
//! ORDER (fixed):
//!   1. Application universe (customer id + label), in input order
//!   2. Left-join repayment, indebtedness, maturity
//!   3. Fill policy
//!   4. Thin-file flag
//!
//! RULE: exactly one output row per application row. Nothing is dropped.

use crate::{
    config::FillPolicy,
    feature::{FeatureRow, FeatureTable},
    indebtedness::IndebtednessSummary,
    maturity::MaturitySummary,
    records::ApplicationRecord,
    repayment::RepaymentSummary,
    types::CustomerIndex,
};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct FeatureAssembler {
    fill_policy: FillPolicy,
}

impl FeatureAssembler {
    pub fn new(fill_policy: FillPolicy) -> Self {
        Self { fill_policy }
    }

    pub fn fill_policy(&self) -> &FillPolicy {
        &self.fill_policy
    }

    pub fn assemble(
        &self,
        applications: &[ApplicationRecord],
        repayment: &CustomerIndex<RepaymentSummary>,
        indebtedness: &CustomerIndex<IndebtednessSummary>,
        maturity: &CustomerIndex<MaturitySummary>,
    ) -> FeatureTable {
        warn_on_duplicate_ids(applications);

        let rows = applications
            .iter()
            .map(|app| {
                let mut row = FeatureRow::unmatched(app.customer_id, app.target);
                join_repayment(&mut row, repayment.get(&app.customer_id));
                join_indebtedness(&mut row, indebtedness.get(&app.customer_id));
                join_maturity(&mut row, maturity.get(&app.customer_id));
                self.apply_fill_policy(&mut row);
                row.thin_file_flag = thin_file_flag(&row);
                row
            })
            .collect();

        FeatureTable { rows }
    }

    /// Substitute the configured default into every null covered column.
    /// Returns the number of cells filled.
    pub fn apply_fill_policy(&self, row: &mut FeatureRow) -> usize {
        self.fill_policy
            .rules
            .iter()
            .filter(|rule| row.fill_null(rule.column, rule.value))
            .count()
    }
}

/// 1 iff summed credit is exactly 0. A null sum is not 0.
pub fn thin_file_flag(row: &FeatureRow) -> u8 {
    u8::from(row.amt_credit_sum == Some(0.0))
}

fn join_repayment(row: &mut FeatureRow, summary: Option<&RepaymentSummary>) {
    let Some(s) = summary else { return };
    row.dpd_mean = s.dpd_mean;
    row.dpd_max = s.dpd_max;
    row.on_time_ratio = Some(s.on_time_ratio);
    row.num_payments = Some(s.num_payments);
}

fn join_indebtedness(row: &mut FeatureRow, summary: Option<&IndebtednessSummary>) {
    let Some(s) = summary else { return };
    row.amt_credit_sum = Some(s.amt_credit_sum);
    row.amt_credit_sum_debt = Some(s.amt_credit_sum_debt);
    row.active_accounts = Some(s.active_accounts);
    row.total_utilization = s.total_utilization;
    row.credit_card_utilization = s.credit_card_utilization;
}

fn join_maturity(row: &mut FeatureRow, summary: Option<&MaturitySummary>) {
    let Some(s) = summary else { return };
    row.oldest_account_months = s.oldest_account_months;
    row.newest_account_months = s.newest_account_months;
    row.average_account_months = s.average_account_months;
}

fn warn_on_duplicate_ids(applications: &[ApplicationRecord]) {
    let mut seen = BTreeSet::new();
    let duplicates = applications
        .iter()
        .filter(|app| !seen.insert(app.customer_id))
        .count();
    if duplicates > 0 {
        log::warn!("Application table repeats {duplicates} customer ids; rows kept one-for-one");
    }
}
