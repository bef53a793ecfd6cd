use crate::{
    error::{FeatureError, FeatureResult},
    feature::FeatureColumn,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Upper bound applied to both utilization ratios.
pub const DEFAULT_UTILIZATION_CAP: f64 = 1.5;
/// Fixed day-to-month conversion for account ages.
pub const DEFAULT_DAYS_PER_MONTH: f64 = 30.44;
/// The `CREDIT_ACTIVE` category counted as an open account.
pub const DEFAULT_ACTIVE_STATUS: &str = "Active";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub application:         String,
    pub installments:        String,
    pub bureau:              String,
    pub credit_card_balance: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            application:         "application_train.csv".into(),
            installments:        "installments_payments.csv".into(),
            bureau:              "bureau.csv".into(),
            credit_card_balance: "credit_card_balance.csv".into(),
        }
    }
}

/// One entry of the default-fill map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillRule {
    pub column: FeatureColumn,
    pub value:  f64,
}

/// Column → default value applied after the joins.
///
/// Columns not listed stay null for customers missing from the
/// corresponding source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FillPolicy {
    pub rules: Vec<FillRule>,
}

impl FillPolicy {
    pub fn new(rules: Vec<FillRule>) -> Self {
        Self { rules }
    }

    /// The default for `column`, if the policy covers it.
    pub fn default_for(&self, column: FeatureColumn) -> Option<f64> {
        self.rules.iter().find(|r| r.column == column).map(|r| r.value)
    }

    pub fn covers(&self, column: FeatureColumn) -> bool {
        self.default_for(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = FeatureColumn> + '_ {
        self.rules.iter().map(|r| r.column)
    }

    pub fn validate(&self) -> FeatureResult<()> {
        let mut seen = BTreeSet::new();
        for rule in &self.rules {
            if !rule.column.is_fillable() {
                return Err(invalid(format!(
                    "column '{}' cannot take a default",
                    rule.column.name()
                )));
            }
            if !seen.insert(rule.column) {
                return Err(invalid(format!(
                    "duplicate fill rule for '{}'",
                    rule.column.name()
                )));
            }
            if !rule.value.is_finite() {
                return Err(invalid(format!(
                    "default for '{}' must be finite",
                    rule.column.name()
                )));
            }
            if rule.column.is_count() && (rule.value < 0.0 || rule.value.fract() != 0.0) {
                return Err(invalid(format!(
                    "default for count column '{}' must be a non-negative integer",
                    rule.column.name()
                )));
            }
        }
        Ok(())
    }
}

impl Default for FillPolicy {
    fn default() -> Self {
        use FeatureColumn::*;
        Self::new(
            [
                DpdMean,
                DpdMax,
                OnTimeRatio,
                AmtCreditSum,
                AmtCreditSumDebt,
                TotalUtilization,
                CreditCardUtilization,
                AverageAccountMonths,
            ]
            .into_iter()
            .map(|column| FillRule { column, value: 0.0 })
            .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub source_files:    SourceFiles,
    pub utilization_cap: f64,
    pub days_per_month:  f64,
    pub active_status:   String,
    pub fill_policy:     FillPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_files:    SourceFiles::default(),
            utilization_cap: DEFAULT_UTILIZATION_CAP,
            days_per_month:  DEFAULT_DAYS_PER_MONTH,
            active_status:   DEFAULT_ACTIVE_STATUS.into(),
            fill_policy:     FillPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FeatureResult<()> {
        if !(self.utilization_cap.is_finite() && self.utilization_cap > 0.0) {
            return Err(invalid(format!(
                "utilization_cap must be positive, got {}",
                self.utilization_cap
            )));
        }
        if !(self.days_per_month.is_finite() && self.days_per_month > 0.0) {
            return Err(invalid(format!(
                "days_per_month must be positive, got {}",
                self.days_per_month
            )));
        }
        if self.active_status.is_empty() {
            return Err(invalid("active_status must not be empty".into()));
        }
        self.fill_policy.validate()
    }
}

fn invalid(reason: String) -> FeatureError {
    FeatureError::InvalidConfig { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fill_policy_enumerates_eight_columns() {
        let policy = FillPolicy::default();
        assert_eq!(policy.rules.len(), 8);
        assert!(policy.covers(FeatureColumn::CreditCardUtilization));
        assert!(policy.covers(FeatureColumn::AverageAccountMonths));
        assert!(!policy.covers(FeatureColumn::NumPayments));
        assert!(!policy.covers(FeatureColumn::ActiveAccounts));
        assert!(!policy.covers(FeatureColumn::OldestAccountMonths));
        assert!(!policy.covers(FeatureColumn::NewestAccountMonths));
        assert!(policy.rules.iter().all(|r| r.value == 0.0));
    }

    #[test]
    fn rejects_fill_rule_on_key_column() {
        let policy = FillPolicy::new(vec![FillRule { column: FeatureColumn::Target, value: 0.0 }]);
        assert!(matches!(policy.validate(), Err(FeatureError::InvalidConfig { .. })));
    }

    #[test]
    fn rejects_duplicate_and_fractional_count_rules() {
        let dup = FillPolicy::new(vec![
            FillRule { column: FeatureColumn::DpdMean, value: 0.0 },
            FillRule { column: FeatureColumn::DpdMean, value: 1.0 },
        ]);
        assert!(dup.validate().is_err());

        let frac = FillPolicy::new(vec![FillRule { column: FeatureColumn::NumPayments, value: 0.5 }]);
        assert!(frac.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "utilization_cap": 2.0 }"#).unwrap();
        assert_eq!(config.utilization_cap, 2.0);
        assert_eq!(config.days_per_month, DEFAULT_DAYS_PER_MONTH);
        assert_eq!(config.fill_policy, FillPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_fill_column_is_rejected_at_parse() {
        let parsed = serde_json::from_str::<FillPolicy>(r#"[{ "column": "dpd_median", "value": 0.0 }]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn fill_policy_reads_as_ordered_list() {
        let policy: FillPolicy = serde_json::from_str(
            r#"[{ "column": "num_payments", "value": 0.0 }, { "column": "dpd_mean", "value": -1.0 }]"#,
        )
        .unwrap();
        assert_eq!(policy.default_for(FeatureColumn::NumPayments), Some(0.0));
        assert_eq!(policy.default_for(FeatureColumn::DpdMean), Some(-1.0));
        assert!(policy.validate().is_ok());
    }
}
