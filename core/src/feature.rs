//! The output schema: one `FeatureRow` per application customer.
//!
//! Column order and presence never depend on which optional inputs were
//! available. Only the content of `credit_card_utilization` changes.

use crate::types::CustomerId;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Every column of the feature table, in artifact order.
/// NEVER reorder: the declaration order is the CSV column order.
/// Serialized as its header name; `name()` is the only place names live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureColumn {
    CustomerId,
    Target,
    DpdMean,
    DpdMax,
    OnTimeRatio,
    NumPayments,
    AmtCreditSum,
    AmtCreditSumDebt,
    ActiveAccounts,
    TotalUtilization,
    CreditCardUtilization,
    OldestAccountMonths,
    NewestAccountMonths,
    AverageAccountMonths,
    ThinFileFlag,
}

impl FeatureColumn {
    pub const ALL: [FeatureColumn; 15] = [
        Self::CustomerId,
        Self::Target,
        Self::DpdMean,
        Self::DpdMax,
        Self::OnTimeRatio,
        Self::NumPayments,
        Self::AmtCreditSum,
        Self::AmtCreditSumDebt,
        Self::ActiveAccounts,
        Self::TotalUtilization,
        Self::CreditCardUtilization,
        Self::OldestAccountMonths,
        Self::NewestAccountMonths,
        Self::AverageAccountMonths,
        Self::ThinFileFlag,
    ];

    /// The artifact header name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CustomerId            => "SK_ID_CURR",
            Self::Target                => "TARGET",
            Self::DpdMean               => "dpd_mean",
            Self::DpdMax                => "dpd_max",
            Self::OnTimeRatio           => "on_time_ratio",
            Self::NumPayments           => "num_payments",
            Self::AmtCreditSum          => "AMT_CREDIT_SUM",
            Self::AmtCreditSumDebt      => "AMT_CREDIT_SUM_DEBT",
            Self::ActiveAccounts        => "CREDIT_ACTIVE_FLAG",
            Self::TotalUtilization      => "total_utilization",
            Self::CreditCardUtilization => "credit_card_utilization",
            Self::OldestAccountMonths   => "oldest_account_m",
            Self::NewestAccountMonths   => "newest_account_m",
            Self::AverageAccountMonths  => "aaoa_m",
            Self::ThinFileFlag          => "thin_file_flag",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Key, label and flag columns are always populated and never take a
    /// default.
    pub fn is_fillable(&self) -> bool {
        !matches!(self, Self::CustomerId | Self::Target | Self::ThinFileFlag)
    }

    /// Columns holding a count rather than a measurement.
    pub fn is_count(&self) -> bool {
        matches!(self, Self::NumPayments | Self::ActiveAccounts)
    }
}

impl Serialize for FeatureColumn {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for FeatureColumn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown feature column `{name}`")))
    }
}

/// One customer's features. `None` is written as an empty field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    #[serde(rename = "SK_ID_CURR")]
    pub customer_id:             CustomerId,
    #[serde(rename = "TARGET")]
    pub target:                  u8,
    pub dpd_mean:                Option<f64>,
    pub dpd_max:                 Option<f64>,
    pub on_time_ratio:           Option<f64>,
    pub num_payments:            Option<u64>,
    #[serde(rename = "AMT_CREDIT_SUM")]
    pub amt_credit_sum:          Option<f64>,
    #[serde(rename = "AMT_CREDIT_SUM_DEBT")]
    pub amt_credit_sum_debt:     Option<f64>,
    #[serde(rename = "CREDIT_ACTIVE_FLAG")]
    pub active_accounts:         Option<u64>,
    pub total_utilization:       Option<f64>,
    pub credit_card_utilization: Option<f64>,
    #[serde(rename = "oldest_account_m")]
    pub oldest_account_months:   Option<f64>,
    #[serde(rename = "newest_account_m")]
    pub newest_account_months:   Option<f64>,
    #[serde(rename = "aaoa_m")]
    pub average_account_months:  Option<f64>,
    pub thin_file_flag:          u8,
}

impl FeatureRow {
    /// A row carrying only the application fields.
    pub fn unmatched(customer_id: CustomerId, target: u8) -> Self {
        Self {
            customer_id,
            target,
            dpd_mean: None,
            dpd_max: None,
            on_time_ratio: None,
            num_payments: None,
            amt_credit_sum: None,
            amt_credit_sum_debt: None,
            active_accounts: None,
            total_utilization: None,
            credit_card_utilization: None,
            oldest_account_months: None,
            newest_account_months: None,
            average_account_months: None,
            thin_file_flag: 0,
        }
    }

    /// Read a column as a number. `None` means null.
    pub fn value(&self, column: FeatureColumn) -> Option<f64> {
        match column {
            FeatureColumn::CustomerId            => Some(self.customer_id as f64),
            FeatureColumn::Target                => Some(f64::from(self.target)),
            FeatureColumn::DpdMean               => self.dpd_mean,
            FeatureColumn::DpdMax                => self.dpd_max,
            FeatureColumn::OnTimeRatio           => self.on_time_ratio,
            FeatureColumn::NumPayments           => self.num_payments.map(|n| n as f64),
            FeatureColumn::AmtCreditSum          => self.amt_credit_sum,
            FeatureColumn::AmtCreditSumDebt      => self.amt_credit_sum_debt,
            FeatureColumn::ActiveAccounts        => self.active_accounts.map(|n| n as f64),
            FeatureColumn::TotalUtilization      => self.total_utilization,
            FeatureColumn::CreditCardUtilization => self.credit_card_utilization,
            FeatureColumn::OldestAccountMonths   => self.oldest_account_months,
            FeatureColumn::NewestAccountMonths   => self.newest_account_months,
            FeatureColumn::AverageAccountMonths  => self.average_account_months,
            FeatureColumn::ThinFileFlag          => Some(f64::from(self.thin_file_flag)),
        }
    }

    /// Substitute `default` if the column is null. Returns whether a value
    /// was substituted. Non-fillable columns are never touched.
    pub fn fill_null(&mut self, column: FeatureColumn, default: f64) -> bool {
        fn fill(slot: &mut Option<f64>, default: f64) -> bool {
            if slot.is_some() {
                return false;
            }
            *slot = Some(default);
            true
        }
        fn fill_count(slot: &mut Option<u64>, default: f64) -> bool {
            if slot.is_some() {
                return false;
            }
            // Counts are non-negative whole numbers; validated config only
            // ever hands in such values.
            *slot = Some(default.max(0.0).round() as u64);
            true
        }

        match column {
            FeatureColumn::CustomerId
            | FeatureColumn::Target
            | FeatureColumn::ThinFileFlag        => false,
            FeatureColumn::DpdMean               => fill(&mut self.dpd_mean, default),
            FeatureColumn::DpdMax                => fill(&mut self.dpd_max, default),
            FeatureColumn::OnTimeRatio           => fill(&mut self.on_time_ratio, default),
            FeatureColumn::NumPayments           => fill_count(&mut self.num_payments, default),
            FeatureColumn::AmtCreditSum          => fill(&mut self.amt_credit_sum, default),
            FeatureColumn::AmtCreditSumDebt      => fill(&mut self.amt_credit_sum_debt, default),
            FeatureColumn::ActiveAccounts        => fill_count(&mut self.active_accounts, default),
            FeatureColumn::TotalUtilization      => fill(&mut self.total_utilization, default),
            FeatureColumn::CreditCardUtilization => fill(&mut self.credit_card_utilization, default),
            FeatureColumn::OldestAccountMonths   => fill(&mut self.oldest_account_months, default),
            FeatureColumn::NewestAccountMonths   => fill(&mut self.newest_account_months, default),
            FeatureColumn::AverageAccountMonths  => fill(&mut self.average_account_months, default),
        }
    }

    pub fn is_thin_file(&self) -> bool {
        self.thin_file_flag == 1
    }
}

/// The assembled feature table, rows in application order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureTable {
    pub rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, customer_id: CustomerId) -> Option<&FeatureRow> {
        self.rows.iter().find(|r| r.customer_id == customer_id)
    }

    pub fn thin_file_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_thin_file()).count()
    }

    /// Number of null cells in one column.
    pub fn null_count(&self, column: FeatureColumn) -> usize {
        self.rows.iter().filter(|r| r.value(column).is_none()).count()
    }

    pub fn header() -> Vec<&'static str> {
        FeatureColumn::ALL.iter().map(|c| c.name()).collect()
    }
}
