//! Raw input records, one struct per source table.
//!
//! Field names follow the source CSV headers. Every numeric field the
//! upstream extract can leave empty is an `Option`; the aggregators decide
//! what a missing value means.

use crate::types::CustomerId;
use serde::{Deserialize, Serialize};

/// One row per customer. Defines the output universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(rename = "SK_ID_CURR")]
    pub customer_id: CustomerId,
    #[serde(rename = "TARGET")]
    pub target:      u8,
}

/// One row per scheduled payment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentRecord {
    #[serde(rename = "SK_ID_CURR")]
    pub customer_id:        CustomerId,
    #[serde(rename = "SK_ID_PREV")]
    pub prev_loan_id:       Option<i64>,
    /// Scheduled due date, days relative to the application date.
    #[serde(rename = "DAYS_INSTALMENT")]
    pub days_instalment:    Option<f64>,
    /// Actual payment date, days relative to the application date.
    #[serde(rename = "DAYS_ENTRY_PAYMENT")]
    pub days_entry_payment: Option<f64>,
}

/// One row per externally reported credit account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BureauRecord {
    #[serde(rename = "SK_ID_CURR")]
    pub customer_id:     CustomerId,
    #[serde(rename = "CREDIT_ACTIVE")]
    pub credit_active:   Option<String>,
    #[serde(rename = "AMT_CREDIT_SUM")]
    pub amt_credit_sum:  Option<f64>,
    #[serde(rename = "AMT_CREDIT_SUM_DEBT")]
    pub amt_credit_debt: Option<f64>,
    /// Account opening, days relative to the application date (negative = before).
    #[serde(rename = "DAYS_CREDIT")]
    pub days_credit:     Option<f64>,
}

/// One row per card statement period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCardBalanceRecord {
    #[serde(rename = "SK_ID_CURR")]
    pub customer_id:  CustomerId,
    #[serde(rename = "AMT_BALANCE")]
    pub balance:      Option<f64>,
    #[serde(rename = "AMT_CREDIT_LIMIT_ACTUAL")]
    pub credit_limit: Option<f64>,
}

/// Availability of the optional credit-card table, resolved once when the
/// inputs are loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum CreditCardSource {
    Present(Vec<CreditCardBalanceRecord>),
    Absent,
}

impl CreditCardSource {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Present(_) => "present",
            Self::Absent     => "absent",
        }
    }
}

impl From<Option<Vec<CreditCardBalanceRecord>>> for CreditCardSource {
    fn from(records: Option<Vec<CreditCardBalanceRecord>>) -> Self {
        match records {
            Some(rows) => Self::Present(rows),
            None       => Self::Absent,
        }
    }
}
