//! Shared primitive types used across the entire pipeline.

use std::collections::BTreeMap;

/// The customer key (`SK_ID_CURR`). The only join key across all tables.
pub type CustomerId = i64;

/// The canonical run identifier.
pub type RunId = String;

/// Per-customer aggregate output, ordered by customer id.
pub type CustomerIndex<T> = BTreeMap<CustomerId, T>;
