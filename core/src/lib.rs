//! FICO-style risk features from loan-level and bureau records.
//!
//! Three independent aggregators (repayment, indebtedness, maturity) feed
//! one assembler that left-joins them onto the application universe and
//! applies the fill policy. `pipeline` wires the stages together and
//! records each run in the SQLite ledger.

pub mod aggregator;
pub mod assembler;
pub mod config;
pub mod error;
pub mod event;
pub mod feature;
pub mod indebtedness;
pub mod maturity;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod repayment;
pub mod rng;
pub mod source;
pub mod stats;
pub mod store;
pub mod synthetic;
pub mod types;
