//! Aggregator trait.
//!
//! RULE: every aggregator is a pure function of the input snapshot.
//! Aggregators never see each other's output; only the assembler
//! combines them. A customer with no rows in an aggregator's source is
//! simply absent from its index.

use crate::{source::InputSnapshot, types::CustomerIndex};

pub trait Aggregator {
    type Summary;

    /// Unique stable name, used in logs and the run ledger.
    fn name(&self) -> &'static str;

    fn aggregate(&self, snapshot: &InputSnapshot) -> CustomerIndex<Self::Summary>;
}
