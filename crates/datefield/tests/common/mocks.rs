//! Mock implementations for testing
//!
//! Provides an in-memory stand-in for the external numeric range index.

use datefield::{Instant, NumericRangeIndex, RangeIndexQuery};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Numeric range index backed by a sorted map
///
/// Records every query it receives so tests can check what the date field
/// handed over.
#[derive(Default)]
pub struct MockRangeIndex {
    values: BTreeMap<u64, i64>,
    queries: RefCell<Vec<RangeIndexQuery>>,
}

impl MockRangeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document's indexed value
    pub fn insert(&mut self, doc: u64, value: Instant) {
        self.values.insert(doc, value.millis());
    }

    /// Queries seen so far
    pub fn queries(&self) -> Vec<RangeIndexQuery> {
        self.queries.borrow().clone()
    }
}

impl NumericRangeIndex for MockRangeIndex {
    fn search(&self, query: &RangeIndexQuery) -> Vec<u64> {
        self.queries.borrow_mut().push(*query);
        self.values
            .iter()
            .filter(|&(_, &value)| query.matches(value))
            .map(|(&doc, _)| doc)
            .collect()
    }
}
