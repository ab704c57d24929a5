//! Join Index Module
//! Lookup structures over typed records, keyed by `(state, year)` and by
//! state alone.
//!
//! The three datasets are independently sourced, so the indexes are the only
//! place their keys meet: queries are normalized the same way record keys
//! were at parse time, duplicate keys resolve to the first occurrence, and
//! cross-dataset alignment silently excludes years one side is missing.

use std::collections::{BTreeSet, HashMap};

use crate::data::records::{normalize_state, MetricRecord, PopulationRecord};

/// Index over one metric dataset.
pub struct JoinIndex<'a> {
    records: &'a [MetricRecord],
    by_key: HashMap<(String, i32), usize>,
    by_state: HashMap<String, Vec<usize>>,
}

impl<'a> JoinIndex<'a> {
    /// Build the index. First occurrence wins on duplicate `(state, year)`
    /// keys.
    pub fn new(records: &'a [MetricRecord]) -> Self {
        let mut by_key = HashMap::new();
        let mut by_state: HashMap<String, Vec<usize>> = HashMap::new();

        for (i, record) in records.iter().enumerate() {
            by_key
                .entry((record.state.clone(), record.year))
                .or_insert(i);
            by_state.entry(record.state.clone()).or_default().push(i);
        }

        Self {
            records,
            by_key,
            by_state,
        }
    }

    /// Look up the record for a `(state, year)` pair.
    pub fn lookup(&self, state: &str, year: i32) -> Option<&MetricRecord> {
        self.by_key
            .get(&(normalize_state(state), year))
            .map(|&i| &self.records[i])
    }

    /// One state's records sorted ascending by year, one record per year
    /// (first occurrence wins).
    pub fn state_series(&self, state: &str) -> Vec<&MetricRecord> {
        let mut series: Vec<&MetricRecord> = self
            .by_state
            .get(&normalize_state(state))
            .map(|indexes| indexes.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default();
        series.sort_by_key(|r| r.year);
        series.dedup_by_key(|r| r.year);
        series
    }

    /// All distinct years in the dataset, ascending.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        years.into_iter().collect()
    }

    /// Pair this dataset with another on the shared `(state, year)` key.
    ///
    /// Returns `(year, self value, other value)` tuples in chronological
    /// order. Years missing from either side, and pairs with a non-finite
    /// value, are excluded rather than reported.
    pub fn aligned_pairs(&self, other: &JoinIndex, state: &str) -> Vec<(i32, f64, f64)> {
        self.state_series(state)
            .into_iter()
            .filter_map(|record| {
                let matched = other.lookup(&record.state, record.year)?;
                (record.value.is_finite() && matched.value.is_finite())
                    .then_some((record.year, record.value, matched.value))
            })
            .collect()
    }
}

/// Index over the population dataset, keyed by state alone.
pub struct PopulationIndex {
    by_state: HashMap<String, i64>,
}

impl PopulationIndex {
    /// Build the index. First occurrence wins on duplicate states.
    pub fn new(records: &[PopulationRecord]) -> Self {
        let mut by_state = HashMap::new();
        for record in records {
            by_state
                .entry(record.state.clone())
                .or_insert(record.population);
        }
        Self { by_state }
    }

    pub fn get(&self, state: &str) -> Option<i64> {
        self.by_state.get(&normalize_state(state)).copied()
    }
}
