use super::domain::{FilterCriteria, SchoolRecord};
use super::filter::PredicateFilter;
use serde::Serialize;
use std::cmp::Ordering;

/// Ordered records to render along with their count.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SearchResults {
    pub records: Vec<SchoolRecord>,
    pub count: usize,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|record| record.name.as_str()).collect()
    }
}

/// Filters the fetched set and, when a distance is known, ranks by it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAssembler {
    filter: PredicateFilter,
}

impl ResultAssembler {
    pub fn new(filter: PredicateFilter) -> Self {
        Self { filter }
    }

    pub fn assemble(&self, records: &[SchoolRecord], criteria: &FilterCriteria) -> SearchResults {
        let mut selected: Vec<SchoolRecord> = records
            .iter()
            .filter(|record| self.filter.matches(record, criteria))
            .cloned()
            .collect();

        if selected.iter().any(|record| record.distance_km.is_some()) {
            // `sort_by` is stable, so ties keep their fetched order.
            selected.sort_by(|left, right| compare_distance(left.distance_km, right.distance_km));
        }

        let count = selected.len();
        SearchResults {
            records: selected,
            count,
        }
    }
}

/// Shorthand for the default assembler over a trusted, server-scoped set.
pub fn assemble(records: &[SchoolRecord], criteria: &FilterCriteria) -> SearchResults {
    ResultAssembler::default().assemble(records, criteria)
}

fn compare_distance(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.total_cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
