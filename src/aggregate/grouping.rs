//! Grouping and ranking of records by dataset
//!
//! Grouping is a stable partition: dataset keys keep their first-seen
//! order and records keep their input order inside each group. Ranking
//! is a stable descending sort, so ties keep their input order.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::{Categorized, Ranked};

/// Records partitioned by dataset, in first-seen key order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grouped<T> {
    groups: Vec<(String, Vec<T>)>,
}

impl<T> Default for Grouped<T> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<T> Grouped<T> {
    /// Dataset names in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    /// Records for one dataset
    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of datasets
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|(_, v)| v.len()).sum()
    }

    /// First entry of a group, the rank-1 entry once ranked
    pub fn best(&self, key: &str) -> Option<&T> {
        self.get(key).and_then(|records| records.first())
    }

    pub fn into_inner(self) -> Vec<(String, Vec<T>)> {
        self.groups
    }
}

/// Partition records by dataset
pub fn group_by_dataset<T, I>(records: I) -> Grouped<T>
where
    T: Categorized,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for record in records {
        match index.get(record.category()) {
            Some(&slot) => groups[slot].1.push(record),
            None => {
                let key = record.category().to_string();
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![record]));
            }
        }
    }

    Grouped { groups }
}

/// Sort every group descending by metric
///
/// `sort_by` is stable, which decides which of several tied entries ends
/// up rank 1. NaN metrics sort last.
pub fn rank_by_metric<T: Ranked>(mut grouped: Grouped<T>) -> Grouped<T> {
    for (_, records) in grouped.groups.iter_mut() {
        records.sort_by(|a, b| descending(a.metric(), b.metric()));
    }
    grouped
}

/// Group then rank in one step
pub fn group_and_rank<T, I>(records: I) -> Grouped<T>
where
    T: Categorized + Ranked,
    I: IntoIterator<Item = T>,
{
    rank_by_metric(group_by_dataset(records))
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelSummary, PredictionRecord};

    fn summary(dataset: &str, model: &str, avg: f64) -> ModelSummary {
        ModelSummary::new(dataset, model, avg)
    }

    fn avgs(grouped: &Grouped<ModelSummary>, key: &str) -> Vec<f64> {
        grouped
            .get(key)
            .unwrap()
            .iter()
            .map(|s| s.avg_output)
            .collect()
    }

    #[test]
    fn test_example_scenario() {
        let records = vec![
            summary("Car Price", "lin", 22000.0),
            summary("Car Price", "xgb", 31000.0),
            summary("Movie Rating", "knn", 7.2),
        ];

        let ranked = group_and_rank(records);

        assert_eq!(ranked.keys().collect::<Vec<_>>(), vec!["Car Price", "Movie Rating"]);
        assert_eq!(avgs(&ranked, "Car Price"), vec![31000.0, 22000.0]);
        assert_eq!(avgs(&ranked, "Movie Rating"), vec![7.2]);
        assert_eq!(ranked.best("Car Price").unwrap().model_name, "xgb");
    }

    #[test]
    fn test_keys_in_first_seen_order() {
        let records = vec![
            PredictionRecord::new("B", "m1", 1.0),
            PredictionRecord::new("A", "m1", 2.0),
            PredictionRecord::new("B", "m2", 3.0),
            PredictionRecord::new("C", "m1", 4.0),
            PredictionRecord::new("A", "m2", 5.0),
        ];

        let grouped = group_by_dataset(records);

        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["B", "A", "C"]);
        let b: Vec<f64> = grouped.get("B").unwrap().iter().map(|r| r.output).collect();
        assert_eq!(b, vec![1.0, 3.0]);
        assert_eq!(grouped.record_count(), 5);
    }

    #[test]
    fn test_grouping_keeps_input_order_without_ranking() {
        let records = vec![
            PredictionRecord::new("A", "m1", 1.0),
            PredictionRecord::new("A", "m2", 9.0),
            PredictionRecord::new("A", "m3", 5.0),
        ];

        let grouped = group_by_dataset(records);
        let outputs: Vec<f64> = grouped.get("A").unwrap().iter().map(|r| r.output).collect();
        assert_eq!(outputs, vec![1.0, 9.0, 5.0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            summary("Car Price", "first", 100.0),
            summary("Car Price", "low", 50.0),
            summary("Car Price", "second", 100.0),
            summary("Car Price", "third", 100.0),
        ];

        let ranked = group_and_rank(records);
        let names: Vec<&str> = ranked
            .get("Car Price")
            .unwrap()
            .iter()
            .map(|s| s.model_name.as_str())
            .collect();

        assert_eq!(names, vec!["first", "second", "third", "low"]);
        assert_eq!(ranked.best("Car Price").unwrap().model_name, "first");
    }

    #[test]
    fn test_rank_one_is_maximum() {
        let values = [3.0, -1.0, 42.0, 0.5, 42.0, 7.0, -100.0];
        let records: Vec<ModelSummary> = values
            .iter()
            .enumerate()
            .map(|(i, v)| summary(if i % 2 == 0 { "even" } else { "odd" }, "m", *v))
            .collect();

        let ranked = group_and_rank(records);
        for (_, group) in ranked.iter() {
            let top = group[0].avg_output;
            assert!(group.iter().all(|s| top >= s.avg_output));
        }
    }

    #[test]
    fn test_nan_sorts_last() {
        let records = vec![
            summary("X", "nan", f64::NAN),
            summary("X", "one", 1.0),
            summary("X", "two", 2.0),
        ];

        let ranked = group_and_rank(records);
        let names: Vec<&str> = ranked
            .get("X")
            .unwrap()
            .iter()
            .map(|s| s.model_name.as_str())
            .collect();
        assert_eq!(names, vec!["two", "one", "nan"]);
    }

    #[test]
    fn test_empty_input() {
        let grouped: Grouped<ModelSummary> = group_and_rank(Vec::new());
        assert!(grouped.is_empty());
        assert_eq!(grouped.len(), 0);
        assert!(grouped.best("anything").is_none());
    }
}
