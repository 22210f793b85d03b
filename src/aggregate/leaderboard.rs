//! Model comparison leaderboard
//!
//! Per-dataset ranking of model summaries. The rank-1 entry of each
//! dataset carries the "best model" badge.

use serde::Serialize;

use super::grouping::group_and_rank;
use crate::domain::ModelSummary;

/// One row of the leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based rank within the dataset
    pub rank: usize,
    /// Only the rank-1 entry is marked best
    pub best: bool,
    pub summary: ModelSummary,
}

/// Ranked models for one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetBoard {
    pub dataset: String,
    pub entries: Vec<LeaderboardEntry>,
}

impl DatasetBoard {
    pub fn best(&self) -> Option<&LeaderboardEntry> {
        self.entries.first()
    }

    /// Total predictions behind all models of this dataset
    pub fn total_records(&self) -> u64 {
        self.entries.iter().map(|e| e.summary.records).sum()
    }
}

/// Model leaderboard across datasets, in first-seen dataset order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Leaderboard {
    pub datasets: Vec<DatasetBoard>,
}

impl Leaderboard {
    /// Build a leaderboard from model summaries
    pub fn from_summaries<I>(summaries: I) -> Self
    where
        I: IntoIterator<Item = ModelSummary>,
    {
        let datasets = group_and_rank(summaries)
            .into_inner()
            .into_iter()
            .map(|(dataset, ranked)| DatasetBoard {
                dataset,
                entries: ranked
                    .into_iter()
                    .enumerate()
                    .map(|(i, summary)| LeaderboardEntry {
                        rank: i + 1,
                        best: i == 0,
                        summary,
                    })
                    .collect(),
            })
            .collect();

        Self { datasets }
    }

    pub fn dataset(&self, name: &str) -> Option<&DatasetBoard> {
        self.datasets.iter().find(|d| d.dataset == name)
    }

    /// Best model of every dataset
    pub fn winners(&self) -> impl Iterator<Item = &LeaderboardEntry> {
        self.datasets.iter().filter_map(|d| d.best())
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Total number of models across datasets
    pub fn model_count(&self) -> usize {
        self.datasets.iter().map(|d| d.entries.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelStatus;

    #[test]
    fn test_best_badge_on_rank_one_only() {
        let board = Leaderboard::from_summaries(vec![
            ModelSummary::new("Car Price", "lin", 22000.0).records(10),
            ModelSummary::new("Car Price", "xgb", 31000.0).records(5),
            ModelSummary::new("Movie Rating", "knn", 7.2).status(ModelStatus::Inactive),
        ]);

        let car = board.dataset("Car Price").unwrap();
        assert_eq!(car.entries[0].summary.model_name, "xgb");
        assert!(car.entries[0].best);
        assert_eq!(car.entries[0].rank, 1);
        assert!(!car.entries[1].best);
        assert_eq!(car.entries[1].rank, 2);
        assert_eq!(car.total_records(), 15);

        assert_eq!(board.winners().count(), 2);
        assert_eq!(board.model_count(), 3);
    }

    #[test]
    fn test_tied_best_goes_to_first_seen() {
        let board = Leaderboard::from_summaries(vec![
            ModelSummary::new("Titanic Survival", "svm", 0.81),
            ModelSummary::new("Titanic Survival", "rf", 0.81),
        ]);

        let best = board.dataset("Titanic Survival").unwrap().best().unwrap();
        assert_eq!(best.summary.model_name, "svm");
    }

    #[test]
    fn test_empty_leaderboard() {
        let board = Leaderboard::from_summaries(Vec::new());
        assert!(board.is_empty());
        assert_eq!(board.winners().count(), 0);
    }
}
