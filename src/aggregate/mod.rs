//! Aggregation
//!
//! Client-side shaping of already-summarized backend data:
//!
//! - **grouping**: stable partition by dataset, plus stable descending ranking
//! - **leaderboard**: model comparison with a best-model badge per dataset
//!
//! All of it is synchronous and pure; nothing here yields or fails.

pub mod grouping;
pub mod leaderboard;

pub use grouping::{group_and_rank, group_by_dataset, rank_by_metric, Grouped};
pub use leaderboard::{DatasetBoard, Leaderboard, LeaderboardEntry};
