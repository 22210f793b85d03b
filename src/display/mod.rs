//! Presentation helpers
//!
//! - **formatter**: dataset-specific value formatting and badges
//! - **table**: plain-text and CSV renderers for the terminal

pub mod formatter;
pub mod table;

pub use formatter::{
    format_confidence, format_currency, format_number, format_output, Badge, DatasetKind,
    FormattedOutput,
};

/// Output format for rendered views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}
