//! Failure reasons reported by the layout engine.
//!
//! None of these are fatal: callers show the message in place of a chart.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Missing X column")]
    MissingXColumn,
    #[error("Missing Y column")]
    MissingYColumn,
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("No matching data")]
    NoMatchingData,
    #[error("Invalid bounds: {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LayoutError {
    /// Short reason string suitable for a "no data" message in place of the chart.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
