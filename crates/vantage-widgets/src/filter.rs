//! Severity filters and drill-down filters.

use crate::data::DataRow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unknown filter name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity filter `{value}` (expected all, critical, high, medium or low)")]
pub struct ParseFilterError {
    /// Rejected input
    pub value: String,
}

/// Widget-level severity selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityFilter {
    /// No filtering
    #[default]
    All,
    /// Critical only
    Critical,
    /// High only
    High,
    /// Medium only
    Medium,
    /// Low only
    Low,
}

impl SeverityFilter {
    /// Every option, in display order.
    pub const ALL: [Self; 5] = [Self::All, Self::Critical, Self::High, Self::Medium, Self::Low];

    /// Lower-case name, also the substring matched against labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Capitalized display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Whether a category label passes: `All` passes everything, otherwise
    /// the lower-cased label must contain the filter name.
    #[must_use]
    pub fn matches_label(self, label: &str) -> bool {
        match self {
            Self::All => true,
            other => label.to_lowercase().contains(other.as_str()),
        }
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseFilterError {
                value: s.to_string(),
            })
    }
}

/// Filter attached to a metric, handed to the host on drill-down.
///
/// Serialized as `{"kind": "bySeverity", "value": "critical"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DrilldownFilter {
    /// Rows whose category label contains the severity name
    BySeverity(SeverityFilter),
    /// Rows whose category label equals the category (case-insensitive)
    ByCategory(String),
    /// Rows whose time bucket (the category label on time-series charts)
    /// equals the range (case-insensitive)
    ByTimeRange(String),
}

impl DrilldownFilter {
    /// Whether `row` passes, reading its label from `x_axis_key`. Rows
    /// without a label only pass `BySeverity(All)`.
    #[must_use]
    pub fn matches(&self, row: &DataRow, x_axis_key: &str) -> bool {
        let label = row.label(x_axis_key);
        match self {
            Self::BySeverity(SeverityFilter::All) => true,
            Self::BySeverity(severity) => label.is_some_and(|l| severity.matches_label(&l)),
            Self::ByCategory(value) | Self::ByTimeRange(value) => {
                label.is_some_and(|l| l.trim().eq_ignore_ascii_case(value.trim()))
            }
        }
    }

    /// Rows of `rows` that pass.
    #[must_use]
    pub fn apply(&self, rows: &[DataRow], x_axis_key: &str) -> Vec<DataRow> {
        rows.iter()
            .filter(|r| self.matches(r, x_axis_key))
            .cloned()
            .collect()
    }

    /// The filter's value as text.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::BySeverity(s) => s.as_str(),
            Self::ByCategory(v) | Self::ByTimeRange(v) => v,
        }
    }
}

impl fmt::Display for DrilldownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::BySeverity(_) => "severity",
            Self::ByCategory(_) => "category",
            Self::ByTimeRange(_) => "time range",
        };
        write!(f, "{kind}: {}", self.value())
    }
}
