//! Closed icon set used by metric tiles and widget headers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Icons understood by the renderer.
///
/// Names are matched leniently (`"chart-bar"`, `"ChartBar"` and
/// `"bar_chart"` are the same icon). Anything unrecognized resolves to
/// [`IconName::Activity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconName {
    /// Pulse line; also the fallback
    #[default]
    Activity,
    /// Bar chart
    BarChart,
    /// Line chart
    LineChart,
    /// Check mark
    Check,
    /// Check mark in a circle
    CheckCircle,
    /// Hollow circle
    Circle,
    /// Payment card
    CreditCard,
    /// Calendar
    Calendar,
    /// Clock
    Clock,
    /// Dollar sign
    DollarSign,
    /// Document
    FileText,
    /// Alert in a circle
    AlertCircle,
    /// People
    Users,
    /// Information
    Info,
    /// Gauge
    Gauge,
    /// Rising trend
    TrendingUp,
    /// Falling trend
    TrendingDown,
}

impl IconName {
    /// Every icon, in declaration order.
    pub const ALL: [Self; 17] = [
        Self::Activity,
        Self::BarChart,
        Self::LineChart,
        Self::Check,
        Self::CheckCircle,
        Self::Circle,
        Self::CreditCard,
        Self::Calendar,
        Self::Clock,
        Self::DollarSign,
        Self::FileText,
        Self::AlertCircle,
        Self::Users,
        Self::Info,
        Self::Gauge,
        Self::TrendingUp,
        Self::TrendingDown,
    ];

    /// Resolve a name; unknown names yield [`IconName::Activity`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "barchart" | "chartbar" | "barchart3" => Self::BarChart,
            "linechart" | "chartline" => Self::LineChart,
            "check" => Self::Check,
            "checkcircle" | "circlecheck" => Self::CheckCircle,
            "circle" => Self::Circle,
            "creditcard" => Self::CreditCard,
            "calendar" => Self::Calendar,
            "clock" => Self::Clock,
            "dollarsign" | "dollar" => Self::DollarSign,
            "filetext" => Self::FileText,
            "alertcircle" => Self::AlertCircle,
            "users" => Self::Users,
            "info" => Self::Info,
            "gauge" => Self::Gauge,
            "trendingup" => Self::TrendingUp,
            "trendingdown" => Self::TrendingDown,
            _ => Self::Activity,
        }
    }

    /// Canonical kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::BarChart => "bar-chart",
            Self::LineChart => "line-chart",
            Self::Check => "check",
            Self::CheckCircle => "check-circle",
            Self::Circle => "circle",
            Self::CreditCard => "credit-card",
            Self::Calendar => "calendar",
            Self::Clock => "clock",
            Self::DollarSign => "dollar-sign",
            Self::FileText => "file-text",
            Self::AlertCircle => "alert-circle",
            Self::Users => "users",
            Self::Info => "info",
            Self::Gauge => "gauge",
            Self::TrendingUp => "trending-up",
            Self::TrendingDown => "trending-down",
        }
    }

    /// Single-glyph stand-in painted by text-only canvases.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Activity => "∿",
            Self::BarChart => "▥",
            Self::LineChart => "⟋",
            Self::Check => "✓",
            Self::CheckCircle => "✔",
            Self::Circle => "○",
            Self::CreditCard => "▭",
            Self::Calendar => "▦",
            Self::Clock => "◷",
            Self::DollarSign => "$",
            Self::FileText => "≡",
            Self::AlertCircle => "!",
            Self::Users => "☺",
            Self::Info => "ℹ",
            Self::Gauge => "◔",
            Self::TrendingUp => "↗",
            Self::TrendingDown => "↘",
        }
    }
}

impl From<String> for IconName {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<&str> for IconName {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<IconName> for String {
    fn from(icon: IconName) -> Self {
        icon.as_str().to_string()
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
