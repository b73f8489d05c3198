//! Dashboard widgets for Vantage.
//!
//! - [`ChartRenderer`]: bar, line, area, pie and composed charts over
//!   [`DataRow`]s described by [`SeriesDescriptor`]s
//! - [`MetricTile`]: a labeled value with trend, icon and drill-down hint
//! - [`AnalyticsWidget`]: header, metric grid, filtered chart, insights and a
//!   call to action, driven by [`WidgetState`]

pub mod analytics;
pub mod chart;
pub mod data;
pub mod filter;
pub mod icon;
pub mod metric_tile;
pub mod palette;
pub mod widget_state;

pub use analytics::{
    AnalyticsWidget, AnalyticsWidgetData, Control, FocusTarget, MenuItem, NavigationRequested,
    WidgetClicked, WidgetStatus, WidgetTarget, CHART_PLACEHOLDER, EMBEDDED_CHART_HEIGHT,
    INSIGHTS_HEADING,
};
pub use chart::{
    ChartConfig, ChartDataCopied, ChartElementClicked, ChartHoverChanged, ChartPeriodChanged,
    ChartRenderer, ChartTabChanged, ChartTarget, Mark, MarkShape, PieSlice, DEFAULT_CHART_HEIGHT,
};
pub use data::{
    series_color, step_circular, to_csv, ChartKind, DataRow, DataTab, SeriesDescriptor,
    SeriesKind, Value,
};
pub use filter::{DrilldownFilter, ParseFilterError, SeverityFilter};
pub use icon::IconName;
pub use metric_tile::{
    MetricClicked, MetricSpec, MetricTile, TileVariant, Trend, TrendDirection,
};
pub use palette::{palette_color, PALETTE_HEX, PALETTE_SIZE};
pub use widget_state::{FilterChanged, WidgetMessage, WidgetState};
