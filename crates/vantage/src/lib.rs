//! Vantage: analytics dashboard widgets.
//!
//! Hosts hand an [`AnalyticsWidgetData`] to an [`AnalyticsWidget`], lay it
//! out, forward input [`Event`]s and paint it onto any [`Canvas`]. Chart
//! rendering, metric tiles and the widget's selection state live in
//! [`widgets`]; manifests for whole dashboards live in [`yaml`].
//!
//! ```
//! use vantage::{AnalyticsWidget, AnalyticsWidgetData, ChartKind, DataRow, Rect};
//! use vantage::{RecordingCanvas, SeriesDescriptor, Widget};
//!
//! let data = AnalyticsWidgetData::new("revenue", "Revenue").chart(
//!     ChartKind::Bar,
//!     vec![DataRow::new().with("name", "Jan").with("value", 10)],
//!     vec![SeriesDescriptor::new("Revenue", "value")],
//! );
//! let mut widget = AnalyticsWidget::new(data);
//! widget.layout(Rect::new(0.0, 0.0, 480.0, 600.0));
//!
//! let mut canvas = RecordingCanvas::new();
//! widget.paint(&mut canvas);
//! assert!(canvas.has_text("Revenue"));
//! ```

pub use vantage_core::*;
pub use vantage_widgets as widgets;
pub use vantage_yaml as yaml;

pub use vantage_widgets::{
    AnalyticsWidget, AnalyticsWidgetData, ChartConfig, ChartKind, ChartRenderer, DataRow,
    DataTab, DrilldownFilter, IconName, MetricSpec, MetricTile, SeriesDescriptor,
    SeverityFilter, Trend, Value, WidgetMessage, WidgetState, WidgetStatus,
};
pub use vantage_yaml::{DashboardManifest, ManifestError, WidgetManifest};
