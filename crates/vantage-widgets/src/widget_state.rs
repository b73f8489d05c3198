//! Transient selection state of an analytics widget and its reducer.
//!
//! Severity filter, series visibility, time range, tab and period are
//! independent cells: no transition validates one against another. The
//! derivations below never touch the caller's rows or series; they return
//! borrowed views when nothing is filtered and fresh vectors otherwise.

use crate::data::{step_circular, ChartKind, DataRow, DataTab, SeriesDescriptor};
use crate::filter::SeverityFilter;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::debug;
use vantage_core::{Command, State};

/// Per-instance selection state, scoped to one widget id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetState {
    /// Widget the state belongs to
    pub widget_id: String,
    /// Severity selection
    pub severity: SeverityFilter,
    /// Names of hidden series; everything else is visible
    pub hidden_series: BTreeSet<String>,
    /// Selected time range, if any
    pub time_range: Option<String>,
    /// Active chart tab
    pub active_tab: usize,
    /// Active period
    pub active_period: usize,
    /// Whether the series menu is open
    pub series_menu_open: bool,
}

/// Transitions of [`WidgetState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetMessage {
    /// Select a severity
    SetSeverity(SeverityFilter),
    /// Flip one series between visible and hidden
    ToggleSeries(String),
    /// Make every series visible
    ShowAllSeries,
    /// Select a time range
    SelectTimeRange(String),
    /// Select a chart tab
    SelectTab(usize),
    /// Select a period
    SelectPeriod(usize),
    /// Step the period cursor circularly over `count` periods
    StepPeriod {
        /// Direction
        forward: bool,
        /// Number of periods
        count: usize,
    },
    /// Open or close the series menu
    ToggleSeriesMenu,
    /// Close the series menu
    CloseSeriesMenu,
    /// New widget data arrived; a different id resets the state and the
    /// tab and period cursors are clamped to the new counts
    DataReplaced {
        /// Id of the new data
        id: String,
        /// Number of tabs in the new data
        tab_count: usize,
        /// Number of periods in the new data
        period_count: usize,
    },
}

/// Reported to the host when a time range or severity is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChanged {
    /// Selected value (`"critical"`, `"30d"`, ...)
    pub value: String,
}

impl WidgetState {
    /// Fresh state for `widget_id`: no filters, every series visible.
    #[must_use]
    pub fn new(widget_id: impl Into<String>) -> Self {
        Self {
            widget_id: widget_id.into(),
            ..Self::default()
        }
    }

    /// Whether series `name` is visible.
    #[must_use]
    pub fn is_series_visible(&self, name: &str) -> bool {
        !self.hidden_series.contains(name)
    }

    /// Names of the visible series, in declaration order.
    #[must_use]
    pub fn visible_series_names<'a>(&self, series: &'a [SeriesDescriptor]) -> Vec<&'a str> {
        series
            .iter()
            .map(|s| s.name.as_str())
            .filter(|name| self.is_series_visible(name))
            .collect()
    }

    /// Rows of the active tab when tabs exist, otherwise `chart_data`.
    #[must_use]
    pub fn active_rows<'a>(&self, chart_data: &'a [DataRow], tabs: &'a [DataTab]) -> &'a [DataRow] {
        tabs.get(self.active_tab.min(tabs.len().saturating_sub(1)))
            .map_or(chart_data, |tab| tab.data.as_slice())
    }

    /// Rows handed to the chart.
    ///
    /// Severity `all` and every non-pie kind return `rows` untouched. For pie
    /// charts the rows whose lower-cased `x_axis_key` label contains the
    /// severity name are kept; rows without a label are dropped.
    #[must_use]
    pub fn effective_chart_data<'a>(
        &self,
        rows: &'a [DataRow],
        kind: ChartKind,
        x_axis_key: &str,
    ) -> Cow<'a, [DataRow]> {
        if self.severity == SeverityFilter::All || kind != ChartKind::Pie {
            return Cow::Borrowed(rows);
        }
        Cow::Owned(
            rows.iter()
                .filter(|row| {
                    row.label(x_axis_key)
                        .is_some_and(|label| self.severity.matches_label(&label))
                })
                .cloned()
                .collect(),
        )
    }

    /// Series handed to the chart: those not hidden. May be empty.
    #[must_use]
    pub fn effective_series<'a>(
        &self,
        series: &'a [SeriesDescriptor],
    ) -> Cow<'a, [SeriesDescriptor]> {
        if series.iter().all(|s| self.is_series_visible(&s.name)) {
            return Cow::Borrowed(series);
        }
        Cow::Owned(
            series
                .iter()
                .filter(|s| self.is_series_visible(&s.name))
                .cloned()
                .collect(),
        )
    }

    fn reset(&mut self, widget_id: String) {
        *self = Self::new(widget_id);
    }
}

impl State for WidgetState {
    type Message = WidgetMessage;
    type Output = FilterChanged;

    fn update(&mut self, msg: Self::Message) -> Command<Self::Output> {
        debug!(widget = %self.widget_id, ?msg, "widget state transition");
        match msg {
            WidgetMessage::SetSeverity(severity) => {
                if severity == self.severity {
                    return Command::None;
                }
                self.severity = severity;
                Command::Emit(FilterChanged {
                    value: severity.as_str().to_string(),
                })
            }
            WidgetMessage::ToggleSeries(name) => {
                if !self.hidden_series.remove(&name) {
                    self.hidden_series.insert(name);
                }
                Command::None
            }
            WidgetMessage::ShowAllSeries => {
                self.hidden_series.clear();
                Command::None
            }
            WidgetMessage::SelectTimeRange(range) => {
                if self.time_range.as_deref() == Some(range.as_str()) {
                    return Command::None;
                }
                self.time_range = Some(range.clone());
                Command::Emit(FilterChanged { value: range })
            }
            WidgetMessage::SelectTab(index) => {
                self.active_tab = index;
                Command::None
            }
            WidgetMessage::SelectPeriod(index) => {
                self.active_period = index;
                Command::None
            }
            WidgetMessage::StepPeriod { forward, count } => {
                self.active_period = step_circular(self.active_period, count, forward);
                Command::None
            }
            WidgetMessage::ToggleSeriesMenu => {
                self.series_menu_open = !self.series_menu_open;
                Command::None
            }
            WidgetMessage::CloseSeriesMenu => {
                self.series_menu_open = false;
                Command::None
            }
            WidgetMessage::DataReplaced {
                id,
                tab_count,
                period_count,
            } => {
                if id != self.widget_id {
                    self.reset(id);
                }
                self.active_tab = self.active_tab.min(tab_count.saturating_sub(1));
                self.active_period = self.active_period.min(period_count.saturating_sub(1));
                self.series_menu_open = false;
                Command::None
            }
        }
    }
}
