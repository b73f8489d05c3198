//! `AnalyticsWidget`: header, metric grid, filtered chart, insights and a
//! call to action over one logical dataset.
//!
//! The widget owns a [`WidgetState`] and derives the embedded chart's input
//! from it after every transition. Interactions are routed to the innermost
//! target only: a tile click never also reaches the widget-level click
//! handler.

use crate::chart::{
    ChartElementClicked, ChartPeriodChanged, ChartRenderer, ChartTabChanged, RowHandler,
};
use crate::data::{ChartKind, DataRow, DataTab, SeriesDescriptor};
use crate::filter::{DrilldownFilter, SeverityFilter};
use crate::icon::IconName;
use crate::metric_tile::{MetricClicked, MetricSpec, MetricTile};
use crate::palette::{self, hex};
use crate::widget_state::{FilterChanged, WidgetMessage, WidgetState};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;
use vantage_core::{
    estimate_text_width, AccessibleRole, Canvas, Color, Command, Constraints, Event, FontWeight,
    Key, LayoutResult, Message, MouseButton, Point, PointerTracker, Rect, Size, State, TextStyle,
    TypeId, Widget,
};

/// Plot height of the embedded chart when the data sets none.
pub const EMBEDDED_CHART_HEIGHT: f32 = 200.0;

/// Text shown instead of the chart when there is nothing to plot.
pub const CHART_PLACEHOLDER: &str = "No chart data available";

/// Heading of the insights list.
pub const INSIGHTS_HEADING: &str = "Key Insights";

const PAD: f32 = 16.0;
const GAP: f32 = 8.0;
const HEADER_HEIGHT: f32 = 48.0;
const CONTROL_HEIGHT: f32 = 28.0;
const TILE_HEIGHT: f32 = 64.0;
const PLACEHOLDER_HEIGHT: f32 = 120.0;
const INSIGHT_HEADING_HEIGHT: f32 = 24.0;
const INSIGHT_ROW: f32 = 20.0;
const ACTION_HEIGHT: f32 = 36.0;
const MENU_ITEM: f32 = 28.0;
const MENU_WIDTH: f32 = 160.0;

/// Health of the data a widget summarizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetStatus {
    /// Healthy
    Success,
    /// Needs attention
    Warning,
    /// Critical
    Error,
    /// Informational
    #[default]
    Info,
}

impl WidgetStatus {
    /// Badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "Healthy",
            Self::Warning => "Attention",
            Self::Error => "Critical",
            Self::Info => "Info",
        }
    }

    /// Header accent color.
    #[must_use]
    pub fn accent(self) -> Color {
        match self {
            Self::Success => hex("#10b981"),
            Self::Warning => hex("#f59e0b"),
            Self::Error => hex("#ef4444"),
            Self::Info => hex("#3b82f6"),
        }
    }
}

/// Everything a host page supplies to one widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsWidgetData {
    /// Unique id; scopes the selection state
    pub id: String,
    /// Header title
    pub title: String,
    /// Header subtitle
    pub subtitle: String,
    /// Tiles of the metric grid
    pub metrics: Vec<MetricSpec>,
    /// Insight sentences
    pub insights: Vec<String>,
    /// Chart rows
    pub chart_data: Vec<DataRow>,
    /// Chart series
    pub chart_series: Vec<SeriesDescriptor>,
    /// Chart kind
    pub chart_type: ChartKind,
    /// Header accent
    pub status: WidgetStatus,
    /// Call-to-action label; no button when empty
    pub action_text: String,
    /// Call-to-action target; empty falls back to the widget click
    pub action_href: String,
    /// Header icon
    pub icon: IconName,
    /// Chart plot height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_height: Option<f32>,
    /// Category field; `"name"` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis_key: Option<String>,
    /// Time-range choices
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter_options: Vec<String>,
    /// Alternative chart datasets
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub chart_tabs: Vec<DataTab>,
    /// Period labels
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<String>,
}

impl AnalyticsWidgetData {
    /// Create widget data with an id and title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the subtitle.
    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    /// Append a metric.
    #[must_use]
    pub fn metric(mut self, metric: MetricSpec) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Append an insight.
    #[must_use]
    pub fn insight(mut self, insight: impl Into<String>) -> Self {
        self.insights.push(insight.into());
        self
    }

    /// Set the chart kind, rows and series.
    #[must_use]
    pub fn chart(
        mut self,
        kind: ChartKind,
        data: Vec<DataRow>,
        series: Vec<SeriesDescriptor>,
    ) -> Self {
        self.chart_type = kind;
        self.chart_data = data;
        self.chart_series = series;
        self
    }

    /// Set the status.
    #[must_use]
    pub const fn status(mut self, status: WidgetStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the call to action.
    #[must_use]
    pub fn action(mut self, text: impl Into<String>, href: impl Into<String>) -> Self {
        self.action_text = text.into();
        self.action_href = href.into();
        self
    }

    /// Set the header icon.
    #[must_use]
    pub const fn icon(mut self, icon: IconName) -> Self {
        self.icon = icon;
        self
    }

    /// Set the chart plot height.
    #[must_use]
    pub const fn chart_height(mut self, height: f32) -> Self {
        self.chart_height = Some(height);
        self
    }

    /// Set the category field.
    #[must_use]
    pub fn x_axis_key(mut self, key: impl Into<String>) -> Self {
        self.x_axis_key = Some(key.into());
        self
    }

    /// Set the time-range choices.
    #[must_use]
    pub fn filter_options(mut self, options: Vec<String>) -> Self {
        self.filter_options = options;
        self
    }

    /// Set the chart tabs.
    #[must_use]
    pub fn chart_tabs(mut self, tabs: Vec<DataTab>) -> Self {
        self.chart_tabs = tabs;
        self
    }

    /// Set the period labels.
    #[must_use]
    pub fn periods(mut self, periods: Vec<String>) -> Self {
        self.periods = periods;
        self
    }

    /// Category field, defaulting to `"name"`.
    #[must_use]
    pub fn category_key(&self) -> &str {
        self.x_axis_key.as_deref().unwrap_or("name")
    }

    /// Whether there is anything to plot (rows and series).
    #[must_use]
    pub fn has_chart(&self) -> bool {
        let has_rows =
            !self.chart_data.is_empty() || self.chart_tabs.iter().any(|t| !t.data.is_empty());
        has_rows && !self.chart_series.is_empty()
    }
}

/// Widget-level click (body, or action without a target).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetClicked {
    /// Id of the clicked widget
    pub widget_id: String,
}

/// Request to navigate to the action target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequested {
    /// Target route or URL
    pub href: String,
}

/// Handler for metric clicks: label and drill-down filter.
pub type MetricClickHandler = Arc<dyn Fn(&str, Option<&DrilldownFilter>) + Send + Sync>;

/// Handler receiving a string value (filter value, navigation target).
pub type TextHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Handler without arguments.
pub type ClickHandler = Arc<dyn Fn() + Send + Sync>;

/// Header controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Time-range chip by option index
    TimeRange(usize),
    /// Severity chip (pie charts only)
    Severity(SeverityFilter),
    /// Series visibility menu button
    SeriesMenu,
}

/// Entries of the series menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Toggle series by index
    Series(usize),
    /// Show every series
    ShowAll,
}

/// Pointer targets inside the widget, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetTarget {
    /// Open series menu entry
    Menu(MenuItem),
    /// Header control
    Control(Control),
    /// Metric tile by index
    Metric(usize),
    /// Embedded chart area
    Chart,
    /// Call-to-action button
    Action,
    /// Anywhere else on the widget
    Body,
}

/// Keyboard focus stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// Metric tile by index
    Metric(usize),
    /// Call-to-action button
    Action,
}

#[derive(Debug, Clone, Default)]
struct WidgetLayout {
    header: Rect,
    badge: Rect,
    controls: Vec<(Control, Rect)>,
    menu: Vec<(MenuItem, Rect)>,
    tiles: Vec<Rect>,
    chart: Rect,
    insights: Rect,
    action: Option<Rect>,
    height: f32,
}

/// Composite analytics panel.
#[derive(Clone)]
pub struct AnalyticsWidget {
    data: AnalyticsWidgetData,
    state: WidgetState,
    loading: bool,
    chart: ChartRenderer,
    tiles: Vec<MetricTile>,
    on_metric_click: Option<MetricClickHandler>,
    on_chart_element_click: Option<RowHandler>,
    on_filter_change: Option<TextHandler>,
    on_click: Option<ClickHandler>,
    on_navigate: Option<TextHandler>,
    pointer: Option<Arc<dyn PointerTracker>>,
    focus: Option<FocusTarget>,
    pressed: Option<WidgetTarget>,
    pressed_on_plot: bool,
    test_id_value: Option<String>,
    layout: WidgetLayout,
    bounds: Rect,
}

impl AnalyticsWidget {
    /// Create a widget over `data`.
    #[must_use]
    pub fn new(data: AnalyticsWidgetData) -> Self {
        let state = WidgetState::new(data.id.clone());
        let mut widget = Self {
            data,
            state,
            loading: false,
            chart: ChartRenderer::default(),
            tiles: Vec::new(),
            on_metric_click: None,
            on_chart_element_click: None,
            on_filter_change: None,
            on_click: None,
            on_navigate: None,
            pointer: None,
            focus: None,
            pressed: None,
            pressed_on_plot: false,
            test_id_value: None,
            layout: WidgetLayout::default(),
            bounds: Rect::default(),
        };
        widget.rebuild_tiles();
        widget.sync_chart();
        widget
    }

    /// Set loading state.
    #[must_use]
    pub fn loading(mut self, loading: bool) -> Self {
        self.set_loading(loading);
        self
    }

    /// Handle metric tile clicks. Tiles are clickable only with a handler.
    #[must_use]
    pub fn on_metric_click(
        mut self,
        handler: impl Fn(&str, Option<&DrilldownFilter>) + Send + Sync + 'static,
    ) -> Self {
        self.on_metric_click = Some(Arc::new(handler));
        self.rebuild_tiles();
        self
    }

    /// Handle chart element clicks.
    #[must_use]
    pub fn on_chart_element_click(
        mut self,
        handler: impl Fn(&DataRow) + Send + Sync + 'static,
    ) -> Self {
        self.on_chart_element_click = Some(Arc::new(handler));
        self
    }

    /// Handle time-range and severity selections.
    #[must_use]
    pub fn on_filter_change(mut self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_filter_change = Some(Arc::new(handler));
        self
    }

    /// Handle widget-level clicks.
    #[must_use]
    pub fn on_click(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(handler));
        self
    }

    /// Handle navigation to the action target.
    #[must_use]
    pub fn on_navigate(mut self, handler: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_navigate = Some(Arc::new(handler));
        self
    }

    /// Report pointer movement to `tracker`.
    #[must_use]
    pub fn pointer_tracker(mut self, tracker: Arc<dyn PointerTracker>) -> Self {
        self.pointer = Some(tracker);
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Replace the data. Selection state survives when the id is unchanged.
    pub fn set_data(&mut self, data: AnalyticsWidgetData) {
        let replaced = WidgetMessage::DataReplaced {
            id: data.id.clone(),
            tab_count: data.chart_tabs.len(),
            period_count: data.periods.len(),
        };
        self.data = data;
        self.focus = None;
        self.pressed = None;
        self.state.update(replaced);
        self.rebuild_tiles();
        self.sync_chart();
        self.relayout();
    }

    /// Change loading state. Selection state is kept.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.pressed = None;
        self.chart.set_loading(loading);
        for tile in &mut self.tiles {
            tile.set_loading(loading);
        }
    }

    /// Current data.
    #[must_use]
    pub const fn data(&self) -> &AnalyticsWidgetData {
        &self.data
    }

    /// Current selection state.
    #[must_use]
    pub const fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Embedded chart.
    #[must_use]
    pub const fn chart(&self) -> &ChartRenderer {
        &self.chart
    }

    /// Metric tiles.
    #[must_use]
    pub fn tiles(&self) -> &[MetricTile] {
        &self.tiles
    }

    /// Whether the widget shows placeholders.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Focused target, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<FocusTarget> {
        self.focus
    }

    /// Rows the chart plots for the active tab.
    #[must_use]
    pub fn effective_chart_data(&self) -> Cow<'_, [DataRow]> {
        let rows = self
            .state
            .active_rows(&self.data.chart_data, &self.data.chart_tabs);
        self.state
            .effective_chart_data(rows, self.data.chart_type, self.data.category_key())
    }

    /// Series the chart plots.
    #[must_use]
    pub fn effective_series(&self) -> Cow<'_, [SeriesDescriptor]> {
        self.state.effective_series(&self.data.chart_series)
    }

    /// Bounds of a header control after layout.
    #[must_use]
    pub fn control_rect(&self, control: Control) -> Option<Rect> {
        self.layout
            .controls
            .iter()
            .find(|(c, _)| *c == control)
            .map(|(_, r)| *r)
    }

    /// Bounds of a series menu entry after layout.
    #[must_use]
    pub fn menu_rect(&self, item: MenuItem) -> Option<Rect> {
        self.layout
            .menu
            .iter()
            .find(|(m, _)| *m == item)
            .map(|(_, r)| *r)
    }

    /// Bounds of metric tile `index` after layout.
    #[must_use]
    pub fn tile_rect(&self, index: usize) -> Option<Rect> {
        self.layout.tiles.get(index).copied()
    }

    /// Bounds of the chart area after layout.
    #[must_use]
    pub const fn chart_rect(&self) -> Rect {
        self.layout.chart
    }

    /// Bounds of the action button after layout.
    #[must_use]
    pub const fn action_rect(&self) -> Option<Rect> {
        self.layout.action
    }

    /// Apply a state transition, refresh the chart and carry out the
    /// resulting command.
    pub fn dispatch(&mut self, msg: WidgetMessage) -> Option<Message> {
        let command = self.state.update(msg);
        self.sync_chart();
        self.relayout();
        self.execute(command)
    }

    fn execute(&self, command: Command<FilterChanged>) -> Option<Message> {
        match command {
            Command::None => None,
            Command::Emit(changed) => {
                debug!(widget = %self.data.id, value = %changed.value, "filter changed");
                if let Some(handler) = &self.on_filter_change {
                    handler(&changed.value);
                }
                Some(Box::new(changed))
            }
            Command::Navigate { route } => {
                debug!(widget = %self.data.id, %route, "navigation requested");
                if let Some(handler) = &self.on_navigate {
                    handler(&route);
                }
                Some(Box::new(NavigationRequested { href: route }))
            }
            Command::Batch(commands) => commands
                .into_iter()
                .filter_map(|c| self.execute(c))
                .last(),
        }
    }

    fn rebuild_tiles(&mut self) {
        let clickable = self.on_metric_click.is_some();
        self.tiles = self
            .data
            .metrics
            .iter()
            .enumerate()
            .map(|(i, metric)| {
                let mut tile = MetricTile::new(metric.clone())
                    .clickable(clickable)
                    .loading(self.loading);
                tile.set_focused(self.focus == Some(FocusTarget::Metric(i)));
                tile
            })
            .collect();
    }

    fn sync_chart(&mut self) {
        let kind = self.data.chart_type;
        let key = self.data.category_key().to_string();
        let data = self
            .state
            .effective_chart_data(&self.data.chart_data, kind, &key)
            .into_owned();
        let tabs = self
            .data
            .chart_tabs
            .iter()
            .map(|tab| {
                let rows = self.state.effective_chart_data(&tab.data, kind, &key);
                DataTab::new(tab.title.clone(), rows.into_owned())
            })
            .collect();
        // Cartesian colors resolve against the full list so hiding a series
        // leaves the others unchanged. Pie slices keep their ordinal colors.
        let series = self
            .data
            .chart_series
            .iter()
            .enumerate()
            .filter(|(_, s)| self.state.is_series_visible(&s.name))
            .map(|(i, s)| {
                let mut s = s.clone();
                let parsed = s.color.as_deref().and_then(|c| Color::from_hex(c).ok());
                if kind != ChartKind::Pie && parsed.is_none() {
                    s.color = Some(palette::palette_color(i).to_hex());
                }
                s
            })
            .collect();

        let chart = &mut self.chart;
        chart.set_kind(kind);
        chart.set_series(series);
        chart.set_data(data);
        chart.set_tabs(tabs);
        chart.set_active_tab(self.state.active_tab);
        chart.set_periods(self.data.periods.clone());
        chart.set_active_period(self.state.active_period);
        chart.set_loading(self.loading);

        let config = chart.config_mut();
        config.x_axis_key = key;
        config.height = Some(self.data.chart_height.unwrap_or(EMBEDDED_CHART_HEIGHT));
        config.show_grid = false;
        config.show_legend = false;
        config.show_percentages = kind == ChartKind::Pie;
    }

    fn relayout(&mut self) {
        if self.bounds.width > 0.0 {
            let bounds = self.bounds;
            self.layout(bounds);
        }
    }

    fn control_labels(&self) -> Vec<(Control, String)> {
        let mut controls: Vec<(Control, String)> = self
            .data
            .filter_options
            .iter()
            .enumerate()
            .map(|(i, option)| (Control::TimeRange(i), option.clone()))
            .collect();
        if self.data.chart_type == ChartKind::Pie {
            controls.extend(
                SeverityFilter::ALL
                    .into_iter()
                    .map(|s| (Control::Severity(s), s.label().to_string())),
            );
        }
        if self.data.chart_series.len() > 1 {
            controls.push((Control::SeriesMenu, "Series".to_string()));
        }
        controls
    }

    fn compute_layout(&self, bounds: Rect) -> WidgetLayout {
        let inner_x = bounds.x + PAD;
        let inner_w = PAD.mul_add(-2.0, bounds.width).max(0.0);
        let mut y = bounds.y + PAD;

        let header = Rect::new(inner_x, y, inner_w, HEADER_HEIGHT);
        let badge_w = estimate_text_width(self.data.status.label(), 12.0) + 16.0;
        let badge = Rect::new(header.right() - badge_w, y + 2.0, badge_w, 20.0);
        y += HEADER_HEIGHT + GAP;

        let mut controls = Vec::new();
        let labels = self.control_labels();
        if !labels.is_empty() {
            let mut x = inner_x;
            for (control, label) in labels {
                let w = estimate_text_width(&label, 12.0) + 20.0;
                let rect = if control == Control::SeriesMenu {
                    Rect::new(header.right() - w, y, w, CONTROL_HEIGHT)
                } else {
                    let rect = Rect::new(x, y, w, CONTROL_HEIGHT);
                    x += w + 6.0;
                    rect
                };
                controls.push((control, rect));
            }
            y += CONTROL_HEIGHT + GAP;
        }

        let mut menu = Vec::new();
        if let Some((_, button)) = controls.iter().find(|(c, _)| *c == Control::SeriesMenu) {
            let x = button.right() - MENU_WIDTH;
            let items = (0..self.data.chart_series.len())
                .map(MenuItem::Series)
                .chain(std::iter::once(MenuItem::ShowAll));
            for (i, item) in items.enumerate() {
                let top = (i as f32).mul_add(MENU_ITEM, button.bottom() + 4.0);
                menu.push((item, Rect::new(x, top, MENU_WIDTH, MENU_ITEM)));
            }
        }

        let mut tiles = Vec::new();
        if !self.tiles.is_empty() {
            let col_w = ((inner_w - GAP) / 2.0).max(0.0);
            let tile_h = self
                .tiles
                .iter()
                .map(|t| t.measure(Constraints::loose(Size::new(col_w, f32::INFINITY))).height)
                .fold(TILE_HEIGHT, f32::max);
            for i in 0..self.tiles.len() {
                let (row, col) = ((i / 2) as f32, (i % 2) as f32);
                tiles.push(Rect::new(
                    col.mul_add(col_w + GAP, inner_x),
                    row.mul_add(tile_h + GAP, y),
                    col_w,
                    tile_h,
                ));
            }
            y += self.tiles.len().div_ceil(2) as f32 * (tile_h + GAP);
        }

        let chart_h = if self.data.has_chart() {
            self.chart
                .measure(Constraints::loose(Size::new(inner_w, f32::INFINITY)))
                .height
        } else {
            PLACEHOLDER_HEIGHT
        };
        let chart = Rect::new(inner_x, y, inner_w, chart_h);
        y += chart_h + GAP;

        let insights_h = if self.data.insights.is_empty() {
            0.0
        } else {
            (self.data.insights.len() as f32).mul_add(INSIGHT_ROW, INSIGHT_HEADING_HEIGHT)
        };
        let insights = Rect::new(inner_x, y, inner_w, insights_h);
        if insights_h > 0.0 {
            y += insights_h + GAP;
        }

        let action = if self.data.action_text.is_empty() {
            None
        } else {
            let rect = Rect::new(inner_x, y, inner_w, ACTION_HEIGHT);
            y += ACTION_HEIGHT + GAP;
            Some(rect)
        };

        WidgetLayout {
            header,
            badge,
            controls,
            menu,
            tiles,
            chart,
            insights,
            action,
            height: y - GAP + PAD - bounds.y,
        }
    }

    /// Innermost target under `point`.
    #[must_use]
    pub fn target_at(&self, point: Point) -> Option<WidgetTarget> {
        let layout = &self.layout;
        if self.state.series_menu_open {
            if let Some((item, _)) = layout.menu.iter().find(|(_, r)| r.contains_point(&point)) {
                return Some(WidgetTarget::Menu(*item));
            }
        }
        if let Some((control, _)) = layout.controls.iter().find(|(_, r)| r.contains_point(&point))
        {
            return Some(WidgetTarget::Control(*control));
        }
        if layout.action.is_some_and(|r| r.contains_point(&point)) {
            return Some(WidgetTarget::Action);
        }
        if let Some(i) = layout.tiles.iter().position(|r| r.contains_point(&point)) {
            if self.tiles.get(i).is_some_and(MetricTile::is_clickable) {
                return Some(WidgetTarget::Metric(i));
            }
        }
        if self.data.has_chart() && layout.chart.contains_point(&point) {
            return Some(WidgetTarget::Chart);
        }
        self.bounds
            .contains_point(&point)
            .then_some(WidgetTarget::Body)
    }

    fn focus_targets(&self) -> Vec<FocusTarget> {
        let mut targets: Vec<FocusTarget> = self
            .tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_clickable())
            .map(|(i, _)| FocusTarget::Metric(i))
            .collect();
        if !self.data.action_text.is_empty() {
            targets.push(FocusTarget::Action);
        }
        targets
    }

    fn set_focus(&mut self, focus: Option<FocusTarget>) {
        self.focus = focus;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            tile.set_focused(focus == Some(FocusTarget::Metric(i)));
        }
    }

    fn cycle_focus(&mut self) {
        let targets = self.focus_targets();
        let next = match self.focus.and_then(|f| targets.iter().position(|t| *t == f)) {
            Some(i) => targets.get((i + 1) % targets.len()).copied(),
            None => targets.first().copied(),
        };
        self.set_focus(next);
    }

    fn click_body(&self) -> Option<Message> {
        debug!(widget = %self.data.id, "widget clicked");
        if let Some(handler) = &self.on_click {
            handler();
        }
        Some(Box::new(WidgetClicked {
            widget_id: self.data.id.clone(),
        }))
    }

    fn click_metric(&self, index: usize) -> Option<Message> {
        let tile = self.tiles.get(index)?;
        let message = tile.activate()?;
        if let Some(handler) = &self.on_metric_click {
            let metric = tile.metric();
            handler(&metric.label, metric.drilldown_filter.as_ref());
        }
        Some(message)
    }

    fn click_action(&mut self) -> Option<Message> {
        if self.data.action_href.is_empty() {
            return self.click_body();
        }
        let route = self.data.action_href.clone();
        self.execute(Command::Navigate { route })
    }

    fn activate(&mut self, target: WidgetTarget) -> Option<Message> {
        match target {
            WidgetTarget::Menu(MenuItem::Series(i)) => {
                let name = self.data.chart_series.get(i)?.name.clone();
                self.dispatch(WidgetMessage::ToggleSeries(name))
            }
            WidgetTarget::Menu(MenuItem::ShowAll) => {
                self.state.update(WidgetMessage::CloseSeriesMenu);
                self.dispatch(WidgetMessage::ShowAllSeries)
            }
            WidgetTarget::Control(Control::TimeRange(i)) => {
                let option = self.data.filter_options.get(i)?.clone();
                self.dispatch(WidgetMessage::SelectTimeRange(option))
            }
            WidgetTarget::Control(Control::Severity(severity)) => {
                self.dispatch(WidgetMessage::SetSeverity(severity))
            }
            WidgetTarget::Control(Control::SeriesMenu) => {
                self.dispatch(WidgetMessage::ToggleSeriesMenu)
            }
            WidgetTarget::Metric(i) => self.click_metric(i),
            WidgetTarget::Action => self.click_action(),
            WidgetTarget::Chart | WidgetTarget::Body => self.click_body(),
        }
    }

    fn activate_focus(&mut self) -> Option<Message> {
        match self.focus? {
            FocusTarget::Metric(i) => self.click_metric(i),
            FocusTarget::Action => self.click_action(),
        }
    }

    /// Map a message coming out of the embedded chart onto the widget.
    fn route_chart_message(&mut self, message: Message) -> Option<Message> {
        let message = match message.downcast::<ChartElementClicked>() {
            Ok(clicked) => {
                let Some(handler) = &self.on_chart_element_click else {
                    return self.click_body();
                };
                debug!(widget = %self.data.id, row = clicked.row_index, "chart element clicked");
                handler(&clicked.row);
                return Some(clicked);
            }
            Err(other) => other,
        };
        if let Some(tab) = message.downcast_ref::<ChartTabChanged>() {
            self.state.update(WidgetMessage::SelectTab(tab.index));
        } else if let Some(period) = message.downcast_ref::<ChartPeriodChanged>() {
            self.state.update(WidgetMessage::SelectPeriod(period.index));
        }
        Some(message)
    }

    /// Finish a press that started on the chart. A press and release on
    /// empty plot space counts as a widget click.
    fn release_on_chart(&mut self, event: &Event, position: Point) -> Option<Message> {
        let on_plot = std::mem::take(&mut self.pressed_on_plot);
        match self.chart.event(event) {
            Some(message) => self.route_chart_message(message),
            None if on_plot
                && self.chart.target_at(position).is_none()
                && self.layout.chart.contains_point(&position) =>
            {
                self.click_body()
            }
            None => None,
        }
    }

    fn paint_header(&self, canvas: &mut dyn Canvas) {
        let header = self.layout.header;
        let accent = self.data.status.accent();
        canvas.fill_rect(
            Rect::new(self.bounds.x, self.bounds.y, 4.0, self.bounds.height),
            accent,
        );
        canvas.draw_text(
            self.data.icon.glyph(),
            Point::new(header.x, header.y + 18.0),
            &TextStyle::sized(16.0, accent),
        );
        canvas.draw_text(
            &self.data.title,
            Point::new(header.x + 24.0, header.y + 18.0),
            &TextStyle::sized(16.0, palette::text_primary()).weight(FontWeight::Semibold),
        );
        if !self.data.subtitle.is_empty() {
            canvas.draw_text(
                &self.data.subtitle,
                Point::new(header.x + 24.0, header.y + 38.0),
                &TextStyle::sized(13.0, palette::text_muted()),
            );
        }

        let badge = self.layout.badge;
        canvas.fill_rect(badge, accent.with_alpha(0.15));
        canvas.draw_text(
            self.data.status.label(),
            Point::new(badge.x + 8.0, badge.y + 14.0),
            &TextStyle::sized(12.0, accent).weight(FontWeight::Medium),
        );
    }

    fn control_selected(&self, control: Control) -> bool {
        match control {
            Control::TimeRange(i) => {
                self.state.time_range.as_deref() == self.data.filter_options.get(i).map(String::as_str)
            }
            Control::Severity(s) => self.state.severity == s,
            Control::SeriesMenu => self.state.series_menu_open,
        }
    }

    fn paint_controls(&self, canvas: &mut dyn Canvas) {
        for ((control, rect), (_, label)) in self.layout.controls.iter().zip(self.control_labels())
        {
            let selected = self.control_selected(*control);
            let text_color = if selected {
                canvas.fill_rect(*rect, palette::accent());
                Color::WHITE
            } else {
                canvas.stroke_rect(*rect, palette::border(), 1.0);
                palette::text_primary()
            };
            canvas.draw_text(
                &label,
                Point::new(rect.x + 10.0, rect.y + 18.0),
                &TextStyle::sized(12.0, text_color),
            );
        }
    }

    fn paint_menu(&self, canvas: &mut dyn Canvas) {
        if !self.state.series_menu_open {
            return;
        }
        for (item, rect) in &self.layout.menu {
            canvas.fill_rect(*rect, palette::surface());
            canvas.stroke_rect(*rect, palette::border(), 1.0);
            let style = TextStyle::sized(13.0, palette::text_primary());
            match item {
                MenuItem::Series(i) => {
                    let Some(series) = self.data.chart_series.get(*i) else {
                        continue;
                    };
                    if self.state.is_series_visible(&series.name) {
                        canvas.draw_text("✓", Point::new(rect.x + 8.0, rect.y + 19.0), &style);
                    }
                    canvas.fill_rect(
                        Rect::new(rect.x + 24.0, rect.y + 9.0, 10.0, 10.0),
                        series.resolved_color(*i),
                    );
                    canvas.draw_text(
                        &series.name,
                        Point::new(rect.x + 40.0, rect.y + 19.0),
                        &style,
                    );
                }
                MenuItem::ShowAll => {
                    canvas.draw_text("Show all", Point::new(rect.x + 40.0, rect.y + 19.0), &style);
                }
            }
        }
    }

    fn paint_insights(&self, canvas: &mut dyn Canvas) {
        if self.data.insights.is_empty() {
            return;
        }
        let area = self.layout.insights;
        canvas.draw_text(
            INSIGHTS_HEADING,
            Point::new(area.x, area.y + 16.0),
            &TextStyle::sized(14.0, palette::text_primary()).weight(FontWeight::Semibold),
        );
        for (i, insight) in self.data.insights.iter().enumerate() {
            let y = (i as f32).mul_add(INSIGHT_ROW, area.y + INSIGHT_HEADING_HEIGHT + 14.0);
            let style = TextStyle::sized(13.0, palette::text_muted());
            canvas.draw_text("•", Point::new(area.x, y), &style);
            canvas.draw_text(insight, Point::new(area.x + 12.0, y), &style);
        }
    }

    fn paint_action(&self, canvas: &mut dyn Canvas) {
        let Some(rect) = self.layout.action else {
            return;
        };
        canvas.fill_rect(rect, palette::accent());
        if self.focus == Some(FocusTarget::Action) {
            canvas.stroke_rect(rect, palette::text_primary(), 2.0);
        }
        let width = estimate_text_width(&self.data.action_text, 14.0);
        canvas.draw_text(
            &self.data.action_text,
            Point::new(rect.center().x - width / 2.0, rect.y + 23.0),
            &TextStyle::sized(14.0, Color::WHITE).weight(FontWeight::Medium),
        );
    }

    fn paint_skeleton(&self, canvas: &mut dyn Canvas) {
        let header = self.layout.header;
        canvas.fill_rect(
            Rect::new(header.x, header.y, header.width * 0.6, 20.0),
            palette::skeleton(),
        );
        canvas.fill_rect(
            Rect::new(header.x, header.y + 28.0, header.width * 0.4, 12.0),
            palette::skeleton(),
        );
        for tile in &self.tiles {
            tile.paint(canvas);
        }
        canvas.fill_rect(self.layout.chart, palette::skeleton());
    }
}

impl Widget for AnalyticsWidget {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let width = constraints.max_width_or(480.0);
        let layout = self.compute_layout(Rect::new(0.0, 0.0, width, 0.0));
        constraints.constrain(Size::new(width, layout.height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.layout = self.compute_layout(bounds);
        for (tile, rect) in self.tiles.iter_mut().zip(&self.layout.tiles) {
            tile.layout(*rect);
        }
        self.chart.layout(self.layout.chart);
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds, palette::surface());
        canvas.stroke_rect(self.bounds, palette::border(), 1.0);

        if self.loading {
            self.paint_skeleton(canvas);
            return;
        }

        self.paint_header(canvas);
        self.paint_controls(canvas);
        for tile in &self.tiles {
            tile.paint(canvas);
        }

        if self.data.has_chart() {
            self.chart.paint(canvas);
        } else {
            let area = self.layout.chart;
            canvas.fill_rect(area, hex("#f9fafb"));
            let width = estimate_text_width(CHART_PLACEHOLDER, 14.0);
            let center = area.center();
            canvas.draw_text(
                CHART_PLACEHOLDER,
                Point::new(center.x - width / 2.0, center.y),
                &TextStyle::sized(14.0, palette::text_muted()),
            );
        }

        self.paint_insights(canvas);
        self.paint_action(canvas);
        self.paint_menu(canvas);
    }

    fn event(&mut self, event: &Event) -> Option<Message> {
        if self.loading {
            return None;
        }

        match event {
            Event::MouseMove { position } => {
                if let Some(pointer) = &self.pointer {
                    pointer.pointer_moved(*position);
                }
                if self.data.has_chart() {
                    self.chart.event(event)
                } else {
                    None
                }
            }
            Event::MouseLeave => {
                if let Some(pointer) = &self.pointer {
                    pointer.pointer_left();
                }
                self.pressed = None;
                self.chart.event(event)
            }
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                let target = self.target_at(*position);
                if self.state.series_menu_open
                    && !matches!(
                        target,
                        Some(WidgetTarget::Menu(_) | WidgetTarget::Control(Control::SeriesMenu))
                    )
                {
                    self.pressed = None;
                    return self.dispatch(WidgetMessage::CloseSeriesMenu);
                }
                self.pressed = target;
                if target == Some(WidgetTarget::Chart) {
                    self.pressed_on_plot = self.chart.target_at(*position).is_none();
                    return self.chart.event(event);
                }
                None
            }
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } => {
                let pressed = self.pressed.take()?;
                if pressed == WidgetTarget::Chart {
                    return self.release_on_chart(event, *position);
                }
                if self.target_at(*position) == Some(pressed) {
                    self.activate(pressed)
                } else {
                    None
                }
            }
            Event::KeyDown { key: Key::Tab } => {
                self.cycle_focus();
                None
            }
            Event::KeyDown { key } if key.is_activation() => self.activate_focus(),
            Event::KeyDown { key: Key::Escape } => {
                if self.state.series_menu_open {
                    self.dispatch(WidgetMessage::CloseSeriesMenu)
                } else {
                    self.set_focus(None);
                    None
                }
            }
            Event::KeyDown {
                key: Key::Left | Key::Right,
            } => {
                let message = self.chart.event(event)?;
                self.route_chart_message(message)
            }
            Event::FocusOut => {
                self.set_focus(None);
                None
            }
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        !self.loading
    }

    fn is_focusable(&self) -> bool {
        !self.loading && !self.focus_targets().is_empty()
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.data.title)
    }

    fn accessible_role(&self) -> AccessibleRole {
        if self.loading {
            AccessibleRole::ProgressBar
        } else {
            AccessibleRole::Region
        }
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref().or(Some(&self.data.id))
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SeriesKind;
    use crate::metric_tile::Trend;
    use std::sync::Mutex;
    use vantage_core::{RecordingCanvas, SharedPointer};

    fn risk_widget() -> AnalyticsWidgetData {
        AnalyticsWidgetData::new("risks", "Risk Overview")
            .subtitle("Open risks by severity")
            .status(WidgetStatus::Warning)
            .metric(
                MetricSpec::new("Critical", 2)
                    .trend(Trend::up(10.0))
                    .drilldown_hint("View critical")
                    .drilldown_filter(DrilldownFilter::BySeverity(SeverityFilter::Critical)),
            )
            .metric(MetricSpec::new("High", 5))
            .chart(
                ChartKind::Pie,
                vec![
                    DataRow::new().with("name", "Critical Risk").with("count", 2),
                    DataRow::new().with("name", "High Risk").with("count", 5),
                ],
                vec![SeriesDescriptor::new("Risks", "count")],
            )
            .insight("Critical risks up 10% this month")
            .action("View all risks", "/risks")
    }

    fn laid_out(mut widget: AnalyticsWidget) -> AnalyticsWidget {
        widget.layout(Rect::new(0.0, 0.0, 480.0, 900.0));
        widget
    }

    fn click(widget: &mut AnalyticsWidget, p: Point) -> Option<Message> {
        widget.event(&Event::press(p));
        widget.event(&Event::release(p))
    }

    // ===== Status Tests =====

    #[test]
    fn test_status_labels() {
        assert_eq!(WidgetStatus::Success.label(), "Healthy");
        assert_eq!(WidgetStatus::Warning.label(), "Attention");
        assert_eq!(WidgetStatus::Error.label(), "Critical");
        assert_eq!(WidgetStatus::Info.label(), "Info");
    }

    // ===== Data Tests =====

    #[test]
    fn test_data_serde_camel_case() {
        let json = r#"{
            "id": "w", "title": "T", "chartType": "line",
            "chartData": [{"month": "Jan", "value": 3}],
            "chartSeries": [{"name": "Value", "dataKey": "value"}],
            "xAxisKey": "month", "status": "error", "icon": "chart-bar"
        }"#;
        let data: AnalyticsWidgetData = serde_json::from_str(json).unwrap();
        assert_eq!(data.chart_type, ChartKind::Line);
        assert_eq!(data.category_key(), "month");
        assert_eq!(data.icon, IconName::BarChart);
        assert_eq!(data.status, WidgetStatus::Error);
        assert!(data.has_chart());
        assert_eq!(AnalyticsWidgetData::new("a", "b").category_key(), "name");
    }

    // ===== Embedded Chart Tests =====

    #[test]
    fn test_embedded_chart_defaults() {
        let widget = AnalyticsWidget::new(risk_widget());
        let config = widget.chart().get_config();
        assert_eq!(config.height, Some(EMBEDDED_CHART_HEIGHT));
        assert!(!config.show_grid);
        assert!(!config.show_legend);
        assert!(config.show_percentages);

        let line = AnalyticsWidget::new(
            AnalyticsWidgetData::new("l", "Line")
                .chart(ChartKind::Line, Vec::new(), Vec::new())
                .chart_height(150.0),
        );
        assert_eq!(line.chart().get_config().height, Some(150.0));
        assert!(!line.chart().get_config().show_percentages);
    }

    #[test]
    fn test_severity_chip_filters_pie() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut widget = laid_out(
            AnalyticsWidget::new(risk_widget())
                .on_filter_change(move |v| sink.lock().unwrap().push(v.to_string())),
        );
        let chip = widget
            .control_rect(Control::Severity(SeverityFilter::Critical))
            .unwrap();
        let msg = click(&mut widget, chip.center()).unwrap();
        assert_eq!(msg.downcast::<FilterChanged>().unwrap().value, "critical");
        assert_eq!(widget.effective_chart_data().len(), 1);
        assert_eq!(widget.chart().active_data().len(), 1);
        assert_eq!(seen.lock().unwrap().as_slice(), &["critical".to_string()]);
    }

    #[test]
    fn test_no_severity_chips_for_bar() {
        let widget = laid_out(AnalyticsWidget::new(
            AnalyticsWidgetData::new("b", "Bars").chart(
                ChartKind::Bar,
                vec![DataRow::new().with("name", "Jan").with("value", 1)],
                vec![SeriesDescriptor::new("Count", "value")],
            ),
        ));
        assert!(widget
            .control_rect(Control::Severity(SeverityFilter::All))
            .is_none());
        assert!(widget.control_rect(Control::SeriesMenu).is_none());
    }

    #[test]
    fn test_series_menu_hides_series() {
        let data = AnalyticsWidgetData::new("s", "Sales").chart(
            ChartKind::Composed,
            vec![DataRow::new().with("name", "Q1").with("a", 1).with("b", 2)],
            vec![
                SeriesDescriptor::new("A", "a"),
                SeriesDescriptor::new("B", "b").kind(SeriesKind::Line),
            ],
        );
        let mut widget = laid_out(AnalyticsWidget::new(data));
        let button = widget.control_rect(Control::SeriesMenu).unwrap();
        click(&mut widget, button.center());
        assert!(widget.state().series_menu_open);

        let item = widget.menu_rect(MenuItem::Series(1)).unwrap();
        click(&mut widget, item.center());
        assert_eq!(widget.effective_series().len(), 1);
        assert_eq!(widget.chart().get_series()[0].name, "A");

        let show_all = widget.menu_rect(MenuItem::ShowAll).unwrap();
        click(&mut widget, show_all.center());
        assert_eq!(widget.effective_series().len(), 2);
        assert!(!widget.state().series_menu_open);
    }

    #[test]
    fn test_hidden_series_keeps_others_colors() {
        let data = AnalyticsWidgetData::new("ab", "A and B").chart(
            ChartKind::Bar,
            vec![DataRow::new().with("name", "Q1").with("a", 1).with("b", 2)],
            vec![SeriesDescriptor::new("A", "a"), SeriesDescriptor::new("B", "b")],
        );
        let mut widget = laid_out(AnalyticsWidget::new(data));
        widget.dispatch(WidgetMessage::ToggleSeries("A".into()));

        let series = widget.chart().get_series();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].resolved_color(0), palette::palette_color(1));
        let marks = widget.chart().marks();
        assert!(!marks.is_empty());
        assert!(marks.iter().all(|m| m.color == palette::palette_color(1)));

        widget.dispatch(WidgetMessage::ToggleSeriesMenu);
        let item = widget.menu_rect(MenuItem::Series(1)).unwrap();
        let mut canvas = RecordingCanvas::new();
        widget.paint(&mut canvas);
        let swatch = canvas
            .rects_filled_with(palette::palette_color(1))
            .find(|r| item.contains_point(&r.center()));
        assert!(swatch.is_some());
    }

    #[test]
    fn test_click_outside_menu_closes_it() {
        let data = AnalyticsWidgetData::new("s", "Sales")
            .chart(
                ChartKind::Bar,
                vec![DataRow::new().with("name", "Q1").with("a", 1).with("b", 2)],
                vec![SeriesDescriptor::new("A", "a"), SeriesDescriptor::new("B", "b")],
            );
        let clicks = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&clicks);
        let mut widget =
            laid_out(AnalyticsWidget::new(data).on_click(move || *sink.lock().unwrap() += 1));
        let button = widget.control_rect(Control::SeriesMenu).unwrap();
        click(&mut widget, button.center());

        assert!(click(&mut widget, Point::new(5.0, 890.0)).is_none());
        assert!(!widget.state().series_menu_open);
        assert_eq!(*clicks.lock().unwrap(), 0);
    }

    // ===== Routing Tests =====

    #[test]
    fn test_metric_click_does_not_reach_body() {
        let metrics = Arc::new(Mutex::new(Vec::new()));
        let body = Arc::new(Mutex::new(0));
        let (m, b) = (Arc::clone(&metrics), Arc::clone(&body));
        let mut widget = laid_out(
            AnalyticsWidget::new(risk_widget())
                .on_metric_click(move |label, filter| {
                    m.lock().unwrap().push((label.to_string(), filter.cloned()));
                })
                .on_click(move || *b.lock().unwrap() += 1),
        );
        let tile = widget.tile_rect(0).unwrap();
        let msg = click(&mut widget, tile.center()).unwrap();
        assert!(msg.downcast::<MetricClicked>().is_ok());
        assert_eq!(
            metrics.lock().unwrap().as_slice(),
            &[(
                "Critical".to_string(),
                Some(DrilldownFilter::BySeverity(SeverityFilter::Critical))
            )]
        );
        assert_eq!(*body.lock().unwrap(), 0);
    }

    #[test]
    fn test_tiles_without_handler_are_body() {
        let body = Arc::new(Mutex::new(0));
        let b = Arc::clone(&body);
        let mut widget =
            laid_out(AnalyticsWidget::new(risk_widget()).on_click(move || *b.lock().unwrap() += 1));
        let tile = widget.tile_rect(0).unwrap();
        assert_eq!(widget.target_at(tile.center()), Some(WidgetTarget::Body));
        click(&mut widget, tile.center());
        assert_eq!(*body.lock().unwrap(), 1);
    }

    #[test]
    fn test_action_navigates() {
        let routes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&routes);
        let mut widget = laid_out(
            AnalyticsWidget::new(risk_widget())
                .on_navigate(move |href| sink.lock().unwrap().push(href.to_string())),
        );
        let action = widget.action_rect().unwrap();
        let msg = click(&mut widget, action.center()).unwrap();
        assert_eq!(msg.downcast::<NavigationRequested>().unwrap().href, "/risks");
        assert_eq!(routes.lock().unwrap().as_slice(), &["/risks".to_string()]);
    }

    #[test]
    fn test_action_without_href_falls_back_to_click() {
        let body = Arc::new(Mutex::new(0));
        let b = Arc::clone(&body);
        let mut widget = laid_out(
            AnalyticsWidget::new(risk_widget().action("Open", ""))
                .on_click(move || *b.lock().unwrap() += 1),
        );
        let action = widget.action_rect().unwrap();
        let msg = click(&mut widget, action.center()).unwrap();
        assert!(msg.downcast::<WidgetClicked>().is_ok());
        assert_eq!(*body.lock().unwrap(), 1);
    }

    #[test]
    fn test_time_range_chip() {
        let mut widget = laid_out(AnalyticsWidget::new(
            risk_widget().filter_options(vec!["7d".into(), "30d".into()]),
        ));
        let chip = widget.control_rect(Control::TimeRange(1)).unwrap();
        let msg = click(&mut widget, chip.center()).unwrap();
        assert_eq!(msg.downcast::<FilterChanged>().unwrap().value, "30d");
        assert_eq!(widget.state().time_range.as_deref(), Some("30d"));
        // Presentational only: the chart data is untouched.
        assert_eq!(widget.effective_chart_data().len(), 2);
    }

    // ===== Keyboard Tests =====

    #[test]
    fn test_tab_cycles_focus() {
        let mut widget = laid_out(AnalyticsWidget::new(risk_widget()).on_metric_click(|_, _| {}));
        widget.event(&Event::KeyDown { key: Key::Tab });
        assert_eq!(widget.focused(), Some(FocusTarget::Metric(0)));
        assert!(widget.tiles()[0].is_focused());
        widget.event(&Event::KeyDown { key: Key::Tab });
        widget.event(&Event::KeyDown { key: Key::Tab });
        assert_eq!(widget.focused(), Some(FocusTarget::Action));
        widget.event(&Event::KeyDown { key: Key::Tab });
        assert_eq!(widget.focused(), Some(FocusTarget::Metric(0)));

        let msg = widget.event(&Event::KeyDown { key: Key::Enter }).unwrap();
        assert_eq!(msg.downcast::<MetricClicked>().unwrap().label, "Critical");
    }

    // ===== Loading Tests =====

    #[test]
    fn test_loading_keeps_state() {
        let mut widget = laid_out(AnalyticsWidget::new(risk_widget()));
        widget.dispatch(WidgetMessage::SetSeverity(SeverityFilter::High));
        widget.set_loading(true);
        let chip = widget
            .control_rect(Control::Severity(SeverityFilter::Low))
            .unwrap();
        assert!(click(&mut widget, chip.center()).is_none());
        assert!(widget.event(&Event::KeyDown { key: Key::Tab }).is_none());
        widget.set_loading(false);
        assert_eq!(widget.state().severity, SeverityFilter::High);
    }

    #[test]
    fn test_loading_paints_no_text() {
        let widget = laid_out(AnalyticsWidget::new(risk_widget()).loading(true));
        let mut canvas = RecordingCanvas::new();
        widget.paint(&mut canvas);
        assert_eq!(canvas.texts().count(), 0);
        assert_eq!(widget.accessible_role(), AccessibleRole::ProgressBar);
    }

    // ===== Paint Tests =====

    #[test]
    fn test_paint_sections() {
        let widget = laid_out(AnalyticsWidget::new(risk_widget()));
        let mut canvas = RecordingCanvas::new();
        widget.paint(&mut canvas);
        assert!(canvas.has_text("Risk Overview"));
        assert!(canvas.has_text("Attention"));
        assert!(canvas.has_text(INSIGHTS_HEADING));
        assert!(canvas.has_text("Critical risks up 10% this month"));
        assert!(canvas.has_text("View all risks"));
        assert!(canvas.arc_count() > 0);
    }

    #[test]
    fn test_placeholder_without_series() {
        let widget = laid_out(AnalyticsWidget::new(
            AnalyticsWidgetData::new("e", "Empty").chart(
                ChartKind::Bar,
                vec![DataRow::new().with("name", "Jan")],
                Vec::new(),
            ),
        ));
        let mut canvas = RecordingCanvas::new();
        widget.paint(&mut canvas);
        assert!(canvas.has_text(CHART_PLACEHOLDER));
        assert!(!canvas.has_text(INSIGHTS_HEADING));
    }

    // ===== Data Swap Tests =====

    #[test]
    fn test_set_data_same_id_keeps_filters() {
        let mut widget = laid_out(AnalyticsWidget::new(risk_widget()));
        widget.dispatch(WidgetMessage::SetSeverity(SeverityFilter::Critical));
        let mut next = risk_widget();
        next.chart_data.push(DataRow::new().with("name", "Critical Vendor").with("count", 1));
        widget.set_data(next);
        assert_eq!(widget.state().severity, SeverityFilter::Critical);
        assert_eq!(widget.chart().active_data().len(), 2);

        let mut other = risk_widget();
        other.id = "other".into();
        widget.set_data(other);
        assert_eq!(widget.state().severity, SeverityFilter::All);
        assert_eq!(widget.chart().active_data().len(), 2);
    }

    #[test]
    fn test_set_data_with_fewer_tabs_follows_chart() {
        let tab = |name: &str| {
            DataTab::new(name, vec![DataRow::new().with("name", name).with("value", 1)])
        };
        let tabbed = |tabs: Vec<DataTab>| {
            AnalyticsWidgetData::new("tabs", "Tabs")
                .chart(
                    ChartKind::Bar,
                    vec![DataRow::new().with("name", "TOP").with("value", 9)],
                    vec![SeriesDescriptor::new("Value", "value")],
                )
                .chart_tabs(tabs)
        };
        let mut widget = laid_out(AnalyticsWidget::new(tabbed(vec![
            tab("tab0"),
            tab("tab1"),
            tab("tab2"),
        ])));
        widget.dispatch(WidgetMessage::SelectTab(2));
        assert_eq!(widget.chart().active_data()[0].label("name").as_deref(), Some("tab2"));

        widget.set_data(tabbed(vec![tab("tab0")]));

        assert_eq!(widget.state().active_tab, 0);
        assert_eq!(&*widget.effective_chart_data(), widget.chart().active_data());
        assert_eq!(widget.chart().active_data()[0].label("name").as_deref(), Some("tab0"));
    }

    // ===== Pointer Port Tests =====

    #[test]
    fn test_pointer_port_tracks_moves() {
        let pointer = SharedPointer::new();
        let mut widget = laid_out(
            AnalyticsWidget::new(risk_widget()).pointer_tracker(Arc::new(pointer.clone())),
        );
        widget.event(&Event::MouseMove {
            position: Point::new(10.0, 10.0),
        });
        assert_eq!(pointer.position(), Some(Point::new(10.0, 10.0)));
        widget.event(&Event::MouseLeave);
        assert_eq!(pointer.position(), None);
    }
}
