//! `ChartRenderer` widget: bar, line, area, pie and composed charts.
//!
//! The renderer plots a collection of [`DataRow`]s according to a list of
//! [`SeriesDescriptor`]s. All geometry (bar rectangles, line dots, pie
//! slices) is derived from the current inputs and bounds every time it is
//! needed; nothing is cached between frames, so swapping the data at any
//! time never leaves stale marks behind.
//!
//! Interaction:
//! - pointer press + release over a mark reports the mark's row
//!   ([`ChartElementClicked`]) and invokes the element-click handler
//! - pointer movement tracks the hovered row ([`ChartHoverChanged`])
//! - header controls switch tabs, step periods and export the data as CSV

use crate::data::{
    series_color, step_circular, to_csv, ChartKind, DataRow, DataTab, SeriesDescriptor, SeriesKind,
};
use crate::palette;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;
use tracing::{debug, trace, warn};
use vantage_core::{
    estimate_text_width, AccessibleRole, Canvas, Clipboard, Color, Constraints, Event, FontWeight,
    Key, LayoutResult, Message, MouseButton, Point, Rect, Size, TextStyle, TypeId, Widget,
};

/// Plot height used when none is configured.
pub const DEFAULT_CHART_HEIGHT: f32 = 300.0;

/// Extra height reserved below small pie charts for the legend.
pub const PIE_LEGEND_ALLOWANCE: f32 = 50.0;

const PADDING: f32 = 16.0;
const HEADER_GAP: f32 = 8.0;
const TITLE_ROW: f32 = 28.0;
const DESCRIPTION_ROW: f32 = 18.0;
const TAB_ROW: f32 = 32.0;
const CONTROL_SIZE: f32 = 24.0;
const PERIOD_LABEL_WIDTH: f32 = 88.0;
const AXIS_LEFT: f32 = 44.0;
const AXIS_BOTTOM: f32 = 24.0;
const LEGEND_ROW: f32 = 24.0;
const DOT_RADIUS: f32 = 3.0;
const DOT_HIT_RADIUS: f32 = 8.0;
const PIE_OUTER_RADIUS: f32 = 90.0;
const PIE_INNER_RATIO: f32 = 60.0 / 90.0;
const Y_TICKS: usize = 4;

/// Handler receiving a data row.
pub type RowHandler = Arc<dyn Fn(&DataRow) + Send + Sync>;

/// Handler receiving the hovered row, `None` when the pointer leaves.
pub type HoverHandler = Arc<dyn Fn(Option<&DataRow>) + Send + Sync>;

/// Presentation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    /// Header title
    pub title: Option<String>,
    /// Text under the title
    pub description: Option<String>,
    /// Info text shown next to the title
    pub tooltip: Option<String>,
    /// Row field holding category labels
    pub x_axis_key: String,
    /// Stack bar/area series
    pub stacked: bool,
    /// Show the legend
    pub show_legend: bool,
    /// Percent labels (pie) / percent ticks (other kinds)
    pub show_percentages: bool,
    /// Show grid lines
    pub show_grid: bool,
    /// Plot height; `None` means [`DEFAULT_CHART_HEIGHT`]
    pub height: Option<f32>,
    /// Text painted over an empty plot
    pub empty_text: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            tooltip: None,
            x_axis_key: "name".to_string(),
            stacked: false,
            show_legend: true,
            show_percentages: false,
            show_grid: true,
            height: None,
            empty_text: "No data available".to_string(),
        }
    }
}

impl ChartConfig {
    /// Plot height for `kind`. Pie charts under 300px get
    /// [`PIE_LEGEND_ALLOWANCE`] extra for the legend.
    #[must_use]
    pub fn effective_height(&self, kind: ChartKind) -> f32 {
        let height = self
            .height
            .filter(|h| h.is_finite() && *h >= 0.0)
            .unwrap_or(DEFAULT_CHART_HEIGHT);
        if kind == ChartKind::Pie && height < DEFAULT_CHART_HEIGHT {
            height + PIE_LEGEND_ALLOWANCE
        } else {
            height
        }
    }
}

/// Message emitted when a chart element is activated.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartElementClicked {
    /// The full row under the pointer
    pub row: DataRow,
    /// Row position in the active data
    pub row_index: usize,
    /// Name of the series the element belongs to
    pub series: Option<String>,
}

/// Message emitted when the hovered row changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartHoverChanged {
    /// Hovered row, `None` when nothing is hovered
    pub row: Option<DataRow>,
}

/// Message emitted when the active tab changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartTabChanged {
    /// Index of the newly active tab
    pub index: usize,
    /// Title of the newly active tab
    pub title: String,
}

/// Message emitted when the active period changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartPeriodChanged {
    /// Index of the newly active period
    pub index: usize,
    /// Label of the newly active period
    pub period: String,
}

/// Message emitted after the active data was copied as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartDataCopied {
    /// Number of data rows exported
    pub rows: usize,
}

/// Shape of a plotted element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkShape {
    /// Bar rectangle
    Bar(Rect),
    /// Line/area dot
    Dot {
        /// Center
        center: Point,
        /// Painted radius
        radius: f32,
    },
    /// Donut slice; angles run clockwise from 12 o'clock
    Slice {
        /// Center
        center: Point,
        /// Inner radius
        inner_radius: f32,
        /// Outer radius
        outer_radius: f32,
        /// Start angle, radians
        start: f32,
        /// End angle, radians
        end: f32,
    },
}

/// A plotted element tied to one row and one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    /// Row index in the active data
    pub row: usize,
    /// Series index
    pub series: usize,
    /// Geometry
    pub shape: MarkShape,
    /// Fill / stroke color
    pub color: Color,
}

impl Mark {
    /// Whether `point` hits this mark.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        match self.shape {
            MarkShape::Bar(rect) => rect.contains_point(&point),
            MarkShape::Dot { center, radius } => {
                center.distance(&point) <= radius.max(DOT_HIT_RADIUS)
            }
            MarkShape::Slice {
                center,
                inner_radius,
                outer_radius,
                start,
                end,
            } => {
                let distance = center.distance(&point);
                if distance < inner_radius || distance > outer_radius {
                    return false;
                }
                let angle = center.clock_angle_to(&point);
                angle >= start && angle < end
            }
        }
    }
}

/// One pie slice with its share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    /// Row index in the active data
    pub row: usize,
    /// Category label
    pub label: String,
    /// Magnitude (missing or negative values count as zero)
    pub value: f64,
    /// `round(value / total * 100)`, or 0 when the total is 0
    pub percent: u32,
    /// Slice color
    pub color: Color,
    /// Start angle, clockwise from 12 o'clock
    pub start: f32,
    /// End angle
    pub end: f32,
}

/// Clickable areas of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTarget {
    /// A plotted element
    Element {
        /// Row index
        row: usize,
        /// Series index
        series: usize,
    },
    /// Previous-period arrow
    PreviousPeriod,
    /// Next-period arrow
    NextPeriod,
    /// A tab of the tab strip
    Tab(usize),
    /// CSV export control
    Download,
}

/// Vertical scale of a cartesian plot.
#[derive(Debug, Clone, PartialEq)]
pub struct YScale {
    /// Lowest axis value
    pub min: f64,
    /// Highest axis value
    pub max: f64,
    /// Tick values, ascending
    pub ticks: Vec<f64>,
}

impl YScale {
    fn for_range(lo: f64, hi: f64) -> Self {
        let lo = lo.clamp(-f64::MAX, 0.0);
        let hi = hi.clamp(0.0, f64::MAX);
        let divisions = Y_TICKS as f64;
        // Divided before subtracting: `hi - lo` overflows near f64::MAX.
        let raw = if hi > lo { hi / divisions - lo / divisions } else { 1.0 / divisions };
        let step = nice_step(raw);
        let min = (lo / step).floor() * step;
        let max = ((hi / step).ceil() * step).max(min + step);
        let count = (max / step - min / step).round();
        if min.is_finite() && max.is_finite() && count <= (Y_TICKS * 2) as f64 {
            let ticks = (0..=count as usize).map(|i| (i as f64).mul_add(step, min)).collect();
            return Self { min, max, ticks };
        }

        // No round step fits: split the exact range evenly.
        let max = if hi > lo { hi } else { lo + 1.0 };
        let ticks = (0..=Y_TICKS)
            .map(|i| {
                let t = i as f64 / divisions;
                max.mul_add(t, lo * (1.0 - t))
            })
            .collect();
        Self { min: lo, max, ticks }
    }

    fn map(&self, value: f64, plot: &Rect) -> f32 {
        let t = ((value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)) as f32;
        t.mul_add(-plot.height, plot.bottom())
    }
}

fn saturating_sum(a: f64, b: f64) -> f64 {
    (a + b).clamp(-f64::MAX, f64::MAX)
}

fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Format an axis tick, with a `%` suffix when requested.
#[must_use]
pub fn format_tick(value: f64, percent: bool) -> String {
    let text = if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round())
    } else {
        format!("{value:.1}")
    };
    if percent {
        format!("{text}%")
    } else {
        text
    }
}

/// Header and body rectangles for given bounds.
#[derive(Debug, Clone, Default)]
struct Regions {
    header: Rect,
    title_row: Option<Rect>,
    description_row: Option<Rect>,
    previous: Option<Rect>,
    period_label: Option<Rect>,
    next: Option<Rect>,
    download: Option<Rect>,
    tabs: Vec<Rect>,
    body: Rect,
}

/// Chart widget.
#[derive(Clone)]
pub struct ChartRenderer {
    kind: ChartKind,
    data: Vec<DataRow>,
    series: Vec<SeriesDescriptor>,
    config: ChartConfig,
    tabs: Vec<DataTab>,
    periods: Vec<String>,
    active_tab: usize,
    active_period: usize,
    loading: bool,
    on_element_click: Option<RowHandler>,
    on_hover_change: Option<HoverHandler>,
    clipboard: Option<Arc<dyn Clipboard>>,
    test_id_value: Option<String>,
    hovered: Option<usize>,
    pressed: Option<ChartTarget>,
    bounds: Rect,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartKind::default())
    }
}

impl ChartRenderer {
    /// Create an empty chart of `kind`.
    #[must_use]
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            data: Vec::new(),
            series: Vec::new(),
            config: ChartConfig::default(),
            tabs: Vec::new(),
            periods: Vec::new(),
            active_tab: 0,
            active_period: 0,
            loading: false,
            on_element_click: None,
            on_hover_change: None,
            clipboard: None,
            test_id_value: None,
            hovered: None,
            pressed: None,
            bounds: Rect::default(),
        }
    }

    /// Bar chart.
    #[must_use]
    pub fn bar() -> Self {
        Self::new(ChartKind::Bar)
    }

    /// Line chart.
    #[must_use]
    pub fn line() -> Self {
        Self::new(ChartKind::Line)
    }

    /// Area chart.
    #[must_use]
    pub fn area() -> Self {
        Self::new(ChartKind::Area)
    }

    /// Pie (donut) chart.
    #[must_use]
    pub fn pie() -> Self {
        Self::new(ChartKind::Pie)
    }

    /// Composed line/bar chart.
    #[must_use]
    pub fn composed() -> Self {
        Self::new(ChartKind::Composed)
    }

    /// Set the data rows.
    #[must_use]
    pub fn data(mut self, data: Vec<DataRow>) -> Self {
        self.set_data(data);
        self
    }

    /// Set the series.
    #[must_use]
    pub fn series(mut self, series: Vec<SeriesDescriptor>) -> Self {
        self.series = series;
        self
    }

    /// Replace all presentation options.
    #[must_use]
    pub fn config(mut self, config: ChartConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the header title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Set the header description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    /// Set the info tooltip text.
    #[must_use]
    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.config.tooltip = Some(tooltip.into());
        self
    }

    /// Set the category field.
    #[must_use]
    pub fn x_axis_key(mut self, key: impl Into<String>) -> Self {
        self.config.x_axis_key = key.into();
        self
    }

    /// Stack bar/area series.
    #[must_use]
    pub const fn stacked(mut self, stacked: bool) -> Self {
        self.config.stacked = stacked;
        self
    }

    /// Show or hide the legend.
    #[must_use]
    pub const fn show_legend(mut self, show: bool) -> Self {
        self.config.show_legend = show;
        self
    }

    /// Show percentages.
    #[must_use]
    pub const fn show_percentages(mut self, show: bool) -> Self {
        self.config.show_percentages = show;
        self
    }

    /// Show or hide grid lines.
    #[must_use]
    pub const fn show_grid(mut self, show: bool) -> Self {
        self.config.show_grid = show;
        self
    }

    /// Set the plot height.
    #[must_use]
    pub const fn height(mut self, height: f32) -> Self {
        self.config.height = Some(height);
        self
    }

    /// Set the empty-data text.
    #[must_use]
    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.config.empty_text = text.into();
        self
    }

    /// Set alternative data sets behind a tab strip.
    #[must_use]
    pub fn tabs(mut self, tabs: Vec<DataTab>) -> Self {
        self.set_tabs(tabs);
        self
    }

    /// Set the period labels.
    #[must_use]
    pub fn periods(mut self, periods: Vec<String>) -> Self {
        self.set_periods(periods);
        self
    }

    /// Set loading state.
    #[must_use]
    pub const fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Handle element clicks.
    #[must_use]
    pub fn on_element_click(mut self, handler: impl Fn(&DataRow) + Send + Sync + 'static) -> Self {
        self.on_element_click = Some(Arc::new(handler));
        self
    }

    /// Handle hover changes.
    #[must_use]
    pub fn on_hover_change(
        mut self,
        handler: impl Fn(Option<&DataRow>) + Send + Sync + 'static,
    ) -> Self {
        self.on_hover_change = Some(Arc::new(handler));
        self
    }

    /// Enable CSV export to `clipboard`.
    #[must_use]
    pub fn clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Replace the data rows. Hover state is dropped.
    pub fn set_data(&mut self, data: Vec<DataRow>) {
        self.data = data;
        self.hovered = None;
        self.pressed = None;
    }

    /// Replace the series.
    pub fn set_series(&mut self, series: Vec<SeriesDescriptor>) {
        self.series = series;
    }

    /// Change the chart kind.
    pub fn set_kind(&mut self, kind: ChartKind) {
        self.kind = kind;
        self.hovered = None;
    }

    /// Change loading state. Other state is kept.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.pressed = None;
    }

    /// Replace the tabs; the active index is clamped.
    pub fn set_tabs(&mut self, tabs: Vec<DataTab>) {
        self.tabs = tabs;
        self.active_tab = self.active_tab.min(self.tabs.len().saturating_sub(1));
        self.hovered = None;
    }

    /// Select a tab; out-of-range indexes are clamped.
    pub fn set_active_tab(&mut self, index: usize) {
        self.active_tab = index.min(self.tabs.len().saturating_sub(1));
    }

    /// Replace the periods; the active index is clamped.
    pub fn set_periods(&mut self, periods: Vec<String>) {
        self.periods = periods;
        self.active_period = self.active_period.min(self.periods.len().saturating_sub(1));
    }

    /// Select a period; out-of-range indexes are clamped.
    pub fn set_active_period(&mut self, index: usize) {
        self.active_period = index.min(self.periods.len().saturating_sub(1));
    }

    /// Mutable presentation options.
    pub fn config_mut(&mut self) -> &mut ChartConfig {
        &mut self.config
    }

    /// Chart kind.
    #[must_use]
    pub const fn kind(&self) -> ChartKind {
        self.kind
    }

    /// Presentation options.
    #[must_use]
    pub const fn get_config(&self) -> &ChartConfig {
        &self.config
    }

    /// Series.
    #[must_use]
    pub fn get_series(&self) -> &[SeriesDescriptor] {
        &self.series
    }

    /// Whether the chart shows a placeholder.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Active tab index.
    #[must_use]
    pub const fn active_tab(&self) -> usize {
        self.active_tab
    }

    /// Active period index.
    #[must_use]
    pub const fn active_period(&self) -> usize {
        self.active_period
    }

    /// Label of the active period.
    #[must_use]
    pub fn current_period(&self) -> Option<&str> {
        self.periods.get(self.active_period).map(String::as_str)
    }

    /// Rows being plotted: the active tab's data when tabs exist, otherwise
    /// the top-level data.
    #[must_use]
    pub fn active_data(&self) -> &[DataRow] {
        self.tabs
            .get(self.active_tab)
            .map_or(self.data.as_slice(), |tab| tab.data.as_slice())
    }

    /// Currently hovered row.
    #[must_use]
    pub fn hovered_row(&self) -> Option<&DataRow> {
        self.hovered.and_then(|i| self.active_data().get(i))
    }

    /// Plot height for the current kind.
    #[must_use]
    pub fn effective_height(&self) -> f32 {
        self.config.effective_height(self.kind)
    }

    fn has_title_row(&self) -> bool {
        self.config.title.is_some()
            || self.config.tooltip.is_some()
            || !self.periods.is_empty()
            || self.clipboard.is_some()
    }

    fn regions_in(&self, bounds: Rect) -> Regions {
        let inner_x = bounds.x + PADDING;
        let inner_w = PADDING.mul_add(-2.0, bounds.width).max(0.0);
        let has_header =
            self.has_title_row() || self.config.description.is_some() || !self.tabs.is_empty();

        let mut regions = Regions::default();
        let mut y = bounds.y + if has_header { HEADER_GAP } else { 0.0 };

        if self.has_title_row() {
            let row = Rect::new(inner_x, y, inner_w, TITLE_ROW);
            let control_y = row.y + (TITLE_ROW - CONTROL_SIZE) / 2.0;
            let mut right = row.right();
            if self.clipboard.is_some() {
                regions.download = Some(Rect::new(
                    right - CONTROL_SIZE,
                    control_y,
                    CONTROL_SIZE,
                    CONTROL_SIZE,
                ));
                right -= CONTROL_SIZE + HEADER_GAP;
            }
            if !self.periods.is_empty() {
                let next = Rect::new(right - CONTROL_SIZE, control_y, CONTROL_SIZE, CONTROL_SIZE);
                let label = Rect::new(
                    next.x - PERIOD_LABEL_WIDTH,
                    control_y,
                    PERIOD_LABEL_WIDTH,
                    CONTROL_SIZE,
                );
                let previous =
                    Rect::new(label.x - CONTROL_SIZE, control_y, CONTROL_SIZE, CONTROL_SIZE);
                regions.previous = Some(previous);
                regions.period_label = Some(label);
                regions.next = Some(next);
            }
            regions.title_row = Some(row);
            y = row.bottom();
        }

        if self.config.description.is_some() {
            regions.description_row = Some(Rect::new(inner_x, y, inner_w, DESCRIPTION_ROW));
            y += DESCRIPTION_ROW;
        }

        if !self.tabs.is_empty() {
            let mut x = inner_x;
            for tab in &self.tabs {
                let width = estimate_text_width(&tab.title, 13.0) + 24.0;
                regions.tabs.push(Rect::new(x, y + 4.0, width, TAB_ROW - 8.0));
                x += width + 4.0;
            }
            y += TAB_ROW;
        }

        if has_header {
            y += HEADER_GAP;
        }

        regions.header = Rect::new(bounds.x, bounds.y, bounds.width, y - bounds.y);
        regions.body = Rect::new(
            bounds.x + HEADER_GAP,
            y,
            HEADER_GAP.mul_add(-2.0, bounds.width).max(0.0),
            (bounds.bottom() - y).max(0.0),
        );
        regions
    }

    fn regions(&self) -> Regions {
        self.regions_in(self.bounds)
    }

    /// Height of the header (title, description, tabs).
    #[must_use]
    pub fn header_height(&self) -> f32 {
        self.regions_in(Rect::new(0.0, 0.0, 400.0, 0.0)).header.height
    }

    fn legend_visible(&self) -> bool {
        self.config.show_legend && !self.series.is_empty()
    }

    /// Cartesian plot area (inside the axes and above the legend).
    #[must_use]
    pub fn plot_area(&self) -> Rect {
        let body = self.regions().body;
        let legend = if self.legend_visible() { LEGEND_ROW } else { 0.0 };
        Rect::new(
            body.x + AXIS_LEFT,
            body.y + HEADER_GAP,
            (body.width - AXIS_LEFT).max(0.0),
            (body.height - AXIS_BOTTOM - legend - HEADER_GAP).max(0.0),
        )
    }

    fn pie_geometry(&self) -> (Point, f32, f32) {
        let body = self.regions().body;
        let legend = if self.legend_visible() { LEGEND_ROW } else { 0.0 };
        let area_h = (body.height - legend).max(0.0);
        let center = Point::new(body.center().x, area_h.mul_add(0.45, body.y));
        let outer = PIE_OUTER_RADIUS
            .min(body.width / 2.0 - HEADER_GAP)
            .min(area_h * 0.45 - HEADER_GAP)
            .max(0.0);
        (center, outer * PIE_INNER_RATIO, outer)
    }

    fn value(&self, row: &DataRow, series: usize) -> Option<f64> {
        self.series
            .get(series)
            .and_then(|s| row.number(&s.data_key))
    }

    fn bar_series(&self) -> Vec<usize> {
        match self.kind {
            ChartKind::Bar => (0..self.series.len()).collect(),
            ChartKind::Composed => self
                .series
                .iter()
                .enumerate()
                .filter(|(_, s)| s.composed_kind() == SeriesKind::Bar)
                .map(|(i, _)| i)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn line_series(&self) -> Vec<usize> {
        match self.kind {
            ChartKind::Line | ChartKind::Area => (0..self.series.len()).collect(),
            ChartKind::Composed => self
                .series
                .iter()
                .enumerate()
                .filter(|(_, s)| s.composed_kind() == SeriesKind::Line)
                .map(|(i, _)| i)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn stacks(&self) -> bool {
        self.config.stacked && matches!(self.kind, ChartKind::Bar | ChartKind::Area | ChartKind::Composed)
    }

    /// Stacked (bottom, top) extent of `series` at `row`, for stacked
    /// bar/area series. Negative values stack downwards.
    fn stack_extent(&self, row: &DataRow, stack: &[usize], series: usize) -> Option<(f64, f64)> {
        let value = self.value(row, series)?;
        let mut positive = 0.0;
        let mut negative = 0.0;
        for &s in stack {
            if s == series {
                break;
            }
            match self.value(row, s) {
                Some(v) if v >= 0.0 => positive = saturating_sum(positive, v),
                Some(v) => negative = saturating_sum(negative, v),
                None => {}
            }
        }
        Some(if value >= 0.0 {
            (positive, saturating_sum(positive, value))
        } else {
            (saturating_sum(negative, value), negative)
        })
    }

    /// Series whose values stack together (bars, or areas when stacked).
    fn stack_members(&self) -> Vec<usize> {
        match self.kind {
            ChartKind::Area => self.line_series(),
            _ => self.bar_series(),
        }
    }

    /// Vertical scale covering every plotted value.
    #[must_use]
    pub fn y_scale(&self) -> YScale {
        let rows = self.active_data();
        let mut lo = 0.0f64;
        let mut hi = 0.0f64;
        let stack = self.stack_members();
        for row in rows {
            for s in self.bar_series().into_iter().chain(self.line_series()) {
                let extent = if self.stacks() && stack.contains(&s) {
                    self.stack_extent(row, &stack, s)
                } else {
                    self.value(row, s).map(|v| (v.min(0.0), v.max(0.0)))
                };
                if let Some((a, b)) = extent {
                    lo = lo.min(a);
                    hi = hi.max(b);
                }
            }
        }
        YScale::for_range(lo, hi)
    }

    fn band_width(&self, plot: &Rect) -> f32 {
        let n = self.active_data().len().max(1);
        plot.width / n as f32
    }

    fn band_center(&self, plot: &Rect, row: usize) -> f32 {
        let band = self.band_width(plot);
        band.mul_add(row as f32 + 0.5, plot.x)
    }

    /// Pie slices of the active data, clockwise from 12 o'clock.
    ///
    /// Magnitudes come from the first series; labels from the category
    /// field. With a zero total every percent is 0 and no slice has extent.
    #[must_use]
    pub fn pie_slices(&self) -> Vec<PieSlice> {
        let rows = self.active_data();
        let Some(first) = self.series.first() else {
            return Vec::new();
        };
        let values: Vec<f64> = rows
            .iter()
            .map(|r| r.number(&first.data_key).unwrap_or(0.0).max(0.0))
            .collect();
        let mut total: f64 = values.iter().sum();
        let mut unit = 1.0;
        if total.is_infinite() {
            unit = values.iter().copied().fold(0.0, f64::max);
            total = values.iter().map(|v| v / unit).sum();
        }

        let mut angle = 0.0f32;
        rows.iter()
            .zip(values)
            .enumerate()
            .map(|(i, (row, value))| {
                let share = if total > 0.0 { value / unit / total } else { 0.0 };
                let start = angle;
                angle = (share as f32).mul_add(TAU, angle);
                PieSlice {
                    row: i,
                    label: row.label(&self.config.x_axis_key).unwrap_or_default(),
                    value,
                    percent: (share * 100.0).round() as u32,
                    color: series_color(&self.series, i),
                    start,
                    end: angle,
                }
            })
            .collect()
    }

    /// Every plotted element for the current bounds, in paint order.
    #[must_use]
    pub fn marks(&self) -> Vec<Mark> {
        if self.kind == ChartKind::Pie {
            let (center, inner_radius, outer_radius) = self.pie_geometry();
            return self
                .pie_slices()
                .into_iter()
                .filter(|s| s.end > s.start)
                .map(|s| Mark {
                    row: s.row,
                    series: 0,
                    shape: MarkShape::Slice {
                        center,
                        inner_radius,
                        outer_radius,
                        start: s.start,
                        end: s.end,
                    },
                    color: s.color,
                })
                .collect();
        }

        let plot = self.plot_area();
        let scale = self.y_scale();
        let rows = self.active_data();
        let band = self.band_width(&plot);
        let stack = self.stack_members();
        let stacked = self.stacks();
        let mut marks = Vec::new();

        let bars = self.bar_series();
        if !bars.is_empty() {
            let group = band * 0.8;
            let columns = if stacked { 1 } else { bars.len() };
            let width = group / columns as f32;
            for (i, row) in rows.iter().enumerate() {
                for (column, &s) in bars.iter().enumerate() {
                    let extent = if stacked {
                        self.stack_extent(row, &stack, s)
                    } else {
                        self.value(row, s).map(|v| (v.min(0.0), v.max(0.0)))
                    };
                    let Some((bottom, top)) = extent else {
                        continue;
                    };
                    let column = if stacked { 0 } else { column };
                    let x = (column as f32).mul_add(width, band.mul_add(i as f32, plot.x) + band * 0.1);
                    let y_top = scale.map(top, &plot);
                    let y_bottom = scale.map(bottom, &plot);
                    marks.push(Mark {
                        row: i,
                        series: s,
                        shape: MarkShape::Bar(Rect::new(
                            x,
                            y_top,
                            (width - 2.0).max(1.0),
                            (y_bottom - y_top).max(0.0),
                        )),
                        color: series_color(&self.series, s),
                    });
                }
            }
        }

        let area_stacked = stacked && self.kind == ChartKind::Area;
        for s in self.line_series() {
            for (i, row) in rows.iter().enumerate() {
                let value = if area_stacked {
                    self.stack_extent(row, &stack, s).map(|(lo, hi)| {
                        if self.value(row, s).is_some_and(|v| v < 0.0) {
                            lo
                        } else {
                            hi
                        }
                    })
                } else {
                    self.value(row, s)
                };
                let Some(value) = value else {
                    continue;
                };
                marks.push(Mark {
                    row: i,
                    series: s,
                    shape: MarkShape::Dot {
                        center: Point::new(self.band_center(&plot, i), scale.map(value, &plot)),
                        radius: DOT_RADIUS,
                    },
                    color: series_color(&self.series, s),
                });
            }
        }

        marks
    }

    /// Clickable target under `point`.
    #[must_use]
    pub fn target_at(&self, point: Point) -> Option<ChartTarget> {
        let regions = self.regions();
        if regions.download.is_some_and(|r| r.contains_point(&point)) {
            return Some(ChartTarget::Download);
        }
        if regions.previous.is_some_and(|r| r.contains_point(&point)) {
            return Some(ChartTarget::PreviousPeriod);
        }
        if regions.next.is_some_and(|r| r.contains_point(&point)) {
            return Some(ChartTarget::NextPeriod);
        }
        if let Some(i) = regions.tabs.iter().position(|r| r.contains_point(&point)) {
            return Some(ChartTarget::Tab(i));
        }
        let hit = self
            .marks()
            .into_iter()
            .rev()
            .find(|m| m.contains(point))
            .map(|m| ChartTarget::Element {
                row: m.row,
                series: m.series,
            });
        trace!(?point, ?hit, "chart hit test");
        hit
    }

    /// Row the tooltip should describe for a pointer at `point`: the slice
    /// under it for pie charts, the category band for the others.
    fn hover_row_at(&self, point: Point) -> Option<usize> {
        if self.active_data().is_empty() {
            return None;
        }
        if self.kind == ChartKind::Pie {
            return self
                .marks()
                .into_iter()
                .find(|m| m.contains(point))
                .map(|m| m.row);
        }
        let plot = self.plot_area();
        if !plot.contains_point(&point) {
            return None;
        }
        let band = self.band_width(&plot);
        let index = ((point.x - plot.x) / band).floor().max(0.0) as usize;
        Some(index.min(self.active_data().len() - 1))
    }

    /// Tooltip lines for row `index`: the category label followed by one
    /// `name: value` entry per series. Pie entries read `value (p%)` when
    /// percentages are shown.
    #[must_use]
    pub fn tooltip_for(&self, index: usize) -> Vec<String> {
        let Some(row) = self.active_data().get(index) else {
            return Vec::new();
        };
        let label = row.label(&self.config.x_axis_key).unwrap_or_default();

        if self.kind == ChartKind::Pie {
            let Some(slice) = self.pie_slices().into_iter().nth(index) else {
                return vec![label];
            };
            let value = self
                .series
                .first()
                .and_then(|s| row.label(&s.data_key))
                .unwrap_or_else(|| "0".to_string());
            let entry = if self.config.show_percentages {
                format!("{label}: {value} ({}%)", slice.percent)
            } else {
                format!("{label}: {value}")
            };
            return vec![label, entry];
        }

        let mut lines = vec![label];
        lines.extend(self.series.iter().filter_map(|s| {
            row.get(&s.data_key)
                .map(|value| format!("{}: {value}", s.name))
        }));
        lines
    }

    fn update_hover(&mut self, hovered: Option<usize>) -> Option<Message> {
        if hovered == self.hovered {
            return None;
        }
        self.hovered = hovered;
        let row = self.hovered_row().cloned();
        if let Some(handler) = &self.on_hover_change {
            handler(row.as_ref());
        }
        Some(Box::new(ChartHoverChanged { row }))
    }

    fn step_period(&mut self, forward: bool) -> Option<Message> {
        let next = step_circular(self.active_period, self.periods.len(), forward);
        if next == self.active_period {
            return None;
        }
        self.active_period = next;
        let period = self.periods.get(next).cloned().unwrap_or_default();
        debug!(index = next, %period, "chart period changed");
        Some(Box::new(ChartPeriodChanged {
            index: next,
            period,
        }))
    }

    fn select_tab(&mut self, index: usize) -> Option<Message> {
        if index == self.active_tab || index >= self.tabs.len() {
            return None;
        }
        self.active_tab = index;
        self.hovered = None;
        let title = self.tabs[index].title.clone();
        debug!(index, %title, "chart tab changed");
        Some(Box::new(ChartTabChanged { index, title }))
    }

    fn copy_data(&self) -> Option<Message> {
        let clipboard = self.clipboard.as_ref()?;
        let rows = self.active_data();
        match clipboard.write_text(&to_csv(rows)) {
            Ok(()) => {
                debug!(rows = rows.len(), "chart data copied");
                Some(Box::new(ChartDataCopied { rows: rows.len() }))
            }
            Err(error) => {
                warn!(%error, "chart data export failed");
                None
            }
        }
    }

    fn activate(&mut self, target: ChartTarget) -> Option<Message> {
        match target {
            ChartTarget::Element { row, series } => {
                let data = self.active_data().get(row)?.clone();
                let series = self.series.get(series).map(|s| s.name.clone());
                debug!(row, ?series, "chart element clicked");
                if let Some(handler) = &self.on_element_click {
                    handler(&data);
                }
                Some(Box::new(ChartElementClicked {
                    row: data,
                    row_index: row,
                    series,
                }))
            }
            ChartTarget::PreviousPeriod => self.step_period(false),
            ChartTarget::NextPeriod => self.step_period(true),
            ChartTarget::Tab(index) => self.select_tab(index),
            ChartTarget::Download => self.copy_data(),
        }
    }

    fn paint_header(&self, canvas: &mut dyn Canvas, regions: &Regions) {
        if regions.header.height <= 0.0 {
            return;
        }
        canvas.draw_line(
            Point::new(regions.header.x, regions.header.bottom()),
            Point::new(regions.header.right(), regions.header.bottom()),
            palette::border(),
            1.0,
        );

        if let Some(row) = regions.title_row {
            let baseline = row.y + 19.0;
            let title_style = TextStyle::sized(16.0, palette::text_primary()).weight(FontWeight::Semibold);
            let mut x = row.x;
            if let Some(title) = &self.config.title {
                canvas.draw_text(title, Point::new(x, baseline), &title_style);
                x += estimate_text_width(title, 16.0) + 6.0;
            }
            if self.config.tooltip.is_some() {
                canvas.draw_text(
                    "ⓘ",
                    Point::new(x, baseline),
                    &TextStyle::sized(14.0, palette::text_muted()),
                );
            }
        }

        let control_style = TextStyle::sized(14.0, palette::text_primary());
        if let (Some(previous), Some(label), Some(next)) =
            (regions.previous, regions.period_label, regions.next)
        {
            canvas.draw_text("‹", Point::new(previous.x + 8.0, previous.y + 17.0), &control_style);
            if let Some(period) = self.current_period() {
                let style = TextStyle::sized(13.0, palette::text_primary()).weight(FontWeight::Medium);
                let width = estimate_text_width(period, 13.0);
                canvas.draw_text(
                    period,
                    Point::new(label.center().x - width / 2.0, label.y + 17.0),
                    &style,
                );
            }
            canvas.draw_text("›", Point::new(next.x + 8.0, next.y + 17.0), &control_style);
        }

        if let Some(download) = regions.download {
            canvas.draw_text("⤓", Point::new(download.x + 6.0, download.y + 17.0), &control_style);
        }

        if let Some(row) = regions.description_row {
            if let Some(description) = &self.config.description {
                canvas.draw_text(
                    description,
                    Point::new(row.x, row.y + 13.0),
                    &TextStyle::sized(13.0, palette::text_muted()),
                );
            }
        }

        for (i, (tab, rect)) in self.tabs.iter().zip(&regions.tabs).enumerate() {
            let active = i == self.active_tab;
            if active {
                canvas.fill_rect(*rect, palette::surface());
                canvas.stroke_rect(*rect, palette::border(), 1.0);
            }
            let color = if active {
                palette::text_primary()
            } else {
                palette::text_muted()
            };
            canvas.draw_text(
                &tab.title,
                Point::new(rect.x + 12.0, rect.y + 16.0),
                &TextStyle::sized(13.0, color).weight(FontWeight::Medium),
            );
        }
    }

    fn paint_axes(&self, canvas: &mut dyn Canvas, plot: &Rect, scale: &YScale) {
        let tick_style = TextStyle::sized(12.0, palette::text_muted());

        for &tick in &scale.ticks {
            let y = scale.map(tick, plot);
            if self.config.show_grid {
                canvas.draw_line(
                    Point::new(plot.x, y),
                    Point::new(plot.right(), y),
                    palette::grid_line(),
                    1.0,
                );
            }
            let text = format_tick(tick, self.config.show_percentages);
            let width = estimate_text_width(&text, 12.0);
            canvas.draw_text(&text, Point::new(plot.x - width - 6.0, y + 4.0), &tick_style);
        }

        canvas.draw_line(
            Point::new(plot.x, plot.bottom()),
            Point::new(plot.right(), plot.bottom()),
            palette::border(),
            1.0,
        );

        for (i, row) in self.active_data().iter().enumerate() {
            let x = self.band_center(plot, i);
            if self.config.show_grid {
                canvas.draw_line(
                    Point::new(x, plot.y),
                    Point::new(x, plot.bottom()),
                    palette::grid_line(),
                    1.0,
                );
            }
            if let Some(label) = row.label(&self.config.x_axis_key) {
                let width = estimate_text_width(&label, 12.0);
                canvas.draw_text(
                    &label,
                    Point::new(x - width / 2.0, plot.bottom() + 16.0),
                    &tick_style,
                );
            }
        }
    }

    fn paint_cartesian(&self, canvas: &mut dyn Canvas) {
        let plot = self.plot_area();
        let scale = self.y_scale();
        self.paint_axes(canvas, &plot, &scale);

        let marks = self.marks();
        for mark in &marks {
            if let MarkShape::Bar(rect) = mark.shape {
                canvas.fill_rect(rect, mark.color);
            }
        }

        let baseline = scale.map(0.0, &plot);
        for s in self.line_series() {
            let points: Vec<Point> = marks
                .iter()
                .filter(|m| m.series == s)
                .filter_map(|m| match m.shape {
                    MarkShape::Dot { center, .. } => Some(center),
                    _ => None,
                })
                .collect();
            let color = series_color(&self.series, s);

            if self.kind == ChartKind::Area {
                if let (Some(first), Some(last)) = (points.first(), points.last()) {
                    let mut fill = points.clone();
                    fill.push(Point::new(last.x, baseline));
                    fill.push(Point::new(first.x, baseline));
                    canvas.fill_polygon(&fill, color.with_alpha(0.2));
                }
            }
            if points.len() >= 2 {
                canvas.draw_path(&points, color, 2.0);
            }
            if self.kind != ChartKind::Area {
                for p in &points {
                    canvas.fill_circle(*p, DOT_RADIUS, color);
                }
            }
        }

        if let Some(row) = self.hovered {
            for mark in marks.iter().filter(|m| m.row == row) {
                if let MarkShape::Dot { center, .. } = mark.shape {
                    canvas.fill_circle(center, DOT_RADIUS + 2.0, mark.color);
                }
            }
        }
    }

    fn paint_pie(&self, canvas: &mut dyn Canvas) {
        let marks = self.marks();
        let slices = self.pie_slices();
        for mark in &marks {
            if let MarkShape::Slice {
                center,
                inner_radius,
                outer_radius,
                start,
                end,
            } = mark.shape
            {
                let outer = if self.hovered == Some(mark.row) {
                    outer_radius + 4.0
                } else {
                    outer_radius
                };
                canvas.fill_arc(
                    center,
                    inner_radius,
                    outer,
                    start - FRAC_PI_2,
                    end - FRAC_PI_2,
                    mark.color,
                );

                if self.config.show_percentages {
                    if let Some(slice) = slices.get(mark.row) {
                        let mid = (start + end) / 2.0 - FRAC_PI_2;
                        let r = outer_radius + 14.0;
                        let text = format!("{}%", slice.percent);
                        let width = estimate_text_width(&text, 12.0);
                        canvas.draw_text(
                            &text,
                            Point::new(
                                r.mul_add(mid.cos(), center.x) - width / 2.0,
                                r.mul_add(mid.sin(), center.y) + 4.0,
                            ),
                            &TextStyle::sized(12.0, palette::text_primary()),
                        );
                    }
                }
            }
        }
    }

    fn paint_legend(&self, canvas: &mut dyn Canvas) {
        if !self.legend_visible() {
            return;
        }
        let body = self.regions().body;
        let y = body.bottom() - LEGEND_ROW + 6.0;
        let entries: Vec<(String, Color)> = if self.kind == ChartKind::Pie {
            self.pie_slices()
                .into_iter()
                .map(|s| (s.label, s.color))
                .collect()
        } else {
            self.series
                .iter()
                .enumerate()
                .map(|(i, s)| (s.name.clone(), series_color(&self.series, i)))
                .collect()
        };

        let style = TextStyle::sized(12.0, palette::text_primary());
        let total: f32 = entries
            .iter()
            .map(|(name, _)| estimate_text_width(name, 12.0) + 28.0)
            .sum();
        let mut x = (body.center().x - total / 2.0).max(body.x);
        for (name, color) in entries {
            canvas.fill_rect(Rect::new(x, y, 10.0, 10.0), color);
            canvas.draw_text(&name, Point::new(x + 14.0, y + 10.0), &style);
            x += estimate_text_width(&name, 12.0) + 28.0;
        }
    }

    fn paint_tooltip(&self, canvas: &mut dyn Canvas) {
        let Some(index) = self.hovered else {
            return;
        };
        let lines = self.tooltip_for(index);
        if lines.is_empty() {
            return;
        }
        let body = self.regions().body;
        let width = lines
            .iter()
            .map(|l| estimate_text_width(l, 12.0))
            .fold(0.0, f32::max)
            + 16.0;
        let height = (lines.len() as f32).mul_add(16.0, 8.0);
        let rect = Rect::new((body.right() - width - 4.0).max(body.x), body.y + 4.0, width, height);
        canvas.fill_rect(rect, palette::surface());
        canvas.stroke_rect(rect, palette::border(), 1.0);
        for (i, line) in lines.iter().enumerate() {
            let style = if i == 0 {
                TextStyle::sized(12.0, palette::text_primary()).weight(FontWeight::Medium)
            } else {
                TextStyle::sized(12.0, palette::text_primary())
            };
            canvas.draw_text(
                line,
                Point::new(rect.x + 8.0, (i as f32).mul_add(16.0, rect.y + 16.0)),
                &style,
            );
        }
    }
}

impl Widget for ChartRenderer {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let width = constraints.max_width_or(400.0);
        let height = self.header_height() + self.effective_height() + HEADER_GAP * 2.0;
        constraints.constrain(Size::new(width, height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.bounds, palette::surface());

        if self.loading {
            canvas.fill_rect(self.bounds.inset(HEADER_GAP), palette::skeleton());
            return;
        }

        let regions = self.regions();
        self.paint_header(canvas, &regions);

        if self.kind == ChartKind::Pie {
            self.paint_pie(canvas);
        } else {
            self.paint_cartesian(canvas);
        }
        self.paint_legend(canvas);

        if self.active_data().is_empty() {
            let text = &self.config.empty_text;
            let width = estimate_text_width(text, 14.0);
            let center = regions.body.center();
            canvas.draw_text(
                text,
                Point::new(center.x - width / 2.0, center.y),
                &TextStyle::sized(14.0, palette::text_muted()),
            );
        }

        self.paint_tooltip(canvas);
    }

    fn event(&mut self, event: &Event) -> Option<Message> {
        if self.loading {
            return None;
        }

        match event {
            Event::MouseMove { position } => {
                let row = self.hover_row_at(*position);
                self.update_hover(row)
            }
            Event::MouseLeave => {
                self.pressed = None;
                self.update_hover(None)
            }
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                self.pressed = self.target_at(*position);
                None
            }
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } => {
                let pressed = self.pressed.take()?;
                if self.target_at(*position) == Some(pressed) {
                    self.activate(pressed)
                } else {
                    None
                }
            }
            Event::KeyDown { key: Key::Left } => self.step_period(false),
            Event::KeyDown { key: Key::Right } => self.step_period(true),
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        !self.loading
    }

    fn accessible_name(&self) -> Option<&str> {
        self.config.title.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        if self.loading {
            AccessibleRole::ProgressBar
        } else {
            AccessibleRole::Image
        }
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
