//! Compact metric tile: label, value, optional trend and drill-down hint.

use crate::data::Value;
use crate::filter::DrilldownFilter;
use crate::icon::IconName;
use crate::palette::{self, hex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use vantage_core::{
    estimate_text_width, AccessibleRole, Canvas, Color, Constraints, Event, FontWeight, Key,
    LayoutResult, Message, MouseButton, Point, Rect, Size, TextStyle, TypeId, Widget,
};

/// Direction of a metric's trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Rising
    Up,
    /// Falling
    Down,
    /// Flat
    #[default]
    Neutral,
}

impl TrendDirection {
    /// Arrow shown before the trend value.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Neutral => "→",
        }
    }

    /// Trend text color: emerald, rose or slate.
    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Self::Up => hex("#059669"),
            Self::Down => hex("#e11d48"),
            Self::Neutral => hex("#64748b"),
        }
    }
}

/// Trend attached to a metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// Direction
    pub direction: TrendDirection,
    /// Change in percent
    pub value: f64,
}

impl Trend {
    /// Rising trend.
    #[must_use]
    pub const fn up(value: f64) -> Self {
        Self {
            direction: TrendDirection::Up,
            value,
        }
    }

    /// Falling trend.
    #[must_use]
    pub const fn down(value: f64) -> Self {
        Self {
            direction: TrendDirection::Down,
            value,
        }
    }

    /// Flat trend.
    #[must_use]
    pub const fn neutral(value: f64) -> Self {
        Self {
            direction: TrendDirection::Neutral,
            value,
        }
    }

    /// Display text, e.g. `↑ 12%`.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{} {}%", self.direction.arrow(), self.value)
    }
}

/// A labeled value shown in a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSpec {
    /// Caption
    pub label: String,
    /// Displayed value
    pub value: Value,
    /// Hover text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Change indicator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    /// Leading icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconName>,
    /// Hint shown when the tile is clickable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drilldown_hint: Option<String>,
    /// Filter handed to the host on drill-down
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drilldown_filter: Option<DrilldownFilter>,
}

impl MetricSpec {
    /// Create a metric.
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            tooltip: None,
            trend: None,
            icon: None,
            drilldown_hint: None,
            drilldown_filter: None,
        }
    }

    /// Set the hover text.
    #[must_use]
    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Set the trend.
    #[must_use]
    pub const fn trend(mut self, trend: Trend) -> Self {
        self.trend = Some(trend);
        self
    }

    /// Set the icon.
    #[must_use]
    pub const fn icon(mut self, icon: IconName) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the drill-down hint.
    #[must_use]
    pub fn drilldown_hint(mut self, hint: impl Into<String>) -> Self {
        self.drilldown_hint = Some(hint.into());
        self
    }

    /// Set the drill-down filter.
    #[must_use]
    pub fn drilldown_filter(mut self, filter: DrilldownFilter) -> Self {
        self.drilldown_filter = Some(filter);
        self
    }
}

/// Visual style of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileVariant {
    /// Plain tile on a light background
    #[default]
    Default,
    /// Tinted background
    Alt,
    /// No background or border
    Minimal,
    /// Bordered card
    Card,
}

/// Message emitted when a clickable tile is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricClicked {
    /// Label of the metric
    pub label: String,
    /// Drill-down filter of the metric
    pub filter: Option<DrilldownFilter>,
}

/// Handler receiving the activated metric.
pub type MetricHandler = Arc<dyn Fn(&MetricSpec) + Send + Sync>;

/// Metric tile widget.
#[derive(Clone)]
pub struct MetricTile {
    metric: MetricSpec,
    variant: TileVariant,
    loading: bool,
    clickable: bool,
    on_click: Option<MetricHandler>,
    focused: bool,
    pressed: bool,
    test_id_value: Option<String>,
    bounds: Rect,
}

impl MetricTile {
    /// Create a tile for `metric`.
    #[must_use]
    pub const fn new(metric: MetricSpec) -> Self {
        Self {
            metric,
            variant: TileVariant::Default,
            loading: false,
            clickable: false,
            on_click: None,
            focused: false,
            pressed: false,
            test_id_value: None,
            bounds: Rect::new(0.0, 0.0, 0.0, 0.0),
        }
    }

    /// Set the variant.
    #[must_use]
    pub const fn variant(mut self, variant: TileVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set loading state.
    #[must_use]
    pub const fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Make the tile clickable without a handler; activation still emits
    /// [`MetricClicked`].
    #[must_use]
    pub const fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    /// Handle activation. Implies clickable.
    #[must_use]
    pub fn on_click(mut self, handler: impl Fn(&MetricSpec) + Send + Sync + 'static) -> Self {
        self.on_click = Some(Arc::new(handler));
        self.clickable = true;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Change loading state.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.pressed = false;
    }

    /// Give or take keyboard focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// The metric shown.
    #[must_use]
    pub const fn metric(&self) -> &MetricSpec {
        &self.metric
    }

    /// Current variant.
    #[must_use]
    pub const fn get_variant(&self) -> TileVariant {
        self.variant
    }

    /// Whether activation does anything.
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.clickable && !self.loading
    }

    /// Whether the tile has keyboard focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Hint text, shown only while the tile is clickable.
    #[must_use]
    pub fn visible_hint(&self) -> Option<&str> {
        if self.is_clickable() {
            self.metric.drilldown_hint.as_deref()
        } else {
            None
        }
    }

    /// Activate the tile as if clicked.
    pub fn activate(&self) -> Option<Message> {
        if !self.is_clickable() {
            return None;
        }
        debug!(label = %self.metric.label, filter = ?self.metric.drilldown_filter, "metric activated");
        if let Some(handler) = &self.on_click {
            handler(&self.metric);
        }
        Some(Box::new(MetricClicked {
            label: self.metric.label.clone(),
            filter: self.metric.drilldown_filter.clone(),
        }))
    }

    fn background(&self) -> Option<Color> {
        match self.variant {
            TileVariant::Default | TileVariant::Card => Some(hex("#f9fafb")),
            TileVariant::Alt => Some(hex("#eff6ff")),
            TileVariant::Minimal => None,
        }
    }

    fn value_size(&self) -> f32 {
        match self.variant {
            TileVariant::Minimal => 16.0,
            TileVariant::Card => 22.0,
            TileVariant::Default | TileVariant::Alt => 20.0,
        }
    }
}

impl Widget for MetricTile {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let text = self
            .metric
            .label
            .len()
            .max(self.metric.value.to_string().len()) as f32;
        let width = (text * 8.4 + 24.0).max(120.0);
        let hint = if self.visible_hint().is_some() { 16.0 } else { 0.0 };
        constraints.constrain(Size::new(width, 64.0 + hint))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let b = self.bounds;

        if self.loading {
            canvas.fill_rect(
                Rect::new(b.x + 12.0, b.y + 12.0, (b.width * 0.5).max(0.0), 10.0),
                palette::skeleton(),
            );
            canvas.fill_rect(
                Rect::new(b.x + 12.0, b.y + 30.0, (b.width * 0.7).max(0.0), 18.0),
                palette::skeleton(),
            );
            return;
        }

        if let Some(bg) = self.background() {
            canvas.fill_rect(b, bg);
        }
        if self.variant == TileVariant::Card {
            canvas.stroke_rect(b, palette::border(), 1.0);
        }
        if self.focused {
            canvas.stroke_rect(b, palette::accent(), 2.0);
        }

        let mut x = b.x + 12.0;
        if let Some(icon) = self.metric.icon {
            canvas.draw_text(
                icon.glyph(),
                Point::new(x, b.y + 22.0),
                &TextStyle::sized(14.0, palette::text_muted()),
            );
            x += 20.0;
        }
        canvas.draw_text(
            &self.metric.label,
            Point::new(x, b.y + 22.0),
            &TextStyle::sized(12.0, palette::text_muted()),
        );

        let value = self.metric.value.to_string();
        let size = self.value_size();
        canvas.draw_text(
            &value,
            Point::new(b.x + 12.0, b.y + 46.0),
            &TextStyle::sized(size, palette::text_primary()).weight(FontWeight::Bold),
        );

        if let Some(trend) = &self.metric.trend {
            let vx = b.x + 12.0 + estimate_text_width(&value, size) + 8.0;
            canvas.draw_text(
                &trend.text(),
                Point::new(vx, b.y + 46.0),
                &TextStyle::sized(12.0, trend.direction.color()).weight(FontWeight::Medium),
            );
        }

        if let Some(hint) = self.visible_hint() {
            canvas.draw_text(
                hint,
                Point::new(b.x + 12.0, b.y + 62.0),
                &TextStyle::sized(11.0, palette::accent()),
            );
        }
    }

    fn event(&mut self, event: &Event) -> Option<Message> {
        if !self.is_clickable() {
            return None;
        }
        match event {
            Event::MouseDown {
                position,
                button: MouseButton::Left,
            } => {
                self.pressed = self.bounds.contains_point(position);
                None
            }
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } => {
                let was_pressed = std::mem::take(&mut self.pressed);
                if was_pressed && self.bounds.contains_point(position) {
                    self.activate()
                } else {
                    None
                }
            }
            Event::MouseLeave => {
                self.pressed = false;
                None
            }
            Event::KeyDown { key } if key.is_activation() => self.activate(),
            Event::FocusIn => {
                self.focused = true;
                None
            }
            Event::FocusOut => {
                self.focused = false;
                None
            }
            Event::KeyDown { key: Key::Escape } => {
                self.focused = false;
                None
            }
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        self.is_clickable()
    }

    fn is_focusable(&self) -> bool {
        self.is_clickable()
    }

    fn accessible_name(&self) -> Option<&str> {
        Some(&self.metric.label)
    }

    fn accessible_role(&self) -> AccessibleRole {
        if self.loading {
            AccessibleRole::ProgressBar
        } else if self.clickable {
            AccessibleRole::Button
        } else {
            AccessibleRole::Generic
        }
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
