//! End-to-end dashboard scenarios across the Vantage crates.

use proptest::prelude::*;
use vantage::widgets::{palette_color, series_color, step_circular, MarkShape, PALETTE_SIZE};
use vantage::{
    AnalyticsWidget, AnalyticsWidgetData, ChartKind, ChartRenderer, Command, DataRow, Point,
    SeriesDescriptor, SeverityFilter, State, Widget, WidgetManifest, WidgetMessage, WidgetState,
};
use vantage_test::{CallLog, Harness};

fn bar_center(chart: &ChartRenderer, row: usize) -> Point {
    chart
        .marks()
        .into_iter()
        .find_map(|m| match m.shape {
            MarkShape::Bar(rect) if m.row == row => Some(rect.center()),
            _ => None,
        })
        .expect("bar for row")
}

fn pie(values: &[u32]) -> ChartRenderer {
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, v)| DataRow::new().with("name", format!("Slice {i}")).with("value", *v))
        .collect();
    ChartRenderer::pie()
        .data(rows)
        .series(vec![SeriesDescriptor::new("Share", "value")])
}

// =============================================================================
// Palette Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_uncolored_series_follow_palette(count in 1usize..30) {
        let series: Vec<SeriesDescriptor> = (0..count)
            .map(|i| SeriesDescriptor::new(format!("S{i}"), format!("k{i}")))
            .collect();
        for i in 0..count {
            prop_assert_eq!(series_color(&series, i), palette_color(i % PALETTE_SIZE));
            prop_assert_eq!(series_color(&series, i), series_color(&series, i));
        }
    }
}

// =============================================================================
// Pie Properties
// =============================================================================

#[test]
fn test_zero_sum_pie_has_zero_percentages() {
    let chart = pie(&[0, 0, 0]);
    let slices = chart.pie_slices();
    assert_eq!(slices.len(), 3);
    assert!(slices.iter().all(|s| s.percent == 0));
}

proptest! {
    #[test]
    fn prop_pie_percentages_round_each_share(values in prop::collection::vec(0u32..1000, 1..12)) {
        let total: u32 = values.iter().sum();
        prop_assume!(total > 0);

        let slices = pie(&values).pie_slices();
        let sum: u32 = slices.iter().map(|s| s.percent).sum();
        let slack = slices.len() as i64;
        prop_assert!((i64::from(sum) - 100).abs() <= slack);

        for (slice, value) in slices.iter().zip(&values) {
            let expected = (f64::from(*value) / f64::from(total) * 100.0).round() as u32;
            prop_assert_eq!(slice.percent, expected);
        }
    }
}

// =============================================================================
// State Properties
// =============================================================================

fn series_ab() -> Vec<SeriesDescriptor> {
    vec![SeriesDescriptor::new("A", "a"), SeriesDescriptor::new("B", "b")]
}

proptest! {
    #[test]
    fn prop_series_toggle_is_idempotent(index in 0usize..2) {
        let series = series_ab();
        let mut state = WidgetState::new("w");
        let before = state.effective_series(&series).into_owned();

        let name = series[index].name.clone();
        state.update(WidgetMessage::ToggleSeries(name.clone()));
        prop_assert_eq!(state.effective_series(&series).len(), 1);
        state.update(WidgetMessage::ToggleSeries(name));

        prop_assert_eq!(state.effective_series(&series).into_owned(), before);
    }

    #[test]
    fn prop_periods_are_circular(len in 2usize..20) {
        prop_assert_eq!(step_circular(len - 1, len, true), 0);
        prop_assert_eq!(step_circular(0, len, false), len - 1);
    }
}

#[test]
fn test_severity_is_noop_off_pie() {
    let rows = vec![
        DataRow::new().with("name", "Critical Risk").with("value", 1),
        DataRow::new().with("name", "High Risk").with("value", 2),
    ];
    let mut state = WidgetState::new("w");
    let command = state.update(WidgetMessage::SetSeverity(SeverityFilter::Critical));
    assert!(!command.is_none());

    for kind in [ChartKind::Bar, ChartKind::Line, ChartKind::Area, ChartKind::Composed] {
        let effective = state.effective_chart_data(&rows, kind, "name");
        assert!(std::ptr::eq(&*effective, rows.as_slice()), "{kind:?}");
    }
}

#[test]
fn test_critical_filter_on_pie() {
    let rows = vec![
        DataRow::new().with("name", "Critical Risk").with("count", 2),
        DataRow::new().with("name", "High Risk").with("count", 5),
    ];
    let mut state = WidgetState::new("w");
    let command = state.update(WidgetMessage::SetSeverity(SeverityFilter::Critical));
    assert_eq!(command.into_emitted().len(), 1);

    let effective = state.effective_chart_data(&rows, ChartKind::Pie, "name");
    assert_eq!(&*effective, &rows[..1]);
}

#[test]
fn test_hidden_series_command_is_silent() {
    let mut state = WidgetState::new("w");
    assert_eq!(
        state.update(WidgetMessage::ToggleSeries("B".into())),
        Command::None
    );
}

// =============================================================================
// Widget Scenarios
// =============================================================================

#[test]
fn test_clicking_feb_reports_the_row() {
    let data = AnalyticsWidgetData::new("counts", "Counts").chart(
        ChartKind::Bar,
        vec![
            DataRow::new().with("name", "Jan").with("value", 10),
            DataRow::new().with("name", "Feb").with("value", 20),
        ],
        vec![SeriesDescriptor::new("Count", "value")],
    );
    let rows = CallLog::new();
    let record = rows.recorder();
    let widget = AnalyticsWidget::new(data).on_chart_element_click(move |r: &DataRow| record(r.clone()));
    let mut harness = Harness::new(widget).viewport(640.0, 800.0);

    let feb = bar_center(harness.widget().chart(), 1);
    harness.click_at(feb);

    assert_eq!(
        rows.entries(),
        vec![DataRow::new().with("name", "Feb").with("value", 20)]
    );
}

#[test]
fn test_hiding_series_b() {
    let rows = vec![DataRow::new().with("name", "Jan").with("a", 1).with("b", 2)];
    let data = AnalyticsWidgetData::new("ab", "A and B").chart(ChartKind::Line, rows, series_ab());
    let mut widget = AnalyticsWidget::new(data);

    widget.dispatch(WidgetMessage::ToggleSeries("B".into()));

    assert_eq!(
        widget.effective_series().into_owned(),
        vec![SeriesDescriptor::new("A", "a")]
    );
}

#[test]
fn test_loading_widget_click_is_silent() {
    let manifest = WidgetManifest::from_yaml(
        r"
id: loading
title: Loading
chartType: bar
chartData:
  - name: Jan
    value: 10
chartSeries:
  - name: Count
    dataKey: value
actionText: Details
",
    )
    .expect("valid manifest");

    let clicks = CallLog::new();
    let elements = CallLog::new();
    let (on_click, on_element) = (clicks.recorder(), elements.recorder());
    let widget = manifest
        .into_widget()
        .on_click(move || on_click(()))
        .on_chart_element_click(move |r: &DataRow| on_element(r.clone()))
        .loading(true);
    let mut harness = Harness::new(widget).viewport(640.0, 800.0);

    let bounds = harness.widget().bounds();
    harness.click_at(Point::new(bounds.x + 40.0, bounds.y + 20.0));
    let chart = harness.widget().chart_rect();
    harness.click_rect(chart);

    assert!(clicks.is_empty());
    assert!(elements.is_empty());
    harness.assert_no_messages();
    assert!(!vantage::Widget::is_interactive(harness.widget()));
}
