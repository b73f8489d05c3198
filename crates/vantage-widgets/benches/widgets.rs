//! Benchmarks for chart geometry and widget derivations.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vantage_core::{Constraints, Rect, Size, Widget};
use vantage_widgets::{
    AnalyticsWidget, AnalyticsWidgetData, ChartKind, ChartRenderer, DataRow, SeriesDescriptor,
    SeverityFilter, WidgetMessage,
};

fn rows(n: usize) -> Vec<DataRow> {
    (0..n)
        .map(|i| {
            let severity = ["Critical", "High", "Medium", "Low"][i % 4];
            DataRow::new()
                .with("name", format!("{severity} {i}"))
                .with("a", (i % 17) as f64)
                .with("b", (i % 11) as f64)
        })
        .collect()
}

fn series() -> Vec<SeriesDescriptor> {
    vec![SeriesDescriptor::new("A", "a"), SeriesDescriptor::new("B", "b")]
}

fn bench_bar_marks(c: &mut Criterion) {
    let mut chart = ChartRenderer::bar().data(rows(500)).series(series()).stacked(true);
    chart.layout(Rect::new(0.0, 0.0, 1200.0, 400.0));

    c.bench_function("bar_marks_500_rows", |b| b.iter(|| black_box(&chart).marks()));
}

fn bench_pie_slices(c: &mut Criterion) {
    let chart = ChartRenderer::pie().data(rows(200)).series(series());

    c.bench_function("pie_slices_200_rows", |b| {
        b.iter(|| black_box(&chart).pie_slices())
    });
}

fn bench_hit_test(c: &mut Criterion) {
    let mut chart = ChartRenderer::line().data(rows(500)).series(series());
    chart.layout(Rect::new(0.0, 0.0, 1200.0, 400.0));
    let point = vantage_core::Point::new(600.0, 200.0);

    c.bench_function("line_target_at_500_rows", |b| {
        b.iter(|| chart.target_at(black_box(point)))
    });
}

fn bench_severity_filter(c: &mut Criterion) {
    let data = AnalyticsWidgetData::new("bench", "Bench").chart(ChartKind::Pie, rows(1000), series());
    let mut widget = AnalyticsWidget::new(data);
    widget.dispatch(WidgetMessage::SetSeverity(SeverityFilter::Critical));

    c.bench_function("pie_severity_filter_1000_rows", |b| {
        b.iter(|| black_box(&widget).effective_chart_data().len())
    });
}

fn bench_widget_measure(c: &mut Criterion) {
    let data = AnalyticsWidgetData::new("bench", "Bench").chart(ChartKind::Bar, rows(50), series());
    let widget = AnalyticsWidget::new(data);
    let constraints = Constraints::loose(Size::new(480.0, f32::INFINITY));

    c.bench_function("analytics_widget_measure", |b| {
        b.iter(|| widget.measure(black_box(constraints)))
    });
}

criterion_group!(
    benches,
    bench_bar_marks,
    bench_pie_slices,
    bench_hit_test,
    bench_severity_filter,
    bench_widget_measure,
);
criterion_main!(benches);
