use approx::assert_relative_eq;
use metric_showcase::ChartError;
use metric_showcase::api::{TrendChart, TrendChartConfig, TrendStyle};
use metric_showcase::core::{
    GrowthPoint, MetricDataSource, StaticMetricSource, TrendLayout, TrendMarkKind, Viewport,
    project_trend_marks, trend_value_domain,
};
use metric_showcase::render::{Color, NullRenderer};
use rust_decimal::Decimal;

fn points(raw: &[(i32, f64)]) -> Vec<GrowthPoint> {
    raw.iter()
        .map(|(year, revenue)| GrowthPoint::new(*year, *revenue).expect("growth point"))
        .collect()
}

#[test]
fn two_years_render_two_marks_in_order_with_growing_magnitude() {
    let series = points(&[(2020, 386.1), (2021, 469.8)]);
    let geometry = project_trend_marks(&series, TrendLayout::default(), Viewport::new(400, 200))
        .expect("project");

    assert_eq!(geometry.marks.len(), 2);
    assert_eq!(geometry.marks[0].year, 2020);
    assert_eq!(geometry.marks[1].year, 2021);
    assert!(geometry.marks[0].center_x < geometry.marks[1].center_x);
    assert!(geometry.marks[1].magnitude_px() > geometry.marks[0].magnitude_px());

    assert_relative_eq!(geometry.plot.left, 48.0);
    assert_relative_eq!(geometry.plot.bottom, 176.0);
    assert_relative_eq!(geometry.marks[0].center_x, 134.0, epsilon = 1e-9);
    assert_relative_eq!(geometry.marks[1].center_x, 306.0, epsilon = 1e-9);
    assert_relative_eq!(geometry.marks[0].bar_width, 172.0 * 0.6, epsilon = 1e-9);
    assert_relative_eq!(geometry.marks[0].baseline_y, geometry.plot.bottom, epsilon = 1e-9);
}

#[test]
fn value_domain_starts_at_zero_with_headroom() {
    let source = StaticMetricSource::default();
    let (low, high) = trend_value_domain(source.growth(), 0.1);

    assert_eq!(low, 0.0);
    assert_relative_eq!(high, 716.9 * 1.1, epsilon = 1e-9);
    assert_eq!(trend_value_domain(&[], 0.1), (0.0, 1.0));
    assert_eq!(trend_value_domain(&points(&[(2020, 0.0)]), 0.1), (0.0, 1.0));
}

#[test]
fn unsorted_or_duplicate_years_are_rejected() {
    let unsorted = vec![
        GrowthPoint::new(2021, 469.8).expect("point"),
        GrowthPoint::new(2020, 386.1).expect("point"),
    ];
    let result = TrendChart::new(
        NullRenderer::default(),
        unsorted,
        TrendChartConfig::new(Viewport::new(400, 200)),
    );
    assert!(matches!(result, Err(ChartError::InvalidData(_))));

    let duplicated = points(&[(2020, 1.0), (2020, 2.0)]);
    let err = project_trend_marks(&duplicated, TrendLayout::default(), Viewport::new(400, 200))
        .expect_err("duplicate year");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn empty_series_renders_axes_only() {
    let mut chart = TrendChart::new(
        NullRenderer::default(),
        Vec::new(),
        TrendChartConfig::new(Viewport::new(400, 200)),
    )
    .expect("empty series is allowed");

    assert!(chart.geometry().marks.is_empty());
    let frame = chart.build_render_frame().expect("frame");
    assert!(frame.rects.is_empty());
    assert_eq!(frame.lines.len(), 5);

    chart.render().expect("render");
    assert_eq!(chart.renderer().frames_rendered, 1);
}

#[test]
fn bar_mode_emits_one_rect_and_label_per_year() {
    let source = StaticMetricSource::default();
    let chart = TrendChart::new(
        NullRenderer::default(),
        source.growth().to_vec(),
        TrendChartConfig::new(Viewport::new(640, 240)),
    )
    .expect("chart init");

    let frame = chart.build_render_frame().expect("frame");
    assert_eq!(frame.rects.len(), 6);
    let year_labels: Vec<_> = frame
        .texts
        .iter()
        .map(|text| text.text.as_str())
        .filter(|text| text.starts_with("20"))
        .collect();
    assert_eq!(year_labels, vec!["2020", "2021", "2022", "2023", "2024", "2025"]);
    assert!(frame.rects.iter().all(|rect| rect.height > 0.0));
}

#[test]
fn line_mode_connects_consecutive_points() {
    let source = StaticMetricSource::default();
    let mut chart = TrendChart::new(
        NullRenderer::default(),
        source.growth().to_vec(),
        TrendChartConfig::new(Viewport::new(640, 240)),
    )
    .expect("chart init");
    chart.set_mark_kind(TrendMarkKind::Line).expect("line mode");

    let frame = chart.build_render_frame().expect("frame");
    let tick_lines = chart.geometry().value_ticks.len();
    assert_eq!(frame.lines.len(), tick_lines + 5);
    assert_eq!(frame.rects.len(), 6);
}

#[test]
fn resize_rescales_marks() {
    let series = points(&[(2020, 386.1), (2021, 469.8)]);
    let mut chart = TrendChart::new(
        NullRenderer::default(),
        series,
        TrendChartConfig::new(Viewport::new(400, 200)),
    )
    .expect("chart init");
    let narrow = chart.geometry().marks[1].center_x;

    chart.resize(Viewport::new(800, 200)).expect("resize");
    assert!(chart.geometry().marks[1].center_x > narrow);

    let err = chart.resize(Viewport::new(40, 20)).expect_err("no plot area");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn decimal_revenue_is_accepted() {
    let point = GrowthPoint::from_decimal(2025, Decimal::new(7169, 1)).expect("decimal point");
    assert_relative_eq!(point.revenue, 716.9, epsilon = 1e-9);
    assert_eq!(point.year_label(), "2025");
}

#[test]
fn revenue_near_f64_max_saturates_domain_instead_of_failing() {
    let series = points(&[(2020, 1.0), (2021, f64::MAX)]);
    assert_eq!(trend_value_domain(&series, 0.1), (0.0, f64::MAX));

    let chart = TrendChart::new(
        NullRenderer::default(),
        series,
        TrendChartConfig::new(Viewport::new(400, 200)),
    )
    .expect("huge revenue still projects");
    let geometry = chart.geometry();
    assert_relative_eq!(geometry.marks[1].value_y, geometry.plot.top, epsilon = 1e-9);
    assert!(geometry.marks[0].magnitude_px() >= 0.0);
    assert!(geometry.value_ticks.iter().all(|tick| tick.value.is_finite()));

    chart.build_render_frame().expect("frame");
}

#[test]
fn set_style_recolors_bars_and_rejects_invalid_widths() {
    let mut chart = TrendChart::new(
        NullRenderer::default(),
        points(&[(2024, 10.0), (2025, 20.0)]),
        TrendChartConfig::new(Viewport::new(400, 200)),
    )
    .expect("chart init");

    let mark_color = Color::rgb(0.2, 0.6, 0.4);
    chart
        .set_style(TrendStyle {
            mark_color,
            ..TrendStyle::default()
        })
        .expect("style");
    let frame = chart.build_render_frame().expect("frame");
    assert!(frame.rects.iter().all(|rect| rect.fill_color == mark_color));

    let err = chart
        .set_style(TrendStyle {
            bar_corner_radius: f64::NAN,
            ..TrendStyle::default()
        })
        .expect_err("nan radius");
    assert!(matches!(err, ChartError::InvalidData(_)));
}
