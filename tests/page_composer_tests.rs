use std::cell::RefCell;
use std::rc::Rc;

use metric_showcase::ChartError;
use metric_showcase::api::{NavChromeVariant, PageComposer, PageConfig, PageSnapshot, StaticContent};
use metric_showcase::core::{DistributionSegment, GrowthPoint, KpiCard, StaticMetricSource, Viewport};
use metric_showcase::render::{Color, NullRenderer, SvgRenderer};
use metric_showcase::scroll::{NoScrollSignal, ScrollObserverConfig, ViewportScrollSource};

fn footer_content() -> StaticContent {
    StaticContent::new()
        .with_block("hero", "<h1>Everything Store</h1>")
        .with_block("footer", "<footer>&copy; 2025</footer>")
}

fn composer_with(
    scroll: &Rc<ViewportScrollSource>,
    config: PageConfig,
) -> PageComposer<NullRenderer> {
    PageComposer::new(
        Rc::new(StaticMetricSource::default()),
        scroll.clone(),
        footer_content(),
        config,
    )
    .expect("compose page")
}

fn legend_labels(snapshot: &PageSnapshot) -> Vec<String> {
    snapshot
        .legend
        .iter()
        .map(|entry| entry.label.clone())
        .collect()
}

#[test]
fn navigation_style_follows_scroll_threshold() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let page = composer_with(&scroll, PageConfig::default());
    assert_eq!(page.nav_style().variant, NavChromeVariant::Transparent);

    scroll.scroll_to(80.0);
    assert_eq!(page.nav_style().variant, NavChromeVariant::Opaque);
    assert!(page.nav_style().border_bottom.is_some());

    scroll.scroll_to(50.0);
    assert_eq!(page.nav_style().variant, NavChromeVariant::Transparent);
}

#[test]
fn nav_change_callback_fires_once_per_flip() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let page = composer_with(&scroll, PageConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = page.on_nav_change(move |style| sink.borrow_mut().push(style.variant));

    scroll.scroll_to(80.0);
    scroll.scroll_to(120.0);
    scroll.scroll_to(20.0);
    assert_eq!(
        *seen.borrow(),
        vec![NavChromeVariant::Opaque, NavChromeVariant::Transparent]
    );

    assert!(page.scroll_observer().unsubscribe(id));
    scroll.scroll_to(300.0);
    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(page.nav_style().variant, NavChromeVariant::Opaque);
}

#[test]
fn composed_view_carries_charts_cards_and_static_content() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let page = composer_with(&scroll, PageConfig::default());
    let view = page.compose().expect("compose");

    assert_eq!(view.kpi_cards.len(), 4);
    assert_eq!(view.kpi_cards[0].value, "$716.9B");
    assert_eq!(view.legend.len(), 4);
    assert!(view.tooltip.is_none());
    assert_eq!(view.distribution_frame.arcs.len(), 7);
    assert!(view.trend_frame.is_none());
    assert_eq!(
        view.static_content.block("footer"),
        Some("<footer>&copy; 2025</footer>")
    );
    assert_eq!(
        view.static_content.blocks().map(|(id, _)| id).collect::<Vec<_>>(),
        vec!["hero", "footer"]
    );
}

#[test]
fn growth_trend_is_opt_in() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let mut page = composer_with(&scroll, PageConfig::default().with_growth_trend(true));

    let view = page.compose().expect("compose");
    let trend = view.trend_frame.expect("trend frame when enabled");
    assert_eq!(trend.rects.len(), 6);

    page.render().expect("render");
    assert_eq!(page.distribution().renderer().frames_rendered, 1);
    assert_eq!(page.trend().renderer().frames_rendered, 1);

    page.set_show_growth_trend(false);
    page.render().expect("render");
    assert_eq!(page.distribution().renderer().frames_rendered, 2);
    assert_eq!(page.trend().renderer().frames_rendered, 1);
    assert!(page.snapshot().trend.is_none());
}

#[test]
fn pointer_hover_reaches_distribution_tooltip() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let mut page = composer_with(&scroll, PageConfig::default());
    let anchor = page.distribution().geometry().arc_anchor(2).expect("anchor");

    assert_eq!(page.pointer_move(anchor.x, anchor.y), Some(2));
    let view = page.compose().expect("compose");
    assert_eq!(view.tooltip.expect("tooltip").text, "AWS: 18%");

    page.pointer_leave();
    assert!(page.compose().expect("compose").tooltip.is_none());
}

#[test]
fn resize_updates_config_and_geometry() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let mut page = composer_with(&scroll, PageConfig::default());

    page.resize_distribution(Viewport::new(200, 200)).expect("resize");
    assert_eq!(page.config().distribution_container, Viewport::new(200, 200));
    assert_eq!(page.distribution().geometry().outer_radius, 100.0);

    let err = page.resize_trend(Viewport::new(0, 100)).expect_err("invalid viewport");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));
    assert_eq!(page.config().trend_container, PageConfig::default().trend_container);
}

#[test]
fn dispose_releases_scroll_listener() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let mut page = composer_with(&scroll, PageConfig::default());
    assert_eq!(scroll.listener_count(), 1);

    page.dispose();
    page.dispose();
    assert_eq!(scroll.listener_count(), 0);

    scroll.scroll_to(400.0);
    assert!(!page.scroll_state().past_threshold);
}

#[test]
fn page_without_scroll_signal_stays_transparent() {
    let page: PageComposer<NullRenderer> = PageComposer::new(
        Rc::new(StaticMetricSource::default()),
        Rc::new(NoScrollSignal),
        StaticContent::new(),
        PageConfig::default(),
    )
    .expect("compose page");

    assert_eq!(page.nav_style().variant, NavChromeVariant::Transparent);
    assert!(!page.scroll_observer().is_listening());
}

#[test]
fn custom_source_with_empty_datasets_composes() {
    let source = StaticMetricSource::new(Vec::new(), Vec::new(), Vec::new()).expect("source");
    let scroll = Rc::new(ViewportScrollSource::new());
    let page: PageComposer<NullRenderer> = PageComposer::new(
        Rc::new(source),
        scroll.clone(),
        StaticContent::new(),
        PageConfig::default().with_growth_trend(true),
    )
    .expect("compose page");

    let view = page.compose().expect("compose");
    assert!(view.distribution_frame.is_empty());
    assert!(view.legend.is_empty());
    assert!(view.kpi_cards.is_empty());
    assert!(view.trend_frame.expect("trend frame").rects.is_empty());
}

#[test]
fn huge_growth_revenue_does_not_block_page_composition() {
    let source = StaticMetricSource::new(
        vec![DistributionSegment::new("A", 1.0, Color::WHITE).expect("segment")],
        vec![
            GrowthPoint::new(2024, 1.0).expect("point"),
            GrowthPoint::new(2025, f64::MAX).expect("point"),
        ],
        Vec::new(),
    )
    .expect("source");
    let scroll = Rc::new(ViewportScrollSource::new());
    let mut page: PageComposer<NullRenderer> = PageComposer::new(
        Rc::new(source),
        scroll.clone(),
        StaticContent::new(),
        PageConfig::default(),
    )
    .expect("compose page");

    assert!(page.compose().expect("compose").trend_frame.is_none());
    page.set_show_growth_trend(true);
    let view = page.compose().expect("compose with trend");
    assert_eq!(view.trend_frame.expect("trend frame").rects.len(), 2);
}

#[test]
fn custom_source_validates_growth_order() {
    let err = StaticMetricSource::new(
        vec![DistributionSegment::new("A", 1.0, Color::WHITE).expect("segment")],
        vec![
            GrowthPoint::new(2022, 1.0).expect("point"),
            GrowthPoint::new(2021, 2.0).expect("point"),
        ],
        vec![KpiCard::new("Label", "1", "up")],
    )
    .expect_err("unsorted growth");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn snapshot_json_contract_round_trips() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let mut page = composer_with(&scroll, PageConfig::default().with_growth_trend(true));
    scroll.scroll_to(120.0);
    page.distribution_mut().focus_segment(0).expect("focus");

    let snapshot = page.snapshot();
    assert_eq!(snapshot.nav_variant, NavChromeVariant::Opaque);
    assert_eq!(snapshot.legend.len(), 4);
    assert!(snapshot.trend.is_some());

    let json = page.snapshot_json_contract_v1_pretty().expect("serialize");
    assert!(json.contains("\"schema_version\": 1"));
    let parsed = PageSnapshot::from_json_compat_str(&json).expect("parse");
    assert_eq!(parsed.scroll, snapshot.scroll);
    assert_eq!(parsed.nav_variant, snapshot.nav_variant);
    assert_eq!(legend_labels(&parsed), legend_labels(&snapshot));
    assert_eq!(parsed.distribution.arcs.len(), 7);
    assert_eq!(parsed.distribution.state, snapshot.distribution.state);
    assert_eq!(
        parsed.tooltip.map(|tooltip| tooltip.text),
        Some("Online Stores: 37.6%".to_owned())
    );
    assert_eq!(parsed.trend.map(|trend| trend.marks.len()), Some(6));

    let bare = serde_json::to_string(&snapshot).expect("bare json");
    let parsed_bare = PageSnapshot::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(legend_labels(&parsed_bare), legend_labels(&snapshot));
}

#[test]
fn snapshot_rejects_unknown_schema_version() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let page = composer_with(&scroll, PageConfig::default());
    let json = page
        .snapshot_json_contract_v1_pretty()
        .expect("serialize")
        .replace("\"schema_version\": 1", "\"schema_version\": 9");

    let err = PageSnapshot::from_json_compat_str(&json).expect_err("unknown version");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn page_config_reads_partial_json_with_defaults() {
    let config = PageConfig::from_json_str("{}").expect("empty config");
    assert_eq!(config, PageConfig::default());

    let config = PageConfig::from_json_str(
        r#"{"show_growth_trend": true, "scroll": {"threshold_px": 120.0}, "legend_len": 3}"#,
    )
    .expect("partial config");
    assert!(config.show_growth_trend);
    assert_eq!(config.scroll, ScrollObserverConfig::default().with_threshold_px(120.0));
    assert_eq!(config.legend_len, 3);

    let json = config.to_json_pretty().expect("serialize config");
    assert_eq!(PageConfig::from_json_str(&json).expect("reparse"), config);
}

#[test]
fn page_config_rejects_invalid_values() {
    let err = PageConfig::from_json_str(r#"{"distribution_container": {"width": 0, "height": 10}}"#)
        .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));

    let err = PageConfig::from_json_str("not json").expect_err("garbage");
    assert!(matches!(err, ChartError::InvalidConfig(_)));
}

#[test]
fn svg_backed_page_renders_documents() {
    let scroll = Rc::new(ViewportScrollSource::new());
    let mut page: PageComposer<SvgRenderer> = PageComposer::new(
        Rc::new(StaticMetricSource::default()),
        scroll.clone(),
        StaticContent::new(),
        PageConfig::default().with_growth_trend(true),
    )
    .expect("compose page");
    page.render().expect("render");

    assert_eq!(
        page.distribution().renderer().document().matches("<polygon").count(),
        7
    );
    let trend = page.trend().renderer().document();
    assert!(trend.contains("<line"));
    assert!(trend.contains("2025"));
}
