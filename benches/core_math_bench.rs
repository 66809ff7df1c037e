use metric_showcase::api::{PageComposer, PageConfig, StaticContent};
use metric_showcase::core::{
    AnnularLayout, DistributionSegment, GrowthPoint, LinearScale, MetricDataSource, PixelPoint,
    StaticMetricSource, TrendLayout, Viewport, project_annular_arcs, project_trend_marks,
};
use metric_showcase::render::{Color, NullRenderer};
use metric_showcase::scroll::ViewportScrollSource;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::rc::Rc;

fn bench_linear_scale_round_trip(c: &mut Criterion) {
    let scale = LinearScale::new(0.0, 10_000.0).expect("valid scale");

    c.bench_function("linear_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale.domain_to_pixel(4_321.123, 1_080.0).expect("to pixel");
            let _ = scale.pixel_to_domain(px, 1_080.0).expect("from pixel");
        })
    });
}

fn bench_annular_projection_1k(c: &mut Criterion) {
    let viewport = Viewport::new(1920, 1080);
    let segments: Vec<DistributionSegment> = (0..1_000)
        .map(|i| {
            DistributionSegment::new(format!("segment-{i}"), f64::from(i % 17), Color::WHITE)
                .expect("valid generated segment")
        })
        .collect();

    c.bench_function("annular_projection_1k", |b| {
        b.iter(|| {
            let _ = project_annular_arcs(
                black_box(&segments),
                black_box(AnnularLayout::default()),
                black_box(viewport),
            )
            .expect("projection should succeed");
        })
    });
}

fn bench_annular_hit_test_sweep(c: &mut Criterion) {
    let source = StaticMetricSource::default();
    let geometry = project_annular_arcs(
        source.distribution(),
        AnnularLayout::default(),
        Viewport::new(640, 300),
    )
    .expect("projection should succeed");

    c.bench_function("annular_hit_test_sweep_640", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for x in (0..640).step_by(4) {
                let point = PixelPoint::new(f64::from(x), 150.0);
                if geometry.hit_test(black_box(point)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

fn bench_trend_projection_5k(c: &mut Criterion) {
    let viewport = Viewport::new(1920, 480);
    let points: Vec<GrowthPoint> = (0..5_000)
        .map(|i| {
            let revenue = 100.0 + f64::from(i) * 0.5 + if i % 2 == 0 { 3.0 } else { 0.0 };
            GrowthPoint::new(1_000 + i, revenue).expect("valid generated point")
        })
        .collect();

    c.bench_function("trend_projection_5k", |b| {
        b.iter(|| {
            let _ = project_trend_marks(
                black_box(&points),
                black_box(TrendLayout::default()),
                black_box(viewport),
            )
            .expect("projection should succeed");
        })
    });
}

fn bench_page_snapshot_json(c: &mut Criterion) {
    let scroll = Rc::new(ViewportScrollSource::new());
    let page: PageComposer<NullRenderer> = PageComposer::new(
        Rc::new(StaticMetricSource::default()),
        scroll.clone(),
        StaticContent::new(),
        PageConfig::default().with_growth_trend(true),
    )
    .expect("page init");
    scroll.scroll_to(120.0);

    c.bench_function("page_snapshot_json", |b| {
        b.iter(|| {
            let _ = page
                .snapshot_json_contract_v1_pretty()
                .expect("snapshot json should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_round_trip,
    bench_annular_projection_1k,
    bench_annular_hit_test_sweep,
    bench_trend_projection_5k,
    bench_page_snapshot_json
);
criterion_main!(benches);
