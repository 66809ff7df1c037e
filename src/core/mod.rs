pub mod annular;
pub mod dataset;
pub mod primitives;
pub mod scale;
pub mod trend;
pub mod types;

pub use annular::{
    AnnularGeometry, AnnularLayout, AnnularState, ArcGeometry, RadiusSpec, project_annular_arcs,
};
pub use dataset::{
    DistributionSegment, GrowthPoint, KpiCard, MetricDataSource, StaticMetricSource,
    distribution_total, is_complete_distribution, validate_growth_order,
};
pub use scale::LinearScale;
pub use trend::{
    PlotArea, TrendGeometry, TrendLayout, TrendMarkGeometry, TrendMarkKind, ValueTick,
    project_trend_marks, trend_value_domain,
};
pub use types::{PixelPoint, Viewport};
