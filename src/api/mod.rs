mod distribution_chart;
mod nav_style;
mod page;
mod snapshot;
mod trend_chart;

pub use distribution_chart::{
    DEFAULT_LEGEND_LEN, DistributionChart, DistributionChartConfig, DistributionStyle, Legend,
    LegendEntry, Tooltip, tooltip_text,
};
pub use nav_style::{
    NAV_BASE_CLASSES, NavChromeStyle, NavChromeVariant, nav_style_for, nav_variant_for,
};
pub use page::{PageComposer, PageConfig, PageView, StaticContent};
pub use snapshot::{PAGE_SNAPSHOT_JSON_SCHEMA_V1, PageSnapshot, PageSnapshotJsonContractV1};
pub use trend_chart::{TrendChart, TrendChartConfig, TrendStyle};
