use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::decimal_to_f64;
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Shares of one distribution are expected to add up to 100 within this slack.
pub const DISTRIBUTION_SUM_TOLERANCE: f64 = 0.5;

/// One named share of a distribution chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSegment {
    pub name: String,
    /// Percentage share, `>= 0`.
    pub value: f64,
    pub color: Color,
}

impl DistributionSegment {
    pub fn new(name: impl Into<String>, value: f64, color: Color) -> ChartResult<Self> {
        let segment = Self {
            name: name.into(),
            value,
            color,
        };
        segment.validate()?;
        Ok(segment)
    }

    /// Builds a segment from a `#RRGGBB` color token.
    pub fn with_hex(name: impl Into<String>, value: f64, color_hex: &str) -> ChartResult<Self> {
        Self::new(name, value, Color::from_hex(color_hex)?)
    }

    pub fn from_decimal(name: impl Into<String>, value: Decimal, color: Color) -> ChartResult<Self> {
        Self::new(name, decimal_to_f64(value, "segment value")?, color)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.name.is_empty() {
            return Err(ChartError::InvalidData(
                "segment name must not be empty".to_owned(),
            ));
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "segment `{}` value must be finite and >= 0",
                self.name
            )));
        }
        self.color.validate()
    }
}

/// Revenue (or any magnitude) for one year of a growth series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub year: i32,
    pub revenue: f64,
}

impl GrowthPoint {
    pub fn new(year: i32, revenue: f64) -> ChartResult<Self> {
        if !revenue.is_finite() || revenue < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "revenue for {year} must be finite and >= 0"
            )));
        }
        Ok(Self { year, revenue })
    }

    pub fn from_decimal(year: i32, revenue: Decimal) -> ChartResult<Self> {
        Self::new(year, decimal_to_f64(revenue, "revenue")?)
    }

    #[must_use]
    pub fn year_label(&self) -> String {
        self.year.to_string()
    }
}

/// Headline stat shown in the floating hero cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiCard {
    pub label: String,
    pub value: String,
    pub trend: String,
}

impl KpiCard {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>, trend: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            trend: trend.into(),
        }
    }
}

/// Supplier of the page's metric datasets.
///
/// Implementations return immutable data; renderers never write back.
pub trait MetricDataSource {
    fn distribution(&self) -> &[DistributionSegment];
    fn growth(&self) -> &[GrowthPoint];
    fn kpi_cards(&self) -> &[KpiCard];
}

/// Compiled-in 2025 revenue report figures.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticMetricSource {
    distribution: Vec<DistributionSegment>,
    growth: Vec<GrowthPoint>,
    kpi_cards: Vec<KpiCard>,
}

const REVENUE_MIX: [(&str, f64, Color); 7] = [
    ("Online Stores", 37.6, rgb8(0xF2, 0x7D, 0x26)),
    ("Third-party", 24.0, rgb8(0xFF, 0x99, 0x00)),
    ("AWS", 18.0, rgb8(0x23, 0x2F, 0x3E)),
    ("Advertising", 9.6, rgb8(0x00, 0xA8, 0xE1)),
    ("Subscriptions", 6.9, rgb8(0x37, 0x47, 0x5A)),
    ("Physical Stores", 3.1, rgb8(0x14, 0x6E, 0xB4)),
    ("Others", 0.8, rgb8(0x8E, 0x92, 0x99)),
];

const REVENUE_GROWTH: [(i32, f64); 6] = [
    (2020, 386.1),
    (2021, 469.8),
    (2022, 514.0),
    (2023, 574.8),
    (2024, 638.0),
    (2025, 716.9),
];

const HERO_STATS: [(&str, &str, &str); 4] = [
    ("2025 Revenue", "$716.9B", "+12% YoY"),
    ("Active Customers", "310M+", "Global"),
    ("Cloud Share", "30%", "Market Leader"),
    ("Market Cap", "$2.39T", "Nasdaq: AMZN"),
];

const fn rgb8(red: u8, green: u8, blue: u8) -> Color {
    Color::rgb(
        red as f64 / 255.0,
        green as f64 / 255.0,
        blue as f64 / 255.0,
    )
}

impl StaticMetricSource {
    /// Source backed by caller-supplied datasets, validated up front.
    pub fn new(
        distribution: Vec<DistributionSegment>,
        growth: Vec<GrowthPoint>,
        kpi_cards: Vec<KpiCard>,
    ) -> ChartResult<Self> {
        for segment in &distribution {
            segment.validate()?;
        }
        validate_growth_order(&growth)?;
        Ok(Self {
            distribution,
            growth,
            kpi_cards,
        })
    }
}

impl Default for StaticMetricSource {
    fn default() -> Self {
        Self {
            distribution: REVENUE_MIX
                .iter()
                .map(|(name, value, color)| DistributionSegment {
                    name: (*name).to_owned(),
                    value: *value,
                    color: *color,
                })
                .collect(),
            growth: REVENUE_GROWTH
                .iter()
                .map(|(year, revenue)| GrowthPoint {
                    year: *year,
                    revenue: *revenue,
                })
                .collect(),
            kpi_cards: HERO_STATS
                .iter()
                .map(|(label, value, trend)| KpiCard::new(*label, *value, *trend))
                .collect(),
        }
    }
}

impl MetricDataSource for StaticMetricSource {
    fn distribution(&self) -> &[DistributionSegment] {
        &self.distribution
    }

    fn growth(&self) -> &[GrowthPoint] {
        &self.growth
    }

    fn kpi_cards(&self) -> &[KpiCard] {
        &self.kpi_cards
    }
}

/// Sum of all segment values.
#[must_use]
pub fn distribution_total(segments: &[DistributionSegment]) -> f64 {
    segments.iter().map(|segment| segment.value).sum()
}

/// Returns whether the shares add up to 100 within `DISTRIBUTION_SUM_TOLERANCE`.
#[must_use]
pub fn is_complete_distribution(segments: &[DistributionSegment]) -> bool {
    (distribution_total(segments) - 100.0).abs() <= DISTRIBUTION_SUM_TOLERANCE
}

/// Rejects growth series whose years are not strictly increasing.
pub fn validate_growth_order(points: &[GrowthPoint]) -> ChartResult<()> {
    for point in points {
        if !point.revenue.is_finite() || point.revenue < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "revenue for {} must be finite and >= 0",
                point.year
            )));
        }
    }
    if let Some(pair) = points.windows(2).find(|pair| pair[0].year >= pair[1].year) {
        return Err(ChartError::InvalidData(format!(
            "growth years must be strictly increasing: {} then {}",
            pair[0].year, pair[1].year
        )));
    }
    Ok(())
}
