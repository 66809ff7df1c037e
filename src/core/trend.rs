use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::dataset::{GrowthPoint, validate_growth_order};
use crate::core::{LinearScale, Viewport};
use crate::error::{ChartError, ChartResult};

/// How each growth point is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendMarkKind {
    #[default]
    Bar,
    Line,
}

/// Plot insets and mark sizing for the growth chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLayout {
    #[serde(default)]
    pub mark_kind: TrendMarkKind,
    /// Room reserved left of the plot for value labels.
    pub value_axis_width_px: f64,
    /// Room reserved below the plot for year labels.
    pub year_axis_height_px: f64,
    pub top_inset_px: f64,
    pub right_inset_px: f64,
    /// Bar width as a fraction of the per-year slot.
    pub bar_width_ratio: f64,
    /// Extra space above the largest value, as a fraction of it.
    pub headroom_ratio: f64,
    pub value_tick_count: usize,
}

impl Default for TrendLayout {
    fn default() -> Self {
        Self {
            mark_kind: TrendMarkKind::Bar,
            value_axis_width_px: 48.0,
            year_axis_height_px: 24.0,
            top_inset_px: 8.0,
            right_inset_px: 8.0,
            bar_width_ratio: 0.6,
            headroom_ratio: 0.1,
            value_tick_count: 5,
        }
    }
}

impl TrendLayout {
    pub fn validate(self) -> ChartResult<()> {
        for (name, value) in [
            ("value_axis_width_px", self.value_axis_width_px),
            ("year_axis_height_px", self.year_axis_height_px),
            ("top_inset_px", self.top_inset_px),
            ("right_inset_px", self.right_inset_px),
            ("headroom_ratio", self.headroom_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.bar_width_ratio.is_finite()
            || self.bar_width_ratio <= 0.0
            || self.bar_width_ratio > 1.0
        {
            return Err(ChartError::InvalidConfig(
                "bar_width_ratio must be finite and in (0, 1]".to_owned(),
            ));
        }
        if self.value_tick_count < 2 {
            return Err(ChartError::InvalidConfig(
                "value_tick_count must be >= 2".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Plot rectangle left after subtracting axis gutters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }
}

/// One growth point mapped to pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendMarkGeometry {
    pub index: usize,
    pub year: i32,
    pub value: f64,
    pub center_x: f64,
    pub value_y: f64,
    pub baseline_y: f64,
    pub bar_left: f64,
    pub bar_width: f64,
}

impl TrendMarkGeometry {
    /// Pixel height of the mark above the baseline.
    #[must_use]
    pub fn magnitude_px(self) -> f64 {
        self.baseline_y - self.value_y
    }
}

/// Value-axis tick in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueTick {
    pub value: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendGeometry {
    pub viewport: Viewport,
    pub plot: PlotArea,
    pub value_domain: (f64, f64),
    pub marks: Vec<TrendMarkGeometry>,
    pub value_ticks: Vec<ValueTick>,
}

/// Value domain anchored at zero with headroom above the maximum.
///
/// A series that is flat at zero falls back to `[0, 1]`. The upper bound
/// saturates at `f64::MAX`, so very large revenues lose their headroom.
#[must_use]
pub fn trend_value_domain(points: &[GrowthPoint], headroom_ratio: f64) -> (f64, f64) {
    let max = points
        .iter()
        .map(|point| OrderedFloat(point.revenue))
        .max()
        .map_or(0.0, OrderedFloat::into_inner);
    let min = points
        .iter()
        .map(|point| OrderedFloat(point.revenue))
        .min()
        .map_or(0.0, OrderedFloat::into_inner);

    let low = min.min(0.0);
    let high = (max * (1.0 + headroom_ratio)).min(f64::MAX);
    if high <= low { (low, low + 1.0) } else { (low, high) }
}

/// Places one mark per point at equal intervals, in year order.
///
/// An empty series yields a geometry without marks.
pub fn project_trend_marks(
    points: &[GrowthPoint],
    layout: TrendLayout,
    viewport: Viewport,
) -> ChartResult<TrendGeometry> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    layout.validate()?;
    validate_growth_order(points)?;

    let plot = PlotArea {
        left: layout.value_axis_width_px,
        top: layout.top_inset_px,
        right: f64::from(viewport.width) - layout.right_inset_px,
        bottom: f64::from(viewport.height) - layout.year_axis_height_px,
    };
    if plot.width() <= 0.0 || plot.height() <= 0.0 {
        return Err(ChartError::InvalidConfig(format!(
            "trend insets leave no plot area in {}x{}",
            viewport.width, viewport.height
        )));
    }

    let value_domain = trend_value_domain(points, layout.headroom_ratio);
    let scale = LinearScale::new(value_domain.0, value_domain.1)?;
    let baseline_y = plot.bottom - scale.domain_to_pixel(value_domain.0.max(0.0), plot.height())?;

    let slot = if points.is_empty() {
        0.0
    } else {
        plot.width() / points.len() as f64
    };
    let bar_width = slot * layout.bar_width_ratio;

    let mut marks = Vec::with_capacity(points.len());
    for (index, point) in points.iter().enumerate() {
        let center_x = plot.left + slot * (index as f64 + 0.5);
        let value_y = plot.bottom - scale.domain_to_pixel(point.revenue, plot.height())?;
        marks.push(TrendMarkGeometry {
            index,
            year: point.year,
            value: point.revenue,
            center_x,
            value_y,
            baseline_y,
            bar_left: center_x - bar_width * 0.5,
            bar_width,
        });
    }

    let step = (value_domain.1 - value_domain.0) / (layout.value_tick_count - 1) as f64;
    let mut value_ticks = Vec::with_capacity(layout.value_tick_count);
    for tick in 0..layout.value_tick_count {
        let value = value_domain.0 + step * tick as f64;
        value_ticks.push(ValueTick {
            value,
            y: plot.bottom - scale.domain_to_pixel(value, plot.height())?,
        });
    }

    Ok(TrendGeometry {
        viewport,
        plot,
        value_domain,
        marks,
        value_ticks,
    })
}
