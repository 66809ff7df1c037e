use serde::{Deserialize, Serialize};

use crate::core::dataset::{DistributionSegment, distribution_total};
use crate::core::primitives::{normalize_degrees, polar_to_pixel};
use crate::core::{PixelPoint, Viewport};
use crate::error::{ChartError, ChartResult};

/// Radius expressed in pixels or as a fraction of the available radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RadiusSpec {
    Pixels(f64),
    Ratio(f64),
}

impl RadiusSpec {
    #[must_use]
    pub fn resolve(self, available_radius: f64) -> f64 {
        match self {
            Self::Pixels(px) => px,
            Self::Ratio(ratio) => ratio * available_radius,
        }
    }

    fn validate(self, field_name: &str) -> ChartResult<()> {
        let valid = match self {
            Self::Pixels(px) => px.is_finite() && px >= 0.0,
            Self::Ratio(ratio) => ratio.is_finite() && (0.0..=1.0).contains(&ratio),
        };
        if valid {
            Ok(())
        } else {
            Err(ChartError::InvalidConfig(format!(
                "{field_name} must be finite pixels >= 0 or a ratio in [0, 1]"
            )))
        }
    }
}

/// Placement and shape of a donut chart inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnularLayout {
    #[serde(default = "default_center_ratio")]
    pub center_x_ratio: f64,
    #[serde(default = "default_center_ratio")]
    pub center_y_ratio: f64,
    pub inner_radius: RadiusSpec,
    pub outer_radius: RadiusSpec,
    /// Gap inserted after every non-zero arc.
    #[serde(default)]
    pub padding_angle_deg: f64,
    /// Where the first arc begins, counterclockwise from 3 o'clock.
    #[serde(default)]
    pub start_angle_deg: f64,
}

fn default_center_ratio() -> f64 {
    0.5
}

impl Default for AnnularLayout {
    fn default() -> Self {
        Self {
            center_x_ratio: 0.5,
            center_y_ratio: 0.5,
            inner_radius: RadiusSpec::Pixels(80.0),
            outer_radius: RadiusSpec::Pixels(120.0),
            padding_angle_deg: 5.0,
            start_angle_deg: 0.0,
        }
    }
}

impl AnnularLayout {
    pub fn validate(self) -> ChartResult<()> {
        for (name, ratio) in [
            ("center_x_ratio", self.center_x_ratio),
            ("center_y_ratio", self.center_y_ratio),
        ] {
            if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} must be finite and in [0, 1]"
                )));
            }
        }
        self.inner_radius.validate("inner_radius")?;
        self.outer_radius.validate("outer_radius")?;
        if !self.padding_angle_deg.is_finite() || !(0.0..360.0).contains(&self.padding_angle_deg) {
            return Err(ChartError::InvalidConfig(
                "padding_angle_deg must be finite and in [0, 360)".to_owned(),
            ));
        }
        if !self.start_angle_deg.is_finite() {
            return Err(ChartError::InvalidConfig(
                "start_angle_deg must be finite".to_owned(),
            ));
        }
        Ok(())
    }
}

/// What the projected ring represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnularState {
    Populated,
    /// Segments exist but all values are zero; a neutral ring is drawn.
    ZeroTotal,
    /// No segments were supplied; nothing is drawn.
    Empty,
}

/// One projected arc, in input order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcGeometry {
    pub index: usize,
    pub start_angle_deg: f64,
    pub sweep_deg: f64,
    pub value: f64,
}

impl ArcGeometry {
    #[must_use]
    pub fn mid_angle_deg(self) -> f64 {
        self.start_angle_deg + self.sweep_deg * 0.5
    }

    fn contains_angle(self, angle_deg: f64) -> bool {
        if self.sweep_deg <= 0.0 {
            return false;
        }
        let relative = normalize_degrees(angle_deg - self.start_angle_deg);
        relative < self.sweep_deg || self.sweep_deg >= 360.0
    }
}

/// Donut geometry resolved against a measured container size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnularGeometry {
    pub viewport: Viewport,
    pub cx: f64,
    pub cy: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Effective gap per non-zero arc after clamping.
    pub padding_angle_deg: f64,
    pub gap_count: usize,
    /// Sum of segment values, saturating at `f64::MAX`.
    pub total_value: f64,
    pub state: AnnularState,
    pub arcs: Vec<ArcGeometry>,
}

impl AnnularGeometry {
    #[must_use]
    pub fn total_sweep_deg(&self) -> f64 {
        self.arcs.iter().map(|arc| arc.sweep_deg).sum()
    }

    #[must_use]
    pub fn total_padding_deg(&self) -> f64 {
        self.padding_angle_deg * self.gap_count as f64
    }

    /// Index of the arc under `point`, `None` for the hole, the gaps and
    /// everything outside the ring.
    #[must_use]
    pub fn hit_test(&self, point: PixelPoint) -> Option<usize> {
        if self.state != AnnularState::Populated || !point.is_finite() {
            return None;
        }

        let dx = point.x - self.cx;
        let dy = self.cy - point.y;
        let distance = dx.hypot(dy);
        if distance < self.inner_radius || distance > self.outer_radius {
            return None;
        }

        let angle = normalize_degrees(dy.atan2(dx).to_degrees());
        self.arcs
            .iter()
            .find(|arc| arc.contains_angle(angle))
            .map(|arc| arc.index)
    }

    /// Point halfway through the arc, both angularly and radially.
    #[must_use]
    pub fn arc_anchor(&self, index: usize) -> Option<PixelPoint> {
        let arc = self.arcs.get(index)?;
        let radius = (self.inner_radius + self.outer_radius) * 0.5;
        let (x, y) = polar_to_pixel(self.cx, self.cy, radius, arc.mid_angle_deg());
        Some(PixelPoint::new(x, y))
    }
}

/// Lays out `segments` as consecutive arcs in input order.
///
/// Each non-zero arc is followed by a `padding_angle_deg` gap when at least
/// two arcs are non-zero. Arcs share what is left of the circle in proportion
/// to their values, so sweeps plus gaps always cover exactly 360 degrees.
pub fn project_annular_arcs(
    segments: &[DistributionSegment],
    layout: AnnularLayout,
    viewport: Viewport,
) -> ChartResult<AnnularGeometry> {
    if !viewport.is_valid() {
        return Err(ChartError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }
    layout.validate()?;
    for segment in segments {
        segment.validate()?;
    }

    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    let cx = width * layout.center_x_ratio;
    let cy = height * layout.center_y_ratio;
    let available_radius = cx.min(width - cx).min(cy).min(height - cy).max(0.0);
    let outer_radius = layout.outer_radius.resolve(available_radius).min(available_radius);
    let inner_radius = layout.inner_radius.resolve(available_radius).min(outer_radius);

    let total_value = distribution_total(segments).min(f64::MAX);
    let state = if segments.is_empty() {
        AnnularState::Empty
    } else if total_value <= 0.0 {
        AnnularState::ZeroTotal
    } else {
        AnnularState::Populated
    };

    let non_zero = segments.iter().filter(|segment| segment.value > 0.0).count();
    let gap_count = if non_zero >= 2 { non_zero } else { 0 };
    let padding_angle_deg = if gap_count == 0 {
        0.0
    } else {
        layout.padding_angle_deg.min(180.0 / gap_count as f64)
    };
    let sweep_budget = 360.0 - padding_angle_deg * gap_count as f64;

    // Shares relative to the largest value cannot overflow, unlike the raw total.
    let max_value = segments
        .iter()
        .map(|segment| segment.value)
        .fold(0.0_f64, f64::max);
    let share_total: f64 = if max_value > 0.0 {
        segments.iter().map(|segment| segment.value / max_value).sum()
    } else {
        0.0
    };

    let mut cursor = layout.start_angle_deg;
    let mut arcs = Vec::with_capacity(segments.len());
    for (index, segment) in segments.iter().enumerate() {
        let sweep_deg = if state == AnnularState::Populated {
            sweep_budget * (segment.value / max_value) / share_total
        } else {
            0.0
        };
        arcs.push(ArcGeometry {
            index,
            start_angle_deg: cursor,
            sweep_deg,
            value: segment.value,
        });
        cursor += sweep_deg;
        if segment.value > 0.0 && gap_count > 0 {
            cursor += padding_angle_deg;
        }
    }

    Ok(AnnularGeometry {
        viewport,
        cx,
        cy,
        inner_radius,
        outer_radius,
        padding_angle_deg,
        gap_count,
        total_value,
        state,
        arcs,
    })
}
