use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::primitives::format_percent;
use crate::core::{
    AnnularGeometry, AnnularLayout, AnnularState, DistributionSegment, PixelPoint, Viewport,
    is_complete_distribution, project_annular_arcs,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{ChartInteractionState, HoverSource, TooltipState};
use crate::render::{
    ArcPrimitive, Color, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
};

/// Legend size used by the revenue card.
pub const DEFAULT_LEGEND_LEN: usize = 4;

/// Visual tokens for the donut card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionStyle {
    /// Ring drawn when every segment is zero.
    pub neutral_ring_color: Color,
    pub tooltip_background_color: Color,
    pub tooltip_border_color: Color,
    pub tooltip_border_width: f64,
    pub tooltip_corner_radius: f64,
    pub tooltip_text_color: Color,
    pub tooltip_font_size_px: f64,
    pub tooltip_padding_px: f64,
    /// Distance between the anchor point and the tooltip box.
    pub tooltip_offset_px: f64,
}

impl Default for DistributionStyle {
    fn default() -> Self {
        Self {
            neutral_ring_color: Color::rgba(1.0, 1.0, 1.0, 0.1),
            tooltip_background_color: Color::rgb(19.0 / 255.0, 25.0 / 255.0, 33.0 / 255.0),
            tooltip_border_color: Color::rgba(1.0, 1.0, 1.0, 0.1),
            tooltip_border_width: 1.0,
            tooltip_corner_radius: 12.0,
            tooltip_text_color: Color::WHITE,
            tooltip_font_size_px: 12.0,
            tooltip_padding_px: 10.0,
            tooltip_offset_px: 10.0,
        }
    }
}

impl DistributionStyle {
    pub fn validate(self) -> ChartResult<()> {
        for color in [
            self.neutral_ring_color,
            self.tooltip_background_color,
            self.tooltip_border_color,
            self.tooltip_text_color,
        ] {
            color.validate()?;
        }
        for (name, value) in [
            ("tooltip_border_width", self.tooltip_border_width),
            ("tooltip_corner_radius", self.tooltip_corner_radius),
            ("tooltip_padding_px", self.tooltip_padding_px),
            ("tooltip_offset_px", self.tooltip_offset_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        if !self.tooltip_font_size_px.is_finite() || self.tooltip_font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "tooltip_font_size_px must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionChartConfig {
    pub container: Viewport,
    pub layout: AnnularLayout,
    pub legend_len: usize,
}

impl DistributionChartConfig {
    #[must_use]
    pub fn new(container: Viewport) -> Self {
        Self {
            container,
            layout: AnnularLayout::default(),
            legend_len: DEFAULT_LEGEND_LEN,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: AnnularLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_legend_len(mut self, legend_len: usize) -> Self {
        self.legend_len = legend_len;
        self
    }
}

/// Tooltip content for the hovered or focused segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub segment_index: usize,
    pub name: String,
    pub value: f64,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Static swatch-plus-label legend row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub index: usize,
    pub name: String,
    pub value: f64,
    pub color: Color,
    pub label: String,
}

pub type Legend = SmallVec<[LegendEntry; DEFAULT_LEGEND_LEN]>;

/// Donut chart over a distribution dataset.
///
/// Geometry is recomputed from the measured container size on every
/// `resize`, so hit-testing always matches what was last drawn.
pub struct DistributionChart<R: Renderer> {
    renderer: R,
    segments: Vec<DistributionSegment>,
    config: DistributionChartConfig,
    style: DistributionStyle,
    geometry: AnnularGeometry,
    interaction: ChartInteractionState,
}

impl<R: Renderer> DistributionChart<R> {
    pub fn new(
        renderer: R,
        segments: Vec<DistributionSegment>,
        config: DistributionChartConfig,
    ) -> ChartResult<Self> {
        log_dataset_health(&segments);
        let geometry = project_annular_arcs(&segments, config.layout, config.container)?;
        Ok(Self {
            renderer,
            segments,
            config,
            style: DistributionStyle::default(),
            geometry,
            interaction: ChartInteractionState::default(),
        })
    }

    #[must_use]
    pub fn segments(&self) -> &[DistributionSegment] {
        &self.segments
    }

    #[must_use]
    pub fn config(&self) -> DistributionChartConfig {
        self.config
    }

    #[must_use]
    pub fn geometry(&self) -> &AnnularGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn container(&self) -> Viewport {
        self.config.container
    }

    #[must_use]
    pub fn style(&self) -> DistributionStyle {
        self.style
    }

    pub fn set_style(&mut self, style: DistributionStyle) -> ChartResult<()> {
        style.validate()?;
        self.style = style;
        Ok(())
    }

    /// Replaces the dataset and drops any tooltip.
    pub fn set_segments(&mut self, segments: Vec<DistributionSegment>) -> ChartResult<()> {
        log_dataset_health(&segments);
        self.geometry = project_annular_arcs(&segments, self.config.layout, self.config.container)?;
        self.segments = segments;
        self.interaction.clear();
        debug!(count = self.segments.len(), "set distribution segments");
        Ok(())
    }

    pub fn set_layout(&mut self, layout: AnnularLayout) -> ChartResult<()> {
        self.geometry = project_annular_arcs(&self.segments, layout, self.config.container)?;
        self.config.layout = layout;
        self.interaction.clear();
        Ok(())
    }

    /// Re-measures against a new container size.
    ///
    /// Pointer hover is dropped since its coordinates refer to the old
    /// geometry; a focused segment keeps its tooltip at the new anchor.
    pub fn resize(&mut self, container: Viewport) -> ChartResult<()> {
        self.geometry = project_annular_arcs(&self.segments, self.config.layout, container)?;
        self.config.container = container;
        debug!(
            width = container.width,
            height = container.height,
            outer_radius = self.geometry.outer_radius,
            "resize distribution chart"
        );

        let tooltip = self.interaction.tooltip();
        match (tooltip.source, tooltip.segment_index) {
            (Some(HoverSource::Focus), Some(index)) => {
                self.focus_segment(index)?;
            }
            _ => self.interaction.clear(),
        }
        Ok(())
    }

    /// Hit-tests the pointer and updates the tooltip. Returns the segment
    /// under the pointer.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<usize> {
        let hit = self.geometry.hit_test(PixelPoint::new(x, y));
        if self.interaction.on_pointer_move(x, y, hit) {
            trace!(?hit, "distribution hover changed");
        }
        hit
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.on_pointer_leave();
    }

    /// Shows the tooltip for `index` without a pointer, anchored mid-arc.
    pub fn focus_segment(&mut self, index: usize) -> ChartResult<()> {
        let anchor = self.geometry.arc_anchor(index).ok_or_else(|| {
            ChartError::InvalidData(format!(
                "segment index {index} out of range for {} segments",
                self.segments.len()
            ))
        })?;
        self.interaction.focus(index, anchor.x, anchor.y);
        Ok(())
    }

    pub fn blur(&mut self) {
        self.interaction.blur();
    }

    #[must_use]
    pub fn tooltip_state(&self) -> TooltipState {
        self.interaction.tooltip()
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<Tooltip> {
        let state = self.interaction.tooltip();
        if !state.visible {
            return None;
        }
        let index = state.segment_index?;
        let segment = self.segments.get(index)?;
        Some(Tooltip {
            segment_index: index,
            name: segment.name.clone(),
            value: segment.value,
            text: tooltip_text(segment),
            x: state.x,
            y: state.y,
        })
    }

    /// First `legend_len` segments in input order.
    #[must_use]
    pub fn legend(&self) -> Legend {
        self.segments
            .iter()
            .take(self.config.legend_len)
            .enumerate()
            .map(|(index, segment)| LegendEntry {
                index,
                name: segment.name.clone(),
                value: segment.value,
                color: segment.color,
                label: format!("{} ({})", segment.name, format_percent(segment.value)),
            })
            .collect()
    }

    pub fn build_render_frame(&self) -> ChartResult<RenderFrame> {
        let geometry = &self.geometry;
        let mut frame = RenderFrame::new(geometry.viewport);

        if geometry.state == AnnularState::ZeroTotal {
            frame.arcs.push(ArcPrimitive {
                cx: geometry.cx,
                cy: geometry.cy,
                inner_radius: geometry.inner_radius,
                outer_radius: geometry.outer_radius,
                start_angle_deg: 0.0,
                sweep_deg: 360.0,
                fill_color: self.style.neutral_ring_color,
            });
        }

        for (arc, segment) in geometry.arcs.iter().zip(&self.segments) {
            frame.arcs.push(ArcPrimitive {
                cx: geometry.cx,
                cy: geometry.cy,
                inner_radius: geometry.inner_radius,
                outer_radius: geometry.outer_radius,
                start_angle_deg: arc.start_angle_deg,
                sweep_deg: arc.sweep_deg.min(360.0),
                fill_color: segment.color,
            });
        }

        if let Some(tooltip) = self.tooltip() {
            self.push_tooltip(&mut frame, &tooltip);
        }

        Ok(frame)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn push_tooltip(&self, frame: &mut RenderFrame, tooltip: &Tooltip) {
        let style = self.style;
        let width = estimate_text_width(&tooltip.text, style.tooltip_font_size_px)
            + style.tooltip_padding_px * 2.0;
        let height = style.tooltip_font_size_px + style.tooltip_padding_px * 2.0;
        let viewport_width = f64::from(frame.viewport.width);
        let viewport_height = f64::from(frame.viewport.height);

        // Prefer below-right of the anchor, flip when that would clip.
        let mut x = tooltip.x + style.tooltip_offset_px;
        if x + width > viewport_width {
            x = tooltip.x - style.tooltip_offset_px - width;
        }
        let mut y = tooltip.y + style.tooltip_offset_px;
        if y + height > viewport_height {
            y = tooltip.y - style.tooltip_offset_px - height;
        }
        let x = x.clamp(0.0, (viewport_width - width).max(0.0));
        let y = y.clamp(0.0, (viewport_height - height).max(0.0));

        frame.rects.push(
            RectPrimitive::new(x, y, width, height, style.tooltip_background_color)
                .with_border(style.tooltip_border_width, style.tooltip_border_color)
                .with_corner_radius(style.tooltip_corner_radius),
        );
        frame.texts.push(TextPrimitive::new(
            tooltip.text.clone(),
            x + style.tooltip_padding_px,
            y + style.tooltip_padding_px,
            style.tooltip_font_size_px,
            style.tooltip_text_color,
            TextHAlign::Left,
        ));
    }
}

#[must_use]
pub fn tooltip_text(segment: &DistributionSegment) -> String {
    format!("{}: {}", segment.name, format_percent(segment.value))
}

fn estimate_text_width(text: &str, font_size_px: f64) -> f64 {
    text.chars().count() as f64 * font_size_px * 0.6
}

fn log_dataset_health(segments: &[DistributionSegment]) {
    if segments.is_empty() {
        warn!("distribution chart has no segments; rendering nothing");
    } else if segments.iter().all(|segment| segment.value == 0.0) {
        warn!(
            count = segments.len(),
            "distribution values sum to zero; rendering neutral ring"
        );
    } else if !is_complete_distribution(segments) {
        debug!(
            count = segments.len(),
            "distribution shares do not add up to 100"
        );
    }
}
