use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{
    GrowthPoint, TrendGeometry, TrendLayout, TrendMarkKind, Viewport, project_trend_marks,
    validate_growth_order,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendStyle {
    pub mark_color: Color,
    pub line_width: f64,
    pub point_size_px: f64,
    pub axis_color: Color,
    pub axis_line_width: f64,
    pub label_color: Color,
    pub label_font_size_px: f64,
    pub bar_corner_radius: f64,
}

impl Default for TrendStyle {
    fn default() -> Self {
        Self {
            mark_color: Color::rgb(1.0, 0.6, 0.0),
            line_width: 2.0,
            point_size_px: 6.0,
            axis_color: Color::rgba(1.0, 1.0, 1.0, 0.1),
            axis_line_width: 1.0,
            label_color: Color::rgba(1.0, 1.0, 1.0, 0.4),
            label_font_size_px: 10.0,
            bar_corner_radius: 4.0,
        }
    }
}

impl TrendStyle {
    pub fn validate(self) -> ChartResult<()> {
        self.mark_color.validate()?;
        self.axis_color.validate()?;
        self.label_color.validate()?;
        for (name, value) in [
            ("line_width", self.line_width),
            ("point_size_px", self.point_size_px),
            ("axis_line_width", self.axis_line_width),
            ("label_font_size_px", self.label_font_size_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        if !self.bar_corner_radius.is_finite() || self.bar_corner_radius < 0.0 {
            return Err(ChartError::InvalidData(
                "bar_corner_radius must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendChartConfig {
    pub container: Viewport,
    pub layout: TrendLayout,
}

impl TrendChartConfig {
    #[must_use]
    pub fn new(container: Viewport) -> Self {
        Self {
            container,
            layout: TrendLayout::default(),
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: TrendLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Year-over-year growth chart, one mark per point.
pub struct TrendChart<R: Renderer> {
    renderer: R,
    points: Vec<GrowthPoint>,
    config: TrendChartConfig,
    style: TrendStyle,
    geometry: TrendGeometry,
}

impl<R: Renderer> TrendChart<R> {
    pub fn new(renderer: R, points: Vec<GrowthPoint>, config: TrendChartConfig) -> ChartResult<Self> {
        validate_growth_order(&points)?;
        if points.is_empty() {
            warn!("trend chart has no points; rendering axes only");
        }
        let geometry = project_trend_marks(&points, config.layout, config.container)?;
        Ok(Self {
            renderer,
            points,
            config,
            style: TrendStyle::default(),
            geometry,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[GrowthPoint] {
        &self.points
    }

    #[must_use]
    pub fn config(&self) -> TrendChartConfig {
        self.config
    }

    #[must_use]
    pub fn geometry(&self) -> &TrendGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn style(&self) -> TrendStyle {
        self.style
    }

    pub fn set_style(&mut self, style: TrendStyle) -> ChartResult<()> {
        style.validate()?;
        self.style = style;
        Ok(())
    }

    pub fn set_points(&mut self, points: Vec<GrowthPoint>) -> ChartResult<()> {
        self.geometry = project_trend_marks(&points, self.config.layout, self.config.container)?;
        self.points = points;
        debug!(count = self.points.len(), "set growth points");
        Ok(())
    }

    pub fn set_mark_kind(&mut self, mark_kind: TrendMarkKind) -> ChartResult<()> {
        let layout = TrendLayout {
            mark_kind,
            ..self.config.layout
        };
        self.geometry = project_trend_marks(&self.points, layout, self.config.container)?;
        self.config.layout = layout;
        Ok(())
    }

    pub fn resize(&mut self, container: Viewport) -> ChartResult<()> {
        self.geometry = project_trend_marks(&self.points, self.config.layout, container)?;
        self.config.container = container;
        debug!(
            width = container.width,
            height = container.height,
            "resize trend chart"
        );
        Ok(())
    }

    pub fn build_render_frame(&self) -> ChartResult<RenderFrame> {
        let geometry = &self.geometry;
        let style = self.style;
        let plot = geometry.plot;
        let mut frame = RenderFrame::new(geometry.viewport);

        for tick in &geometry.value_ticks {
            frame.lines.push(LinePrimitive::new(
                plot.left,
                tick.y,
                plot.right,
                tick.y,
                style.axis_line_width,
                style.axis_color,
            ));
            frame.texts.push(TextPrimitive::new(
                format_axis_value(tick.value),
                plot.left - 6.0,
                tick.y - style.label_font_size_px * 0.5,
                style.label_font_size_px,
                style.label_color,
                TextHAlign::Right,
            ));
        }

        match self.config.layout.mark_kind {
            TrendMarkKind::Bar => {
                for mark in &geometry.marks {
                    frame.rects.push(
                        RectPrimitive::new(
                            mark.bar_left,
                            mark.value_y,
                            mark.bar_width,
                            mark.magnitude_px().max(0.0),
                            style.mark_color,
                        )
                        .with_corner_radius(style.bar_corner_radius),
                    );
                }
            }
            TrendMarkKind::Line => {
                for pair in geometry.marks.windows(2) {
                    frame.lines.push(LinePrimitive::new(
                        pair[0].center_x,
                        pair[0].value_y,
                        pair[1].center_x,
                        pair[1].value_y,
                        style.line_width,
                        style.mark_color,
                    ));
                }
                let half = style.point_size_px * 0.5;
                for mark in &geometry.marks {
                    frame.rects.push(
                        RectPrimitive::new(
                            mark.center_x - half,
                            mark.value_y - half,
                            style.point_size_px,
                            style.point_size_px,
                            style.mark_color,
                        )
                        .with_corner_radius(half),
                    );
                }
            }
        }

        for mark in &geometry.marks {
            frame.texts.push(TextPrimitive::new(
                mark.year.to_string(),
                mark.center_x,
                plot.bottom + 6.0,
                style.label_font_size_px,
                style.label_color,
                TextHAlign::Center,
            ));
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
}

fn format_axis_value(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
