use plotters::prelude::{DrawingBackend, IntoFont, RGBAColor, SVGBackend, ShapeStyle};
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::core::primitives::polar_to_pixel;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ArcPrimitive, Color, LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign,
    TextPrimitive,
};

/// Largest angular step, in degrees, between two polygon vertices on an arc edge.
const ARC_STEP_DEG: f64 = 2.0;
const CORNER_STEPS: usize = 6;

type Coord = (i32, i32);

/// Serializes frames into standalone SVG documents through the plotters SVG backend.
///
/// The last document is kept so hosts can inline it into page markup.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "plotters-svg"
    }

    /// SVG markup produced by the last successful `render` call.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        let mut buffer = String::new();
        {
            let mut backend = SVGBackend::with_string(
                &mut buffer,
                (frame.viewport.width, frame.viewport.height),
            );
            for arc in &frame.arcs {
                draw_arc(&mut backend, *arc)?;
            }
            for rect in &frame.rects {
                draw_rect(&mut backend, *rect)?;
            }
            for line in &frame.lines {
                draw_line(&mut backend, *line)?;
            }
            for text in &frame.texts {
                draw_text(&mut backend, text)?;
            }
            backend.present().map_err(map_backend_error)?;
        }

        self.document = buffer;
        Ok(())
    }
}

fn draw_arc(backend: &mut SVGBackend<'_>, arc: ArcPrimitive) -> ChartResult<()> {
    if arc.sweep_deg <= 0.0 || arc.outer_radius <= 0.0 {
        return Ok(());
    }

    backend
        .fill_polygon(arc_outline(arc), &to_rgba(arc.fill_color))
        .map_err(map_backend_error)
}

/// Outer edge from start to end, then inner edge back, as one closed outline.
///
/// A full sweep yields a keyhole whose two edges wind in opposite directions,
/// so the hole stays unfilled.
fn arc_outline(arc: ArcPrimitive) -> Vec<Coord> {
    let steps = (arc.sweep_deg / ARC_STEP_DEG).ceil().max(1.0) as usize;
    let angle_at = |step: usize| arc.start_angle_deg + arc.sweep_deg * step as f64 / steps as f64;

    let mut outline = Vec::with_capacity(2 * (steps + 1));
    for step in 0..=steps {
        outline.push(to_coord(polar_to_pixel(
            arc.cx,
            arc.cy,
            arc.outer_radius,
            angle_at(step),
        )));
    }
    if arc.inner_radius > 0.0 {
        for step in (0..=steps).rev() {
            outline.push(to_coord(polar_to_pixel(
                arc.cx,
                arc.cy,
                arc.inner_radius,
                angle_at(step),
            )));
        }
    } else {
        outline.push(to_coord((arc.cx, arc.cy)));
    }
    outline
}

fn draw_rect(backend: &mut SVGBackend<'_>, rect: RectPrimitive) -> ChartResult<()> {
    let fill = to_rgba(rect.fill_color);
    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);

    if radius > 0.0 {
        let outline = rounded_rect_outline(rect, radius);
        backend
            .fill_polygon(outline.iter().copied(), &fill)
            .map_err(map_backend_error)?;
        if rect.border_width > 0.0 {
            let mut closed = outline;
            if let Some(first) = closed.first().copied() {
                closed.push(first);
            }
            backend
                .draw_path(closed, &stroke(rect.border_color, rect.border_width))
                .map_err(map_backend_error)?;
        }
        return Ok(());
    }

    let upper_left = to_coord((rect.x, rect.y));
    let bottom_right = to_coord((rect.x + rect.width, rect.y + rect.height));
    backend
        .draw_rect(upper_left, bottom_right, &fill, true)
        .map_err(map_backend_error)?;
    if rect.border_width > 0.0 {
        backend
            .draw_rect(
                upper_left,
                bottom_right,
                &stroke(rect.border_color, rect.border_width),
                false,
            )
            .map_err(map_backend_error)?;
    }
    Ok(())
}

fn rounded_rect_outline(rect: RectPrimitive, radius: f64) -> Vec<Coord> {
    let left = rect.x + radius;
    let right = rect.x + rect.width - radius;
    let top = rect.y + radius;
    let bottom = rect.y + rect.height - radius;

    // Corner centers with their starting angle, clockwise on screen from the top-right.
    let corners = [
        (right, top, -90.0_f64),
        (right, bottom, 0.0),
        (left, bottom, 90.0),
        (left, top, 180.0),
    ];

    let mut outline = Vec::with_capacity(corners.len() * (CORNER_STEPS + 1));
    for (cx, cy, start) in corners {
        for step in 0..=CORNER_STEPS {
            let angle = (start + 90.0 * step as f64 / CORNER_STEPS as f64).to_radians();
            outline.push(to_coord((
                cx + radius * angle.cos(),
                cy + radius * angle.sin(),
            )));
        }
    }
    outline
}

fn draw_line(backend: &mut SVGBackend<'_>, line: LinePrimitive) -> ChartResult<()> {
    backend
        .draw_line(
            to_coord((line.x1, line.y1)),
            to_coord((line.x2, line.y2)),
            &stroke(line.color, line.stroke_width),
        )
        .map_err(map_backend_error)
}

fn draw_text(backend: &mut SVGBackend<'_>, text: &TextPrimitive) -> ChartResult<()> {
    let h_pos = match text.h_align {
        TextHAlign::Left => HPos::Left,
        TextHAlign::Center => HPos::Center,
        TextHAlign::Right => HPos::Right,
    };
    let style = ("sans-serif", text.font_size_px)
        .into_font()
        .color(&to_rgba(text.color))
        .pos(Pos::new(h_pos, VPos::Top));

    backend
        .draw_text(&text.text, &style, to_coord((text.x, text.y)))
        .map_err(map_backend_error)
}

fn stroke(color: Color, width: f64) -> ShapeStyle {
    ShapeStyle {
        color: to_rgba(color),
        filled: false,
        stroke_width: width.round().max(1.0) as u32,
    }
}

fn to_rgba(color: Color) -> RGBAColor {
    RGBAColor(
        to_byte(color.red),
        to_byte(color.green),
        to_byte(color.blue),
        color.alpha,
    )
}

fn to_byte(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn to_coord((x, y): (f64, f64)) -> Coord {
    (x.round() as i32, y.round() as i32)
}

fn map_backend_error(err: impl std::fmt::Display) -> ChartError {
    ChartError::InvalidData(format!("failed to write svg document: {err}"))
}

#[cfg(test)]
mod tests {
    use super::{SvgRenderer, arc_outline};
    use crate::core::Viewport;
    use crate::render::{
        ArcPrimitive, Color, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
    };

    fn ring(sweep_deg: f64) -> ArcPrimitive {
        ArcPrimitive {
            cx: 100.0,
            cy: 100.0,
            inner_radius: 40.0,
            outer_radius: 60.0,
            start_angle_deg: 0.0,
            sweep_deg,
            fill_color: Color::WHITE,
        }
    }

    #[test]
    fn escapes_markup_in_labels() {
        let frame = RenderFrame::new(Viewport::new(200, 200)).with_text(TextPrimitive::new(
            "A & <B>",
            10.0,
            10.0,
            12.0,
            Color::WHITE,
            TextHAlign::Left,
        ));
        let mut renderer = SvgRenderer::new();
        renderer.render(&frame).expect("render");

        assert!(renderer.document().contains("A &amp; &lt;B&gt;"));
        assert!(!renderer.document().contains("<B>"));
    }

    #[test]
    fn zero_sweep_arcs_are_not_emitted() {
        let frame = RenderFrame::new(Viewport::new(200, 200)).with_arc(ring(0.0));
        let mut renderer = SvgRenderer::new();
        renderer.render(&frame).expect("render");
        assert!(!renderer.document().contains("<polygon"));
    }

    #[test]
    fn full_ring_outline_returns_to_its_start_on_both_edges() {
        let outline = arc_outline(ring(360.0));
        let half = outline.len() / 2;

        assert_eq!(outline.len() % 2, 0);
        assert_eq!(outline[0], outline[half - 1]);
        assert_eq!(outline[half], outline[outline.len() - 1]);
        assert_eq!(outline[0], (160, 100));
        assert_eq!(outline[half], (140, 100));
    }

    #[test]
    fn document_wraps_every_primitive_kind() {
        let frame = RenderFrame::new(Viewport::new(200, 200))
            .with_arc(ring(360.0))
            .with_rect(RectPrimitive::new(10.0, 10.0, 30.0, 20.0, Color::WHITE))
            .with_text(TextPrimitive::new(
                "AWS",
                10.0,
                10.0,
                12.0,
                Color::WHITE,
                TextHAlign::Left,
            ));
        let mut renderer = SvgRenderer::new();
        renderer.render(&frame).expect("render");
        let document = renderer.document();

        assert_eq!(renderer.backend_name(), "plotters-svg");
        assert!(document.starts_with("<svg"));
        assert_eq!(document.matches("<polygon").count(), 1);
        assert_eq!(document.matches("<rect").count(), 1);
        assert!(document.contains("AWS"));
        assert!(document.trim_end().ends_with("</svg>"));
    }
}
