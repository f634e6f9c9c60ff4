//! Drawing surfaces the grid renderer emits into.
//!
//! The renderer never touches pixels. It calls a [`Surface`], which is either
//! the browser canvas ([`Canvas2dSurface`]) or a [`DrawList`] that records
//! commands for tests, export, and replay.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use web_sys::CanvasRenderingContext2d;

use crate::camera::Point;
use crate::geometry::{CURVE_TENSION, cardinal_to_bezier};

/// Stroke appearance for one draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// CSS color string.
    pub color: String,
    /// Stroke width in pixels.
    pub width: f64,
    /// Dash pattern in pixels; empty for a solid line.
    #[serde(default)]
    pub dash: Vec<f64>,
}

impl LineStyle {
    #[must_use]
    pub fn solid(color: impl Into<String>, width: f64) -> Self {
        Self { color: color.into(), width, dash: Vec::new() }
    }

    #[must_use]
    pub fn dashed(color: impl Into<String>, width: f64, dash: Vec<f64>) -> Self {
        Self { color: color.into(), width, dash }
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::solid("#3a5f8f", 1.0)
    }
}

/// Something grid lines can be drawn onto.
pub trait Surface {
    /// Straight segment from `a` to `b`.
    fn draw_line(&mut self, a: Point, b: Point, style: &LineStyle);

    /// Smooth open curve through every point.
    fn draw_curve(&mut self, points: &[Point], style: &LineStyle);

    /// Smooth closed curve through every point.
    fn draw_closed_curve(&mut self, points: &[Point], style: &LineStyle);

    /// Axis-aligned ellipse outline.
    fn draw_ellipse(&mut self, center: Point, rx: f64, ry: f64, style: &LineStyle);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Line { a: Point, b: Point, style: LineStyle },
    Curve { points: Vec<Point>, style: LineStyle },
    ClosedCurve { points: Vec<Point>, style: LineStyle },
    Ellipse { center: Point, rx: f64, ry: f64, style: LineStyle },
}

impl DrawCommand {
    /// Every canvas point this command touches.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        match self {
            Self::Line { a, b, .. } => vec![*a, *b],
            Self::Curve { points, .. } | Self::ClosedCurve { points, .. } => points.clone(),
            Self::Ellipse { center, .. } => vec![*center],
        }
    }
}

/// Surface that records commands instead of drawing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Serialize the recorded commands as JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; only non-finite numbers can trigger it.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Play the recorded commands onto another surface.
    pub fn replay(&self, target: &mut dyn Surface) {
        for command in &self.commands {
            match command {
                DrawCommand::Line { a, b, style } => target.draw_line(*a, *b, style),
                DrawCommand::Curve { points, style } => target.draw_curve(points, style),
                DrawCommand::ClosedCurve { points, style } => target.draw_closed_curve(points, style),
                DrawCommand::Ellipse { center, rx, ry, style } => target.draw_ellipse(*center, *rx, *ry, style),
            }
        }
    }
}

impl Surface for DrawList {
    fn draw_line(&mut self, a: Point, b: Point, style: &LineStyle) {
        self.commands.push(DrawCommand::Line { a, b, style: style.clone() });
    }

    fn draw_curve(&mut self, points: &[Point], style: &LineStyle) {
        self.commands.push(DrawCommand::Curve { points: points.to_vec(), style: style.clone() });
    }

    fn draw_closed_curve(&mut self, points: &[Point], style: &LineStyle) {
        self.commands.push(DrawCommand::ClosedCurve { points: points.to_vec(), style: style.clone() });
    }

    fn draw_ellipse(&mut self, center: Point, rx: f64, ry: f64, style: &LineStyle) {
        self.commands.push(DrawCommand::Ellipse { center, rx, ry, style: style.clone() });
    }
}

/// Surface over a browser 2D canvas context.
///
/// This is the only place in the crate that touches [`CanvasRenderingContext2d`].
/// Curves are drawn as Catmull-Rom splines converted to cubic Béziers.
pub struct Canvas2dSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> Canvas2dSurface<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn apply_style(&self, style: &LineStyle) {
        self.ctx.set_stroke_style_str(&style.color);
        self.ctx.set_line_width(style.width);
        let dash_array = js_sys::Array::new();
        for segment in &style.dash {
            dash_array.push(&(*segment).into());
        }
        // A rejected dash pattern leaves the previous one; the stroke itself still happens.
        if self.ctx.set_line_dash(&dash_array).is_err() {
            tracing::debug!("canvas rejected dash pattern");
        }
    }

    fn trace_spline(&self, points: &[Point], closed: bool) {
        let Some(first) = points.first() else {
            return;
        };
        self.ctx.move_to(first.x, first.y);
        for seg in cardinal_to_bezier(points, closed, CURVE_TENSION) {
            self.ctx.bezier_curve_to(seg.c1.x, seg.c1.y, seg.c2.x, seg.c2.y, seg.to.x, seg.to.y);
        }
        if closed {
            self.ctx.close_path();
        }
    }
}

impl Surface for Canvas2dSurface<'_> {
    fn draw_line(&mut self, a: Point, b: Point, style: &LineStyle) {
        self.ctx.save();
        self.apply_style(style);
        self.ctx.begin_path();
        self.ctx.move_to(a.x, a.y);
        self.ctx.line_to(b.x, b.y);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn draw_curve(&mut self, points: &[Point], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }
        self.ctx.save();
        self.apply_style(style);
        self.ctx.begin_path();
        self.trace_spline(points, false);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn draw_closed_curve(&mut self, points: &[Point], style: &LineStyle) {
        if points.len() < 3 {
            return;
        }
        self.ctx.save();
        self.apply_style(style);
        self.ctx.begin_path();
        self.trace_spline(points, true);
        self.ctx.stroke();
        self.ctx.restore();
    }

    fn draw_ellipse(&mut self, center: Point, rx: f64, ry: f64, style: &LineStyle) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        self.ctx.save();
        self.apply_style(style);
        self.ctx.begin_path();
        if self.ctx.ellipse(center.x, center.y, rx, ry, 0.0, 0.0, 2.0 * PI).is_ok() {
            self.ctx.stroke();
        }
        self.ctx.restore();
    }
}
