//! Grid rendering: turns celestial grids into draw calls on a [`Surface`].
//!
//! For every meridian (column) and parallel (row) of a grid the renderer
//!
//! 1. marks points within `view_angle * VISIBILITY_MARGIN` of the view center,
//! 2. splits the line into maximal runs of visible points,
//! 3. joins the two runs that meet across the 0°/360° seam of a parallel,
//! 4. pads each run with one neighbor on each side (meridians reaching the
//!    last stored row are padded with the grid pole instead),
//! 5. projects the run plus two reference points that bound it at the
//!    canvas edges, and
//! 6. picks between nothing, a straight line, and a smooth curve.
//!
//! When no grid point at all is visible (deep zoom between grid lines), the
//! grid point closest to the view center seeds one row run and one column
//! run so the nearest lines still show.
//!
//! The renderer reads a [`ViewState`] snapshot and keeps no state between calls.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::{Point, ViewState};
use crate::consts::{
    FAR_ENDPOINT_RADII, FLAT_ARC_RATIO, MAX_CURVE_EXTENT_RADII, POLE_MARKER_RADIUS_PX, REFERENCE_LATITUDE_LIMIT,
    SHORT_RUN_MAX_POINTS, STRAIGHT_ANGLE_DEG, VISIBILITY_MARGIN,
};
use crate::coords::{HorizontalCoordinate, angular_distance};
use crate::geometry::{
    angle_between_vectors, distance, fit_circle, is_out_of_screen, line_rectangle_intersection, split_runs,
};
use crate::grid::{CelestialGrid, GridPoint};
use crate::projection::Projection;
use crate::surface::{LineStyle, Surface};

/// How one grid layer is drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridStyle {
    /// Style for every grid line.
    pub line: LineStyle,
    /// Alternate style for the latitude-0 parallel, if any.
    pub equator: Option<LineStyle>,
    /// Draw a small marker at each grid pole that is on screen.
    pub pole_markers: bool,
}

/// Counters for one render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Runs handed to the curve/line decision (closed circles included).
    pub runs: usize,
    pub lines: usize,
    pub curves: usize,
    pub closed_curves: usize,
    pub markers: usize,
    /// Runs that produced no draw call.
    pub skipped: usize,
}

impl RenderStats {
    /// Total draw calls emitted.
    #[must_use]
    pub fn draw_calls(&self) -> usize {
        self.lines + self.curves + self.closed_curves + self.markers
    }

    /// Add another render's counters to this one.
    pub fn merge(&mut self, other: RenderStats) {
        self.runs += other.runs;
        self.lines += other.lines;
        self.curves += other.curves;
        self.closed_curves += other.closed_curves;
        self.markers += other.markers;
        self.skipped += other.skipped;
    }
}

/// Outcome of the curve/line decision for one projected run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stroke {
    /// Nothing worth drawing.
    Skip,
    /// A straight segment.
    Line(Point, Point),
    /// A smooth curve through every run point.
    Curve,
}

/// Renders grids and outlines for one view snapshot.
#[derive(Debug, Clone, Copy)]
pub struct GridRenderer<'v> {
    view: &'v ViewState,
    projection: Projection<'v>,
}

impl<'v> GridRenderer<'v> {
    #[must_use]
    pub fn new(view: &'v ViewState) -> Self {
        Self { view, projection: Projection::new(view) }
    }

    /// Whether a direction is close enough to the view center to take part in a run.
    #[must_use]
    pub fn is_visible(&self, hor: HorizontalCoordinate) -> bool {
        angular_distance(hor, self.view.center) < self.view.view_angle * VISIBILITY_MARGIN
    }

    /// Draw every meridian and parallel of `grid`.
    pub fn render_grid(&self, grid: &CelestialGrid, style: &GridStyle, surface: &mut dyn Surface) -> RenderStats {
        let mut stats = RenderStats::default();
        let rows = grid.rows();
        let columns = grid.columns();
        let horizontal = grid.to_horizontal_all();
        let visible: Vec<bool> = horizontal.iter().map(|h| self.is_visible(*h)).collect();
        let seed = grid.frame().from_horizontal(self.view.center);
        let equator = equator_row(grid);

        let lines = GridLines { grid, horizontal: &horizontal, seed, style, equator };

        if !visible.contains(&true) {
            if let Some(closest) = self.closest_point(&horizontal) {
                let (row, column) = (closest / columns, closest % columns);
                tracing::debug!(grid = grid.name(), row, column, "no visible grid points; drawing nearest lines");
                self.draw_column_run(&lines, column, &[row], surface, &mut stats);
                self.draw_row_run(&lines, row, &[column], surface, &mut stats);
            }
        } else {
            let row_indices: Vec<usize> = (0..rows).collect();
            for column in 0..columns {
                for run in split_runs(&row_indices, |&row| visible[row * columns + column]) {
                    self.draw_column_run(&lines, column, &run, surface, &mut stats);
                }
            }

            let column_indices: Vec<usize> = (0..columns).collect();
            for row in 0..rows {
                let runs = split_runs(&column_indices, |&column| visible[row * columns + column]);
                if runs.len() == 1 && runs[0].len() == columns {
                    self.draw_full_row(&lines, row, surface, &mut stats);
                    continue;
                }
                for run in merge_wrapped_runs(runs, columns) {
                    self.draw_row_run(&lines, row, &run, surface, &mut stats);
                }
            }
        }

        if style.pole_markers {
            self.draw_pole_markers(grid, &style.line, surface, &mut stats);
        }
        stats
    }

    /// Draw an arbitrary polyline given in horizontal coordinates.
    ///
    /// A `closed` outline wraps from its last point back to its first. Runs
    /// that collapse to a straight line are drawn between their own end points
    /// clipped to the canvas.
    pub fn render_outline(
        &self,
        points: &[HorizontalCoordinate],
        closed: bool,
        style: &LineStyle,
        surface: &mut dyn Surface,
    ) -> RenderStats {
        let mut stats = RenderStats::default();
        let n = points.len();
        if n < 2 {
            return stats;
        }

        let indices: Vec<usize> = (0..n).collect();
        let mut runs = split_runs(&indices, |&i| self.is_visible(points[i]));

        if closed {
            if runs.len() == 1 && runs[0].len() == n && n >= 3 {
                let projected: Vec<Point> = points.iter().map(|h| self.projection.project(*h)).collect();
                self.emit_closed(&projected, style, surface, &mut stats);
                return stats;
            }
            runs = merge_wrapped_runs(runs, n);
        }

        for run in runs {
            let padded = if closed { pad_wrapping(&run, n) } else { pad_clamped(&run, n) };
            let projected: Vec<Point> = padded.iter().map(|&i| self.projection.project(points[i])).collect();
            let refs = match (projected.first(), projected.last()) {
                (Some(a), Some(b)) => self.bound_references(*a, *b),
                _ => None,
            };
            self.emit_run(&projected, refs, style, surface, &mut stats);
        }
        stats
    }

    /// Decide how a projected run should be drawn.
    ///
    /// `refs` bounds the run at the canvas edges and is used whenever the run
    /// is replaced by a straight line.
    #[must_use]
    pub fn decide_stroke(&self, points: &[Point], refs: Option<(Point, Point)>) -> Stroke {
        if points.iter().any(|p| !p.is_finite()) {
            return Stroke::Skip;
        }
        let (first, last) = match points {
            [] | [_] => return Stroke::Skip,
            [a, b] => return Stroke::Line(*a, *b),
            [first, .., last] => (*first, *last),
        };

        let origin = self.view.canvas_center();
        let radius = self.view.screen_radius();
        let as_line = || refs.map_or(Stroke::Skip, |(a, b)| Stroke::Line(a, b));

        if points.len() <= SHORT_RUN_MAX_POINTS {
            let far = radius * FAR_ENDPOINT_RADII;
            let first_far = distance(origin, first) > far;
            let last_far = distance(origin, last) > far;
            let middle = points[points.len() / 2];

            if angle_between_vectors(middle, first, last) > STRAIGHT_ANGLE_DEG && (first_far || last_far) {
                return as_line();
            }
            if first_far && last_far {
                let flat = fit_circle(points).map_or(true, |circle| circle.radius / radius > FLAT_ARC_RATIO);
                if flat {
                    return as_line();
                }
            }
        }

        let limit = radius * MAX_CURVE_EXTENT_RADII;
        if points.iter().all(|p| distance(origin, *p) < limit) { Stroke::Curve } else { Stroke::Skip }
    }

    fn draw_column_run(
        &self,
        lines: &GridLines<'_>,
        column: usize,
        run: &[usize],
        surface: &mut dyn Surface,
        stats: &mut RenderStats,
    ) {
        let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
            return;
        };
        let grid = lines.grid;
        let columns = grid.columns();
        let Some(longitude) = grid.column_longitude(column) else {
            return;
        };

        let mut projected = Vec::with_capacity(run.len() + 2);
        projected.push(if first > 0 {
            self.projection.project(lines.horizontal[(first - 1) * columns + column])
        } else {
            self.project_native(grid, longitude, -90.0)
        });
        projected.extend(run.iter().map(|&row| self.projection.project(lines.horizontal[row * columns + column])));
        projected.push(if last + 1 < grid.rows() {
            self.projection.project(lines.horizontal[(last + 1) * columns + column])
        } else {
            self.project_native(grid, longitude, 90.0)
        });

        let reach = self.view.view_angle * VISIBILITY_MARGIN;
        let lat_a = (lines.seed.latitude - reach).clamp(-REFERENCE_LATITUDE_LIMIT, REFERENCE_LATITUDE_LIMIT);
        let lat_b = (lines.seed.latitude + reach).clamp(-REFERENCE_LATITUDE_LIMIT, REFERENCE_LATITUDE_LIMIT);
        let refs =
            self.bound_references(self.project_native(grid, longitude, lat_a), self.project_native(grid, longitude, lat_b));

        self.emit_run(&projected, refs, &lines.style.line, surface, stats);
    }

    fn draw_row_run(
        &self,
        lines: &GridLines<'_>,
        row: usize,
        run: &[usize],
        surface: &mut dyn Surface,
        stats: &mut RenderStats,
    ) {
        let grid = lines.grid;
        let columns = grid.columns();
        let Some(latitude) = grid.row_latitude(row) else {
            return;
        };

        let projected: Vec<Point> = pad_wrapping(run, columns)
            .into_iter()
            .map(|column| self.projection.project(lines.horizontal[row * columns + column]))
            .collect();

        let reach = self.view.view_angle * VISIBILITY_MARGIN;
        let refs = self.bound_references(
            self.project_native(grid, lines.seed.longitude - reach, latitude),
            self.project_native(grid, lines.seed.longitude + reach, latitude),
        );

        self.emit_run(&projected, refs, lines.row_style(row), surface, stats);
    }

    fn draw_full_row(&self, lines: &GridLines<'_>, row: usize, surface: &mut dyn Surface, stats: &mut RenderStats) {
        let columns = lines.grid.columns();
        let projected: Vec<Point> =
            (0..columns).map(|column| self.projection.project(lines.horizontal[row * columns + column])).collect();
        self.emit_closed(&projected, lines.row_style(row), surface, stats);
    }

    fn draw_pole_markers(
        &self,
        grid: &CelestialGrid,
        style: &LineStyle,
        surface: &mut dyn Surface,
        stats: &mut RenderStats,
    ) {
        for latitude in [90.0, -90.0] {
            let pole = grid.frame().to_horizontal(&GridPoint::detached(0.0, latitude));
            if !self.is_visible(pole) {
                continue;
            }
            let p = self.projection.project(pole);
            if p.is_finite() && !is_out_of_screen(p, self.view.width_px(), self.view.height_px()) {
                surface.draw_ellipse(p, POLE_MARKER_RADIUS_PX, POLE_MARKER_RADIUS_PX, style);
                stats.markers += 1;
            }
        }
    }

    fn emit_run(
        &self,
        projected: &[Point],
        refs: Option<(Point, Point)>,
        style: &LineStyle,
        surface: &mut dyn Surface,
        stats: &mut RenderStats,
    ) {
        stats.runs += 1;
        match self.decide_stroke(projected, refs) {
            Stroke::Line(a, b) => {
                surface.draw_line(a, b, style);
                stats.lines += 1;
            }
            Stroke::Curve => {
                surface.draw_curve(projected, style);
                stats.curves += 1;
            }
            Stroke::Skip => {
                tracing::trace!(points = projected.len(), "grid run skipped");
                stats.skipped += 1;
            }
        }
    }

    fn emit_closed(&self, projected: &[Point], style: &LineStyle, surface: &mut dyn Surface, stats: &mut RenderStats) {
        stats.runs += 1;
        let origin = self.view.canvas_center();
        let limit = self.view.screen_radius() * MAX_CURVE_EXTENT_RADII;
        if projected.iter().all(|p| p.is_finite() && distance(origin, *p) < limit) {
            surface.draw_closed_curve(projected, style);
            stats.closed_curves += 1;
        } else {
            tracing::debug!(points = projected.len(), "closed grid line skipped: points out of range");
            stats.skipped += 1;
        }
    }

    /// Keep reference points that are on screen; clip the pair to the canvas otherwise.
    fn bound_references(&self, a: Point, b: Point) -> Option<(Point, Point)> {
        if !(a.is_finite() && b.is_finite()) {
            return None;
        }
        let (w, h) = (self.view.width_px(), self.view.height_px());
        if is_out_of_screen(a, w, h) || is_out_of_screen(b, w, h) {
            line_rectangle_intersection(a, b, w, h)
        } else {
            Some((a, b))
        }
    }

    fn project_native(&self, grid: &CelestialGrid, longitude: f64, latitude: f64) -> Point {
        self.projection.project(grid.frame().to_horizontal(&GridPoint::detached(longitude, latitude)))
    }

    fn closest_point(&self, horizontal: &[HorizontalCoordinate]) -> Option<usize> {
        horizontal
            .iter()
            .map(|h| angular_distance(*h, self.view.center))
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
    }
}

/// Per-grid context shared by the run drawers.
struct GridLines<'g> {
    grid: &'g CelestialGrid,
    horizontal: &'g [HorizontalCoordinate],
    seed: GridPoint,
    style: &'g GridStyle,
    equator: Option<usize>,
}

impl GridLines<'_> {
    fn row_style(&self, row: usize) -> &LineStyle {
        match (&self.style.equator, self.equator) {
            (Some(style), Some(equator)) if equator == row => style,
            _ => &self.style.line,
        }
    }
}

/// Join the run ending at the last index with the run starting at index 0.
///
/// Both touch the seam of a wrapping line, so together they are one
/// continuous stretch: `[22, 23]` and `[0, 1]` become `[22, 23, 0, 1]`.
#[must_use]
pub fn merge_wrapped_runs(mut runs: Vec<Vec<usize>>, len: usize) -> Vec<Vec<usize>> {
    if runs.len() < 2 || len == 0 {
        return runs;
    }
    let starts_at_seam = runs.first().and_then(|r| r.first()) == Some(&0);
    let ends_at_seam = runs.last().and_then(|r| r.last()) == Some(&(len - 1));
    if starts_at_seam && ends_at_seam {
        let head = runs.remove(0);
        if let Some(tail) = runs.last_mut() {
            tail.extend(head);
        }
    }
    runs
}

/// Pad a run on a wrapping line with its neighbor on each side.
#[must_use]
pub fn pad_wrapping(run: &[usize], len: usize) -> Vec<usize> {
    let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
        return Vec::new();
    };
    if len == 0 {
        return Vec::new();
    }
    let mut padded = Vec::with_capacity(run.len() + 2);
    padded.push((first + len - 1) % len);
    padded.extend_from_slice(run);
    padded.push((last + 1) % len);
    padded
}

/// Pad a run on a non-wrapping line with whichever neighbors exist.
#[must_use]
pub fn pad_clamped(run: &[usize], len: usize) -> Vec<usize> {
    let (Some(&first), Some(&last)) = (run.first(), run.last()) else {
        return Vec::new();
    };
    let mut padded = Vec::with_capacity(run.len() + 2);
    if first > 0 {
        padded.push(first - 1);
    }
    padded.extend_from_slice(run);
    if last + 1 < len {
        padded.push(last + 1);
    }
    padded
}

/// The row lying on latitude 0, if the grid has one.
fn equator_row(grid: &CelestialGrid) -> Option<usize> {
    (0..grid.rows()).find(|&row| grid.row_latitude(row).is_some_and(|lat| lat.abs() < 1e-9))
}
