//! Pure 2D helpers used by the projection and the grid renderer.
//!
//! None of these functions panic or divide by zero: degenerate inputs map to
//! a defined result (`0.0`, `None`, or an empty vector).

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;

/// Default cardinal spline tension; 0.5 is the Catmull-Rom curve.
pub const CURVE_TENSION: f64 = 0.5;

/// Angle in degrees at `origin` between the rays to `p1` and `p2`, in `[0, 180]`.
///
/// Returns `0.0` when either ray has zero length.
#[must_use]
pub fn angle_between_vectors(origin: Point, p1: Point, p2: Point) -> f64 {
    let (ax, ay) = (p1.x - origin.x, p1.y - origin.y);
    let (bx, by) = (p2.x - origin.x, p2.y - origin.y);
    let norms = ax.hypot(ay) * bx.hypot(by);
    if norms == 0.0 || !norms.is_finite() {
        return 0.0;
    }
    let cos = (ax * bx + ay * by) / norms;
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(p1: Point, p2: Point) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

/// Whether `p` lies outside the `[0, width] x [0, height]` canvas.
#[must_use]
pub fn is_out_of_screen(p: Point, width: f64, height: f64) -> bool {
    !(p.x >= 0.0 && p.x <= width && p.y >= 0.0 && p.y <= height)
}

/// Clip the segment `p1`–`p2` to the canvas rectangle (Liang–Barsky).
///
/// Returns the part of the segment inside `[0, width] x [0, height]`, ordered
/// from `p1` toward `p2`, or `None` when the segment misses the rectangle or has
/// zero length.
#[must_use]
pub fn line_rectangle_intersection(p1: Point, p2: Point, width: f64, height: f64) -> Option<(Point, Point)> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    if !(dx.is_finite() && dy.is_finite() && p1.is_finite()) || (dx == 0.0 && dy == 0.0) {
        return None;
    }

    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;
    let edges = [(-dx, p1.x), (dx, width - p1.x), (-dy, p1.y), (dy, height - p1.y)];
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: reject if outside it.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
    }
    if t_enter > t_exit {
        return None;
    }

    Some((
        Point::new(p1.x + t_enter * dx, p1.y + t_enter * dy),
        Point::new(p1.x + t_exit * dx, p1.y + t_exit * dy),
    ))
}

/// A circle in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// Least-squares (Kåsa) circle through a point set.
///
/// Returns `None` for fewer than three points or a degenerate (collinear)
/// configuration.
#[must_use]
pub fn fit_circle(points: &[Point]) -> Option<Circle> {
    if points.len() < 3 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

    // Work in centered coordinates to keep the normal equations well scaled.
    let (mut sxx, mut sxy, mut syy, mut sx, mut sy) = (0.0, 0.0, 0.0, 0.0, 0.0);
    let (mut sxz, mut syz, mut sz) = (0.0, 0.0, 0.0);
    for p in points {
        let x = p.x - mean_x;
        let y = p.y - mean_y;
        let z = x * x + y * y;
        sxx += x * x;
        sxy += x * y;
        syy += y * y;
        sx += x;
        sy += y;
        sxz += x * z;
        syz += y * z;
        sz += z;
    }

    let [d, e, f] = solve_linear_3x3([[sxx, sxy, sx], [sxy, syy, sy], [sx, sy, n]], [-sxz, -syz, -sz])?;
    let cx = -d * 0.5;
    let cy = -e * 0.5;
    let r_sq = cx * cx + cy * cy - f;
    if !(r_sq > 0.0 && r_sq.is_finite()) {
        return None;
    }
    Some(Circle { center: Point::new(cx + mean_x, cy + mean_y), radius: r_sq.sqrt() })
}

fn solve_linear_3x3(m: [[f64; 3]; 3], rhs: [f64; 3]) -> Option<[f64; 3]> {
    let det = det3(m);
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let mut out = [0.0; 3];
    for (col, slot) in out.iter_mut().enumerate() {
        let mut replaced = m;
        for (row, value) in rhs.iter().enumerate() {
            replaced[row][col] = *value;
        }
        *slot = det3(replaced) / det;
    }
    out.iter().all(|v| v.is_finite()).then_some(out)
}

fn det3(m: [[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// One cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bezier {
    pub from: Point,
    pub c1: Point,
    pub c2: Point,
    pub to: Point,
}

/// Convert a cardinal spline through `points` into cubic Bézier segments.
///
/// The spline passes through every input point. A closed curve gets one extra
/// segment joining the last point back to the first.
#[must_use]
pub fn cardinal_to_bezier(points: &[Point], closed: bool, tension: f64) -> Vec<Bezier> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let k = tension / 3.0;
    // Neighbor lookup: wraps for closed curves, repeats the end point otherwise.
    let at = |i: usize, offset: isize| -> Point {
        let idx = match (i.checked_add_signed(offset), closed) {
            (Some(j), true) => j % n,
            (Some(j), false) => j.min(n - 1),
            (None, true) => n - 1,
            (None, false) => 0,
        };
        points[idx]
    };

    let segments = if closed { n } else { n - 1 };
    (0..segments)
        .map(|i| {
            let (p0, p1, p2, p3) = (at(i, -1), at(i, 0), at(i, 1), at(i, 2));
            Bezier {
                from: p1,
                c1: Point::new(p1.x + (p2.x - p0.x) * k, p1.y + (p2.y - p0.y) * k),
                c2: Point::new(p2.x - (p3.x - p1.x) * k, p2.y - (p3.y - p1.y) * k),
                to: p2,
            }
        })
        .collect()
}

/// Split `items` into maximal runs of consecutive elements satisfying `keep`.
///
/// Elements failing the predicate act as separators and are dropped, as are
/// empty runs.
#[must_use]
pub fn split_runs<T: Copy>(items: &[T], keep: impl Fn(&T) -> bool) -> Vec<Vec<T>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for item in items {
        if keep(item) {
            current.push(*item);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
