//! Zenith-equidistant (ARC) projection between the horizontal sky and the canvas.
//!
//! Angular distance from the view center maps linearly to pixel distance from
//! the canvas center (AIPS Memo 27). The forward mapping is closed-form. The
//! closed-form inverse only recovers the azimuth branch nearest the view
//! center, so points past the ±90° azimuth edge, and every point of a
//! zenith/nadir view, go through a bounded iterative correction.
//!
//! A [`Projection`] borrows a [`ViewState`] snapshot and holds nothing else.

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;

use crate::camera::{Point, ViewState};
use crate::consts::{CORRECTION_MAX_ITERATIONS, CORRECTION_TOLERANCE_PX, POLE_TOLERANCE_DEG};
use crate::coords::HorizontalCoordinate;
use crate::geometry::{angle_between_vectors, distance};

/// ARC projection bound to one view snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Projection<'v> {
    view: &'v ViewState,
}

/// Which branch of the inverse produced a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverseBranch {
    /// The closed-form result was trusted as-is.
    ClosedForm,
    /// The correction pass converged within the pixel tolerance.
    Corrected { iterations: usize },
    /// The correction pass missed; the azimuth came from the exact altitude instead.
    Refined,
    /// Nothing reached the pixel tolerance; best estimate returned.
    BestEffort,
}

impl<'v> Projection<'v> {
    #[must_use]
    pub fn new(view: &'v ViewState) -> Self {
        Self { view }
    }

    /// The view this projection reads.
    #[must_use]
    pub fn view(&self) -> &'v ViewState {
        self.view
    }

    /// Map a horizontal coordinate to a canvas point.
    ///
    /// The view center, and any point whose angular distance cannot be
    /// computed, maps to the canvas center.
    #[must_use]
    pub fn project(&self, hor: HorizontalCoordinate) -> Point {
        let view = self.view;
        let d = hor.altitude.to_radians();
        let d0 = view.center.altitude.to_radians();
        let da = (hor.azimuth - view.center.azimuth).to_radians();

        let (sin_d, cos_d) = d.sin_cos();
        let (sin_d0, cos_d0) = d0.sin_cos();
        let (sin_da, cos_da) = da.sin_cos();

        let theta = (sin_d * sin_d0 + cos_d * cos_d0 * cos_da).clamp(-1.0, 1.0).acos();
        if theta == 0.0 || theta.is_nan() {
            return view.canvas_center();
        }

        let k = theta / theta.sin();
        let l = k * cos_d * sin_da;
        let m = k * (sin_d * cos_d0 - cos_d * sin_d0 * cos_da);

        let (sin_rho, cos_rho) = view.rho.to_radians().sin_cos();
        let x = l * cos_rho + m * sin_rho;
        let y = -l * sin_rho + m * cos_rho;

        let scale = view.pixels_per_degree();
        let center = view.canvas_center();
        Point::new(center.x + x.to_degrees() * scale, center.y - y.to_degrees() * scale)
    }

    /// Map a canvas point back to a horizontal coordinate.
    #[must_use]
    pub fn invert(&self, p: Point) -> HorizontalCoordinate {
        self.invert_with_branch(p).0
    }

    /// Like [`Projection::invert`], also reporting how the result was obtained.
    #[must_use]
    pub fn invert_with_branch(&self, p: Point) -> (HorizontalCoordinate, InverseBranch) {
        let closed = self.invert_closed_form(p);
        self.correct_inverse(p, closed)
    }

    /// Closed-form ARC inverse; exact only within 90° of azimuth from the center.
    fn invert_closed_form(&self, p: Point) -> ClosedFormInverse {
        let view = self.view;
        let (l, m) = self.native_offset(p);

        let theta = l.hypot(m);
        if theta == 0.0 || !theta.is_finite() {
            return ClosedFormInverse { approx: view.center, exact_azimuth: view.center.azimuth };
        }

        let d0 = view.center.altitude.to_radians();
        let (sin_d0, cos_d0) = d0.sin_cos();
        let sinc = theta.sin() / theta;

        let altitude = (m * cos_d0 * sinc + sin_d0 * theta.cos()).clamp(-1.0, 1.0).asin();
        let num = l * sinc;
        let den = cos_d0 * theta.cos() - m * sin_d0 * sinc;
        // Single-argument arctangent: the principal branch within ±90° of the center.
        let d_azimuth = if den == 0.0 { std::f64::consts::FRAC_PI_2.copysign(num) } else { (num / den).atan() };

        ClosedFormInverse {
            approx: HorizontalCoordinate::new(view.center.azimuth + d_azimuth.to_degrees(), altitude.to_degrees()),
            exact_azimuth: view.center.azimuth + num.atan2(den).to_degrees(),
        }
    }

    /// Canvas offset from the center in radians, with the canvas rotation undone.
    fn native_offset(&self, p: Point) -> (f64, f64) {
        let view = self.view;
        let scale = view.pixels_per_degree();
        let center = view.canvas_center();

        let x = ((p.x - center.x) / scale).to_radians();
        let y = ((center.y - p.y) / scale).to_radians();
        let (sin_rho, cos_rho) = view.rho.to_radians().sin_cos();
        (x * cos_rho - y * sin_rho, x * sin_rho + y * cos_rho)
    }

    /// Canvas point rotated about the center as if the view had no rotation.
    fn unrotate(&self, p: Point) -> Point {
        let center = self.view.canvas_center();
        let dx = p.x - center.x;
        let dy = center.y - p.y;
        let (sin_rho, cos_rho) = self.view.rho.to_radians().sin_cos();
        Point::new(center.x + dx * cos_rho - dy * sin_rho, center.y - (dx * sin_rho + dy * cos_rho))
    }

    /// Forward projection into the unrotated canvas frame.
    fn project_unrotated(&self, hor: HorizontalCoordinate) -> Point {
        self.unrotate(self.project(hor))
    }

    /// Detect a wrong-branch inverse and refine its azimuth.
    ///
    /// Keeps the altitude of the closed form and searches the azimuth on the
    /// far side of the ±90° edge. The search is seeded from the screen angle
    /// the point makes with the two edge points as seen from the visible pole,
    /// then rescaled by chord-length ratios against the nearer edge. The
    /// candidate closest to `p` on screen wins. Every screen comparison runs in
    /// the unrotated canvas frame; rotation preserves distances and angles.
    ///
    /// Far from the center the chord ratios stop converging. The altitude is
    /// exact, so the two-argument azimuth is tried before giving up.
    fn correct_inverse(&self, p: Point, closed: ClosedFormInverse) -> (HorizontalCoordinate, InverseBranch) {
        let view = self.view;
        let approx = closed.approx;
        let origin = view.canvas_center();
        let center_az = view.center.azimuth;
        let target = self.unrotate(p);

        let p_left = self.project_unrotated(HorizontalCoordinate::new(center_az - 90.0, approx.altitude));
        let p_right = self.project_unrotated(HorizontalCoordinate::new(center_az + 90.0, approx.altitude));
        let p_edge = if target.x < origin.x { p_left } else { p_right };

        let pole_view = is_pole_view(view.center.altitude);
        if !pole_view && distance(origin, target) <= distance(origin, p_edge) {
            return (approx, InverseBranch::ClosedForm);
        }

        let looking_up = view.center.altitude >= 0.0;
        let pole = self
            .project_unrotated(if looking_up { HorizontalCoordinate::zenith() } else { HorizontalCoordinate::nadir() });

        let angle_whole = 360.0 - angle_between_vectors(pole, p_left, p_right);
        let angle_left = angle_between_vectors(pole, target, p_left);
        let angle_right = angle_between_vectors(pole, target, p_right);

        let (shift_sign, p_near) = if angle_left < angle_right { (-1.0, p_left) } else { (1.0, p_right) };

        // Looking straight at a pole, points on the far side of it sweep the
        // azimuth the other way.
        let pole_fix = if pole_view && ((looking_up && pole.y < target.y) || (!looking_up && pole.y > target.y)) {
            -1.0
        } else {
            1.0
        };

        let mut azimuth_shift =
            if angle_whole > 0.0 { angle_left.min(angle_right) / angle_whole * 180.0 } else { 0.0 };

        let mut best = approx;
        let mut best_error = distance(self.project_unrotated(approx), target);
        let dist_original = distance(target, p_near);

        for iteration in 1..=CORRECTION_MAX_ITERATIONS {
            let candidate = HorizontalCoordinate::new(
                center_az + shift_sign * 90.0 + pole_fix * shift_sign * azimuth_shift,
                approx.altitude,
            );
            let p_candidate = self.project_unrotated(candidate);
            let error = distance(p_candidate, target);
            if error < best_error {
                best = candidate;
                best_error = error;
            }
            if error <= CORRECTION_TOLERANCE_PX {
                return (candidate, InverseBranch::Corrected { iterations: iteration });
            }

            let dist_corrected = distance(p_candidate, p_near);
            // A candidate landing on the edge gives no scale information.
            if dist_corrected == 0.0 || !dist_corrected.is_finite() {
                break;
            }
            azimuth_shift *= dist_original / dist_corrected;
        }

        if best_error <= CORRECTION_TOLERANCE_PX {
            return (best, InverseBranch::Corrected { iterations: CORRECTION_MAX_ITERATIONS });
        }

        let refined = HorizontalCoordinate::new(closed.exact_azimuth, approx.altitude);
        let refined_error = distance(self.project_unrotated(refined), target);
        if refined_error <= CORRECTION_TOLERANCE_PX {
            return (refined, InverseBranch::Refined);
        }
        if refined_error < best_error {
            best = refined;
            best_error = refined_error;
        }
        tracing::trace!(x = p.x, y = p.y, error_px = best_error, "inverse correction did not converge");
        (best, InverseBranch::BestEffort)
    }
}

/// Closed-form inverse result plus the two-argument azimuth used as a fallback.
struct ClosedFormInverse {
    approx: HorizontalCoordinate,
    exact_azimuth: f64,
}

fn is_pole_view(center_altitude: f64) -> bool {
    (center_altitude.abs() - 90.0).abs() <= POLE_TOLERANCE_DEG
}
