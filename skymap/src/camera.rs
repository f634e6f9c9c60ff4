#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_VIEW_ANGLE, MIN_VIEW_ANGLE};
use crate::coords::HorizontalCoordinate;
use crate::error::SkyError;

/// A point in canvas pixel space: origin top-left, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Snapshot of the sky view for one render pass.
///
/// `view_angle` is the angular distance in degrees from the canvas center to
/// its left/right edge. `rho` rotates the canvas, in degrees.
///
/// The map component owns and mutates this between frames; the projection and
/// the grid renderer only ever read it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub width: u32,
    pub height: u32,
    pub center: HorizontalCoordinate,
    pub view_angle: f64,
    pub rho: f64,
}

impl ViewState {
    /// Create a validated view.
    ///
    /// # Errors
    ///
    /// Returns [`SkyError::InvalidViewport`] for a zero dimension and
    /// [`SkyError::InvalidViewAngle`] when `view_angle` is outside `(0, 180]`.
    pub fn new(width: u32, height: u32, center: HorizontalCoordinate, view_angle: f64) -> Result<Self, SkyError> {
        if width == 0 || height == 0 {
            return Err(SkyError::InvalidViewport { width, height });
        }
        if !view_angle.is_finite() || view_angle <= 0.0 || view_angle > MAX_VIEW_ANGLE {
            return Err(SkyError::InvalidViewAngle(view_angle));
        }
        Ok(Self { width, height, center, view_angle, rho: 0.0 })
    }

    /// Same view with the canvas rotated by `rho` degrees.
    #[must_use]
    pub fn with_rotation(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Canvas width as a float.
    #[must_use]
    pub fn width_px(&self) -> f64 {
        f64::from(self.width)
    }

    /// Canvas height as a float.
    #[must_use]
    pub fn height_px(&self) -> f64 {
        f64::from(self.height)
    }

    /// The pixel the view center projects to.
    #[must_use]
    pub fn canvas_center(&self) -> Point {
        Point::new(self.width_px() * 0.5, self.height_px() * 0.5)
    }

    /// Radius of the circle circumscribing the canvas.
    #[must_use]
    pub fn screen_radius(&self) -> f64 {
        self.width_px().hypot(self.height_px()) * 0.5
    }

    /// Pixels per degree of angular distance from the center.
    #[must_use]
    pub fn pixels_per_degree(&self) -> f64 {
        self.width_px() * 0.5 / self.view_angle
    }

    /// Multiply the view angle by `factor`, clamped to the supported range.
    pub fn zoom_by(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.view_angle = (self.view_angle * factor).clamp(MIN_VIEW_ANGLE, MAX_VIEW_ANGLE);
    }

    /// Move the view center; altitude stops at the poles.
    pub fn pan_by(&mut self, d_azimuth: f64, d_altitude: f64) {
        if !d_azimuth.is_finite() || !d_altitude.is_finite() {
            return;
        }
        self.center =
            HorizontalCoordinate::new(self.center.azimuth + d_azimuth, self.center.altitude + d_altitude);
    }

    /// Resize the canvas, ignoring zero dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }
}
