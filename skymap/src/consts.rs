//! Shared numeric constants for the sky map crate.

// ── Visibility ──────────────────────────────────────────────────

/// Grid points within `view_angle * VISIBILITY_MARGIN` of the view center count
/// as visible, so lines entering or leaving the view stay smooth at the edges.
pub const VISIBILITY_MARGIN: f64 = 1.2;

/// Reference points used to bound a meridian run never go past this latitude.
pub const REFERENCE_LATITUDE_LIMIT: f64 = 80.0;

// ── Inverse projection correction ───────────────────────────────

/// Upper bound on refinement passes in the inverse-projection correction.
pub const CORRECTION_MAX_ITERATIONS: usize = 5;

/// A corrected point within this many pixels of the input point is accepted.
pub const CORRECTION_TOLERANCE_PX: f64 = 2.0;

/// Center altitudes within this many degrees of ±90 are treated as a pole view.
pub const POLE_TOLERANCE_DEG: f64 = 1e-6;

// ── Curve / line heuristic ──────────────────────────────────────

/// Midpoint angle (degrees) above which a short run counts as straight.
pub const STRAIGHT_ANGLE_DEG: f64 = 179.0;

/// Run endpoints farther than this many screen radii are "far away".
pub const FAR_ENDPOINT_RADII: f64 = 2.0;

/// Fitted circle radius / screen radius above which an arc is drawn as a line.
pub const FLAT_ARC_RATIO: f64 = 60.0;

/// Curves with any point beyond this many screen radii are not drawn.
pub const MAX_CURVE_EXTENT_RADII: f64 = 60.0;

/// Runs with at most this many points are candidates for the straight-line test.
pub const SHORT_RUN_MAX_POINTS: usize = 5;

// ── View limits ─────────────────────────────────────────────────

/// Narrowest view angle in degrees (about 36 arcseconds).
pub const MIN_VIEW_ANGLE: f64 = 0.01;

/// Widest view angle in degrees.
pub const MAX_VIEW_ANGLE: f64 = 180.0;

/// Multiplicative view-angle step for one wheel notch.
pub const ZOOM_STEP: f64 = 1.1;

/// Fraction of the view angle panned by one arrow key press.
pub const KEY_PAN_FRACTION: f64 = 0.1;

// ── Markers ─────────────────────────────────────────────────────

/// Radius in pixels of the marker drawn at a grid pole.
pub const POLE_MARKER_RADIUS_PX: f64 = 4.0;

/// Mean obliquity of the ecliptic at J2000, in degrees.
pub const J2000_OBLIQUITY_DEG: f64 = 23.439_291_1;
