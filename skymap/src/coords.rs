//! Spherical coordinate types and the frame conversions grids are built on.
//!
//! All angles are in degrees. Horizontal azimuth is measured from north
//! through east and always normalized to `[0, 360)`.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use serde::{Deserialize, Serialize};

/// A direction in the observer's local sky.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalCoordinate {
    pub azimuth: f64,
    pub altitude: f64,
}

impl HorizontalCoordinate {
    /// Build a coordinate, wrapping azimuth into `[0, 360)` and clamping altitude to `[-90, 90]`.
    #[must_use]
    pub fn new(azimuth: f64, altitude: f64) -> Self {
        Self { azimuth: normalize_degrees_360(azimuth), altitude: altitude.clamp(-90.0, 90.0) }
    }

    /// The zenith (`altitude = 90`).
    #[must_use]
    pub fn zenith() -> Self {
        Self::new(0.0, 90.0)
    }

    /// The nadir (`altitude = -90`).
    #[must_use]
    pub fn nadir() -> Self {
        Self::new(0.0, -90.0)
    }
}

/// Right ascension / declination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquatorialCoordinate {
    pub ra: f64,
    pub dec: f64,
}

impl EquatorialCoordinate {
    #[must_use]
    pub fn new(ra: f64, dec: f64) -> Self {
        Self { ra: normalize_degrees_360(ra), dec: dec.clamp(-90.0, 90.0) }
    }
}

/// Ecliptic longitude / latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticCoordinate {
    pub lon: f64,
    pub lat: f64,
}

impl EclipticCoordinate {
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon: normalize_degrees_360(lon), lat: lat.clamp(-90.0, 90.0) }
    }
}

/// Observer context needed to relate the equatorial sky to the local horizon.
///
/// `sidereal_time` is the local sidereal time expressed in degrees. Computing it
/// from a clock is the job of the ephemeris layer, not this crate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub latitude: f64,
    pub sidereal_time: f64,
}

impl Observer {
    #[must_use]
    pub fn new(latitude: f64, sidereal_time: f64) -> Self {
        Self { latitude: latitude.clamp(-90.0, 90.0), sidereal_time: normalize_degrees_360(sidereal_time) }
    }

    /// Equatorial to horizontal for this observer.
    #[must_use]
    pub fn to_horizontal(&self, eq: EquatorialCoordinate) -> HorizontalCoordinate {
        let phi = self.latitude.to_radians();
        let dec = eq.dec.to_radians();
        let ha = (self.sidereal_time - eq.ra).to_radians();

        let sin_alt = phi.sin() * dec.sin() + phi.cos() * dec.cos() * ha.cos();
        let altitude = sin_alt.clamp(-1.0, 1.0).asin();
        let azimuth = (-dec.cos() * ha.sin()).atan2(dec.sin() * phi.cos() - dec.cos() * phi.sin() * ha.cos());

        HorizontalCoordinate::new(azimuth.to_degrees(), altitude.to_degrees())
    }

    /// Horizontal to equatorial for this observer.
    #[must_use]
    pub fn to_equatorial(&self, hor: HorizontalCoordinate) -> EquatorialCoordinate {
        let phi = self.latitude.to_radians();
        let alt = hor.altitude.to_radians();
        let az = hor.azimuth.to_radians();

        let sin_dec = phi.sin() * alt.sin() + phi.cos() * alt.cos() * az.cos();
        let dec = sin_dec.clamp(-1.0, 1.0).asin();
        let ha = (-az.sin() * alt.cos()).atan2(alt.sin() * phi.cos() - alt.cos() * phi.sin() * az.cos());

        EquatorialCoordinate::new(self.sidereal_time - ha.to_degrees(), dec.to_degrees())
    }
}

/// Ecliptic to equatorial for the given obliquity (degrees).
#[must_use]
pub fn ecliptic_to_equatorial(ecl: EclipticCoordinate, obliquity: f64) -> EquatorialCoordinate {
    let eps = obliquity.to_radians();
    let lon = ecl.lon.to_radians();
    let lat = ecl.lat.to_radians();

    let ra = (lon.sin() * eps.cos() - lat.tan() * eps.sin()).atan2(lon.cos());
    let dec = (lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin()).clamp(-1.0, 1.0).asin();

    EquatorialCoordinate::new(ra.to_degrees(), dec.to_degrees())
}

/// Equatorial to ecliptic for the given obliquity (degrees).
#[must_use]
pub fn equatorial_to_ecliptic(eq: EquatorialCoordinate, obliquity: f64) -> EclipticCoordinate {
    let eps = obliquity.to_radians();
    let ra = eq.ra.to_radians();
    let dec = eq.dec.to_radians();

    let lon = (ra.sin() * eps.cos() + dec.tan() * eps.sin()).atan2(ra.cos());
    let lat = (dec.sin() * eps.cos() - dec.cos() * eps.sin() * ra.sin()).clamp(-1.0, 1.0).asin();

    EclipticCoordinate::new(lon.to_degrees(), lat.to_degrees())
}

/// Great-circle separation between two horizontal directions, in degrees.
#[must_use]
pub fn angular_distance(a: HorizontalCoordinate, b: HorizontalCoordinate) -> f64 {
    let a1 = a.altitude.to_radians();
    let a2 = b.altitude.to_radians();
    let daz = (a.azimuth - b.azimuth).to_radians();
    let cos_sep = a1.sin() * a2.sin() + a1.cos() * a2.cos() * daz.cos();
    cos_sep.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Wrap an angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees_360(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest signed difference `current - start`, in `(-180, 180]`.
#[must_use]
pub fn signed_angle_delta_deg(current: f64, start: f64) -> f64 {
    let delta = current - start;
    if !delta.is_finite() {
        return 0.0;
    }
    let mut wrapped = delta.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped -= 360.0;
    }
    wrapped
}
