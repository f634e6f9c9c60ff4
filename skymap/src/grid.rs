//! Celestial grids: fixed lattices of points in a grid-native frame.
//!
//! A [`CelestialGrid`] stores `rows x columns` [`GridPoint`]s in row-major
//! order. Rows are parallels (constant latitude) and wrap in longitude;
//! columns are meridians (constant longitude) and stop short of the poles,
//! which are never stored as rows.
//!
//! The conversion between the grid's own coordinates and the observer's
//! horizon is injected as a [`GridFrame`]. The lattice never changes after
//! construction; the frame can be replaced between frames when its context
//! (for example sidereal time) moves on.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::fmt;

use crate::coords::{
    EclipticCoordinate, EquatorialCoordinate, HorizontalCoordinate, Observer, ecliptic_to_equatorial,
    equatorial_to_ecliptic, normalize_degrees_360,
};
use crate::error::SkyError;

/// Latitude steps of the standard grids (10°).
pub const STANDARD_ROWS: usize = 17;
/// Longitude steps of the standard grids (15°).
pub const STANDARD_COLUMNS: usize = 24;

/// One lattice node, in the grid's native coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub row_index: usize,
    pub column_index: usize,
}

impl GridPoint {
    /// A free-standing point that is not part of any lattice.
    #[must_use]
    pub fn detached(longitude: f64, latitude: f64) -> Self {
        Self { longitude: normalize_degrees_360(longitude), latitude, row_index: 0, column_index: 0 }
    }
}

/// Conversion between a grid's native frame and horizontal coordinates.
pub trait GridFrame {
    /// Where a grid point appears on the observer's sky.
    fn to_horizontal(&self, point: &GridPoint) -> HorizontalCoordinate;

    /// Grid-native coordinates of a horizontal direction.
    ///
    /// Only used to seed reference points, so it does not need to be exact.
    fn from_horizontal(&self, hor: HorizontalCoordinate) -> GridPoint;
}

/// The horizontal grid: azimuth/altitude map onto themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalFrame;

impl GridFrame for HorizontalFrame {
    fn to_horizontal(&self, point: &GridPoint) -> HorizontalCoordinate {
        HorizontalCoordinate::new(point.longitude, point.latitude)
    }

    fn from_horizontal(&self, hor: HorizontalCoordinate) -> GridPoint {
        GridPoint::detached(hor.azimuth, hor.altitude)
    }
}

/// The equatorial grid: right ascension / declination.
#[derive(Debug, Clone, Copy)]
pub struct EquatorialFrame {
    pub observer: Observer,
}

impl GridFrame for EquatorialFrame {
    fn to_horizontal(&self, point: &GridPoint) -> HorizontalCoordinate {
        self.observer.to_horizontal(EquatorialCoordinate::new(point.longitude, point.latitude))
    }

    fn from_horizontal(&self, hor: HorizontalCoordinate) -> GridPoint {
        let eq = self.observer.to_equatorial(hor);
        GridPoint::detached(eq.ra, eq.dec)
    }
}

/// The ecliptic grid: ecliptic longitude / latitude.
#[derive(Debug, Clone, Copy)]
pub struct EclipticFrame {
    pub observer: Observer,
    pub obliquity: f64,
}

impl GridFrame for EclipticFrame {
    fn to_horizontal(&self, point: &GridPoint) -> HorizontalCoordinate {
        let eq = ecliptic_to_equatorial(EclipticCoordinate::new(point.longitude, point.latitude), self.obliquity);
        self.observer.to_horizontal(eq)
    }

    fn from_horizontal(&self, hor: HorizontalCoordinate) -> GridPoint {
        let ecl = equatorial_to_ecliptic(self.observer.to_equatorial(hor), self.obliquity);
        GridPoint::detached(ecl.lon, ecl.lat)
    }
}

/// A frame built from two caller-supplied closures.
pub struct FnFrame<T, F>
where
    T: Fn(&GridPoint) -> HorizontalCoordinate,
    F: Fn(HorizontalCoordinate) -> GridPoint,
{
    to: T,
    from: F,
}

impl<T, F> FnFrame<T, F>
where
    T: Fn(&GridPoint) -> HorizontalCoordinate,
    F: Fn(HorizontalCoordinate) -> GridPoint,
{
    #[must_use]
    pub fn new(to: T, from: F) -> Self {
        Self { to, from }
    }
}

impl<T, F> GridFrame for FnFrame<T, F>
where
    T: Fn(&GridPoint) -> HorizontalCoordinate,
    F: Fn(HorizontalCoordinate) -> GridPoint,
{
    fn to_horizontal(&self, point: &GridPoint) -> HorizontalCoordinate {
        (self.to)(point)
    }

    fn from_horizontal(&self, hor: HorizontalCoordinate) -> GridPoint {
        (self.from)(hor)
    }
}

/// A fixed lattice of grid points plus its conversion frame.
pub struct CelestialGrid {
    name: String,
    rows: usize,
    columns: usize,
    points: Vec<GridPoint>,
    frame: Box<dyn GridFrame>,
}

impl fmt::Debug for CelestialGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CelestialGrid")
            .field("name", &self.name)
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl CelestialGrid {
    /// Build a lattice with evenly spaced latitudes strictly between the poles
    /// and evenly spaced longitudes starting at 0.
    ///
    /// # Errors
    ///
    /// Returns [`SkyError::InvalidGridShape`] for fewer than 2 rows or 3 columns.
    pub fn new(
        name: impl Into<String>,
        rows: usize,
        columns: usize,
        frame: impl GridFrame + 'static,
    ) -> Result<Self, SkyError> {
        if rows < 2 || columns < 3 {
            return Err(SkyError::InvalidGridShape { rows, columns });
        }
        Ok(Self::build(name.into(), rows, columns, Box::new(frame)))
    }

    /// Azimuth/altitude grid, 10° x 15°.
    #[must_use]
    pub fn horizontal() -> Self {
        Self::standard("horizontal", HorizontalFrame)
    }

    /// Right ascension/declination grid, 10° x 15°.
    #[must_use]
    pub fn equatorial(observer: Observer) -> Self {
        Self::standard("equatorial", EquatorialFrame { observer })
    }

    /// Ecliptic longitude/latitude grid, 10° x 15°.
    #[must_use]
    pub fn ecliptic(observer: Observer, obliquity: f64) -> Self {
        Self::standard("ecliptic", EclipticFrame { observer, obliquity })
    }

    fn standard(name: &str, frame: impl GridFrame + 'static) -> Self {
        Self::build(name.to_owned(), STANDARD_ROWS, STANDARD_COLUMNS, Box::new(frame))
    }

    #[allow(clippy::cast_precision_loss)]
    fn build(name: String, rows: usize, columns: usize, frame: Box<dyn GridFrame>) -> Self {
        let lat_step = 180.0 / (rows + 1) as f64;
        let lon_step = 360.0 / columns as f64;

        let mut points = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            let latitude = -90.0 + lat_step * (row + 1) as f64;
            for column in 0..columns {
                let longitude = lon_step * column as f64;
                points.push(GridPoint { longitude, latitude, row_index: row, column_index: column });
            }
        }

        Self { name, rows, columns, points, frame }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// All points, row-major.
    #[must_use]
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// The point at `(row, column)`, if in range.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<&GridPoint> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.points.get(row * self.columns + column)
    }

    /// Every point of parallel `row`, in column order. Empty when out of range.
    #[must_use]
    pub fn row(&self, row: usize) -> &[GridPoint] {
        if row >= self.rows {
            return &[];
        }
        &self.points[row * self.columns..(row + 1) * self.columns]
    }

    /// Every point of meridian `column`, in row order. Empty when out of range.
    #[must_use]
    pub fn column(&self, column: usize) -> Vec<GridPoint> {
        if column >= self.columns {
            return Vec::new();
        }
        self.points.iter().skip(column).step_by(self.columns).copied().collect()
    }

    /// The conversion frame.
    #[must_use]
    pub fn frame(&self) -> &dyn GridFrame {
        self.frame.as_ref()
    }

    /// Swap in a new conversion frame; the lattice is untouched.
    pub fn set_frame(&mut self, frame: impl GridFrame + 'static) {
        self.frame = Box::new(frame);
    }

    /// Horizontal coordinates of every point, row-major.
    #[must_use]
    pub fn to_horizontal_all(&self) -> Vec<HorizontalCoordinate> {
        self.points.iter().map(|p| self.frame.to_horizontal(p)).collect()
    }

    /// Latitude of row `row`.
    #[must_use]
    pub fn row_latitude(&self, row: usize) -> Option<f64> {
        self.get(row, 0).map(|p| p.latitude)
    }

    /// Longitude of column `column`.
    #[must_use]
    pub fn column_longitude(&self, column: usize) -> Option<f64> {
        self.get(0, column).map(|p| p.longitude)
    }
}
