//! Sky map configuration.
//!
//! Loaded from JSON with every field defaulted, then optionally overridden
//! from `SKYMAP_*` environment variables. Validation happens when the config
//! is turned into runtime types ([`SkyConfig::view_state`]).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::camera::ViewState;
use crate::consts::J2000_OBLIQUITY_DEG;
use crate::coords::{HorizontalCoordinate, Observer};
use crate::error::SkyError;
use crate::grid::CelestialGrid;
use crate::render::GridStyle;
use crate::surface::LineStyle;

pub const ENV_WIDTH: &str = "SKYMAP_WIDTH";
pub const ENV_HEIGHT: &str = "SKYMAP_HEIGHT";
pub const ENV_VIEW_ANGLE: &str = "SKYMAP_VIEW_ANGLE";
pub const ENV_LATITUDE: &str = "SKYMAP_LATITUDE";
pub const ENV_SIDEREAL_TIME: &str = "SKYMAP_SIDEREAL_TIME";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub view: ViewConfig,
    pub observer: ObserverConfig,
    pub ecliptic_obliquity: f64,
    pub grids: GridsConfig,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            observer: ObserverConfig::default(),
            ecliptic_obliquity: J2000_OBLIQUITY_DEG,
            grids: GridsConfig::default(),
        }
    }
}

/// Initial view parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub width: u32,
    pub height: u32,
    pub azimuth: f64,
    pub altitude: f64,
    pub view_angle: f64,
    pub rotation: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { width: 800, height: 450, azimuth: 180.0, altitude: 30.0, view_angle: 90.0, rotation: 0.0 }
    }
}

/// Observer location and time, as needed by the equatorial and ecliptic grids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Geographic latitude in degrees.
    pub latitude: f64,
    /// Local sidereal time in degrees.
    pub sidereal_time: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self { latitude: 50.0, sidereal_time: 0.0 }
    }
}

/// Settings for one grid layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayerConfig {
    pub enabled: bool,
    pub color: String,
    pub width: f64,
    /// Highlight color for the latitude-0 line; `None` draws it like the others.
    pub equator_color: Option<String>,
    pub pole_markers: bool,
    /// Dash pattern in pixels; empty draws solid lines.
    pub dash: Vec<f64>,
}

impl GridLayerConfig {
    fn new(enabled: bool, color: &str, equator_color: Option<&str>) -> Self {
        Self {
            enabled,
            color: color.to_owned(),
            width: 1.0,
            equator_color: equator_color.map(str::to_owned),
            pole_markers: false,
            dash: Vec::new(),
        }
    }

    fn dashed(mut self, dash: &[f64]) -> Self {
        self.dash = dash.to_vec();
        self
    }

    /// Line styles for this layer. The dash pattern applies to the grid lines, not the equator.
    #[must_use]
    pub fn style(&self) -> GridStyle {
        let line = if self.dash.is_empty() {
            LineStyle::solid(self.color.clone(), self.width)
        } else {
            LineStyle::dashed(self.color.clone(), self.width, self.dash.clone())
        };
        GridStyle {
            line,
            equator: self.equator_color.as_ref().map(|color| LineStyle::solid(color.clone(), self.width * 1.5)),
            pole_markers: self.pole_markers,
        }
    }
}

impl Default for GridLayerConfig {
    fn default() -> Self {
        Self::new(true, "#3a5f8f", None)
    }
}

/// The three built-in grid layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridsConfig {
    pub horizontal: GridLayerConfig,
    pub equatorial: GridLayerConfig,
    pub ecliptic: GridLayerConfig,
}

impl Default for GridsConfig {
    fn default() -> Self {
        Self {
            horizontal: GridLayerConfig::new(true, "#2f6f4f", Some("#6fbf8f")),
            equatorial: GridLayerConfig::new(false, "#3a5f8f", Some("#7fa7df")),
            ecliptic: GridLayerConfig::new(false, "#8f7a3a", None).dashed(&[6.0, 4.0]),
        }
    }
}

/// Which observer-dependent frame a layer's grid uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Horizontal,
    /// Rebuilt from the observer whenever it moves.
    Equatorial,
    /// Rebuilt from the observer and obliquity whenever the observer moves.
    Ecliptic,
    /// Caller-supplied frame; never touched by observer updates.
    Custom,
}

/// A grid ready to render, with its style.
#[derive(Debug)]
pub struct GridLayer {
    pub kind: LayerKind,
    pub grid: CelestialGrid,
    pub style: GridStyle,
}

impl SkyConfig {
    /// Parse a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SkyError::Config`] for malformed JSON and the
    /// [`ViewState::new`] errors for an unusable view.
    pub fn from_json(json: &str) -> Result<Self, SkyError> {
        let config: Self = serde_json::from_str(json)?;
        config.view_state()?;
        Ok(config)
    }

    /// Apply `SKYMAP_*` environment variables on top of the current values.
    ///
    /// # Errors
    ///
    /// Returns [`SkyError::InvalidSetting`] for a variable that does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), SkyError> {
        self.apply_overrides(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Apply overrides from any key lookup, using the `SKYMAP_*` key names.
    ///
    /// # Errors
    ///
    /// Returns [`SkyError::InvalidSetting`] for a value that does not parse.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), SkyError> {
        override_value(&lookup, ENV_WIDTH, &mut self.view.width)?;
        override_value(&lookup, ENV_HEIGHT, &mut self.view.height)?;
        override_value(&lookup, ENV_VIEW_ANGLE, &mut self.view.view_angle)?;
        override_value(&lookup, ENV_LATITUDE, &mut self.observer.latitude)?;
        override_value(&lookup, ENV_SIDEREAL_TIME, &mut self.observer.sidereal_time)?;
        Ok(())
    }

    /// The configured view.
    ///
    /// # Errors
    ///
    /// Returns the [`ViewState::new`] validation errors.
    pub fn view_state(&self) -> Result<ViewState, SkyError> {
        let v = &self.view;
        let center = HorizontalCoordinate::new(v.azimuth, v.altitude);
        Ok(ViewState::new(v.width, v.height, center, v.view_angle)?.with_rotation(v.rotation))
    }

    #[must_use]
    pub fn observer(&self) -> Observer {
        Observer::new(self.observer.latitude, self.observer.sidereal_time)
    }

    /// Build every enabled grid layer, in drawing order.
    #[must_use]
    pub fn grid_layers(&self) -> Vec<GridLayer> {
        let observer = self.observer();
        let mut layers = Vec::new();
        if self.grids.equatorial.enabled {
            layers.push(GridLayer {
                kind: LayerKind::Equatorial,
                grid: CelestialGrid::equatorial(observer),
                style: self.grids.equatorial.style(),
            });
        }
        if self.grids.ecliptic.enabled {
            layers.push(GridLayer {
                kind: LayerKind::Ecliptic,
                grid: CelestialGrid::ecliptic(observer, self.ecliptic_obliquity),
                style: self.grids.ecliptic.style(),
            });
        }
        if self.grids.horizontal.enabled {
            layers.push(GridLayer {
                kind: LayerKind::Horizontal,
                grid: CelestialGrid::horizontal(),
                style: self.grids.horizontal.style(),
            });
        }
        layers
    }
}

fn override_value<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, slot: &mut T) -> Result<(), SkyError>
where
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    *slot = raw.trim().parse::<T>().map_err(|_| SkyError::InvalidSetting { key, value: raw.clone() })?;
    Ok(())
}
