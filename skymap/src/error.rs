//! Error type for construction-time validation.
//!
//! Per-frame operations (projection, inversion, rendering) never fail; they
//! degrade to defined fallbacks instead. Only building a view, a grid, or a
//! configuration can be rejected.

/// Error returned when a view, grid, or configuration is invalid.
#[derive(Debug, thiserror::Error)]
pub enum SkyError {
    /// Canvas dimensions must both be positive.
    #[error("invalid viewport {width}x{height}: both dimensions must be positive")]
    InvalidViewport { width: u32, height: u32 },
    /// View angle outside `(0, 180]` degrees or not finite.
    #[error("invalid view angle {0}: expected a finite value in (0, 180]")]
    InvalidViewAngle(f64),
    /// A grid needs at least two rows and three columns to form lines.
    #[error("invalid grid shape {rows}x{columns}: need at least 2 rows and 3 columns")]
    InvalidGridShape { rows: usize, columns: usize },
    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// An environment override held a value that does not parse.
    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
}
