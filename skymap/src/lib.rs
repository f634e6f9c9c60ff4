//! Sky map projection and coordinate-grid rendering.
//!
//! This crate maps the observer's sky onto a 2D canvas with the
//! zenith-equidistant (ARC) projection, maps canvas points back to the sky
//! for picking, and draws horizontal, equatorial, and ecliptic coordinate
//! grids as smooth curves or straight segments. It compiles to WebAssembly
//! for the browser canvas and to a native library for the CLI; everything
//! above the [`surface::Surface`] seam is platform independent.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`projection`] | Forward/inverse ARC projection with inverse correction |
//! | [`render`] | Grid segmentation and the curve/line decision |
//! | [`grid`] | Celestial grid lattices and their conversion frames |
//! | [`coords`] | Coordinate types and frame conversions |
//! | [`geometry`] | Angles, distances, clipping, circle fit, splines |
//! | [`surface`] | Drawing surfaces: recording list and Canvas2D |
//! | [`camera`] | Canvas points and the view snapshot |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`config`] | JSON / environment configuration |
//! | [`error`] | Construction-time validation errors |
//! | [`consts`] | Shared numeric constants (thresholds, view limits, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod coords;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod projection;
pub mod render;
pub mod surface;

pub use camera::{Point, ViewState};
pub use coords::HorizontalCoordinate;
pub use error::SkyError;
pub use projection::Projection;
