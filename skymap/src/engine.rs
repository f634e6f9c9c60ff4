use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Point, ViewState};
use crate::config::{GridLayer, LayerKind, SkyConfig};
use crate::consts::{J2000_OBLIQUITY_DEG, KEY_PAN_FRACTION, ZOOM_STEP};
use crate::coords::{HorizontalCoordinate, Observer, signed_angle_delta_deg};
use crate::error::SkyError;
use crate::grid::{CelestialGrid, EclipticFrame, EquatorialFrame};
use crate::input::{Button, InputState, Key, Modifiers, WheelDelta};
use crate::projection::Projection;
use crate::render::{GridRenderer, GridStyle, RenderStats};
use crate::surface::{Canvas2dSurface, Surface};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The view moved, zoomed, or resized; carries the new snapshot.
    ViewChanged(ViewState),
    /// The user picked a sky position.
    Picked(HorizontalCoordinate),
    RenderNeeded,
}

/// Engine state and event handling, independent of any canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
#[derive(Debug)]
pub struct EngineCore {
    pub view: ViewState,
    pub layers: Vec<GridLayer>,
    pub input: InputState,
    pub observer: Observer,
    pub obliquity: f64,
    pub dpr: f64,
}

impl EngineCore {
    /// An engine with no grid layers.
    #[must_use]
    pub fn new(view: ViewState) -> Self {
        Self {
            view,
            layers: Vec::new(),
            input: InputState::default(),
            observer: Observer::new(0.0, 0.0),
            obliquity: J2000_OBLIQUITY_DEG,
            dpr: 1.0,
        }
    }

    /// An engine with the configured view, observer, and grid layers.
    ///
    /// # Errors
    ///
    /// Returns the view validation errors from [`SkyConfig::view_state`].
    pub fn from_config(config: &SkyConfig) -> Result<Self, SkyError> {
        let mut core = Self::new(config.view_state()?);
        core.observer = config.observer();
        core.obliquity = config.ecliptic_obliquity;
        core.layers = config.grid_layers();
        Ok(core)
    }

    /// Append a grid layer; layers draw in insertion order.
    ///
    /// Only [`LayerKind::Equatorial`] and [`LayerKind::Ecliptic`] layers follow
    /// [`EngineCore::set_observer`].
    pub fn add_layer(&mut self, kind: LayerKind, grid: CelestialGrid, style: GridStyle) {
        self.layers.push(GridLayer { kind, grid, style });
    }

    // --- Data inputs ---

    /// Move the observer (new location or sidereal time).
    ///
    /// The equatorial and ecliptic layers get fresh frames; their lattices are untouched.
    pub fn set_observer(&mut self, observer: Observer) -> Vec<Action> {
        self.observer = observer;
        for layer in &mut self.layers {
            match layer.kind {
                LayerKind::Equatorial => layer.grid.set_frame(EquatorialFrame { observer }),
                LayerKind::Ecliptic => layer.grid.set_frame(EclipticFrame { observer, obliquity: self.obliquity }),
                LayerKind::Horizontal | LayerKind::Custom => {}
            }
        }
        vec![Action::RenderNeeded]
    }

    /// Update viewport dimensions and device pixel ratio.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let before = self.view;
        if dpr.is_finite() && dpr > 0.0 {
            self.dpr = dpr;
        }
        if width_css.is_finite() && height_css.is_finite() && width_css >= 1.0 && height_css >= 1.0 {
            self.view.resize(width_css.round() as u32, height_css.round() as u32);
        }
        self.view_changed(before)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        match button {
            Button::Primary | Button::Middle => {
                self.input = InputState::Panning { last_screen: screen_pt };
                Vec::new()
            }
            Button::Secondary => vec![Action::Picked(self.pick(screen_pt))],
        }
    }

    /// Drag the sky so the position under the pointer follows it.
    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let InputState::Panning { last_screen } = self.input else {
            return Vec::new();
        };
        self.input = InputState::Panning { last_screen: screen_pt };

        let before = self.view;
        let grabbed = self.pick(last_screen);
        let under = self.pick(screen_pt);
        self.view.pan_by(
            signed_angle_delta_deg(grabbed.azimuth, under.azimuth),
            grabbed.altitude - under.altitude,
        );
        self.view_changed(before)
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.input = InputState::Idle;
        Vec::new()
    }

    /// Scrolling down widens the view, scrolling up narrows it.
    pub fn on_wheel(&mut self, _screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        if delta.dy == 0.0 || !delta.dy.is_finite() {
            return Vec::new();
        }
        let before = self.view;
        self.view.zoom_by(if delta.dy > 0.0 { ZOOM_STEP } else { ZOOM_STEP.recip() });
        self.view_changed(before)
    }

    /// Arrow keys pan by a fraction of the view angle, scaled by the modifiers; `+`/`-` zoom.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        let before = self.view;
        if let Some((d_az, d_alt)) = key.pan_direction() {
            let step = self.view.view_angle * KEY_PAN_FRACTION * modifiers.step_scale();
            self.view.pan_by(d_az * step, d_alt * step);
        } else if let Some(direction) = key.zoom_direction() {
            self.view.zoom_by(ZOOM_STEP.powi(direction));
        }
        self.view_changed(before)
    }

    // --- Queries ---

    /// The sky position under a canvas point.
    #[must_use]
    pub fn pick(&self, screen_pt: Point) -> HorizontalCoordinate {
        Projection::new(&self.view).invert(screen_pt)
    }

    /// The canvas point of a sky position.
    #[must_use]
    pub fn project(&self, hor: HorizontalCoordinate) -> Point {
        Projection::new(&self.view).project(hor)
    }

    /// The current view snapshot.
    #[must_use]
    pub fn view(&self) -> ViewState {
        self.view
    }

    // --- Render ---

    /// Draw every layer onto `surface`.
    pub fn render(&self, surface: &mut dyn Surface) -> RenderStats {
        let renderer = GridRenderer::new(&self.view);
        let mut stats = RenderStats::default();
        for layer in &self.layers {
            stats.merge(renderer.render_grid(&layer.grid, &layer.style, surface));
        }
        tracing::trace!(runs = stats.runs, draw_calls = stats.draw_calls(), skipped = stats.skipped, "sky rendered");
        stats
    }

    fn view_changed(&self, before: ViewState) -> Vec<Action> {
        if before == self.view {
            return Vec::new();
        }
        tracing::debug!(
            azimuth = self.view.center.azimuth,
            altitude = self.view.center.altitude,
            view_angle = self.view.view_angle,
            "view changed"
        );
        vec![Action::ViewChanged(self.view), Action::RenderNeeded]
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Fails when the canvas cannot provide a 2D context.
    pub fn new(canvas: HtmlCanvasElement, core: EngineCore) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx, core })
    }

    // --- Viewport ---

    /// Update viewport dimensions and size the backing store for the pixel ratio.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let actions = self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((self.core.view.width_px() * self.core.dpr).round() as u32);
        self.canvas.set_height((self.core.view.height_px() * self.core.dpr).round() as u32);
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    // --- Render ---

    /// Clear the canvas and draw the current view.
    ///
    /// # Errors
    ///
    /// Fails when the context rejects the pixel-ratio transform.
    pub fn render(&self) -> Result<RenderStats, JsValue> {
        let dpr = self.core.dpr;
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        self.ctx.clear_rect(0.0, 0.0, self.core.view.width_px(), self.core.view.height_px());
        let mut surface = Canvas2dSurface::new(&self.ctx);
        Ok(self.core.render(&mut surface))
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn pick(&self, screen_pt: Point) -> HorizontalCoordinate {
        self.core.pick(screen_pt)
    }

    #[must_use]
    pub fn view(&self) -> ViewState {
        self.core.view()
    }
}
