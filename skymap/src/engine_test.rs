#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;
use crate::consts::MAX_VIEW_ANGLE;
use crate::geometry::distance;
use crate::grid::HorizontalFrame;
use crate::surface::{DrawCommand, DrawList};

// =============================================================
// Helpers
// =============================================================

fn default_core() -> EngineCore {
    EngineCore::from_config(&SkyConfig::default()).unwrap()
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn shift_modifier() -> Modifiers {
    Modifiers { shift: true, ..Default::default() }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn key(name: &str) -> Key {
    Key(name.into())
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn has_view_changed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::ViewChanged(_)))
}

// =============================================================
// EngineCore: construction
// =============================================================

#[test]
fn core_from_default_config() {
    let core = default_core();
    assert_eq!(core.view().center, HorizontalCoordinate::new(180.0, 30.0));
    assert_eq!(core.layers.len(), 1);
    assert_eq!(core.input, InputState::Idle);
    assert_eq!(core.dpr, 1.0);
}

#[test]
fn core_new_has_no_layers() {
    let view = ViewState::new(640, 480, HorizontalCoordinate::new(0.0, 0.0), 60.0).unwrap();
    let core = EngineCore::new(view);
    assert!(core.layers.is_empty());
    let mut list = DrawList::new();
    assert_eq!(core.render(&mut list), RenderStats::default());
    assert!(list.is_empty());
}

#[test]
fn core_from_invalid_config_fails() {
    let mut config = SkyConfig::default();
    config.view.view_angle = -1.0;
    assert!(EngineCore::from_config(&config).is_err());
}

// =============================================================
// EngineCore: viewport
// =============================================================

#[test]
fn set_viewport_resizes_view() {
    let mut core = default_core();
    let actions = core.set_viewport(1024.0, 768.0, 2.0);
    assert!(has_view_changed(&actions));
    assert!(has_render_needed(&actions));
    assert_eq!((core.view.width, core.view.height), (1024, 768));
    assert_eq!(core.dpr, 2.0);
}

#[test]
fn set_viewport_same_size_is_quiet() {
    let mut core = default_core();
    assert!(core.set_viewport(800.0, 450.0, 1.0).is_empty());
}

#[test]
fn set_viewport_ignores_degenerate_sizes() {
    let mut core = default_core();
    let actions = core.set_viewport(0.0, f64::NAN, -1.0);
    assert!(actions.is_empty());
    assert_eq!((core.view.width, core.view.height), (800, 450));
    assert_eq!(core.dpr, 1.0);
}

// =============================================================
// EngineCore: pointer panning
// =============================================================

#[test]
fn primary_down_starts_panning() {
    let mut core = default_core();
    let actions = core.on_pointer_down(pt(400.0, 225.0), Button::Primary, no_modifiers());
    assert!(actions.is_empty());
    assert_eq!(core.input, InputState::Panning { last_screen: pt(400.0, 225.0) });
}

#[test]
fn move_without_drag_does_nothing() {
    let mut core = default_core();
    let before = core.view();
    assert!(core.on_pointer_move(pt(500.0, 300.0), no_modifiers()).is_empty());
    assert_eq!(core.view(), before);
}

#[test]
fn drag_keeps_grabbed_point_under_pointer() {
    let mut core = default_core();
    let grabbed = core.pick(pt(400.0, 225.0));
    core.on_pointer_down(pt(400.0, 225.0), Button::Primary, no_modifiers());
    let actions = core.on_pointer_move(pt(440.0, 225.0), no_modifiers());

    assert!(has_view_changed(&actions));
    assert!(has_render_needed(&actions));
    assert!(core.view().center.azimuth < 180.0);
    assert!(distance(core.project(grabbed), pt(440.0, 225.0)) < 1.0);
}

#[test]
fn vertical_drag_changes_altitude() {
    let mut core = default_core();
    core.on_pointer_down(pt(400.0, 225.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(400.0, 265.0), no_modifiers());
    assert!((core.view().center.altitude - 39.0).abs() < 1e-6);
    assert!((core.view().center.azimuth - 180.0).abs() < 1e-6);
}

#[test]
fn pointer_up_ends_panning() {
    let mut core = default_core();
    core.on_pointer_down(pt(400.0, 225.0), Button::Primary, no_modifiers());
    core.on_pointer_up(pt(410.0, 225.0), Button::Primary, no_modifiers());
    assert_eq!(core.input, InputState::Idle);
    assert!(core.on_pointer_move(pt(500.0, 225.0), no_modifiers()).is_empty());
}

// =============================================================
// EngineCore: picking
// =============================================================

#[test]
fn secondary_click_picks() {
    let mut core = default_core();
    let actions = core.on_pointer_down(pt(400.0, 225.0), Button::Secondary, no_modifiers());
    assert_eq!(actions, vec![Action::Picked(HorizontalCoordinate::new(180.0, 30.0))]);
    assert_eq!(core.input, InputState::Idle);
}

#[test]
fn pick_inverts_project() {
    let core = default_core();
    let target = HorizontalCoordinate::new(200.0, 40.0);
    let back = core.pick(core.project(target));
    assert!((back.azimuth - 200.0).abs() < 1e-9);
    assert!((back.altitude - 40.0).abs() < 1e-9);
}

#[test]
fn pick_inverts_project_on_rotated_zenith_view() {
    let view = ViewState::new(800, 450, HorizontalCoordinate::zenith(), 30.0).unwrap().with_rotation(30.0);
    let core = EngineCore::new(view);
    let target = HorizontalCoordinate::new(100.0, 70.0);
    let back = core.pick(core.project(target));
    assert!((back.azimuth - 100.0).abs() < 1e-6, "{back:?}");
    assert!((back.altitude - 70.0).abs() < 1e-6);
}

#[test]
fn drag_on_rotated_view_follows_pointer() {
    let mut core = default_core();
    core.view = core.view.with_rotation(30.0);
    let grabbed = core.pick(pt(400.0, 225.0));
    core.on_pointer_down(pt(400.0, 225.0), Button::Primary, no_modifiers());
    core.on_pointer_move(pt(440.0, 225.0), no_modifiers());
    assert!(distance(core.project(grabbed), pt(440.0, 225.0)) < 2.0);
}

// =============================================================
// EngineCore: wheel and keys
// =============================================================

#[test]
fn wheel_down_widens_view() {
    let mut core = default_core();
    let actions = core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 100.0 }, no_modifiers());
    assert!(has_view_changed(&actions));
    assert!((core.view().view_angle - 90.0 * ZOOM_STEP).abs() < 1e-9);
}

#[test]
fn wheel_up_narrows_view() {
    let mut core = default_core();
    core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: -100.0 }, no_modifiers());
    assert!((core.view().view_angle - 90.0 / ZOOM_STEP).abs() < 1e-9);
}

#[test]
fn wheel_without_vertical_delta_is_ignored() {
    let mut core = default_core();
    assert!(core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 50.0, dy: 0.0 }, no_modifiers()).is_empty());
}

#[test]
fn wheel_at_limit_is_quiet() {
    let mut core = default_core();
    core.view.view_angle = MAX_VIEW_ANGLE;
    assert!(core.on_wheel(pt(0.0, 0.0), WheelDelta { dx: 0.0, dy: 10.0 }, no_modifiers()).is_empty());
}

#[test]
fn arrow_keys_pan_by_fraction_of_view() {
    let mut core = default_core();
    let actions = core.on_key_down(&key("ArrowRight"), no_modifiers());
    assert!(has_view_changed(&actions));
    assert!((core.view().center.azimuth - 189.0).abs() < 1e-9);

    core.on_key_down(&key("ArrowUp"), shift_modifier());
    assert!((core.view().center.altitude - 90.0).abs() < 1e-9);
}

#[test]
fn alt_arrow_pans_finely() {
    let mut core = default_core();
    core.on_key_down(&key("ArrowLeft"), Modifiers { shift: false, alt: true });
    assert!((core.view().center.azimuth - 179.1).abs() < 1e-9);
}

#[test]
fn plus_key_zooms_in() {
    let mut core = default_core();
    core.on_key_down(&key("+"), no_modifiers());
    assert!(core.view().view_angle < 90.0);
}

#[test]
fn unknown_key_is_ignored() {
    let mut core = default_core();
    assert!(core.on_key_down(&key("q"), no_modifiers()).is_empty());
}

// =============================================================
// EngineCore: observer and rendering
// =============================================================

#[test]
fn set_observer_refreshes_equatorial_layer() {
    let mut config = SkyConfig::default();
    config.grids.equatorial.enabled = true;
    let mut core = EngineCore::from_config(&config).unwrap();
    let before = core.layers[0].grid.to_horizontal_all();

    let actions = core.set_observer(Observer::new(50.0, 90.0));
    assert_eq!(actions, vec![Action::RenderNeeded]);
    assert_ne!(core.layers[0].grid.to_horizontal_all(), before);
}

#[test]
fn render_draws_all_layers() {
    let mut config = SkyConfig::default();
    config.grids.equatorial.enabled = true;
    let core = EngineCore::from_config(&config).unwrap();

    let mut list = DrawList::new();
    let stats = core.render(&mut list);
    assert_eq!(stats.draw_calls(), list.len());

    let colors: std::collections::HashSet<&str> = list
        .commands
        .iter()
        .map(|c| match c {
            DrawCommand::Line { style, .. }
            | DrawCommand::Curve { style, .. }
            | DrawCommand::ClosedCurve { style, .. }
            | DrawCommand::Ellipse { style, .. } => style.color.as_str(),
        })
        .collect();
    assert!(colors.contains(config.grids.horizontal.color.as_str()));
    assert!(colors.contains(config.grids.equatorial.color.as_str()));
}

#[test]
fn add_layer_appends() {
    let view = ViewState::new(800, 450, HorizontalCoordinate::new(0.0, 0.0), 90.0).unwrap();
    let mut core = EngineCore::new(view);
    core.add_layer(LayerKind::Horizontal, CelestialGrid::horizontal(), GridStyle::default());
    let mut list = DrawList::new();
    assert!(core.render(&mut list).draw_calls() > 0);
}

#[test]
fn set_observer_leaves_custom_layers_alone() {
    let view = ViewState::new(800, 450, HorizontalCoordinate::new(0.0, 0.0), 90.0).unwrap();
    let mut core = EngineCore::new(view);
    // Named like the built-in layer, but with its own frame.
    let grid = CelestialGrid::new("equatorial", 17, 24, HorizontalFrame).unwrap();
    core.add_layer(LayerKind::Custom, grid, GridStyle::default());
    let before = core.layers[0].grid.to_horizontal_all();

    core.set_observer(Observer::new(-20.0, 135.0));
    assert_eq!(core.layers[0].grid.to_horizontal_all(), before);
}
