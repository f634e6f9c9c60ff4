//! Render scenarios: whole-grid renders checked against the recorded draw list
//!
//! Each scenario renders a standard 17x24 grid into a `DrawList` and checks
//! the shape of the output: how many runs became curves, closed curves, or
//! lines, and where the lines landed.
#![allow(clippy::float_cmp)]

use skymap::camera::{Point, ViewState};
use skymap::coords::{HorizontalCoordinate, Observer};
use skymap::grid::CelestialGrid;
use skymap::render::{GridRenderer, GridStyle, RenderStats};
use skymap::surface::{DrawCommand, DrawList};

// =============================================================
// Helpers
// =============================================================

fn view(azimuth: f64, altitude: f64, view_angle: f64) -> ViewState {
    ViewState::new(800, 450, HorizontalCoordinate::new(azimuth, altitude), view_angle).unwrap()
}

fn render(grid: &CelestialGrid, view: &ViewState) -> (RenderStats, DrawList) {
    let mut list = DrawList::new();
    let stats = GridRenderer::new(view).render_grid(grid, &GridStyle::default(), &mut list);
    (stats, list)
}

fn lines(list: &DrawList) -> Vec<(Point, Point)> {
    list.commands
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Line { a, b, .. } => Some((*a, *b)),
            _ => None,
        })
        .collect()
}

fn near(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// =============================================================
// Wide views
// =============================================================

#[test]
fn horizon_view_draws_curves_and_polar_circles() {
    let (stats, list) = render(&CelestialGrid::horizontal(), &view(0.0, 0.0, 90.0));
    assert_eq!(stats.closed_curves, 2);
    assert_eq!(stats.curves, 48);
    assert_eq!(stats.lines, 0);
    assert_eq!(stats.skipped, 0);
    assert_eq!(list.len(), 50);
}

#[test]
fn horizon_row_wraps_into_single_run() {
    // Visible horizon columns are 17..=23 and 0..=7; they must come out as one
    // curve of 15 points plus a pad point on each side, not two pieces.
    let (_, list) = render(&CelestialGrid::horizontal(), &view(0.0, 0.0, 90.0));
    let horizon: Vec<&DrawCommand> = list
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Curve { .. }) && c.points().iter().all(|p| near(p.y, 225.0)))
        .collect();
    assert_eq!(horizon.len(), 1);
    let points = horizon[0].points();
    assert_eq!(points.len(), 17);
    // Runs left to right: west of the seam first, then east.
    assert!(points.windows(2).all(|w| w[0].x < w[1].x));
}

#[test]
fn zenith_view_closes_the_high_parallels() {
    let (stats, _) = render(&CelestialGrid::horizontal(), &view(0.0, 90.0, 90.0));
    assert_eq!(stats.closed_curves, 10);
    assert_eq!(stats.curves, 24);
    assert_eq!(stats.skipped, 0);
}

#[test]
fn nadir_view_mirrors_zenith_view() {
    let (stats, _) = render(&CelestialGrid::horizontal(), &view(0.0, -90.0, 90.0));
    assert_eq!(stats.closed_curves, 10);
    assert_eq!(stats.curves, 24);
}

#[test]
fn full_sky_closes_every_parallel() {
    let (stats, _) = render(&CelestialGrid::horizontal(), &view(0.0, 0.0, 180.0));
    assert_eq!(stats.closed_curves, 17);
    assert_eq!(stats.curves, 24);
}

#[test]
fn meridians_reaching_the_pole_end_at_the_pole() {
    let (_, list) = render(&CelestialGrid::horizontal(), &view(0.0, 90.0, 90.0));
    let center = Point::new(400.0, 225.0);
    let meridians: Vec<Vec<Point>> = list
        .commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Curve { .. }))
        .map(DrawCommand::points)
        .collect();
    assert_eq!(meridians.len(), 24);
    for points in meridians {
        let last = points[points.len() - 1];
        assert!(near(last.x, center.x) && near(last.y, center.y), "meridian ends at {last:?}");
    }
}

// =============================================================
// Deep zoom: no grid point in view
// =============================================================

#[test]
fn deep_zoom_on_meridian_draws_one_vertical_line() {
    let (stats, list) = render(&CelestialGrid::horizontal(), &view(0.0, 0.8, 0.5));
    assert_eq!(stats.runs, 2);
    assert_eq!(stats.lines, 1);
    assert_eq!(list.len(), 1);

    let (a, b) = lines(&list)[0];
    assert!(near(a.x, 400.0) && near(b.x, 400.0));
    assert!(near(a.y, 450.0));
    assert!(near(b.y, 0.0));
}

#[test]
fn deep_zoom_near_parallel_draws_one_horizontal_line() {
    let (stats, list) = render(&CelestialGrid::horizontal(), &view(3.0, 10.2, 0.5));
    assert_eq!(stats.lines, 1);
    assert_eq!(list.len(), 1);

    let (a, b) = lines(&list)[0];
    assert!(near(a.x, 0.0) && near(b.x, 800.0));
    assert!((a.y - b.y).abs() < 1e-6);
    assert!(a.y > 380.0 && a.y < 390.0, "parallel at y = {}", a.y);
}

#[test]
fn deep_zoom_between_lines_draws_nothing() {
    // No grid line crosses a 4° x 2° view centered between them.
    let (stats, list) = render(&CelestialGrid::horizontal(), &view(37.0, 12.0, 2.0));
    assert!(list.is_empty());
    assert_eq!(stats.skipped, stats.runs);
}

// =============================================================
// Robustness sweep
// =============================================================

#[test]
fn every_view_produces_finite_bounded_output() {
    let observer = Observer::new(50.0, 0.0);
    let grids = [
        CelestialGrid::horizontal(),
        CelestialGrid::equatorial(observer),
        CelestialGrid::ecliptic(observer, 23.4392911),
    ];
    for grid in &grids {
        for (az, alt) in [(0.0, 0.0), (180.0, 30.0), (90.0, 60.0), (45.0, 90.0), (300.0, -45.0), (10.0, -90.0)] {
            let views = [0.5, 5.0, 30.0, 90.0, 150.0, 180.0]
                .into_iter()
                .flat_map(|va| [(va, 0.0), (va, 35.0), (va, -120.0)]);
            for (va, rho) in views {
                let v = view(az, alt, va).with_rotation(rho);
                let (stats, list) = render(grid, &v);
                let limit = v.screen_radius() * 60.0;
                assert_eq!(stats.draw_calls(), list.len());
                assert_eq!(stats.runs, stats.lines + stats.curves + stats.closed_curves + stats.skipped);
                for p in list.commands.iter().flat_map(DrawCommand::points) {
                    assert!(p.is_finite(), "{} at {az}/{alt}/{va} rho {rho}", grid.name());
                    let d = (p.x - 400.0).hypot(p.y - 225.0);
                    assert!(d < limit, "{} at {az}/{alt}/{va} rho {rho}: point {p:?}", grid.name());
                }
            }
        }
    }
}

#[test]
fn rotation_turns_the_drawing_but_not_its_shape() {
    let grid = CelestialGrid::horizontal();
    let (plain, _) = render(&grid, &view(0.0, 90.0, 90.0));
    let (rotated, list) = render(&grid, &view(0.0, 90.0, 90.0).with_rotation(40.0));
    assert_eq!(plain, rotated);
    assert!(!list.is_empty());
}

#[test]
fn sidereal_time_moves_equatorial_grid() {
    let mut grid = CelestialGrid::equatorial(Observer::new(50.0, 0.0));
    let v = view(180.0, 30.0, 90.0);
    let (_, before) = render(&grid, &v);
    grid.set_frame(skymap::grid::EquatorialFrame { observer: Observer::new(50.0, 45.0) });
    let (_, after) = render(&grid, &v);
    assert_ne!(before, after);
}
