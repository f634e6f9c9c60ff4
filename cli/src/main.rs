use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use skymap::camera::{Point, ViewState};
use skymap::config::SkyConfig;
use skymap::coords::HorizontalCoordinate;
use skymap::engine::EngineCore;
use skymap::geometry::{CURVE_TENSION, cardinal_to_bezier};
use skymap::projection::Projection;
use skymap::surface::{DrawList, LineStyle, Surface};
use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Ellipse, Group, Path, Rectangle};
use tracing::info;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("sky map rejected the setup: {0}")]
    Sky(#[from] skymap::SkyError),
    #[error("failed to read or write {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "skymap-cli", about = "Render, project, and invert ARC-projected sky grids")]
struct Cli {
    /// JSON configuration file; missing fields take their defaults.
    #[arg(long, env = "SKYMAP_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    view: ViewArgs,

    #[command(subcommand)]
    command: Command,
}

/// View settings that override the configuration file.
#[derive(Args, Debug)]
struct ViewArgs {
    #[arg(long, global = true)]
    width: Option<u32>,
    #[arg(long, global = true)]
    height: Option<u32>,
    #[arg(long, global = true, allow_hyphen_values = true)]
    azimuth: Option<f64>,
    #[arg(long, global = true, allow_hyphen_values = true)]
    altitude: Option<f64>,
    #[arg(long, global = true)]
    view_angle: Option<f64>,
    #[arg(long, global = true, allow_hyphen_values = true)]
    rotation: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw every enabled grid and write the result.
    Render {
        #[arg(long, value_enum, default_value_t = Format::Svg)]
        format: Format,
        #[arg(long, help = "Output file path; stdout when omitted")]
        output: Option<PathBuf>,
    },
    /// Project a horizontal coordinate to canvas pixels.
    Project {
        #[arg(long = "az", allow_hyphen_values = true)]
        target_azimuth: f64,
        #[arg(long = "alt", allow_hyphen_values = true)]
        target_altitude: f64,
    },
    /// Invert a canvas pixel back to a horizontal coordinate.
    Invert {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Format {
    Svg,
    Json,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), &cli.view)?;

    match cli.command {
        Command::Render { format, output } => run_render(&config, format, output),
        Command::Project { target_azimuth, target_altitude } => {
            let view = config.view_state()?;
            let point = Projection::new(&view).project(HorizontalCoordinate::new(target_azimuth, target_altitude));
            print_json(&json!({ "x": point.x, "y": point.y, "finite": point.is_finite() }))
        }
        Command::Invert { x, y } => {
            let view = config.view_state()?;
            let (hor, branch) = Projection::new(&view).invert_with_branch(Point::new(x, y));
            print_json(&json!({
                "azimuth": hor.azimuth,
                "altitude": hor.altitude,
                "branch": format!("{branch:?}"),
            }))
        }
    }
}

/// File, then `SKYMAP_*` environment, then command-line flags.
fn load_config(path: Option<&PathBuf>, view: &ViewArgs) -> Result<SkyConfig, CliError> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| CliError::Io { path: path.clone(), source })?;
            SkyConfig::from_json(&text)?
        }
        None => SkyConfig::default(),
    };
    config.apply_env_overrides()?;

    if let Some(width) = view.width {
        config.view.width = width;
    }
    if let Some(height) = view.height {
        config.view.height = height;
    }
    if let Some(azimuth) = view.azimuth {
        config.view.azimuth = azimuth;
    }
    if let Some(altitude) = view.altitude {
        config.view.altitude = altitude;
    }
    if let Some(view_angle) = view.view_angle {
        config.view.view_angle = view_angle;
    }
    if let Some(rotation) = view.rotation {
        config.view.rotation = rotation;
    }
    Ok(config)
}

fn run_render(config: &SkyConfig, format: Format, output: Option<PathBuf>) -> Result<(), CliError> {
    let core = EngineCore::from_config(config)?;
    let view = core.view();

    let rendered = match format {
        Format::Json => {
            let mut list = DrawList::new();
            let stats = core.render(&mut list);
            info!(draw_calls = stats.draw_calls(), skipped = stats.skipped, "rendered draw list");
            list.to_json()?
        }
        Format::Svg => {
            let mut surface = SvgSurface::new();
            let stats = core.render(&mut surface);
            info!(draw_calls = stats.draw_calls(), skipped = stats.skipped, "rendered svg");
            surface.into_document(&view).to_string()
        }
    };

    match output {
        Some(path) => fs::write(&path, rendered).map_err(|source| CliError::Io { path, source }),
        None => {
            println!("{rendered}");
            Ok(())
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

// =============================================================================
// SVG surface
// =============================================================================

/// Surface that builds SVG paths, one per draw call.
struct SvgSurface {
    group: Group,
}

impl SvgSurface {
    fn new() -> Self {
        Self { group: Group::new().set("class", "grid") }
    }

    fn push<T>(&mut self, node: T)
    where
        T: Into<Box<dyn svg::Node>>,
    {
        let group = std::mem::replace(&mut self.group, Group::new());
        self.group = group.add(node);
    }

    fn into_document(self, view: &ViewState) -> Document {
        let background = Rectangle::new()
            .set("width", view.width)
            .set("height", view.height)
            .set("fill", "#05070d");
        Document::new()
            .set("viewBox", (0_u32, 0_u32, view.width, view.height))
            .set("width", view.width)
            .set("height", view.height)
            .add(background)
            .add(self.group)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn xy(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

fn stroked(path: Path, style: &LineStyle) -> Path {
    let path = path.set("fill", "none").set("stroke", style.color.as_str()).set("stroke-width", style.width);
    if style.dash.is_empty() {
        return path;
    }
    let dash = style.dash.iter().map(f64::to_string).collect::<Vec<_>>().join(" ");
    path.set("stroke-dasharray", dash)
}

fn spline_data(points: &[Point], closed: bool) -> Option<Data> {
    let first = points.first()?;
    let mut d = Data::new().move_to(xy(*first));
    for segment in cardinal_to_bezier(points, closed, CURVE_TENSION) {
        let (c1x, c1y) = xy(segment.c1);
        let (c2x, c2y) = xy(segment.c2);
        let (x, y) = xy(segment.to);
        d = d.cubic_curve_to((c1x, c1y, c2x, c2y, x, y));
    }
    Some(if closed { d.close() } else { d })
}

impl Surface for SvgSurface {
    fn draw_line(&mut self, a: Point, b: Point, style: &LineStyle) {
        let d = Data::new().move_to(xy(a)).line_to(xy(b));
        self.push(stroked(Path::new().set("d", d), style));
    }

    fn draw_curve(&mut self, points: &[Point], style: &LineStyle) {
        if let Some(d) = spline_data(points, false) {
            self.push(stroked(Path::new().set("d", d), style));
        }
    }

    fn draw_closed_curve(&mut self, points: &[Point], style: &LineStyle) {
        if let Some(d) = spline_data(points, true) {
            self.push(stroked(Path::new().set("d", d), style));
        }
    }

    fn draw_ellipse(&mut self, center: Point, rx: f64, ry: f64, style: &LineStyle) {
        let ellipse = Ellipse::new()
            .set("cx", center.x)
            .set("cy", center.y)
            .set("rx", rx)
            .set("ry", ry)
            .set("fill", "none")
            .set("stroke", style.color.as_str())
            .set("stroke-width", style.width);
        self.push(ellipse);
    }
}
