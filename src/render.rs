//! Frame drawing: grid, finalized curves, live preview, control polygon.
//!
//! Drawing goes through [`Surface`], a thin slice of the 2D canvas API, so a
//! frame is a pure function of the model and produces no state changes.

use glam::DVec2;
use web_sys::CanvasRenderingContext2d;

use crate::error::KernelError;
use crate::kernel::{CoordinateSystem, GeometryKernel};
use crate::model::{ScreenPoint, ScreenRect, WorldPoint, curve_degree, sketch_point};
use crate::state::{CurveStore, PointAccumulator, Projection, ViewMapper};

const GRID_STYLE: &str = "rgb(130,130,130)";
const CURVE_STYLE: &str = "black";
const POLYGON_STYLE: &str = "darkgray";
const MARKER_FILL: &str = "white";
const MARKER_STROKE: &str = "black";
const POLYGON_DASH: [f64; 2] = [4.0, 4.0];

pub trait Surface {
    fn clear(&mut self, rect: ScreenRect);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: ScreenPoint);
    fn line_to(&mut self, p: ScreenPoint);
    fn stroke(&mut self);
    fn set_line_width(&mut self, width: f64);
    fn set_stroke_style(&mut self, css: &str);
    fn set_fill_style(&mut self, css: &str);
    fn set_line_dash(&mut self, segments: &[f64]);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSettings {
    pub grid_extent: i32,
    pub curve_subdivisions: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            grid_extent: 50,
            curve_subdivisions: 200,
        }
    }
}

/// Everything a frame reads.
pub struct Scene<'a, K: GeometryKernel> {
    pub view: &'a ViewMapper,
    pub points: &'a PointAccumulator,
    pub curves: &'a CurveStore<K::Curve>,
}

pub fn draw_frame<K: GeometryKernel, S: Surface>(
    kernel: &K,
    scene: &Scene<'_, K>,
    settings: &RenderSettings,
    surface: &mut S,
) -> Result<(), KernelError> {
    let w2s = scene
        .view
        .projection(kernel, CoordinateSystem::World, CoordinateSystem::Screen)?;
    draw_scene(kernel, &w2s, scene, settings, surface);
    Ok(())
}

/// Draws a frame with an already built world-to-screen projection. Cannot
/// fail: a preview the kernel rejects is skipped.
pub fn draw_scene<K: GeometryKernel, S: Surface>(
    kernel: &K,
    w2s: &Projection<'_, K>,
    scene: &Scene<'_, K>,
    settings: &RenderSettings,
    surface: &mut S,
) {
    surface.clear(scene.view.view().screen());

    draw_grid(w2s, settings.grid_extent, surface);
    for curve in scene.curves {
        draw_curve(kernel, w2s, curve, settings.curve_subdivisions, surface);
    }

    let points = scene.points.points();
    if !points.is_empty() {
        match kernel.create_curve(true, curve_degree(points.len()), points) {
            Ok(preview) => draw_curve(kernel, w2s, &preview, settings.curve_subdivisions, surface),
            Err(e) => log::debug!("preview skipped: {e}"),
        }
        draw_control_polygon(w2s, points, surface);
    }
}

fn draw_grid<K: GeometryKernel, S: Surface>(w2s: &Projection<'_, K>, extent: i32, surface: &mut S) {
    let e = extent as f64;
    surface.set_line_width(0.5);
    surface.set_stroke_style(GRID_STYLE);
    surface.begin_path();
    for i in -extent..=extent {
        let i = i as f64;
        surface.move_to(w2s.screen(sketch_point(i, -e)));
        surface.line_to(w2s.screen(sketch_point(i, e)));
        surface.move_to(w2s.screen(sketch_point(-e, i)));
        surface.line_to(w2s.screen(sketch_point(e, i)));
    }
    surface.stroke();
}

fn draw_curve<K: GeometryKernel, S: Surface>(
    kernel: &K,
    w2s: &Projection<'_, K>,
    curve: &K::Curve,
    divisions: usize,
    surface: &mut S,
) {
    let divisions = divisions.max(1);
    let (t0, t1) = kernel.domain(curve);
    surface.set_line_width(1.0);
    surface.set_stroke_style(CURVE_STYLE);
    surface.begin_path();
    surface.move_to(w2s.screen(kernel.point_at(curve, t0)));
    for i in 1..=divisions {
        let t = t0 + (i as f64 / divisions as f64) * (t1 - t0);
        surface.line_to(w2s.screen(kernel.point_at(curve, t)));
    }
    surface.stroke();
}

fn draw_control_polygon<K: GeometryKernel, S: Surface>(
    w2s: &Projection<'_, K>,
    points: &[WorldPoint],
    surface: &mut S,
) {
    let screen: Vec<ScreenPoint> = points.iter().map(|&p| w2s.screen(p)).collect();

    surface.set_line_width(1.0);
    surface.set_stroke_style(POLYGON_STYLE);
    surface.set_line_dash(&POLYGON_DASH);
    surface.begin_path();
    for (i, &sp) in screen.iter().enumerate() {
        if i == 0 {
            surface.move_to(sp);
        } else {
            surface.line_to(sp);
        }
    }
    if screen.len() > 2 {
        surface.line_to(screen[0]);
    }
    surface.stroke();
    surface.set_line_dash(&[]);

    surface.set_fill_style(MARKER_FILL);
    surface.set_stroke_style(MARKER_STROKE);
    for sp in screen {
        surface.fill_rect(sp.x - 1.0, sp.y - 1.0, 3.0, 3.0);
        surface.stroke_rect(sp.x - 2.0, sp.y - 2.0, 5.0, 5.0);
    }
}

/// Canvas 2D context as a drawing surface.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, rect: ScreenRect) {
        self.ctx.clear_rect(rect.x, rect.y, rect.width, rect.height);
    }
    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }
    fn move_to(&mut self, p: DVec2) {
        self.ctx.move_to(p.x, p.y);
    }
    fn line_to(&mut self, p: DVec2) {
        self.ctx.line_to(p.x, p.y);
    }
    fn stroke(&mut self) {
        self.ctx.stroke();
    }
    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }
    fn set_stroke_style(&mut self, css: &str) {
        self.ctx.set_stroke_style_str(css);
    }
    fn set_fill_style(&mut self, css: &str) {
        self.ctx.set_fill_style_str(css);
    }
    fn set_line_dash(&mut self, segments: &[f64]) {
        let dash = js_sys::Array::new();
        for s in segments {
            dash.push(&(*s).into());
        }
        self.ctx.set_line_dash(&dash).ok();
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.stroke_rect(x, y, w, h);
    }
}
