//! Core data models for the sketch tool.
//! Points live on the z = 0 plane of world space; screen space is canvas pixels
//! with Y growing downward.

use glam::{DVec2, DVec3};
use serde::Deserialize;

use crate::error::ViewError;

/// A world-space coordinate. `z` is always 0 for points produced by this tool.
pub type WorldPoint = DVec3;

/// A canvas pixel coordinate.
pub type ScreenPoint = DVec2;

/// Highest degree ever requested from the kernel.
pub const MAX_DEGREE: usize = 3;

/// Degree used for a curve built from `point_count` points: `min(n - 1, 3)`.
pub fn curve_degree(point_count: usize) -> usize {
    point_count.saturating_sub(1).min(MAX_DEGREE)
}

/// Lifts a 2D world coordinate onto the sketch plane.
pub fn sketch_point(x: f64, y: f64) -> WorldPoint {
    DVec3::new(x, y, 0.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct WorldRect {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl WorldRect {
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
    pub fn contains(&self, p: WorldPoint) -> bool {
        p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Visible world region plus the canvas viewport it maps onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    visible: WorldRect,
    screen: ScreenRect,
    near: f64,
    far: f64,
}

impl ViewState {
    pub fn new(
        visible: WorldRect,
        screen: ScreenRect,
        near: f64,
        far: f64,
    ) -> Result<Self, ViewError> {
        if !(visible.xmax > visible.xmin) || !(visible.ymax > visible.ymin) {
            return Err(ViewError::EmptyWorldRect(visible));
        }
        if !(screen.width > 0.0) || !(screen.height > 0.0) {
            return Err(ViewError::EmptyScreenRect(screen));
        }
        if !(far > near) {
            return Err(ViewError::DepthRange { near, far });
        }
        Ok(Self {
            visible,
            screen,
            near,
            far,
        })
    }

    pub fn visible(&self) -> WorldRect {
        self.visible
    }
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }
    pub fn near(&self) -> f64 {
        self.near
    }
    pub fn far(&self) -> f64 {
        self.far
    }
}

/// Shapes inserted directly into the curve store from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Line,
    Polyline,
    /// 12-point approximation through a closed cubic. Not a true circular arc:
    /// the curve undershoots the radius between samples.
    Circle,
}

pub const CIRCLE_CENTER: (f64, f64) = (5.0, 5.0);
pub const CIRCLE_RADIUS: f64 = 3.0;
pub const CIRCLE_DIVISIONS: usize = 12;

impl Preset {
    pub fn points(self) -> Vec<WorldPoint> {
        match self {
            Preset::Line => vec![sketch_point(0.0, 0.0), sketch_point(10.0, 10.0)],
            Preset::Polyline => vec![
                sketch_point(0.0, 0.0),
                sketch_point(5.0, 10.0),
                sketch_point(10.0, 0.0),
            ],
            Preset::Circle => circle_points(
                sketch_point(CIRCLE_CENTER.0, CIRCLE_CENTER.1),
                CIRCLE_RADIUS,
                CIRCLE_DIVISIONS,
            ),
        }
    }

    pub fn closed(self) -> bool {
        matches!(self, Preset::Circle)
    }

    pub fn degree(self) -> usize {
        match self {
            Preset::Line | Preset::Polyline => 1,
            Preset::Circle => MAX_DEGREE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::Line => "line",
            Preset::Polyline => "polyline",
            Preset::Circle => "circle",
        }
    }
}

/// `divisions` points evenly spaced by angle, followed by a copy of the first.
pub fn circle_points(center: WorldPoint, radius: f64, divisions: usize) -> Vec<WorldPoint> {
    let mut pts = Vec::with_capacity(divisions + 1);
    for i in 0..divisions {
        let angle = std::f64::consts::TAU * (i as f64 / divisions as f64);
        pts.push(sketch_point(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
    if let Some(&first) = pts.first() {
        pts.push(first);
    }
    pts
}
