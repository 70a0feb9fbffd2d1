//! In-memory kernel for unit tests: linear view mapping, piecewise-linear
//! curves, a live-handle counter and switchable failures.

use std::cell::Cell;
use std::rc::Rc;

use glam::DVec3;

use super::{CoordinateSystem, GeometryKernel};
use crate::error::KernelError;
use crate::model::{ViewState, WorldPoint};

#[derive(Debug)]
struct Live(Rc<Cell<i64>>);

impl Live {
    fn acquire(counter: &Rc<Cell<i64>>) -> Self {
        counter.set(counter.get() + 1);
        Live(counter.clone())
    }
}

impl Drop for Live {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[derive(Debug)]
pub struct FakeCurve {
    pub closed: bool,
    pub degree: usize,
    pub points: Vec<WorldPoint>,
    _live: Live,
}

#[derive(Debug)]
pub struct FakeTransform {
    from: CoordinateSystem,
    to: CoordinateSystem,
    view: ViewState,
    _live: Live,
}

#[derive(Default)]
pub struct FakeKernel {
    live: Rc<Cell<i64>>,
    pub curves_created: Cell<usize>,
    pub transforms_built: Cell<usize>,
    pub fail_curves: Cell<bool>,
    pub fail_transforms: Cell<bool>,
    pub fail_serialize: Cell<bool>,
}

impl FakeKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles created and not yet dropped.
    pub fn live_handles(&self) -> i64 {
        self.live.get()
    }
}

impl GeometryKernel for FakeKernel {
    type Curve = FakeCurve;
    type Transform = FakeTransform;

    fn create_curve(
        &self,
        closed: bool,
        degree: usize,
        points: &[WorldPoint],
    ) -> Result<FakeCurve, KernelError> {
        if self.fail_curves.get() {
            return Err(KernelError::Curve("injected failure".into()));
        }
        if points.len() < 2 || degree == 0 || degree >= points.len() + usize::from(closed) {
            return Err(KernelError::Curve(format!(
                "{} points at degree {degree}",
                points.len()
            )));
        }
        self.curves_created.set(self.curves_created.get() + 1);
        Ok(FakeCurve {
            closed,
            degree,
            points: points.to_vec(),
            _live: Live::acquire(&self.live),
        })
    }

    fn domain(&self, curve: &FakeCurve) -> (f64, f64) {
        let spans = curve.points.len() - 1 + usize::from(curve.closed);
        (0.0, spans as f64)
    }

    fn point_at(&self, curve: &FakeCurve, t: f64) -> WorldPoint {
        let n = curve.points.len();
        let (t0, t1) = self.domain(curve);
        let t = t.clamp(t0, t1);
        let i = (t.floor() as usize).min(t1 as usize - 1);
        let a = curve.points[i % n];
        let b = curve.points[(i + 1) % n];
        a.lerp(b, t - i as f64)
    }

    fn build_transform(
        &self,
        from: CoordinateSystem,
        to: CoordinateSystem,
        view: &ViewState,
    ) -> Result<FakeTransform, KernelError> {
        if self.fail_transforms.get() {
            return Err(KernelError::Transform("injected failure".into()));
        }
        self.transforms_built.set(self.transforms_built.get() + 1);
        Ok(FakeTransform {
            from,
            to,
            view: *view,
            _live: Live::acquire(&self.live),
        })
    }

    fn apply_transform(&self, transform: &FakeTransform, point: WorldPoint) -> WorldPoint {
        let w = transform.view.visible();
        let s = transform.view.screen();
        let sx = s.width / w.width();
        let sy = s.height / w.height();
        match (transform.from, transform.to) {
            (CoordinateSystem::World, CoordinateSystem::Screen) => DVec3::new(
                s.x + (point.x - w.xmin) * sx,
                s.y + (w.ymax - point.y) * sy,
                point.z,
            ),
            (CoordinateSystem::Screen, CoordinateSystem::World) => DVec3::new(
                w.xmin + (point.x - s.x) / sx,
                w.ymax - (point.y - s.y) / sy,
                point.z,
            ),
            _ => point,
        }
    }

    fn serialize_document(&self, curves: &[FakeCurve]) -> Result<Vec<u8>, KernelError> {
        if self.fail_serialize.get() {
            return Err(KernelError::Serialize("injected failure".into()));
        }
        let doc: Vec<Vec<[f64; 3]>> = curves
            .iter()
            .map(|c| c.points.iter().map(|p| p.to_array()).collect())
            .collect();
        serde_json::to_vec(&doc).map_err(|e| KernelError::Serialize(e.to_string()))
    }
}
