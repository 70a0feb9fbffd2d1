//! rhino3dm binding.
//!
//! The JS glue keeps the loaded module in a module-level variable and exposes
//! flat functions; every object it hands back is wrapped in a Rust handle whose
//! `Drop` calls `delete()` on it.

use glam::DVec3;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{CoordinateSystem, GeometryKernel};
use crate::error::{KernelError, js_message};
use crate::model::{ViewState, WorldPoint};

#[wasm_bindgen(inline_js = "
import rhino3dm from 'rhino3dm';

let rhino = null;

function kernel() {
    if (!rhino) throw new Error('rhino3dm is not loaded');
    return rhino;
}

export async function sketch_kernel_load() {
    if (!rhino) rhino = await rhino3dm();
    return true;
}

export function sketch_curve_create(closed, degree, coords) {
    const r = kernel();
    const list = new r.Point3dList();
    try {
        for (let i = 0; i + 2 < coords.length; i += 3) {
            list.add(coords[i], coords[i + 1], coords[i + 2]);
        }
        const crv = r.NurbsCurve.create(closed, degree, list);
        if (!crv) throw new Error('NurbsCurve.create rejected ' + list.count + ' points at degree ' + degree);
        return crv;
    } finally {
        list.delete();
    }
}

export function sketch_curve_domain(crv) {
    const d = crv.domain;
    return new Float64Array([d[0], d[1]]);
}

export function sketch_curve_point_at(crv, t) {
    return new Float64Array(crv.pointAt(t));
}

export function sketch_view_xform(from, to, port, frustum, near, far) {
    const r = kernel();
    const vp = new r.ViewportInfo();
    try {
        vp.screenPort = [port[0], port[1], port[2], port[3]];
        vp.setFrustum(frustum[0], frustum[1], frustum[2], frustum[3], near, far);
        const cs = (n) => n === 0 ? r.CoordinateSystem.World : r.CoordinateSystem.Screen;
        const xf = vp.getXform(cs(from), cs(to));
        if (!xf) throw new Error('ViewportInfo.getXform returned nothing');
        return xf;
    } finally {
        vp.delete();
    }
}

export function sketch_point_transform(x, y, z, xf) {
    return new Float64Array(kernel().Point3d.transform([x, y, z], xf));
}

export function sketch_document_bytes(curves) {
    const r = kernel();
    const doc = new r.File3dm();
    try {
        for (const c of curves) doc.objects().add(c, null);
        return doc.toByteArray();
    } finally {
        doc.delete();
    }
}

export function sketch_release(obj) {
    if (obj && typeof obj.delete === 'function') obj.delete();
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn sketch_kernel_load() -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch)]
    fn sketch_curve_create(closed: bool, degree: u32, coords: &[f64]) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn sketch_curve_domain(curve: &JsValue) -> Result<Vec<f64>, JsValue>;

    #[wasm_bindgen(catch)]
    fn sketch_curve_point_at(curve: &JsValue, t: f64) -> Result<Vec<f64>, JsValue>;

    #[wasm_bindgen(catch)]
    fn sketch_view_xform(
        from: u8,
        to: u8,
        port: &[f64],
        frustum: &[f64],
        near: f64,
        far: f64,
    ) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn sketch_point_transform(x: f64, y: f64, z: f64, xform: &JsValue) -> Result<Vec<f64>, JsValue>;

    #[wasm_bindgen(catch)]
    fn sketch_document_bytes(curves: &js_sys::Array) -> Result<Vec<u8>, JsValue>;

    fn sketch_release(obj: &JsValue);
}

/// A kernel-owned object, deleted when the handle drops.
#[derive(Debug)]
struct Owned(JsValue);

impl Drop for Owned {
    fn drop(&mut self) {
        sketch_release(&self.0);
    }
}

#[derive(Debug)]
pub struct RhinoCurve(Owned);

#[derive(Debug)]
pub struct RhinoTransform(Owned);

/// The loaded rhino3dm module. Only one exists per page; the glue caches the
/// module, so loading twice is harmless.
#[derive(Debug, PartialEq)]
pub struct Rhino3dm {
    _loaded: (),
}

impl Rhino3dm {
    pub async fn load() -> Result<Self, KernelError> {
        let promise = sketch_kernel_load().map_err(|e| KernelError::Unavailable(js_message(&e)))?;
        JsFuture::from(promise)
            .await
            .map_err(|e| KernelError::Unavailable(js_message(&e)))?;
        log::info!("rhino3dm loaded");
        Ok(Self { _loaded: () })
    }
}

fn to_point(coords: &[f64]) -> WorldPoint {
    let at = |i: usize| coords.get(i).copied().unwrap_or(0.0);
    DVec3::new(at(0), at(1), at(2))
}

/// Evaluation results from the glue. A throwing call is logged and becomes
/// NaN, which the canvas skips when drawing.
fn evaluated(what: &str, result: Result<Vec<f64>, String>) -> WorldPoint {
    match result {
        Ok(coords) => to_point(&coords),
        Err(message) => {
            log::error!("{what} failed: {message}");
            DVec3::NAN
        }
    }
}

fn interval(result: Result<Vec<f64>, String>) -> (f64, f64) {
    match result {
        Ok(d) => (
            d.first().copied().unwrap_or(0.0),
            d.get(1).copied().unwrap_or(0.0),
        ),
        Err(message) => {
            log::error!("curve domain failed: {message}");
            (f64::NAN, f64::NAN)
        }
    }
}

fn system_code(cs: CoordinateSystem) -> u8 {
    match cs {
        CoordinateSystem::World => 0,
        CoordinateSystem::Screen => 1,
    }
}

impl GeometryKernel for Rhino3dm {
    type Curve = RhinoCurve;
    type Transform = RhinoTransform;

    fn create_curve(
        &self,
        closed: bool,
        degree: usize,
        points: &[WorldPoint],
    ) -> Result<RhinoCurve, KernelError> {
        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
        sketch_curve_create(closed, degree as u32, &coords)
            .map(|obj| RhinoCurve(Owned(obj)))
            .map_err(|e| KernelError::Curve(js_message(&e)))
    }

    fn domain(&self, curve: &RhinoCurve) -> (f64, f64) {
        interval(sketch_curve_domain(&curve.0.0).map_err(|e| js_message(&e)))
    }

    fn point_at(&self, curve: &RhinoCurve, t: f64) -> WorldPoint {
        evaluated(
            "curve evaluation",
            sketch_curve_point_at(&curve.0.0, t).map_err(|e| js_message(&e)),
        )
    }

    fn build_transform(
        &self,
        from: CoordinateSystem,
        to: CoordinateSystem,
        view: &ViewState,
    ) -> Result<RhinoTransform, KernelError> {
        let s = view.screen();
        let w = view.visible();
        sketch_view_xform(
            system_code(from),
            system_code(to),
            &[s.x, s.y, s.width, s.height],
            &[w.xmin, w.xmax, w.ymin, w.ymax],
            view.near(),
            view.far(),
        )
        .map(|obj| RhinoTransform(Owned(obj)))
        .map_err(|e| KernelError::Transform(js_message(&e)))
    }

    fn apply_transform(&self, transform: &RhinoTransform, point: WorldPoint) -> WorldPoint {
        evaluated(
            "point transform",
            sketch_point_transform(point.x, point.y, point.z, &transform.0.0)
                .map_err(|e| js_message(&e)),
        )
    }

    fn serialize_document(&self, curves: &[RhinoCurve]) -> Result<Vec<u8>, KernelError> {
        let list = js_sys::Array::new();
        for c in curves {
            list.push(&c.0.0);
        }
        sketch_document_bytes(&list).map_err(|e| KernelError::Serialize(js_message(&e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glue_results_become_points() {
        assert_eq!(
            evaluated("eval", Ok(vec![1.0, 2.0, 3.0])),
            DVec3::new(1.0, 2.0, 3.0)
        );
        assert_eq!(evaluated("eval", Ok(vec![4.0])), DVec3::new(4.0, 0.0, 0.0));
        assert_eq!(interval(Ok(vec![0.0, 2.5])), (0.0, 2.5));
    }

    #[test]
    fn throwing_glue_yields_nan_instead_of_unwinding() {
        assert!(evaluated("eval", Err("deleted object".into())).is_nan());
        let (t0, t1) = interval(Err("deleted object".into()));
        assert!(t0.is_nan() && t1.is_nan());
    }
}
