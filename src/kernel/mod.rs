//! Seam to the external geometry kernel.
//!
//! The kernel owns every curve and transform object and does not garbage
//! collect them. Handle types returned here release their kernel object when
//! dropped, so a transient handle lives exactly as long as the scope that
//! created it, and finalized curves live as long as the store that owns them.

use crate::error::KernelError;
use crate::model::{ViewState, WorldPoint};

#[cfg(test)]
pub mod fake;
pub mod rhino;

pub use rhino::Rhino3dm;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinateSystem {
    World,
    Screen,
}

pub trait GeometryKernel {
    /// NURBS curve handle; released on drop.
    type Curve;
    /// Point transform handle; released on drop.
    type Transform;

    fn create_curve(
        &self,
        closed: bool,
        degree: usize,
        points: &[WorldPoint],
    ) -> Result<Self::Curve, KernelError>;

    /// Parameter interval `(t_min, t_max)`.
    fn domain(&self, curve: &Self::Curve) -> (f64, f64);

    /// Evaluation does not fail; a kernel that cannot evaluate returns NaN
    /// coordinates.
    fn point_at(&self, curve: &Self::Curve, t: f64) -> WorldPoint;

    fn build_transform(
        &self,
        from: CoordinateSystem,
        to: CoordinateSystem,
        view: &ViewState,
    ) -> Result<Self::Transform, KernelError>;

    fn apply_transform(&self, transform: &Self::Transform, point: WorldPoint) -> WorldPoint;

    /// Bytes of a native document holding `curves`. Any temporary document
    /// object is released before returning.
    fn serialize_document(&self, curves: &[Self::Curve]) -> Result<Vec<u8>, KernelError>;
}
