// World <-> screen mapping for the fixed viewport
use glam::DVec3;

use crate::error::KernelError;
use crate::kernel::{CoordinateSystem, GeometryKernel};
use crate::model::{ScreenPoint, ViewState, WorldPoint, sketch_point};

/// Maps between world and screen space for one [`ViewState`].
///
/// Transforms are rebuilt through the kernel on every call rather than cached,
/// so a future viewport change needs no invalidation.
#[derive(Debug, Clone)]
pub struct ViewMapper {
    view: ViewState,
}

impl ViewMapper {
    pub fn new(view: ViewState) -> Self {
        Self { view }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn world_to_screen<K: GeometryKernel>(
        &self,
        kernel: &K,
        p: WorldPoint,
    ) -> Result<ScreenPoint, KernelError> {
        let w2s = self.projection(kernel, CoordinateSystem::World, CoordinateSystem::Screen)?;
        Ok(w2s.screen(p))
    }

    /// Pointer position to a point on the sketch plane (z = 0).
    pub fn screen_to_world<K: GeometryKernel>(
        &self,
        kernel: &K,
        p: ScreenPoint,
    ) -> Result<WorldPoint, KernelError> {
        let s2w = self.projection(kernel, CoordinateSystem::Screen, CoordinateSystem::World)?;
        let w = s2w.apply(DVec3::new(p.x, p.y, 0.0));
        Ok(sketch_point(w.x, w.y))
    }

    /// A transform held for a batch of points, e.g. one rendered frame.
    /// The kernel transform is released when the projection drops.
    pub fn projection<'k, K: GeometryKernel>(
        &self,
        kernel: &'k K,
        from: CoordinateSystem,
        to: CoordinateSystem,
    ) -> Result<Projection<'k, K>, KernelError> {
        let transform = kernel.build_transform(from, to, &self.view)?;
        Ok(Projection { kernel, transform })
    }
}

pub struct Projection<'k, K: GeometryKernel> {
    kernel: &'k K,
    transform: K::Transform,
}

impl<K: GeometryKernel> Projection<'_, K> {
    pub fn apply(&self, p: WorldPoint) -> WorldPoint {
        self.kernel.apply_transform(&self.transform, p)
    }

    /// Applies the transform and drops depth.
    pub fn screen(&self, p: WorldPoint) -> ScreenPoint {
        self.apply(p).truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::fake::FakeKernel;
    use crate::model::{ScreenRect, WorldRect};
    use approx::assert_relative_eq;
    use glam::DVec2;

    fn mapper() -> ViewMapper {
        let view = ViewState::new(
            WorldRect {
                xmin: -30.0,
                xmax: 30.0,
                ymin: -30.0,
                ymax: 30.0,
            },
            ScreenRect {
                x: 0.0,
                y: 0.0,
                width: 600.0,
                height: 400.0,
            },
            1.0,
            1000.0,
        )
        .unwrap();
        ViewMapper::new(view)
    }

    #[test]
    fn world_origin_maps_to_screen_center() {
        let k = FakeKernel::new();
        let s = mapper().world_to_screen(&k, sketch_point(0.0, 0.0)).unwrap();
        assert_relative_eq!(s.x, 300.0);
        assert_relative_eq!(s.y, 200.0);
    }

    #[test]
    fn screen_y_grows_downward() {
        let k = FakeKernel::new();
        let m = mapper();
        let up = m.world_to_screen(&k, sketch_point(0.0, 10.0)).unwrap();
        let down = m.world_to_screen(&k, sketch_point(0.0, -10.0)).unwrap();
        assert!(up.y < down.y);
        let top_left = m.screen_to_world(&k, DVec2::new(0.0, 0.0)).unwrap();
        assert_relative_eq!(top_left.x, -30.0);
        assert_relative_eq!(top_left.y, 30.0);
    }

    #[test]
    fn round_trip_inside_visible_region() {
        let k = FakeKernel::new();
        let m = mapper();
        let mut x = -30.0;
        while x <= 30.0 {
            let mut y = -30.0;
            while y <= 30.0 {
                let p = sketch_point(x, y);
                assert!(m.view().visible().contains(p));
                let back = m
                    .screen_to_world(&k, m.world_to_screen(&k, p).unwrap())
                    .unwrap();
                assert_relative_eq!(back.x, p.x, epsilon = 1e-9);
                assert_relative_eq!(back.y, p.y, epsilon = 1e-9);
                assert_eq!(back.z, 0.0);
                y += 7.5;
            }
            x += 7.5;
        }
    }

    #[test]
    fn every_call_releases_its_transform() {
        let k = FakeKernel::new();
        let m = mapper();
        for _ in 0..3 {
            m.world_to_screen(&k, sketch_point(1.0, 2.0)).unwrap();
            m.screen_to_world(&k, DVec2::new(5.0, 5.0)).unwrap();
        }
        assert_eq!(k.transforms_built.get(), 6);
        assert_eq!(k.live_handles(), 0);
        {
            let _p = m
                .projection(&k, CoordinateSystem::World, CoordinateSystem::Screen)
                .unwrap();
            assert_eq!(k.live_handles(), 1);
        }
        assert_eq!(k.live_handles(), 0);
    }

    #[test]
    fn transform_failure_propagates() {
        let k = FakeKernel::new();
        k.fail_transforms.set(true);
        assert!(matches!(
            mapper().screen_to_world(&k, DVec2::ZERO),
            Err(KernelError::Transform(_))
        ));
    }
}
