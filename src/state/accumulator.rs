use crate::error::InsufficientPoints;
use crate::model::WorldPoint;

/// Fewest accumulated points `finalize` accepts: three committed plus the live one.
pub const MIN_FINALIZE_POINTS: usize = 4;

/// Points of the curve being sketched, in click order.
///
/// The last point, when present, is the live point that follows the pointer.
/// The first click stores its point twice so a live segment exists at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointAccumulator {
    points: Vec<WorldPoint>,
}

impl PointAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    pub fn live(&self) -> Option<WorldPoint> {
        self.points.last().copied()
    }

    /// Commits the current live point where it is and starts a new one at `p`.
    pub fn begin_stroke(&mut self, p: WorldPoint) {
        if self.points.is_empty() {
            self.points.push(p);
        }
        self.points.push(p);
    }

    pub fn update_live(&mut self, p: WorldPoint) {
        if let Some(last) = self.points.last_mut() {
            *last = p;
        }
    }

    /// Drops the live point and hands back the committed ones, leaving the
    /// accumulator empty. Fails without touching anything below the threshold.
    pub fn finalize(&mut self) -> Result<Vec<WorldPoint>, InsufficientPoints> {
        if self.points.len() < MIN_FINALIZE_POINTS {
            return Err(InsufficientPoints {
                count: self.points.len(),
            });
        }
        let committed = self.points[..self.points.len() - 1].to_vec();
        self.clear();
        Ok(committed)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sketch_point;

    #[test]
    fn first_stroke_duplicates_the_point() {
        let mut acc = PointAccumulator::new();
        let p = sketch_point(1.0, 2.0);
        acc.begin_stroke(p);
        assert_eq!(acc.len(), 2);
        assert_eq!(acc.points()[0], p);
        assert_eq!(acc.points()[1], p);
    }

    #[test]
    fn second_stroke_freezes_previous_live_point() {
        let mut acc = PointAccumulator::new();
        acc.begin_stroke(sketch_point(0.0, 0.0));
        acc.update_live(sketch_point(3.0, 4.0));
        let q = sketch_point(10.0, 0.0);
        acc.begin_stroke(q);
        assert_eq!(acc.len(), 3);
        assert_eq!(acc.points()[1], sketch_point(3.0, 4.0));
        assert_eq!(acc.live(), Some(q));
    }

    #[test]
    fn update_live_only_touches_last_point() {
        let mut acc = PointAccumulator::new();
        acc.begin_stroke(sketch_point(0.0, 0.0));
        acc.begin_stroke(sketch_point(1.0, 0.0));
        acc.begin_stroke(sketch_point(2.0, 0.0));
        let before = acc.points().to_vec();
        acc.update_live(sketch_point(9.0, 9.0));
        assert_eq!(&acc.points()[..3], &before[..3]);
        assert_eq!(acc.live(), Some(sketch_point(9.0, 9.0)));
    }

    #[test]
    fn update_live_on_empty_is_noop() {
        let mut acc = PointAccumulator::new();
        acc.update_live(sketch_point(1.0, 1.0));
        assert!(acc.is_empty());
        assert_eq!(acc.live(), None);
    }

    #[test]
    fn finalize_below_threshold_leaves_points() {
        let mut acc = PointAccumulator::new();
        assert_eq!(acc.finalize(), Err(InsufficientPoints { count: 0 }));
        acc.begin_stroke(sketch_point(0.0, 0.0));
        acc.begin_stroke(sketch_point(1.0, 0.0));
        let before = acc.clone();
        assert_eq!(acc.finalize(), Err(InsufficientPoints { count: 3 }));
        assert_eq!(acc, before);
    }

    #[test]
    fn finalize_drops_live_point_and_clears() {
        let mut acc = PointAccumulator::new();
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
            acc.begin_stroke(sketch_point(x, y));
        }
        acc.update_live(sketch_point(-1.0, 5.0));
        let before = acc.points().to_vec();
        assert_eq!(before.len(), 5);
        let committed = acc.finalize().unwrap();
        assert_eq!(committed, before[..4].to_vec());
        assert!(acc.is_empty());
    }

    #[test]
    fn clear_empties_unconditionally() {
        let mut acc = PointAccumulator::new();
        acc.clear();
        acc.begin_stroke(sketch_point(0.0, 0.0));
        acc.clear();
        assert!(acc.is_empty());
    }
}
