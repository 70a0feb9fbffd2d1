pub mod accumulator;
pub mod curves;
pub mod view;

pub use accumulator::{MIN_FINALIZE_POINTS, PointAccumulator};
pub use curves::CurveStore;
pub use view::{Projection, ViewMapper};
