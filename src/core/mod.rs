pub mod bounds;
pub mod culling;
pub mod hit_index;
pub mod interpolation;
pub mod primitives;
pub mod transform;
pub mod types;
pub mod viewport;

pub use bounds::{Bounds, DEFAULT_TOP_PADDING_RATIO};
pub use culling::{CullResult, DEFAULT_CULL_MARGIN_RATIO, DEFAULT_CULL_THRESHOLD, ViewportCuller};
pub use hit_index::{HitRegion, HitResult, SpatialHitIndex};
pub use interpolation::{
    CardinalInterpolator, CatmullRomInterpolator, CurveInterpolator, CurvePath, Interpolation,
    LinearInterpolator, MonotoneCubicInterpolator, PathCommand, StepInterpolator, StepPosition,
};
pub use transform::{CoordinateTransform, TransformKey};
pub use types::{DataPointIndex, Point2D, Rect, XValue};
pub use viewport::{Viewport, ZoomLimits};
