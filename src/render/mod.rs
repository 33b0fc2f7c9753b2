mod frame;
mod layer_stack;
mod null_renderer;

pub use frame::{MarkerState, PointMarker, RenderFrame, SeriesGeometry};
pub use layer_stack::CanvasLayerKind;
pub use null_renderer::NullRenderer;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame` in screen space so
/// drawing code stays isolated from geometry and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
