use crate::core::Rect;
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_series_count: usize,
    pub last_marker_count: usize,
    pub last_full_repaint: bool,
    pub last_paint_rect: Option<Rect>,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_series_count = frame.series.len();
        self.last_marker_count = frame.markers.len();
        self.last_full_repaint = frame.dirty.as_ref().is_none_or(|dirty| dirty.full_repaint);
        self.last_paint_rect = Some(frame.paint_rect());
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
