use serde::{Deserialize, Serialize};

/// Paint layers of one chart surface, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Series,
    Overlay,
    Crosshair,
    Axis,
}

impl CanvasLayerKind {
    pub const PAINT_ORDER: [Self; 6] = [
        Self::Background,
        Self::Grid,
        Self::Series,
        Self::Overlay,
        Self::Crosshair,
        Self::Axis,
    ];

    /// Layers whose invalidation touches every pixel of the surface.
    #[must_use]
    pub const fn covers_surface(self) -> bool {
        matches!(self, Self::Background)
    }
}
