//! chart-geometry: rendering geometry and interaction core for charts.
//!
//! The crate maps data space to screen space, turns series into drawable
//! curves, culls off-screen data, resolves pointer hits and keeps redraws
//! cheap through bounded caches. Drawing itself is delegated to a
//! [`render::Renderer`] implementation.

pub mod api;
pub mod cache;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig, FrameStats};
pub use error::{ChartError, ChartResult};
