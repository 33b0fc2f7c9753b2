//! Host-facing engine facade and its configuration.

mod engine;
mod engine_config;

pub use engine::{ChartEngine, FrameStats, SeriesData};
pub use engine_config::ChartEngineConfig;
