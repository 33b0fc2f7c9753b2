//! Long-lived viewport, selection and hover state.

pub mod controller;
pub mod easing;

pub use controller::{
    DEFAULT_ANIMATION_DURATION, ListenerId, ViewportAnimation, ViewportController, ViewportEvent,
    ViewportObserver,
};
pub use easing::Easing;
