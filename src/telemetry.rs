//! Tracing setup for applications embedding `chart-geometry`.
//!
//! The crate only emits `tracing` events; installing a subscriber is the
//! host's decision. With the `telemetry` feature enabled the helpers below
//! install a compact `fmt` subscriber filtered through `RUST_LOG`.

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "chart_geometry=info";

/// Installs a compact subscriber using [`DEFAULT_FILTER`] as fallback.
///
/// Returns `false` when the feature is disabled or a global subscriber is
/// already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Installs a compact subscriber with an explicit fallback filter directive,
/// e.g. `"chart_geometry=trace"` while debugging culling or hit-testing.
#[must_use]
pub fn init_tracing_with_filter(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
