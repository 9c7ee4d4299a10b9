/*!
 * Structured Tracing
 * Span-per-call instrumentation using the tracing crate
 */

use std::time::Instant;
use tracing::{span, trace, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing for the embedding process.
///
/// Environment variables:
/// - `RUST_LOG`: log filter (default: info)
/// - `SHIM_TRACE_JSON`: emit JSON instead of human-readable output
///
/// Call at most once; later calls are ignored so embedders and tests can
/// both initialize safely.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SHIM_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        let _ = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init();
    } else {
        let _ = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init();
    }
}

/// Span wrapping one guest syscall, from dispatch to return.
pub struct CallSpan {
    _span: Span,
    name: String,
    start: Instant,
}

impl CallSpan {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let span = span!(
            Level::TRACE,
            "syscall",
            call = %name,
            ret = tracing::field::Empty,
            error = tracing::field::Empty,
        );
        Self {
            _span: span,
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self._span.enter()
    }

    pub fn record_ret(&self, ret: i32) {
        self._span.record("ret", ret);
    }

    pub fn record_error(&self, error: &str) {
        self._span.record("error", error);
    }
}

impl Drop for CallSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self._span.enter();
        if duration.as_millis() > 10 {
            warn!(
                call = %self.name,
                duration_us = duration.as_micros() as u64,
                slow = true,
                "slow syscall"
            );
        } else {
            trace!(
                call = %self.name,
                duration_us = duration.as_micros() as u64,
                "syscall completed"
            );
        }
    }
}

/// Helper to open a call span.
#[inline]
pub fn span_call(name: &str) -> CallSpan {
    CallSpan::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_records_without_subscriber() {
        // must not panic with no subscriber installed
        let span = span_call("getuid");
        let _guard = span.enter();
        span.record_ret(0);
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing();
        init_tracing();
    }
}
