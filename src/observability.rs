//! Tracing integration for structured logging and spans.

use tracing::{Level, Span, span};

/// Configuration for tracing behavior.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Whether to create spans for pin connections.
    pub connection_spans: bool,
    /// Whether to create spans for lifecycle transitions.
    pub state_spans: bool,
    /// Whether to create spans for streaming calls.
    pub streaming_spans: bool,
    /// Level of every span created.
    pub level: Level,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            connection_spans: true,
            state_spans: true,
            streaming_spans: false, // one per sample
            level: Level::DEBUG,
        }
    }
}

impl TracingConfig {
    /// Create a config with all spans enabled.
    pub fn all() -> Self {
        Self {
            connection_spans: true,
            state_spans: true,
            streaming_spans: true,
            level: Level::TRACE,
        }
    }

    /// Disable all spans.
    pub fn none() -> Self {
        Self {
            connection_spans: false,
            state_spans: false,
            streaming_spans: false,
            level: Level::INFO,
        }
    }
}

/// `span!` needs a constant level, so dispatch on the configured one.
macro_rules! span_at {
    ($level:expr, $name:literal, $($fields:tt)*) => {{
        let level = $level;
        if level == Level::ERROR {
            span!(Level::ERROR, $name, $($fields)*)
        } else if level == Level::WARN {
            span!(Level::WARN, $name, $($fields)*)
        } else if level == Level::INFO {
            span!(Level::INFO, $name, $($fields)*)
        } else if level == Level::DEBUG {
            span!(Level::DEBUG, $name, $($fields)*)
        } else {
            span!(Level::TRACE, $name, $($fields)*)
        }
    }};
}

/// Create a span for a connection attempt on a pin.
#[inline]
pub fn span_connection(config: &TracingConfig, pin: &str) -> Span {
    if !config.connection_spans {
        return Span::none();
    }
    span_at!(config.level, "connect", pin = %pin)
}

/// Create a span for a lifecycle transition.
#[inline]
pub fn span_state_change(config: &TracingConfig, filter: &str, target: &str) -> Span {
    if !config.state_spans {
        return Span::none();
    }
    span_at!(config.level, "state_change", filter = %filter, target = %target)
}

/// Create a span for a streaming call on a pin.
#[inline]
pub fn span_streaming(config: &TracingConfig, pin: &str) -> Span {
    if !config.streaming_spans {
        return Span::none();
    }
    span_at!(config.level, "receive", pin = %pin)
}
