//! Wrapper configuration.

use crate::observability::TracingConfig;

/// Default floor for a freshly created output allocator's buffer size.
pub const DEFAULT_MIN_BUFFER_SIZE: u32 = 16 * 1024;

/// Configuration for a [`FilterAdapter`](crate::element::FilterAdapter).
#[derive(Debug, Clone)]
pub struct WrapperConfig {
    /// Minimum buffer size of an allocator the output pin creates itself.
    ///
    /// Also used when the component does not report size hints.
    pub min_buffer_size: u32,

    /// Alignment used when the component does not report size hints.
    pub default_alignment: u32,

    /// Upper bound on the stream count a component may declare.
    pub max_streams: u32,

    /// Maximum `process_output` passes per output stream per input sample.
    pub max_output_passes: usize,

    /// Span configuration.
    pub tracing: TracingConfig,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            min_buffer_size: DEFAULT_MIN_BUFFER_SIZE,
            default_alignment: 1,
            max_streams: 64,
            max_output_passes: 64,
            tracing: TracingConfig::default(),
        }
    }
}

impl WrapperConfig {
    /// Configuration that lets the component dictate buffer sizes exactly.
    ///
    /// No size floor is applied to freshly created allocators.
    pub fn exact_sizes() -> Self {
        Self {
            min_buffer_size: 1,
            ..Self::default()
        }
    }

    /// Set the buffer size floor.
    pub fn with_min_buffer_size(mut self, size: u32) -> Self {
        self.min_buffer_size = size.max(1);
        self
    }

    /// Set the maximum number of output passes.
    pub fn with_max_output_passes(mut self, passes: usize) -> Self {
        self.max_output_passes = passes.max(1);
        self
    }

    /// Set the span configuration.
    pub fn with_tracing(mut self, tracing: TracingConfig) -> Self {
        self.tracing = tracing;
        self
    }
}
