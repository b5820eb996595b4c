//! Allocator selection for an output connection.

use crate::component::SizeHints;
use crate::config::WrapperConfig;
use crate::element::MemInput;
use crate::error::{Error, Result};
use crate::memory::{AllocatorProperties, AllocatorRequirements, MemoryAllocator};
use std::sync::Arc;
use tracing::debug;

/// Reconciles a component's size hints with the downstream peer's allocator.
#[derive(Debug, Clone, Copy)]
pub struct AllocatorNegotiator<'a> {
    config: &'a WrapperConfig,
}

impl<'a> AllocatorNegotiator<'a> {
    /// Create a negotiator using the floors in `config`.
    pub fn new(config: &'a WrapperConfig) -> Self {
        Self { config }
    }

    /// Requirements implied by a stream's size hints.
    ///
    /// The prefix is left to the caller.
    pub fn requirements(hints: &SizeHints) -> AllocatorRequirements {
        AllocatorRequirements {
            count: 1,
            size: hints.size,
            alignment: hints.alignment,
            prefix: None,
        }
    }

    /// Choose the connection's allocator and notify it to `peer`.
    ///
    /// `hints` is the output stream's size hints as reported by the component;
    /// [`Error::NotImplemented`] means the component does not dictate sizes.
    pub fn decide(
        &self,
        hints: Result<SizeHints>,
        peer: &dyn MemInput,
    ) -> Result<Arc<MemoryAllocator>> {
        let hints = match hints {
            Ok(hints) => Some(hints),
            Err(e) if e.is_not_implemented() => None,
            Err(e) => return Err(e),
        };

        let existing = match peer.allocator() {
            Ok(allocator) => Some(allocator),
            Err(Error::NotImplemented) => None,
            Err(e) => return Err(e),
        };

        if let Some(allocator) = existing.filter(|a| a.properties().is_concrete()) {
            let current = allocator.properties();
            if let Some(hints) = hints {
                let raised = AllocatorProperties {
                    size: current.size.max(hints.size),
                    alignment: current.alignment.max(hints.alignment),
                    ..current
                };
                if raised != current {
                    debug!(
                        from = current.size,
                        to = raised.size,
                        "raising peer allocator to component minimum"
                    );
                    allocator.set_properties(&raised)?;
                }
            }
            peer.notify_allocator(Some(allocator.clone()), false)?;
            return Ok(allocator);
        }

        let size = hints
            .map(|h| h.size)
            .unwrap_or(0)
            .max(self.config.min_buffer_size);
        let alignment = hints
            .map(|h| h.alignment)
            .unwrap_or(self.config.default_alignment)
            .max(1);
        let allocator =
            MemoryAllocator::with_properties(&AllocatorProperties::new(1, size, alignment, 0))?;
        debug!(size, alignment, "created output allocator");

        peer.notify_allocator(Some(allocator.clone()), false)?;
        Ok(allocator)
    }
}
