//! # Parallax wrapper
//!
//! Exposes a self-contained stream-processing component (a *media object*)
//! as a filter with pins inside a pipeline graph.
//!
//! The wrapper owns no processing logic. It translates between the
//! component's model (numbered streams, per-stream type negotiation, size
//! hints, process calls) and the graph's model (named pins, connection
//! negotiation, shared allocators, a stopped/paused/running lifecycle).
//!
//! ## Features
//!
//! - **Capability query**: closed [`Capability`](unknown::Capability) tags
//!   with typed results, plus aggregation through an [`Outer`](unknown::Outer)
//! - **Type negotiation**: wildcard requests resolved against the
//!   component's and the peer's candidate types
//! - **Allocator negotiation**: component size hints reconciled with an
//!   allocator the downstream peer already owns
//! - **Lifecycle**: adjacent-step state machine with flush on stop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parallax_wrapper::prelude::*;
//!
//! let registry = Arc::new(ComponentRegistry::new());
//! registry.register(DECODER_ID, "decoder", categories::AUDIO_DECODER, factory);
//!
//! let filter = FilterAdapter::new(registry);
//! filter.init(&DECODER_ID, &categories::AUDIO_DECODER)?;
//!
//! let sink = filter.find_pin("in0")?;
//! upstream.connect(&sink, None)?;
//! filter.run()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod component;
pub mod config;
pub mod element;
pub mod enumerator;
pub mod error;
pub mod format;
pub mod memory;
pub mod negotiation;
pub mod observability;
pub mod unknown;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::component::{
        Acceptance, ComponentFactory, ComponentRegistry, MediaObject, OutputStatus, SetType,
        SizeHints, Stream, StreamFlags,
    };
    pub use crate::config::WrapperConfig;
    pub use crate::element::{
        Disconnect, FilterAdapter, FilterState, MediaSeeking, MemInput, Pin, PinDirection,
        QualityControl,
    };
    pub use crate::enumerator::{EnumStatus, MediaTypeEnumerator, PinEnumerator};
    pub use crate::error::{Error, Result};
    pub use crate::format::{MediaType, TypeTag, categories, formats, kinds, subtypes};
    pub use crate::memory::{AllocatorProperties, MediaSample, MemoryAllocator};
    pub use crate::unknown::{Capability, Interface, Outer, Unknown};
    pub use std::sync::Arc;
}

pub use error::{Error, Result};
