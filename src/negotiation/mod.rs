//! Connection negotiation.
//!
//! Two steps run when a pin connects:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ TypeNegotiator                                           │
//! │  exact request     → test it directly                    │
//! │  wildcard / absent → first concrete candidate that fits  │
//! │                      the request and is accepted         │
//! ├──────────────────────────────────────────────────────────┤
//! │ AllocatorNegotiator (output pins only)                   │
//! │  component size hints + peer allocator → shared pool     │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod allocator;
mod types;

pub use allocator::AllocatorNegotiator;
pub use types::TypeNegotiator;
