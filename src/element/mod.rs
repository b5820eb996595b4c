//! Filter and pins exposed to the host graph.
//!
//! - [`FilterAdapter`]: binds a component, owns the pin set, drives lifecycle
//! - [`InputPin`] / [`OutputPin`]: one per component stream, named `in<i>` /
//!   `out<i>`
//! - [`Pin`], [`MemInput`], [`QualityControl`], [`MediaSeeking`]: the
//!   host-facing contracts, also implemented by peers
//!
//! # Ownership
//!
//! The filter owns its pins and the component. Pins refer back to the filter
//! and to their peer through `Weak` handles; a call on a pin whose filter has
//! been released fails with [`Error::Released`](crate::Error::Released).
//! Calls never hold a lock while entering a peer or the component.

mod filter;
mod input;
mod output;
mod pad;
mod seeking;
mod state;

pub use filter::{FilterAdapter, FilterInfo};
pub use input::InputPin;
pub use output::OutputPin;
pub use pad::{
    Disconnect, MemInput, Pin, PinDirection, PinInfo, Quality, QualityControl, QualityKind,
};
pub use seeking::{MediaSeeking, SeekingFlags};
pub use state::FilterState;
