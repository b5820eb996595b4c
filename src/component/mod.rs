//! The wrapped component boundary.
//!
//! - [`MediaObject`]: what a component must implement to be wrapped
//! - [`ComponentFactory`]: creates (aggregated) instances
//! - [`ComponentRegistry`]: maps class ids to factories

mod registry;
mod traits;

pub use registry::{ComponentRegistry, Registration};
pub use traits::{
    Acceptance, ComponentFactory, MediaObject, OutputStatus, SetType, SizeHints, Stream,
    StreamFlags,
};
