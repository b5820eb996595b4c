//! Capability query and aggregation primitives.
//!
//! Every object in the graph answers [`Unknown::query_capability`] for a
//! closed set of [`Capability`] tags, returning a typed [`Interface`].
//! Reference counting is the `Arc` strong count; owned children are released
//! by `Drop` when the last reference goes away, and back-references are held
//! as `Weak` handles that are checked on every use.
//!
//! An object embedded in a composite holds an [`Outer`] delegate. Its
//! delegating entry points forward to the outer object exactly once; the outer
//! object in turn answers from the embedded object's non-delegating identity,
//! so a query never re-enters the object it started from.

use crate::component::MediaObject;
use crate::element::{FilterAdapter, MediaSeeking, MemInput, Pin, QualityControl};
use crate::error::{Error, Result};
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Capability tags understood by the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The generic reference-counted identity.
    Unknown,
    /// Host-facing filter surface (pins, find, info).
    Filter,
    /// Lifecycle control.
    MediaFilter,
    /// Class id reporting.
    Persist,
    /// Binding of the wrapped component.
    WrapperFilter,
    /// Pin connection surface.
    Pin,
    /// Buffer transport and allocator negotiation on input pins.
    MemInput,
    /// Seeking on output pins.
    MediaSeeking,
    /// Position reporting on output pins.
    MediaPosition,
    /// Quality notifications.
    QualityControl,
    /// A clock source.
    ReferenceClock,
    /// Pull-mode reading.
    AsyncReader,
    /// Property sets.
    PropertySet,
    /// The wrapped component's native capability.
    MediaObject,
    /// Any other capability, identified by id.
    Custom(Uuid),
}

/// A typed reference returned by a capability query.
#[derive(Clone)]
pub enum Interface {
    /// Generic identity.
    Unknown(Arc<dyn Unknown>),
    /// The wrapper filter itself (filter, media-filter, persist, wrapper).
    Filter(Arc<FilterAdapter>),
    /// A pin.
    Pin(Arc<dyn Pin>),
    /// An input pin's transport surface.
    MemInput(Arc<dyn MemInput>),
    /// Seeking / position surface.
    Seeking(Arc<dyn MediaSeeking>),
    /// Quality notifications.
    QualityControl(Arc<dyn QualityControl>),
    /// A wrapped component.
    MediaObject(Arc<dyn MediaObject>),
}

impl Interface {
    /// Address of the underlying object, for identity comparison.
    pub fn addr(&self) -> *const () {
        match self {
            Self::Unknown(o) => Arc::as_ptr(o) as *const (),
            Self::Filter(o) => Arc::as_ptr(o) as *const (),
            Self::Pin(o) => Arc::as_ptr(o) as *const (),
            Self::MemInput(o) => Arc::as_ptr(o) as *const (),
            Self::Seeking(o) => Arc::as_ptr(o) as *const (),
            Self::QualityControl(o) => Arc::as_ptr(o) as *const (),
            Self::MediaObject(o) => Arc::as_ptr(o) as *const (),
        }
    }

    /// Whether both references point at the same object.
    pub fn same_object(&self, other: &Interface) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }

    /// Take the filter reference.
    pub fn into_filter(self) -> Option<Arc<FilterAdapter>> {
        match self {
            Self::Filter(f) => Some(f),
            _ => None,
        }
    }

    /// Take the pin reference.
    pub fn into_pin(self) -> Option<Arc<dyn Pin>> {
        match self {
            Self::Pin(p) => Some(p),
            _ => None,
        }
    }

    /// Take the transport reference.
    pub fn into_mem_input(self) -> Option<Arc<dyn MemInput>> {
        match self {
            Self::MemInput(m) => Some(m),
            _ => None,
        }
    }

    /// Take the seeking reference.
    pub fn into_seeking(self) -> Option<Arc<dyn MediaSeeking>> {
        match self {
            Self::Seeking(s) => Some(s),
            _ => None,
        }
    }

    /// Take the quality-control reference.
    pub fn into_quality_control(self) -> Option<Arc<dyn QualityControl>> {
        match self {
            Self::QualityControl(q) => Some(q),
            _ => None,
        }
    }

    /// Take the component reference.
    pub fn into_media_object(self) -> Option<Arc<dyn MediaObject>> {
        match self {
            Self::MediaObject(m) => Some(m),
            _ => None,
        }
    }

    /// Take the generic identity.
    pub fn into_unknown(self) -> Option<Arc<dyn Unknown>> {
        match self {
            Self::Unknown(u) => Some(u),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Unknown(_) => "Unknown",
            Self::Filter(_) => "Filter",
            Self::Pin(_) => "Pin",
            Self::MemInput(_) => "MemInput",
            Self::Seeking(_) => "Seeking",
            Self::QualityControl(_) => "QualityControl",
            Self::MediaObject(_) => "MediaObject",
        };
        f.debug_tuple(kind).field(&self.addr()).finish()
    }
}

/// Capability query, implemented once per object kind.
pub trait Unknown: Send + Sync {
    /// Return a reference to this object's implementation of `capability`.
    ///
    /// Fails with [`Error::NoInterface`] for unsupported capabilities.
    fn query_capability(&self, capability: &Capability) -> Result<Interface>;
}

/// Whether two `Arc`s (possibly of different pointee types) share an object.
pub fn same_object<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Delegation target of an object embedded in a composite.
#[derive(Clone, Default)]
pub struct Outer(Option<Weak<dyn Unknown>>);

impl Outer {
    /// A standalone object.
    pub fn none() -> Self {
        Self(None)
    }

    /// Delegate to `outer` without keeping it alive.
    pub fn new(outer: &Arc<dyn Unknown>) -> Self {
        Self(Some(Arc::downgrade(outer)))
    }

    /// Delegate to an already weak outer reference.
    pub fn from_weak(outer: Weak<dyn Unknown>) -> Self {
        Self(Some(outer))
    }

    /// Whether this object is embedded in a composite.
    pub fn is_aggregated(&self) -> bool {
        self.0.is_some()
    }

    /// The outer object, if still alive.
    pub fn get(&self) -> Option<Arc<dyn Unknown>> {
        self.0.as_ref().and_then(Weak::upgrade)
    }

    /// Forward a query to the outer object.
    ///
    /// Returns `None` when not aggregated, so the caller answers itself.
    pub fn forward(&self, capability: &Capability) -> Option<Result<Interface>> {
        let weak = self.0.as_ref()?;
        Some(match weak.upgrade() {
            Some(outer) => outer.query_capability(capability),
            None => Err(Error::Released),
        })
    }
}

impl std::fmt::Debug for Outer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outer")
            .field("aggregated", &self.is_aggregated())
            .field("alive", &self.get().is_some())
            .finish()
    }
}
