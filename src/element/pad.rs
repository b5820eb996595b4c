//! Host-visible pin contracts.
//!
//! Pins are the connection points of a filter. Every pin implements [`Pin`];
//! input pins additionally expose [`MemInput`] for buffer transport, and both
//! directions accept [`QualityControl`] notifications.

use super::FilterAdapter;
use crate::component::{Acceptance, MediaObject, SetType, Stream, StreamFlags};
use crate::enumerator::{ComponentTypes, Enumerator, MediaTypeEnumerator};
use crate::error::{Error, Result};
use crate::format::MediaType;
use crate::memory::{AllocatorRequirements, MediaSample, MemoryAllocator};
use crate::negotiation::TypeNegotiator;
use crate::observability::span_connection;
use crate::unknown::{Capability, Unknown, same_object};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, warn};

/// Direction of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinDirection {
    /// Receives buffers from upstream.
    Input,
    /// Sends buffers downstream.
    Output,
}

/// Description of a pin.
#[derive(Clone)]
pub struct PinInfo {
    /// The owning filter, if still alive.
    pub filter: Option<Arc<dyn Unknown>>,
    /// Direction.
    pub direction: PinDirection,
    /// Stable name.
    pub name: String,
}

impl std::fmt::Debug for PinInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinInfo")
            .field("filter", &self.filter.is_some())
            .field("direction", &self.direction)
            .field("name", &self.name)
            .finish()
    }
}

/// Successful outcome of [`Pin::disconnect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnect {
    /// The pin was connected and is now free.
    Disconnected,
    /// The pin had no peer.
    AlreadyDisconnected,
}

/// A typed connection point.
pub trait Pin: Unknown {
    /// Connect to `peer`, negotiating a media type.
    ///
    /// `media_type` may be partially wildcarded; `None` is fully wildcarded.
    fn connect(&self, peer: &Arc<dyn Pin>, media_type: Option<&MediaType>) -> Result<()>;

    /// Accept a connection initiated by `connector` with an exact type.
    fn receive_connection(&self, connector: &Arc<dyn Pin>, media_type: &MediaType) -> Result<()>;

    /// Drop the connection on this side.
    fn disconnect(&self) -> Result<Disconnect>;

    /// The connected peer.
    fn connected_to(&self) -> Result<Arc<dyn Pin>>;

    /// The negotiated media type.
    fn connection_media_type(&self) -> Result<MediaType>;

    /// Owner, direction and name.
    fn pin_info(&self) -> PinInfo;

    /// Direction.
    fn direction(&self) -> PinDirection;

    /// Stable name.
    fn id(&self) -> String;

    /// Whether `media_type` would be accepted.
    fn query_accept(&self, media_type: &MediaType) -> Result<bool>;

    /// Preferred media types.
    fn enum_media_types(&self) -> Result<MediaTypeEnumerator>;

    /// Pins on the same filter this pin routes data to.
    fn query_internal_connections(&self) -> Result<Vec<Arc<dyn Pin>>> {
        Err(Error::NotImplemented)
    }

    /// No more data follows.
    fn end_of_stream(&self) -> Result<()>;

    /// Start discarding data.
    fn begin_flush(&self) -> Result<()>;

    /// Stop discarding data.
    fn end_flush(&self) -> Result<()>;
}

impl std::fmt::Debug for dyn Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pin")
            .field("direction", &self.direction())
            .field("id", &self.id())
            .finish()
    }
}

/// Buffer transport on an input pin.
pub trait MemInput: Send + Sync {
    /// The allocator this pin prefers.
    fn allocator(&self) -> Result<Arc<MemoryAllocator>>;

    /// Tell the pin which allocator the connection uses.
    fn notify_allocator(&self, allocator: Option<Arc<MemoryAllocator>>, read_only: bool)
    -> Result<()>;

    /// Buffer requirements of this pin.
    fn allocator_requirements(&self) -> Result<AllocatorRequirements>;

    /// Deliver one sample.
    fn receive(&self, sample: MediaSample) -> Result<()>;
}

/// Kind of a quality message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityKind {
    /// Data arrives too slowly.
    Famine,
    /// Data arrives too quickly.
    Flood,
}

/// A quality message travelling upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality {
    /// Direction of the problem.
    pub kind: QualityKind,
    /// Requested rate in thousandths of normal.
    pub proportion: u32,
    /// How late (famine) or early (flood) the last sample was.
    pub late: Duration,
    /// Time of the last sample.
    pub timestamp: Duration,
}

/// Receiver of quality messages.
pub trait QualityControl: Send + Sync {
    /// Handle a quality message.
    fn notify(&self, quality: Quality) -> Result<()>;

    /// Route this object's quality messages to `sink`.
    fn set_sink(&self, sink: Option<Arc<dyn QualityControl>>) -> Result<()>;
}

// ============================================================================
// Shared pin state
// ============================================================================

pub(crate) struct Connection {
    pub(crate) peer: Weak<dyn Pin>,
    pub(crate) media_type: MediaType,
}

/// State common to both pin directions.
pub(crate) struct PinCore {
    name: String,
    direction: PinDirection,
    index: u32,
    flags: StreamFlags,
    filter: Weak<FilterAdapter>,
    connection: Mutex<Option<Connection>>,
    flushing: AtomicBool,
    quality_sink: Mutex<Option<Arc<dyn QualityControl>>>,
}

impl PinCore {
    pub(crate) fn new(
        direction: PinDirection,
        index: u32,
        flags: StreamFlags,
        filter: Weak<FilterAdapter>,
    ) -> Self {
        let name = match direction {
            PinDirection::Input => format!("in{index}"),
            PinDirection::Output => format!("out{index}"),
        };
        Self {
            name,
            direction,
            index,
            flags,
            filter,
            connection: Mutex::new(None),
            flushing: AtomicBool::new(false),
            quality_sink: Mutex::new(None),
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn index(&self) -> u32 {
        self.index
    }

    pub(crate) fn flags(&self) -> StreamFlags {
        self.flags
    }

    pub(crate) fn stream(&self) -> Stream {
        match self.direction {
            PinDirection::Input => Stream::Input(self.index),
            PinDirection::Output => Stream::Output(self.index),
        }
    }

    pub(crate) fn filter(&self) -> Result<Arc<FilterAdapter>> {
        self.filter.upgrade().ok_or(Error::Released)
    }

    pub(crate) fn info(&self) -> PinInfo {
        PinInfo {
            filter: self
                .filter
                .upgrade()
                .map(|filter| filter as Arc<dyn Unknown>),
            direction: self.direction,
            name: self.name.clone(),
        }
    }

    /// Drop a connection whose peer has been released, along with the
    /// component's type for this stream.
    fn release_dead_peer(&self) {
        let stale = {
            let mut connection = self.connection.lock();
            match connection.as_ref() {
                Some(c) if c.peer.strong_count() == 0 => connection.take(),
                _ => None,
            }
        };
        if stale.is_none() {
            return;
        }
        warn!(pin = %self.name, "connected peer has been released");
        if let Some(object) = self.filter.upgrade().and_then(|f| f.media_object().ok()) {
            self.clear_type(&*object);
        }
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.release_dead_peer();
        self.connection.lock().is_some()
    }

    pub(crate) fn peer(&self) -> Result<Arc<dyn Pin>> {
        self.release_dead_peer();
        self.connection
            .lock()
            .as_ref()
            .and_then(|c| c.peer.upgrade())
            .ok_or(Error::NotConnected)
    }

    pub(crate) fn media_type(&self) -> Result<MediaType> {
        self.release_dead_peer();
        self.connection
            .lock()
            .as_ref()
            .map(|c| c.media_type.clone())
            .ok_or(Error::NotConnected)
    }

    /// Record a connection. Fails if one already exists.
    pub(crate) fn attach(&self, peer: &Arc<dyn Pin>, media_type: MediaType) -> Result<()> {
        self.release_dead_peer();
        let mut connection = self.connection.lock();
        if connection.is_some() {
            return Err(Error::AlreadyConnected);
        }
        *connection = Some(Connection {
            peer: Arc::downgrade(peer),
            media_type,
        });
        Ok(())
    }

    pub(crate) fn detach(&self) -> Option<Connection> {
        self.connection.lock().take()
    }

    pub(crate) fn is_flushing(&self) -> bool {
        self.flushing.load(Ordering::Acquire)
    }

    pub(crate) fn set_flushing(&self, flushing: bool) {
        self.flushing.store(flushing, Ordering::Release);
    }

    pub(crate) fn quality_sink(&self) -> Option<Arc<dyn QualityControl>> {
        self.quality_sink.lock().clone()
    }

    pub(crate) fn set_quality_sink(&self, sink: Option<Arc<dyn QualityControl>>) {
        *self.quality_sink.lock() = sink;
    }

    /// Ask the component whether it would accept `media_type` on this stream.
    ///
    /// Wildcarded types are never accepted.
    pub(crate) fn test_type(&self, object: &dyn MediaObject, media_type: &MediaType) -> Result<bool> {
        if media_type.has_wildcards() {
            return Ok(false);
        }
        match object.set_type(self.stream(), SetType::Test(media_type)) {
            Ok(acceptance) => Ok(acceptance.is_accepted()),
            Err(Error::TypeNotAccepted) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Push the negotiated type into the component.
    pub(crate) fn commit_type(&self, object: &dyn MediaObject, media_type: &MediaType) -> Result<()> {
        match object.set_type(self.stream(), SetType::Commit(media_type))? {
            Acceptance::Accepted => Ok(()),
            Acceptance::Rejected => Err(Error::TypeNotAccepted),
        }
    }

    /// Unset the component's type for this stream, logging failures.
    pub(crate) fn clear_type(&self, object: &dyn MediaObject) {
        if let Err(e) = object.set_type(self.stream(), SetType::Clear) {
            tracing::warn!(pin = %self.name, error = %e, "failed to clear stream type");
        }
    }

    /// Type acceptance against a connecting peer.
    ///
    /// A type is acceptable when the component accepts it and the peer takes
    /// the connection. A peer rejection moves on to the next candidate.
    pub(crate) fn accept_with_peer(
        &self,
        object: &dyn MediaObject,
        this: &Arc<dyn Pin>,
        peer: &Arc<dyn Pin>,
        media_type: &MediaType,
    ) -> Result<bool> {
        if !self.test_type(object, media_type)? {
            return Ok(false);
        }
        match peer.receive_connection(this, media_type) {
            Ok(()) => Ok(true),
            Err(Error::TypeNotAccepted) => {
                tracing::debug!(pin = %self.name, "peer rejected candidate type");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

// ============================================================================
// Connection protocol
// ============================================================================

impl PinCore {
    /// Candidate types the component offers for this stream.
    pub(crate) fn candidates(&self, object: &Arc<dyn MediaObject>) -> MediaTypeEnumerator {
        Enumerator::new(Arc::new(ComponentTypes::new(object.clone(), self.stream())))
    }

    /// Initiate a connection from `this` to `peer`.
    ///
    /// `complete` runs once the type is committed; its failure rolls the
    /// connection back on both sides.
    pub(crate) fn connect_with<F>(
        &self,
        this: &Arc<dyn Pin>,
        peer: &Arc<dyn Pin>,
        request: Option<&MediaType>,
        complete: F,
    ) -> Result<()>
    where
        F: FnOnce(&FilterAdapter, &Arc<dyn Pin>) -> Result<()>,
    {
        let filter = self.filter()?;
        filter.ensure_stopped()?;
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }
        if same_object(this, peer) {
            return Err(Error::invalid("a pin cannot connect to itself"));
        }
        let object = filter.media_object()?;
        let _span = span_connection(&filter.config().tracing, &self.name).entered();

        let mut negotiator = TypeNegotiator::new(request).with_candidates(self.candidates(&object));
        match peer.enum_media_types() {
            Ok(theirs) => negotiator = negotiator.with_candidates(theirs),
            Err(e) => debug!(pin = %self.name, error = %e, "peer offers no media types"),
        }
        let media_type = negotiator.negotiate(|mt| self.accept_with_peer(&*object, this, peer, mt))?;

        if let Err(e) = self.complete_connection(&filter, &*object, peer, media_type, complete) {
            if let Err(undo) = peer.disconnect() {
                warn!(pin = %self.name, error = %undo, "failed to disconnect peer after rollback");
            }
            return Err(e);
        }
        debug!(pin = %self.name, "connected");
        Ok(())
    }

    /// Accept a connection initiated by `connector`.
    pub(crate) fn receive_with<F>(
        &self,
        connector: &Arc<dyn Pin>,
        media_type: &MediaType,
        complete: F,
    ) -> Result<()>
    where
        F: FnOnce(&FilterAdapter, &Arc<dyn Pin>) -> Result<()>,
    {
        let filter = self.filter()?;
        filter.ensure_stopped()?;
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }
        let object = filter.media_object()?;
        if !self.test_type(&*object, media_type)? {
            debug!(pin = %self.name, "rejected offered media type");
            return Err(Error::TypeNotAccepted);
        }

        self.complete_connection(&filter, &*object, connector, media_type.clone(), complete)?;
        debug!(pin = %self.name, "accepted connection");
        Ok(())
    }

    fn complete_connection<F>(
        &self,
        filter: &FilterAdapter,
        object: &dyn MediaObject,
        peer: &Arc<dyn Pin>,
        media_type: MediaType,
        complete: F,
    ) -> Result<()>
    where
        F: FnOnce(&FilterAdapter, &Arc<dyn Pin>) -> Result<()>,
    {
        self.attach(peer, media_type.clone())?;
        let result = self
            .commit_type(object, &media_type)
            .and_then(|()| complete(filter, peer));
        if let Err(e) = result {
            self.clear_type(object);
            self.detach();
            return Err(e);
        }
        Ok(())
    }

    /// Drop this side of the connection; `release` drops per-direction state.
    pub(crate) fn disconnect_with(&self, release: impl FnOnce()) -> Result<Disconnect> {
        let filter = self.filter()?;
        filter.ensure_stopped()?;
        if self.detach().is_none() {
            return Ok(Disconnect::AlreadyDisconnected);
        }
        self.clear_type(&*filter.media_object()?);
        release();
        debug!(pin = %self.name, "disconnected");
        Ok(Disconnect::Disconnected)
    }
}

/// Query `pin`'s peer for buffer transport.
pub(crate) fn mem_input_of(pin: &Arc<dyn Pin>) -> Result<Arc<dyn MemInput>> {
    pin.query_capability(&Capability::MemInput)?
        .into_mem_input()
        .ok_or(Error::NoInterface(Capability::MemInput))
}
