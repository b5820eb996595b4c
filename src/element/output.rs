//! Output pins.

use super::pad::{PinCore, mem_input_of};
use super::{
    Disconnect, FilterAdapter, MemInput, Pin, PinDirection, PinInfo, Quality, QualityControl,
};
use crate::component::{SizeHints, StreamFlags};
use crate::enumerator::MediaTypeEnumerator;
use crate::error::{Error, Result};
use crate::format::MediaType;
use crate::memory::{MediaSample, MemoryAllocator};
use crate::negotiation::AllocatorNegotiator;
use crate::unknown::{Capability, Interface, Unknown};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Downstream side of an established connection.
#[derive(Clone)]
pub(crate) struct Downstream {
    pub(crate) allocator: Arc<MemoryAllocator>,
    pub(crate) input: Weak<dyn MemInput>,
}

/// Output pin delivering one of the component's output streams.
pub struct OutputPin {
    this: Weak<OutputPin>,
    core: PinCore,
    downstream: Mutex<Option<Downstream>>,
}

impl OutputPin {
    pub(crate) fn new(filter: Weak<FilterAdapter>, index: u32, flags: StreamFlags) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            core: PinCore::new(PinDirection::Output, index, flags, filter),
            downstream: Mutex::new(None),
        })
    }

    fn this(&self) -> Result<Arc<OutputPin>> {
        self.this.upgrade().ok_or(Error::Released)
    }

    pub(crate) fn core(&self) -> &PinCore {
        &self.core
    }

    /// Stream index.
    pub fn index(&self) -> u32 {
        self.core.index()
    }

    /// Whether the pin has a peer.
    pub fn is_connected(&self) -> bool {
        self.core.is_connected()
    }

    /// The allocator negotiated for the current connection.
    pub fn allocator(&self) -> Option<Arc<MemoryAllocator>> {
        self.downstream().map(|d| d.allocator)
    }

    pub(crate) fn downstream(&self) -> Option<Downstream> {
        if !self.core.is_connected() {
            self.downstream.lock().take();
            return None;
        }
        self.downstream.lock().clone()
    }

    fn negotiate_allocator(&self, filter: &FilterAdapter, peer: &Arc<dyn Pin>) -> Result<()> {
        let input = mem_input_of(peer)?;
        let hints: Result<SizeHints> = filter.media_object()?.size_hints(self.core.stream());
        let allocator = AllocatorNegotiator::new(filter.config()).decide(hints, &*input)?;
        debug!(
            pin = %self.core.name(),
            properties = ?allocator.properties(),
            "allocator negotiated"
        );
        *self.downstream.lock() = Some(Downstream {
            allocator,
            input: Arc::downgrade(&input),
        });
        Ok(())
    }

    /// Deliver a sample to the connected input.
    pub(crate) fn deliver(&self, downstream: &Downstream, sample: MediaSample) -> Result<()> {
        let input = downstream.input.upgrade().ok_or(Error::NotConnected)?;
        trace!(pin = %self.core.name(), len = sample.len(), "deliver");
        input.receive(sample)
    }

    /// Quality messages go to the explicit sink, else upstream.
    fn route_quality(&self, quality: Quality) -> Result<()> {
        if let Some(sink) = self.core.quality_sink() {
            return sink.notify(quality);
        }
        let filter = self.core.filter()?;
        for peer in filter.upstream_peers() {
            let Some(upstream) = peer
                .query_capability(&Capability::QualityControl)
                .ok()
                .and_then(Interface::into_quality_control)
            else {
                continue;
            };
            return upstream.notify(quality);
        }
        Err(Error::NotImplemented)
    }
}

impl Unknown for OutputPin {
    fn query_capability(&self, capability: &Capability) -> Result<Interface> {
        let this = self.this()?;
        match capability {
            Capability::Unknown => Ok(Interface::Unknown(this)),
            Capability::Pin => Ok(Interface::Pin(this)),
            Capability::MediaSeeking | Capability::MediaPosition => Ok(Interface::Seeking(this)),
            Capability::QualityControl => Ok(Interface::QualityControl(this)),
            other => Err(Error::NoInterface(*other)),
        }
    }
}

impl Pin for OutputPin {
    fn connect(&self, peer: &Arc<dyn Pin>, media_type: Option<&MediaType>) -> Result<()> {
        if peer.direction() == PinDirection::Output {
            return Err(Error::invalid("cannot connect two output pins"));
        }
        let this: Arc<dyn Pin> = self.this()?;
        self.core.connect_with(&this, peer, media_type, |filter, peer| {
            self.negotiate_allocator(filter, peer)
        })
    }

    fn receive_connection(&self, connector: &Arc<dyn Pin>, media_type: &MediaType) -> Result<()> {
        if connector.direction() == PinDirection::Output {
            return Err(Error::invalid("cannot connect two output pins"));
        }
        self.core.receive_with(connector, media_type, |filter, peer| {
            self.negotiate_allocator(filter, peer)
        })
    }

    fn disconnect(&self) -> Result<Disconnect> {
        self.core.disconnect_with(|| {
            self.downstream.lock().take();
        })
    }

    fn connected_to(&self) -> Result<Arc<dyn Pin>> {
        self.core.peer()
    }

    fn connection_media_type(&self) -> Result<MediaType> {
        self.core.media_type()
    }

    fn pin_info(&self) -> PinInfo {
        self.core.info()
    }

    fn direction(&self) -> PinDirection {
        PinDirection::Output
    }

    fn id(&self) -> String {
        self.core.name().to_string()
    }

    fn query_accept(&self, media_type: &MediaType) -> Result<bool> {
        let object = self.core.filter()?.media_object()?;
        self.core.test_type(&*object, media_type)
    }

    fn enum_media_types(&self) -> Result<MediaTypeEnumerator> {
        let object = self.core.filter()?.media_object()?;
        Ok(self.core.candidates(&object))
    }

    // streaming control travels downstream into input pins only

    fn end_of_stream(&self) -> Result<()> {
        Err(Error::NotImplemented)
    }

    fn begin_flush(&self) -> Result<()> {
        Err(Error::NotImplemented)
    }

    fn end_flush(&self) -> Result<()> {
        Err(Error::NotImplemented)
    }
}

impl QualityControl for OutputPin {
    fn notify(&self, quality: Quality) -> Result<()> {
        trace!(pin = %self.core.name(), ?quality, "quality notification");
        self.route_quality(quality)
    }

    fn set_sink(&self, sink: Option<Arc<dyn QualityControl>>) -> Result<()> {
        self.core.set_quality_sink(sink);
        Ok(())
    }
}

impl std::fmt::Debug for OutputPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputPin")
            .field("name", &self.core.name())
            .field("connected", &self.core.is_connected())
            .finish()
    }
}
