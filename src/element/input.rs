//! Input pins.

use super::pad::PinCore;
use super::{
    Disconnect, FilterAdapter, MemInput, Pin, PinDirection, PinInfo, Quality, QualityControl,
};
use crate::component::StreamFlags;
use crate::enumerator::MediaTypeEnumerator;
use crate::error::{Error, Result};
use crate::format::MediaType;
use crate::memory::{AllocatorRequirements, MediaSample, MemoryAllocator};
use crate::negotiation::AllocatorNegotiator;
use crate::observability::span_streaming;
use crate::unknown::{Capability, Interface, Unknown};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Input pin feeding one of the component's input streams.
pub struct InputPin {
    this: Weak<InputPin>,
    core: PinCore,
    allocator: Mutex<Option<Arc<MemoryAllocator>>>,
}

impl InputPin {
    pub(crate) fn new(filter: Weak<FilterAdapter>, index: u32, flags: StreamFlags) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            core: PinCore::new(PinDirection::Input, index, flags, filter),
            allocator: Mutex::new(None),
        })
    }

    fn this(&self) -> Result<Arc<InputPin>> {
        self.this.upgrade().ok_or(Error::Released)
    }

    fn as_pin(&self) -> Result<Arc<dyn Pin>> {
        Ok(self.this()? as Arc<dyn Pin>)
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

    /// Forget an allocator left over from a connection that is gone.
    fn drop_stale_allocator(&self) {
        if !self.core.is_connected() {
            self.allocator.lock().take();
        }
    }

    /// Check that streaming calls may proceed.
    fn ensure_streaming(&self, filter: &FilterAdapter) -> Result<()> {
        if !filter.state().is_active() {
            return Err(Error::WrongState);
        }
        if !self.core.is_connected() {
            return Err(Error::NotConnected);
        }
        if self.core.is_flushing() {
            return Err(Error::Flushing);
        }
        Ok(())
    }
}

impl Unknown for InputPin {
    fn query_capability(&self, capability: &Capability) -> Result<Interface> {
        let this = self.this()?;
        match capability {
            Capability::Unknown => Ok(Interface::Unknown(this)),
            Capability::Pin => Ok(Interface::Pin(this)),
            Capability::MemInput => Ok(Interface::MemInput(this)),
            Capability::QualityControl => Ok(Interface::QualityControl(this)),
            other => Err(Error::NoInterface(*other)),
        }
    }
}

impl Pin for InputPin {
    fn connect(&self, peer: &Arc<dyn Pin>, media_type: Option<&MediaType>) -> Result<()> {
        if peer.direction() == PinDirection::Input {
            return Err(Error::invalid("cannot connect two input pins"));
        }
        self.drop_stale_allocator();
        self.core
            .connect_with(&self.as_pin()?, peer, media_type, |_, _| Ok(()))
    }

    fn receive_connection(&self, connector: &Arc<dyn Pin>, media_type: &MediaType) -> Result<()> {
        if connector.direction() == PinDirection::Input {
            return Err(Error::invalid("cannot connect two input pins"));
        }
        self.drop_stale_allocator();
        self.core.receive_with(connector, media_type, |_, _| Ok(()))
    }

    fn disconnect(&self) -> Result<Disconnect> {
        self.core.disconnect_with(|| {
            self.allocator.lock().take();
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
        PinDirection::Input
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

    fn end_of_stream(&self) -> Result<()> {
        let filter = self.core.filter()?;
        if !self.core.is_connected() {
            return Err(Error::NotConnected);
        }
        if self.core.is_flushing() {
            return Err(Error::Flushing);
        }
        debug!(pin = %self.core.name(), "end of stream");
        filter.media_object()?.discontinuity(self.core.index())?;
        filter.drain_outputs()?;
        for peer in filter.downstream_peers() {
            peer.end_of_stream()?;
        }
        Ok(())
    }

    fn begin_flush(&self) -> Result<()> {
        let filter = self.core.filter()?;
        self.core.set_flushing(true);
        filter.media_object()?.flush()?;
        for peer in filter.downstream_peers() {
            peer.begin_flush()?;
        }
        Ok(())
    }

    fn end_flush(&self) -> Result<()> {
        let filter = self.core.filter()?;
        self.core.set_flushing(false);
        for peer in filter.downstream_peers() {
            peer.end_flush()?;
        }
        Ok(())
    }
}

impl MemInput for InputPin {
    fn allocator(&self) -> Result<Arc<MemoryAllocator>> {
        Ok(self
            .allocator
            .lock()
            .get_or_insert_with(MemoryAllocator::new)
            .clone())
    }

    fn notify_allocator(
        &self,
        allocator: Option<Arc<MemoryAllocator>>,
        read_only: bool,
    ) -> Result<()> {
        let allocator = allocator.ok_or_else(|| Error::invalid("no allocator supplied"))?;
        trace!(
            pin = %self.core.name(),
            properties = ?allocator.properties(),
            read_only,
            "allocator notified"
        );
        *self.allocator.lock() = Some(allocator);
        Ok(())
    }

    fn allocator_requirements(&self) -> Result<AllocatorRequirements> {
        let object = self.core.filter()?.media_object()?;
        let hints = object.size_hints(self.core.stream())?;
        Ok(AllocatorNegotiator::requirements(&hints))
    }

    fn receive(&self, sample: MediaSample) -> Result<()> {
        let filter = self.core.filter()?;
        self.ensure_streaming(&filter)?;
        let _span = span_streaming(&filter.config().tracing, self.core.name()).entered();

        trace!(pin = %self.core.name(), len = sample.len(), "receive");
        filter
            .media_object()?
            .process_input(self.core.index(), &sample)?;
        filter.drain_outputs()
    }
}

impl QualityControl for InputPin {
    fn notify(&self, quality: Quality) -> Result<()> {
        match self.core.quality_sink() {
            Some(sink) => sink.notify(quality),
            None => Err(Error::NotImplemented),
        }
    }

    fn set_sink(&self, sink: Option<Arc<dyn QualityControl>>) -> Result<()> {
        self.core.set_quality_sink(sink);
        Ok(())
    }
}

impl std::fmt::Debug for InputPin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputPin")
            .field("name", &self.core.name())
            .field("connected", &self.core.is_connected())
            .finish()
    }
}
