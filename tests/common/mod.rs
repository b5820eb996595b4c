//! Shared test doubles: a component, an upstream source pin and a
//! downstream sink pin.

#![allow(dead_code)]

use bytes::{BufMut, Bytes, BytesMut};
use parallax_wrapper::component::{
    Acceptance, ComponentFactory, ComponentRegistry, MediaObject, OutputStatus, SetType,
    SizeHints, Stream, StreamFlags,
};
use parallax_wrapper::config::WrapperConfig;
use parallax_wrapper::element::{
    Disconnect, FilterAdapter, MediaSeeking, MemInput, Pin, PinDirection, PinInfo, Quality,
    QualityControl, SeekingFlags,
};
use parallax_wrapper::enumerator::{Enumerator, MediaTypeEnumerator};
use parallax_wrapper::format::{MediaType, categories};
use parallax_wrapper::memory::{
    AllocatorProperties, AllocatorRequirements, MediaSample, MemoryAllocator,
};
use parallax_wrapper::unknown::{Capability, Interface, Outer, Unknown};
use parallax_wrapper::{Error, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use uuid::Uuid;

pub const TEST_CLASS_ID: Uuid = Uuid::from_u128(0x1c3d6bd4_ef0f_47d7_b4a8_bb5f0b7e5ec1);
pub const TEST_CAPABILITY: Uuid = Uuid::from_u128(0x1c3d6bd4_ef0f_47d7_b4a8_bb5f0b7e5ec2);

/// Route log output through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Media types
// ============================================================================

/// Input type the component accepts.
pub fn input_type() -> MediaType {
    MediaType::new(
        Uuid::from_u128(0x123),
        Uuid::from_u128(0x456),
        Uuid::from_u128(0xabc),
    )
    .with_sample_size(123)
    .with_format(0xdeadbeef_u32.to_le_bytes().to_vec())
}

/// Same kind as [`input_type`], but with a sample size the component rejects.
pub fn rejected_input_type() -> MediaType {
    input_type().with_sample_size(789)
}

/// Output type the component accepts.
pub fn output_type() -> MediaType {
    MediaType::new(
        Uuid::from_u128(0x987),
        Uuid::from_u128(0x654),
        Uuid::from_u128(0xcba),
    )
    .with_sample_size(321)
    .with_format(0xdeadf00d_u32.to_le_bytes().to_vec())
}

// ============================================================================
// TestComponent
// ============================================================================

/// Behaviour knobs of [`TestComponent`].
#[derive(Clone)]
pub struct TestConfig {
    pub inputs: u32,
    pub outputs: u32,
    pub output_flags: Vec<StreamFlags>,
    pub input_candidates: Vec<MediaType>,
    pub output_candidates: Vec<MediaType>,
    pub input_hints: Result<SizeHints>,
    pub output_hints: Result<SizeHints>,
    /// Largest chunk written per output pass; 0 writes everything at once.
    pub output_chunk: usize,
    pub fail_allocate: bool,
    pub refuse_aggregation: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            inputs: 1,
            outputs: 2,
            output_flags: vec![StreamFlags::empty(), StreamFlags::OPTIONAL],
            input_candidates: vec![rejected_input_type(), input_type()],
            output_candidates: vec![output_type()],
            input_hints: Err(Error::NotImplemented),
            output_hints: Ok(SizeHints::new(123, 1)),
            output_chunk: 0,
            fail_allocate: false,
            refuse_aggregation: false,
        }
    }
}

/// Calls observed by [`TestComponent`].
#[derive(Debug, Default, Clone)]
pub struct Calls {
    pub flush: usize,
    pub discontinuity: usize,
    pub allocate: usize,
    pub free: usize,
    pub clear: usize,
    pub processed: usize,
    pub discarded: usize,
}

/// A component with a fixed acceptance rule: input sample size 123, output
/// sample size 321. Every input buffer is copied to every output.
pub struct TestComponent {
    outer: Outer,
    config: TestConfig,
    current: Mutex<Vec<Option<MediaType>>>,
    pending: Mutex<Vec<VecDeque<Bytes>>>,
    calls: Mutex<Calls>,
}

impl TestComponent {
    fn slot(&self, stream: Stream) -> usize {
        match stream {
            Stream::Input(i) => i as usize,
            Stream::Output(i) => (self.config.inputs + i) as usize,
        }
    }

    fn accepts(&self, stream: Stream, mt: &MediaType) -> bool {
        let wanted = if stream.is_input() { 123 } else { 321 };
        mt.sample_size == wanted
    }

    fn check(&self, stream: Stream) -> Result<()> {
        let count = match stream {
            Stream::Input(_) => self.config.inputs,
            Stream::Output(_) => self.config.outputs,
        };
        if stream.index() >= count {
            return Err(Error::invalid(format!("no {stream}")));
        }
        Ok(())
    }

    /// Committed type of a stream, as the component sees it.
    pub fn stream_type(&self, stream: Stream) -> Option<MediaType> {
        self.current.lock()[self.slot(stream)].clone()
    }

    pub fn calls(&self) -> Calls {
        self.calls.lock().clone()
    }

    pub fn outer(&self) -> &Outer {
        &self.outer
    }

    pub fn pending(&self, output: u32) -> usize {
        self.pending.lock()[output as usize].len()
    }
}

impl Unknown for TestComponent {
    fn query_capability(&self, capability: &Capability) -> Result<Interface> {
        match self.outer.forward(capability) {
            Some(result) => result,
            None => Err(Error::NoInterface(*capability)),
        }
    }
}

impl MediaObject for TestComponent {
    fn stream_count(&self) -> Result<(u32, u32)> {
        Ok((self.config.inputs, self.config.outputs))
    }

    fn stream_info(&self, stream: Stream) -> Result<StreamFlags> {
        self.check(stream)?;
        Ok(match stream {
            Stream::Input(_) => StreamFlags::empty(),
            Stream::Output(i) => self
                .config
                .output_flags
                .get(i as usize)
                .copied()
                .unwrap_or_default(),
        })
    }

    fn available_type(&self, stream: Stream, index: u32) -> Result<Option<MediaType>> {
        self.check(stream)?;
        let candidates = match stream {
            Stream::Input(_) => &self.config.input_candidates,
            Stream::Output(_) => &self.config.output_candidates,
        };
        Ok(candidates.get(index as usize).cloned())
    }

    fn set_type(&self, stream: Stream, mode: SetType<'_>) -> Result<Acceptance> {
        self.check(stream)?;
        let slot = self.slot(stream);
        match mode {
            SetType::Test(mt) if self.accepts(stream, mt) => Ok(Acceptance::Accepted),
            SetType::Commit(mt) if self.accepts(stream, mt) => {
                self.current.lock()[slot] = Some(mt.clone());
                Ok(Acceptance::Accepted)
            }
            SetType::Test(_) | SetType::Commit(_) => Ok(Acceptance::Rejected),
            SetType::Clear => {
                self.current.lock()[slot] = None;
                self.calls.lock().clear += 1;
                Ok(Acceptance::Accepted)
            }
        }
    }

    fn current_type(&self, stream: Stream) -> Result<Option<MediaType>> {
        self.check(stream)?;
        Ok(self.stream_type(stream))
    }

    fn size_hints(&self, stream: Stream) -> Result<SizeHints> {
        self.check(stream)?;
        match stream {
            Stream::Input(_) => self.config.input_hints.clone(),
            Stream::Output(_) => self.config.output_hints.clone(),
        }
    }

    fn flush(&self) -> Result<()> {
        self.calls.lock().flush += 1;
        for queue in self.pending.lock().iter_mut() {
            queue.clear();
        }
        Ok(())
    }

    fn discontinuity(&self, _input: u32) -> Result<()> {
        self.calls.lock().discontinuity += 1;
        Ok(())
    }

    fn allocate_streaming_resources(&self) -> Result<()> {
        if self.config.fail_allocate {
            return Err(Error::Component("out of resources".into()));
        }
        self.calls.lock().allocate += 1;
        Ok(())
    }

    fn free_streaming_resources(&self) -> Result<()> {
        self.calls.lock().free += 1;
        Ok(())
    }

    fn process_input(&self, input: u32, sample: &MediaSample) -> Result<()> {
        self.check(Stream::Input(input))?;
        for queue in self.pending.lock().iter_mut() {
            queue.push_back(sample.data.clone());
        }
        self.calls.lock().processed += 1;
        Ok(())
    }

    fn process_output(&self, output: u32, buffer: Option<&mut BytesMut>) -> Result<OutputStatus> {
        self.check(Stream::Output(output))?;
        let mut pending = self.pending.lock();
        let queue = &mut pending[output as usize];
        let Some(mut data) = queue.pop_front() else {
            return Ok(OutputStatus::default());
        };

        let chunk = match self.config.output_chunk {
            0 => data.len(),
            n => n.min(data.len()),
        };
        let rest = data.split_off(chunk);
        if !rest.is_empty() {
            queue.push_front(rest);
        }
        let incomplete = !queue.is_empty();
        drop(pending);

        match buffer {
            Some(buffer) => buffer.put_slice(&data),
            None => self.calls.lock().discarded += 1,
        }
        Ok(OutputStatus {
            incomplete,
            sync_point: true,
            time: None,
        })
    }
}

/// Non-delegating identity of a [`TestComponent`].
pub struct TestIdentity {
    this: Weak<TestIdentity>,
    component: Arc<TestComponent>,
}

impl Unknown for TestIdentity {
    fn query_capability(&self, capability: &Capability) -> Result<Interface> {
        match capability {
            Capability::Unknown => {
                let this = self.this.upgrade().ok_or(Error::Released)?;
                Ok(Interface::Unknown(this))
            }
            Capability::MediaObject => Ok(Interface::MediaObject(self.component.clone())),
            Capability::Custom(id) if *id == TEST_CAPABILITY => {
                Ok(Interface::MediaObject(self.component.clone()))
            }
            other => Err(Error::NoInterface(*other)),
        }
    }
}

/// Creates [`TestComponent`]s and remembers the last one.
pub struct TestFactory {
    config: TestConfig,
    created: Mutex<Option<(Arc<TestComponent>, Arc<dyn Unknown>)>>,
}

impl TestFactory {
    pub fn new(config: TestConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            created: Mutex::new(None),
        })
    }

    /// The component created last.
    pub fn component(&self) -> Arc<TestComponent> {
        self.created.lock().as_ref().map(|(c, _)| c.clone()).unwrap()
    }

    /// The identity handed out last.
    pub fn identity(&self) -> Arc<dyn Unknown> {
        self.created.lock().as_ref().map(|(_, i)| i.clone()).unwrap()
    }
}

impl ComponentFactory for TestFactory {
    fn create_instance(&self, outer: Outer) -> Result<Arc<dyn Unknown>> {
        if self.config.refuse_aggregation && outer.is_aggregated() {
            return Err(Error::Component("aggregation not supported".into()));
        }
        let streams = (self.config.inputs + self.config.outputs) as usize;
        let component = Arc::new(TestComponent {
            outer,
            config: self.config.clone(),
            current: Mutex::new(vec![None; streams]),
            pending: Mutex::new(vec![VecDeque::new(); self.config.outputs as usize]),
            calls: Mutex::new(Calls::default()),
        });
        let identity = Arc::new_cyclic(|this: &Weak<TestIdentity>| TestIdentity {
            this: this.clone(),
            component: component.clone(),
        });
        let identity: Arc<dyn Unknown> = identity;
        *self.created.lock() = Some((component, identity.clone()));
        Ok(identity)
    }
}

/// Registry holding the test component class.
pub fn registry(factory: &Arc<TestFactory>) -> Arc<ComponentRegistry> {
    let registry = Arc::new(ComponentRegistry::new());
    let factory = factory.clone();
    registry.register(
        TEST_CLASS_ID,
        "test component",
        categories::AUDIO_DECODER,
        move |outer: Outer| ComponentFactory::create_instance(&*factory, outer),
    );
    registry
}

/// A bound wrapper around a fresh [`TestComponent`].
pub fn wrapper(config: TestConfig) -> (Arc<FilterAdapter>, Arc<TestFactory>) {
    wrapper_with(config, WrapperConfig::default())
}

pub fn wrapper_with(
    config: TestConfig,
    wrapper_config: WrapperConfig,
) -> (Arc<FilterAdapter>, Arc<TestFactory>) {
    init_tracing();
    let factory = TestFactory::new(config);
    let filter = FilterAdapter::with_config(registry(&factory), wrapper_config);
    filter
        .init(&TEST_CLASS_ID, &categories::AUDIO_DECODER)
        .unwrap();
    (filter, factory)
}

pub fn mem_input(pin: &Arc<dyn Pin>) -> Arc<dyn MemInput> {
    pin.query_capability(&Capability::MemInput)
        .unwrap()
        .into_mem_input()
        .unwrap()
}

// ============================================================================
// TestSink
// ============================================================================

/// A downstream input pin.
pub struct TestSink {
    this: Weak<TestSink>,
    /// Only type accepted (and offered), if set.
    accept: Option<MediaType>,
    peer: Mutex<Option<Arc<dyn Pin>>>,
    media_type: Mutex<Option<MediaType>>,
    allocator: Mutex<Option<Arc<MemoryAllocator>>>,
    received: Mutex<Vec<MediaSample>>,
    eos: Mutex<usize>,
    flushing: Mutex<bool>,
}

impl TestSink {
    pub fn new(accept: Option<MediaType>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            accept,
            peer: Mutex::new(None),
            media_type: Mutex::new(None),
            allocator: Mutex::new(None),
            received: Mutex::new(Vec::new()),
            eos: Mutex::new(0),
            flushing: Mutex::new(false),
        })
    }

    /// A sink that already owns an allocator with `properties`.
    pub fn with_allocator(accept: Option<MediaType>, properties: AllocatorProperties) -> Arc<Self> {
        let sink = Self::new(accept);
        *sink.allocator.lock() = Some(MemoryAllocator::with_properties(&properties).unwrap());
        sink
    }

    pub fn pin(self: &Arc<Self>) -> Arc<dyn Pin> {
        self.clone()
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.media_type.lock().clone()
    }

    pub fn peer(&self) -> Option<Arc<dyn Pin>> {
        self.peer.lock().clone()
    }

    pub fn current_allocator(&self) -> Option<Arc<MemoryAllocator>> {
        self.allocator.lock().clone()
    }

    pub fn received(&self) -> Vec<MediaSample> {
        self.received.lock().clone()
    }

    pub fn eos_count(&self) -> usize {
        *self.eos.lock()
    }

    pub fn is_flushing(&self) -> bool {
        *self.flushing.lock()
    }
}

impl Unknown for TestSink {
    fn query_capability(&self, capability: &Capability) -> Result<Interface> {
        let this = self.this.upgrade().ok_or(Error::Released)?;
        match capability {
            Capability::Unknown => Ok(Interface::Unknown(this)),
            Capability::Pin => Ok(Interface::Pin(this)),
            Capability::MemInput => Ok(Interface::MemInput(this)),
            other => Err(Error::NoInterface(*other)),
        }
    }
}

impl Pin for TestSink {
    fn connect(&self, _peer: &Arc<dyn Pin>, _media_type: Option<&MediaType>) -> Result<()> {
        Err(Error::invalid("input pins do not initiate connections"))
    }

    fn receive_connection(&self, connector: &Arc<dyn Pin>, media_type: &MediaType) -> Result<()> {
        let mut peer = self.peer.lock();
        if peer.is_some() {
            return Err(Error::AlreadyConnected);
        }
        if self.accept.as_ref().is_some_and(|mt| mt != media_type) {
            return Err(Error::TypeNotAccepted);
        }
        *peer = Some(connector.clone());
        *self.media_type.lock() = Some(media_type.clone());
        Ok(())
    }

    fn disconnect(&self) -> Result<Disconnect> {
        if self.peer.lock().take().is_none() {
            return Ok(Disconnect::AlreadyDisconnected);
        }
        self.media_type.lock().take();
        self.allocator.lock().take();
        Ok(Disconnect::Disconnected)
    }

    fn connected_to(&self) -> Result<Arc<dyn Pin>> {
        self.peer().ok_or(Error::NotConnected)
    }

    fn connection_media_type(&self) -> Result<MediaType> {
        self.media_type().ok_or(Error::NotConnected)
    }

    fn pin_info(&self) -> PinInfo {
        PinInfo {
            filter: None,
            direction: PinDirection::Input,
            name: "sink".into(),
        }
    }

    fn direction(&self) -> PinDirection {
        PinDirection::Input
    }

    fn id(&self) -> String {
        "sink".into()
    }

    fn query_accept(&self, media_type: &MediaType) -> Result<bool> {
        Ok(self.accept.as_ref().is_none_or(|mt| mt == media_type))
    }

    fn enum_media_types(&self) -> Result<MediaTypeEnumerator> {
        Ok(Enumerator::from_snapshot(self.accept.iter().cloned().collect()))
    }

    fn end_of_stream(&self) -> Result<()> {
        *self.eos.lock() += 1;
        Ok(())
    }

    fn begin_flush(&self) -> Result<()> {
        *self.flushing.lock() = true;
        Ok(())
    }

    fn end_flush(&self) -> Result<()> {
        *self.flushing.lock() = false;
        Ok(())
    }
}

impl MemInput for TestSink {
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
        _read_only: bool,
    ) -> Result<()> {
        let allocator = allocator.ok_or_else(|| Error::invalid("no allocator"))?;
        *self.allocator.lock() = Some(allocator);
        Ok(())
    }

    fn allocator_requirements(&self) -> Result<AllocatorRequirements> {
        Err(Error::NotImplemented)
    }

    fn receive(&self, sample: MediaSample) -> Result<()> {
        self.received.lock().push(sample);
        Ok(())
    }
}

// ============================================================================
// TestSource
// ============================================================================

/// An upstream output pin that can also answer seeking and quality calls.
pub struct TestSource {
    this: Weak<TestSource>,
    offers: Vec<MediaType>,
    seekable: bool,
    peer: Mutex<Option<Arc<dyn Pin>>>,
    media_type: Mutex<Option<MediaType>>,
    qualities: Mutex<Vec<Quality>>,
    position: Mutex<(Duration, Duration)>,
    rate: Mutex<f64>,
}

impl TestSource {
    pub fn new(offers: Vec<MediaType>, seekable: bool) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            offers,
            seekable,
            peer: Mutex::new(None),
            media_type: Mutex::new(None),
            qualities: Mutex::new(Vec::new()),
            position: Mutex::new((Duration::ZERO, Duration::from_secs(10))),
            rate: Mutex::new(1.0),
        })
    }

    pub fn pin(self: &Arc<Self>) -> Arc<dyn Pin> {
        self.clone()
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.media_type.lock().clone()
    }

    pub fn qualities(&self) -> Vec<Quality> {
        self.qualities.lock().clone()
    }

    pub fn position(&self) -> (Duration, Duration) {
        *self.position.lock()
    }

    fn attach(&self, peer: &Arc<dyn Pin>, media_type: &MediaType) {
        *self.peer.lock() = Some(peer.clone());
        *self.media_type.lock() = Some(media_type.clone());
    }
}

impl Unknown for TestSource {
    fn query_capability(&self, capability: &Capability) -> Result<Interface> {
        let this = self.this.upgrade().ok_or(Error::Released)?;
        match capability {
            Capability::Unknown => Ok(Interface::Unknown(this)),
            Capability::Pin => Ok(Interface::Pin(this)),
            Capability::MediaSeeking if self.seekable => Ok(Interface::Seeking(this)),
            Capability::QualityControl => Ok(Interface::QualityControl(this)),
            other => Err(Error::NoInterface(*other)),
        }
    }
}

impl Pin for TestSource {
    fn connect(&self, peer: &Arc<dyn Pin>, media_type: Option<&MediaType>) -> Result<()> {
        if self.peer.lock().is_some() {
            return Err(Error::AlreadyConnected);
        }
        let this: Arc<dyn Pin> = self.this.upgrade().ok_or(Error::Released)?;
        if let Some(mt) = media_type.filter(|mt| !mt.has_wildcards()) {
            peer.receive_connection(&this, mt)?;
            self.attach(peer, mt);
            return Ok(());
        }
        let pattern = media_type.cloned().unwrap_or_default();
        for mt in self.offers.iter().filter(|mt| mt.matches_pattern(&pattern)) {
            if peer.receive_connection(&this, mt).is_ok() {
                self.attach(peer, mt);
                return Ok(());
            }
        }
        Err(Error::NoAcceptableTypes)
    }

    fn receive_connection(&self, connector: &Arc<dyn Pin>, media_type: &MediaType) -> Result<()> {
        if self.peer.lock().is_some() {
            return Err(Error::AlreadyConnected);
        }
        if !self.offers.is_empty() && !self.offers.contains(media_type) {
            return Err(Error::TypeNotAccepted);
        }
        self.attach(connector, media_type);
        Ok(())
    }

    fn disconnect(&self) -> Result<Disconnect> {
        if self.peer.lock().take().is_none() {
            return Ok(Disconnect::AlreadyDisconnected);
        }
        self.media_type.lock().take();
        Ok(Disconnect::Disconnected)
    }

    fn connected_to(&self) -> Result<Arc<dyn Pin>> {
        self.peer.lock().clone().ok_or(Error::NotConnected)
    }

    fn connection_media_type(&self) -> Result<MediaType> {
        self.media_type().ok_or(Error::NotConnected)
    }

    fn pin_info(&self) -> PinInfo {
        PinInfo {
            filter: None,
            direction: PinDirection::Output,
            name: "source".into(),
        }
    }

    fn direction(&self) -> PinDirection {
        PinDirection::Output
    }

    fn id(&self) -> String {
        "source".into()
    }

    fn query_accept(&self, media_type: &MediaType) -> Result<bool> {
        Ok(self.offers.contains(media_type))
    }

    fn enum_media_types(&self) -> Result<MediaTypeEnumerator> {
        Ok(Enumerator::from_snapshot(self.offers.clone()))
    }

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

impl MediaSeeking for TestSource {
    fn capabilities(&self) -> Result<SeekingFlags> {
        Ok(SeekingFlags::CAN_SEEK_ABSOLUTE
            | SeekingFlags::CAN_GET_CURRENT_POS
            | SeekingFlags::CAN_GET_DURATION)
    }

    fn duration(&self) -> Result<Duration> {
        Ok(Duration::from_secs(10))
    }

    fn current_position(&self) -> Result<Duration> {
        Ok(self.position.lock().0)
    }

    fn stop_position(&self) -> Result<Duration> {
        Ok(self.position.lock().1)
    }

    fn set_positions(&self, current: Option<Duration>, stop: Option<Duration>) -> Result<()> {
        let mut position = self.position.lock();
        if let Some(current) = current {
            position.0 = current;
        }
        if let Some(stop) = stop {
            position.1 = stop;
        }
        Ok(())
    }

    fn rate(&self) -> Result<f64> {
        Ok(*self.rate.lock())
    }

    fn set_rate(&self, rate: f64) -> Result<()> {
        *self.rate.lock() = rate;
        Ok(())
    }
}

impl QualityControl for TestSource {
    fn notify(&self, quality: Quality) -> Result<()> {
        self.qualities.lock().push(quality);
        Ok(())
    }

    fn set_sink(&self, _sink: Option<Arc<dyn QualityControl>>) -> Result<()> {
        Err(Error::NotImplemented)
    }
}

/// Records quality messages.
#[derive(Default)]
pub struct QualityRecorder {
    pub seen: Mutex<Vec<Quality>>,
}

impl QualityControl for QualityRecorder {
    fn notify(&self, quality: Quality) -> Result<()> {
        self.seen.lock().push(quality);
        Ok(())
    }

    fn set_sink(&self, _sink: Option<Arc<dyn QualityControl>>) -> Result<()> {
        Ok(())
    }
}
