//! Contract of a wrapped stream-processing component.

use crate::error::Result;
use crate::format::MediaType;
use crate::memory::{MediaSample, SampleTime};
use crate::unknown::{Outer, Unknown};
use bitflags::bitflags;
use bytes::BytesMut;
use std::sync::Arc;

/// Addresses one of a component's streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    /// An input stream.
    Input(u32),
    /// An output stream.
    Output(u32),
}

impl Stream {
    /// Stream index within its direction.
    pub fn index(&self) -> u32 {
        match self {
            Self::Input(i) | Self::Output(i) => *i,
        }
    }

    /// Whether this is an input stream.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(i) => write!(f, "input {i}"),
            Self::Output(i) => write!(f, "output {i}"),
        }
    }
}

/// Mode of a [`MediaObject::set_type`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetType<'a> {
    /// Report whether the type would be accepted, without changing anything.
    Test(&'a MediaType),
    /// Make the type the stream's current type.
    Commit(&'a MediaType),
    /// Unset the stream's type.
    Clear,
}

/// Outcome of a [`MediaObject::set_type`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acceptance {
    /// The type is (or would be) accepted.
    Accepted,
    /// The type is not acceptable.
    Rejected,
}

impl Acceptance {
    /// Whether the type was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Buffer sizing reported by a component for one stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeHints {
    /// Minimum buffer size in bytes.
    pub size: u32,
    /// Required buffer alignment.
    pub alignment: u32,
    /// Bytes of lookahead the component holds (input streams only).
    pub lookahead: u32,
}

impl SizeHints {
    /// Create hints without lookahead.
    pub fn new(size: u32, alignment: u32) -> Self {
        Self {
            size,
            alignment,
            lookahead: 0,
        }
    }
}

bitflags! {
    /// Per-stream properties declared by the component.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct StreamFlags: u32 {
        /// Buffers always contain whole samples.
        const WHOLE_SAMPLES = 1 << 0;
        /// Each buffer holds exactly one sample.
        const SINGLE_SAMPLE_PER_BUFFER = 1 << 1;
        /// All samples have the same size.
        const FIXED_SAMPLE_SIZE = 1 << 2;
        /// The component keeps references to input buffers.
        const HOLDS_BUFFERS = 1 << 3;
        /// The output stream may be left unconnected and is then skipped.
        const OPTIONAL = 1 << 4;
        /// The output stream may be discarded.
        const DISCARDABLE = 1 << 5;
    }
}

/// Result of one [`MediaObject::process_output`] pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OutputStatus {
    /// More output is pending for this stream.
    pub incomplete: bool,
    /// The produced buffer starts at a sync point.
    pub sync_point: bool,
    /// Presentation interval of the produced buffer.
    pub time: Option<SampleTime>,
}

/// A self-contained stream processor.
///
/// All methods take `&self`; implementations keep their own interior state.
pub trait MediaObject: Unknown {
    /// Number of input and output streams.
    fn stream_count(&self) -> Result<(u32, u32)>;

    /// Properties of one stream.
    fn stream_info(&self, _stream: Stream) -> Result<StreamFlags> {
        Ok(StreamFlags::empty())
    }

    /// The candidate type at `index`, or `None` past the last one.
    fn available_type(&self, stream: Stream, index: u32) -> Result<Option<MediaType>>;

    /// Test, commit or clear the type of a stream.
    fn set_type(&self, stream: Stream, mode: SetType<'_>) -> Result<Acceptance>;

    /// The committed type of a stream, `None` while unset.
    fn current_type(&self, stream: Stream) -> Result<Option<MediaType>>;

    /// Buffer size and alignment requirements.
    ///
    /// [`Error::NotImplemented`](crate::Error::NotImplemented) means the
    /// component does not dictate sizes.
    fn size_hints(&self, stream: Stream) -> Result<SizeHints>;

    /// Discard all buffered data.
    fn flush(&self) -> Result<()>;

    /// Signal a gap on an input stream.
    fn discontinuity(&self, _input: u32) -> Result<()> {
        Ok(())
    }

    /// Prepare for streaming.
    fn allocate_streaming_resources(&self) -> Result<()> {
        Ok(())
    }

    /// Release streaming resources.
    fn free_streaming_resources(&self) -> Result<()> {
        Ok(())
    }

    /// Hand one input buffer to the component.
    fn process_input(&self, input: u32, sample: &MediaSample) -> Result<()>;

    /// Produce output for one stream.
    ///
    /// `None` asks the component to discard what it would have produced.
    fn process_output(&self, output: u32, buffer: Option<&mut BytesMut>) -> Result<OutputStatus>;
}

/// Creates component instances.
pub trait ComponentFactory: Send + Sync {
    /// Create an instance, returning its non-delegating identity.
    ///
    /// `outer` is the composite the instance is embedded in. Factories that
    /// cannot aggregate fail when it is set.
    fn create_instance(&self, outer: Outer) -> Result<Arc<dyn Unknown>>;
}

impl<F> ComponentFactory for F
where
    F: Fn(Outer) -> Result<Arc<dyn Unknown>> + Send + Sync,
{
    fn create_instance(&self, outer: Outer) -> Result<Arc<dyn Unknown>> {
        self(outer)
    }
}
