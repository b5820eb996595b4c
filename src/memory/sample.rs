//! Media samples passed between pins.

use crate::format::MediaType;
use bytes::Bytes;
use std::time::Duration;

/// Presentation interval of a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct SampleTime {
    /// Start time.
    pub start: Duration,
    /// Stop time.
    pub stop: Duration,
}

impl SampleTime {
    /// Create an interval.
    pub fn new(start: Duration, stop: Duration) -> Self {
        Self { start, stop }
    }

    /// Length of the interval.
    pub fn duration(&self) -> Duration {
        self.stop.saturating_sub(self.start)
    }
}

/// A buffer of media data plus its stream properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaSample {
    /// Payload.
    pub data: Bytes,
    /// Presentation interval, if known.
    pub time: Option<SampleTime>,
    /// Whether decoding can start at this sample.
    pub sync_point: bool,
    /// Whether a gap precedes this sample.
    pub discontinuity: bool,
    /// Whether the sample is decoded but not presented.
    pub preroll: bool,
    /// Dynamic type change carried with the sample.
    pub media_type: Option<MediaType>,
}

impl MediaSample {
    /// Create a sample around `data`.
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            ..Self::default()
        }
    }

    /// Set the presentation interval.
    pub fn with_time(mut self, time: SampleTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Mark as a sync point.
    pub fn with_sync_point(mut self, sync_point: bool) -> Self {
        self.sync_point = sync_point;
        self
    }

    /// Mark as following a gap.
    pub fn with_discontinuity(mut self, discontinuity: bool) -> Self {
        self.discontinuity = discontinuity;
        self
    }

    /// Mark as preroll.
    pub fn with_preroll(mut self, preroll: bool) -> Self {
        self.preroll = preroll;
        self
    }

    /// Payload length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
