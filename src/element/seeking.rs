//! Seeking and position reporting on output pins.
//!
//! The wrapper holds no timeline of its own. Output pins answer seeking
//! requests by passing them to the upstream pin connected to the first
//! connected input.

use super::{OutputPin, Pin};
use crate::error::{Error, Result};
use crate::unknown::{Capability, Interface};
use bitflags::bitflags;
use std::sync::Arc;
use std::time::Duration;

bitflags! {
    /// What a seekable stream supports.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SeekingFlags: u32 {
        /// Absolute positions can be set.
        const CAN_SEEK_ABSOLUTE = 1 << 0;
        /// Forward seeks are possible.
        const CAN_SEEK_FORWARDS = 1 << 1;
        /// Backward seeks are possible.
        const CAN_SEEK_BACKWARDS = 1 << 2;
        /// The current position can be read.
        const CAN_GET_CURRENT_POS = 1 << 3;
        /// The stop position can be read.
        const CAN_GET_STOP_POS = 1 << 4;
        /// The duration can be read.
        const CAN_GET_DURATION = 1 << 5;
    }
}

/// Seeking and position control.
pub trait MediaSeeking: Send + Sync {
    /// Supported operations.
    fn capabilities(&self) -> Result<SeekingFlags>;

    /// Total length of the stream.
    fn duration(&self) -> Result<Duration>;

    /// Current playback position.
    fn current_position(&self) -> Result<Duration>;

    /// Position at which playback stops.
    fn stop_position(&self) -> Result<Duration>;

    /// Move the current and/or stop positions.
    fn set_positions(&self, current: Option<Duration>, stop: Option<Duration>) -> Result<()>;

    /// Playback rate, 1.0 being normal.
    fn rate(&self) -> Result<f64>;

    /// Change the playback rate.
    fn set_rate(&self, rate: f64) -> Result<()>;
}

impl OutputPin {
    /// The seeking surface of the first connected input's peer.
    fn upstream_seeking(&self) -> Result<Arc<dyn MediaSeeking>> {
        let filter = self.core().filter()?;
        let peer: Arc<dyn Pin> = filter
            .upstream_peers()
            .into_iter()
            .next()
            .ok_or(Error::NotConnected)?;
        peer.query_capability(&Capability::MediaSeeking)
            .ok()
            .and_then(Interface::into_seeking)
            .ok_or(Error::NotImplemented)
    }
}

impl MediaSeeking for OutputPin {
    fn capabilities(&self) -> Result<SeekingFlags> {
        self.upstream_seeking()?.capabilities()
    }

    fn duration(&self) -> Result<Duration> {
        self.upstream_seeking()?.duration()
    }

    fn current_position(&self) -> Result<Duration> {
        self.upstream_seeking()?.current_position()
    }

    fn stop_position(&self) -> Result<Duration> {
        self.upstream_seeking()?.stop_position()
    }

    fn set_positions(&self, current: Option<Duration>, stop: Option<Duration>) -> Result<()> {
        self.upstream_seeking()?.set_positions(current, stop)
    }

    fn rate(&self) -> Result<f64> {
        self.upstream_seeking()?.rate()
    }

    fn set_rate(&self, rate: f64) -> Result<()> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(Error::invalid(format!("unsupported rate {rate}")));
        }
        self.upstream_seeking()?.set_rate(rate)
    }
}
