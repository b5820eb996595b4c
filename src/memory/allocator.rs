//! Negotiated buffer allocator shared across a connection.
//!
//! A [`MemoryAllocator`] is created by one side of a connection and handed
//! to the other. Its properties are agreed during allocator negotiation and
//! frozen while it is committed. Buffers are loaned as [`PooledBuffer`]s and
//! return to the free list when dropped.
//!
//! ```rust
//! use parallax_wrapper::memory::{AllocatorProperties, MemoryAllocator};
//!
//! let allocator = MemoryAllocator::new();
//! allocator.set_properties(&AllocatorProperties::new(2, 4096, 16, 0))?;
//! allocator.commit()?;
//!
//! let mut buffer = allocator.acquire()?;
//! buffer.data_mut().extend_from_slice(b"hello");
//! assert_eq!(buffer.len(), 5);
//! # Ok::<(), parallax_wrapper::Error>(())
//! ```

use crate::error::{Error, Result};
use bytes::BytesMut;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// ============================================================================
// Properties
// ============================================================================

/// Buffer pool properties agreed between two pins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocatorProperties {
    /// Number of buffers.
    pub count: u32,
    /// Size of each buffer in bytes.
    pub size: u32,
    /// Required buffer alignment.
    pub alignment: u32,
    /// Bytes reserved in front of each buffer.
    pub prefix: u32,
}

impl AllocatorProperties {
    /// Create a property set.
    pub const fn new(count: u32, size: u32, alignment: u32, prefix: u32) -> Self {
        Self {
            count,
            size,
            alignment,
            prefix,
        }
    }

    /// Whether the pool has been given usable properties.
    ///
    /// The prefix is allowed to be zero.
    pub fn is_concrete(&self) -> bool {
        self.count != 0 && self.size != 0 && self.alignment != 0
    }
}

/// Requirements one side places on an allocator before negotiation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocatorRequirements {
    /// Minimum number of buffers.
    pub count: u32,
    /// Minimum buffer size.
    pub size: u32,
    /// Minimum alignment.
    pub alignment: u32,
    /// Required prefix; `None` leaves the caller's value untouched.
    pub prefix: Option<u32>,
}

impl AllocatorRequirements {
    /// Fill `current` with these requirements.
    pub fn apply_to(&self, current: &AllocatorProperties) -> AllocatorProperties {
        AllocatorProperties {
            count: self.count,
            size: self.size,
            alignment: self.alignment,
            prefix: self.prefix.unwrap_or(current.prefix),
        }
    }
}

// ============================================================================
// MemoryAllocator
// ============================================================================

/// Allocator usage statistics.
#[derive(Debug, Clone, Default)]
pub struct AllocatorStats {
    /// Buffers currently loaned out.
    pub in_use: u32,
    /// Total successful acquisitions.
    pub acquisitions: u64,
    /// Buffers that left the pool inside a sample.
    pub detached: u64,
}

struct AllocatorState {
    properties: AllocatorProperties,
    committed: bool,
    free: Vec<BytesMut>,
    in_use: u32,
}

struct AllocatorInner {
    state: Mutex<AllocatorState>,
    acquisitions: AtomicU64,
    detached: AtomicU64,
}

impl AllocatorInner {
    fn release(&self, buffer: Option<BytesMut>) {
        let mut state = self.state.lock();
        state.in_use = state.in_use.saturating_sub(1);
        let Some(mut buffer) = buffer else {
            return;
        };
        if state.committed && buffer.capacity() >= state.properties.size as usize {
            buffer.clear();
            state.free.push(buffer);
        }
    }
}

/// A shared buffer pool with negotiated properties.
pub struct MemoryAllocator {
    inner: Arc<AllocatorInner>,
}

impl MemoryAllocator {
    /// Create an allocator with zeroed properties.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Arc::new(AllocatorInner {
                state: Mutex::new(AllocatorState {
                    properties: AllocatorProperties::default(),
                    committed: false,
                    free: Vec::new(),
                    in_use: 0,
                }),
                acquisitions: AtomicU64::new(0),
                detached: AtomicU64::new(0),
            }),
        })
    }

    /// Create an allocator and set its properties.
    pub fn with_properties(properties: &AllocatorProperties) -> Result<Arc<Self>> {
        let allocator = Self::new();
        allocator.set_properties(properties)?;
        Ok(allocator)
    }

    /// Current properties.
    pub fn properties(&self) -> AllocatorProperties {
        self.inner.state.lock().properties
    }

    /// Request new properties, returning the ones actually set.
    ///
    /// Fails with [`Error::AllocatorCommitted`] while committed.
    pub fn set_properties(&self, request: &AllocatorProperties) -> Result<AllocatorProperties> {
        if request.alignment != 0 && !request.alignment.is_power_of_two() {
            return Err(Error::invalid(format!(
                "alignment {} is not a power of two",
                request.alignment
            )));
        }

        let mut state = self.inner.state.lock();
        if state.committed {
            return Err(Error::AllocatorCommitted);
        }
        state.properties = *request;
        state.free.clear();
        Ok(state.properties)
    }

    /// Make buffers available. Committing twice is a no-op.
    pub fn commit(&self) -> Result<()> {
        let mut state = self.inner.state.lock();
        if state.committed {
            return Ok(());
        }
        if state.properties.count == 0 || state.properties.size == 0 {
            return Err(Error::invalid("cannot commit an allocator without buffers"));
        }
        state.committed = true;
        tracing::trace!(
            count = state.properties.count,
            size = state.properties.size,
            "allocator committed"
        );
        Ok(())
    }

    /// Release the free list. Outstanding buffers are dropped when returned.
    pub fn decommit(&self) {
        let mut state = self.inner.state.lock();
        state.committed = false;
        state.free.clear();
    }

    /// Whether buffers can be acquired.
    pub fn is_committed(&self) -> bool {
        self.inner.state.lock().committed
    }

    /// Loan an empty buffer with at least `properties().size` bytes of capacity.
    pub fn acquire(&self) -> Result<PooledBuffer> {
        let mut state = self.inner.state.lock();
        if !state.committed {
            return Err(Error::NotCommitted);
        }
        if state.in_use >= state.properties.count {
            return Err(Error::PoolExhausted);
        }

        let size = state.properties.size as usize;
        let data = state
            .free
            .pop()
            .unwrap_or_else(|| BytesMut::with_capacity(size));
        state.in_use += 1;
        drop(state);

        self.inner.acquisitions.fetch_add(1, Ordering::Relaxed);
        Ok(PooledBuffer {
            data: Some(data),
            pool: self.inner.clone(),
        })
    }

    /// Usage statistics.
    pub fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            in_use: self.inner.state.lock().in_use,
            acquisitions: self.inner.acquisitions.load(Ordering::Relaxed),
            detached: self.inner.detached.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for MemoryAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("MemoryAllocator")
            .field("properties", &state.properties)
            .field("committed", &state.committed)
            .field("in_use", &state.in_use)
            .finish()
    }
}

// ============================================================================
// PooledBuffer
// ============================================================================

/// A buffer loaned from a [`MemoryAllocator`].
///
/// Returns to the pool when dropped. [`into_bytes`](Self::into_bytes)
/// detaches it so the data can travel downstream.
pub struct PooledBuffer {
    data: Option<BytesMut>,
    pool: Arc<AllocatorInner>,
}

impl PooledBuffer {
    /// The writable contents.
    #[inline]
    pub fn data_mut(&mut self) -> &mut BytesMut {
        // only `into_bytes` takes the data, and it consumes self
        self.data.get_or_insert_with(BytesMut::new)
    }

    /// The written contents.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.data.as_deref().unwrap_or_default()
    }

    /// Number of bytes written.
    #[inline]
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Whether nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reserved capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.as_ref().map(BytesMut::capacity).unwrap_or(0)
    }

    /// Detach the contents from the pool.
    ///
    /// The loan ends; the pool allocates a replacement on a later acquire.
    pub fn into_bytes(mut self) -> bytes::Bytes {
        let data = self.data.take().unwrap_or_default();
        self.pool.detached.fetch_add(1, Ordering::Relaxed);
        data.freeze()
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        self.pool.release(self.data.take());
    }
}

impl std::fmt::Debug for PooledBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledBuffer")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
