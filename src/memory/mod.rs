//! Buffer allocators and media samples.
//!
//! - [`MemoryAllocator`]: shared pool with negotiated [`AllocatorProperties`]
//! - [`PooledBuffer`]: RAII loan that returns to its pool on drop
//! - [`MediaSample`]: payload plus timing and stream flags

mod allocator;
mod sample;

pub use allocator::{
    AllocatorProperties, AllocatorRequirements, AllocatorStats, MemoryAllocator, PooledBuffer,
};
pub use sample::{MediaSample, SampleTime};
