//! Cursor-based enumerators over pins and media types.
//!
//! An [`Enumerator`] pairs a shared item source with a private cursor.
//! Sources are either frozen snapshots (the pin set) or lazy views over a
//! component's candidate list (media types). Cloning an enumerator copies the
//! cursor only, so the clone is unaffected by anything done to the original.
//!
//! ```rust
//! use parallax_wrapper::enumerator::{EnumStatus, Enumerator};
//!
//! let mut e = Enumerator::from_snapshot(vec!["a", "b", "c"]);
//! assert_eq!(e.skip(2)?, EnumStatus::Full);
//! let fetched = e.next(4)?;
//! assert_eq!(fetched.items.as_slice(), &["c"]);
//! assert_eq!(fetched.status, EnumStatus::Partial);
//! # Ok::<(), parallax_wrapper::Error>(())
//! ```

use crate::component::{MediaObject, Stream};
use crate::element::Pin;
use crate::error::{Error, Result};
use crate::format::MediaType;
use crate::unknown::Unknown;
use smallvec::SmallVec;
use std::sync::Arc;

/// Three-way outcome of a batch call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumStatus {
    /// Exactly the requested number of items.
    Full,
    /// Fewer than requested, but at least one.
    Partial,
    /// Nothing left.
    Exhausted,
}

impl EnumStatus {
    fn of(requested: usize, got: usize) -> Self {
        if got == requested {
            Self::Full
        } else if got == 0 {
            Self::Exhausted
        } else {
            Self::Partial
        }
    }
}

/// Items returned by [`Enumerator::next`].
#[derive(Debug)]
pub struct Fetched<T> {
    /// The items, owned by the caller.
    pub items: SmallVec<[T; 4]>,
    /// Whether the batch was full.
    pub status: EnumStatus,
}

/// Random-access backing store of an enumerator.
pub trait ItemSource<T>: Send + Sync {
    /// Item at `index`, or `None` past the end.
    fn item(&self, index: usize) -> Result<Option<T>>;
}

/// A frozen list of items.
///
/// `owner` keeps the object the items came from alive.
pub struct Snapshot<T> {
    items: Vec<T>,
    _owner: Option<Arc<dyn Unknown>>,
}

impl<T> Snapshot<T> {
    /// Freeze `items`, optionally holding their owner.
    pub fn new(items: Vec<T>, owner: Option<Arc<dyn Unknown>>) -> Self {
        Self {
            items,
            _owner: owner,
        }
    }
}

impl<T: Clone + Send + Sync> ItemSource<T> for Snapshot<T> {
    fn item(&self, index: usize) -> Result<Option<T>> {
        Ok(self.items.get(index).cloned())
    }
}

/// Candidate types of one component stream, pulled on demand.
pub struct ComponentTypes {
    component: Arc<dyn MediaObject>,
    stream: Stream,
}

impl ComponentTypes {
    /// View the candidates of `stream`.
    pub fn new(component: Arc<dyn MediaObject>, stream: Stream) -> Self {
        Self { component, stream }
    }
}

impl ItemSource<MediaType> for ComponentTypes {
    fn item(&self, index: usize) -> Result<Option<MediaType>> {
        let Ok(index) = u32::try_from(index) else {
            return Ok(None);
        };
        self.component.available_type(self.stream, index)
    }
}

/// A cursor over an [`ItemSource`].
pub struct Enumerator<T> {
    source: Arc<dyn ItemSource<T>>,
    cursor: usize,
    failed: bool,
}

/// Enumerates a filter's pins.
pub type PinEnumerator = Enumerator<Arc<dyn Pin>>;

/// Enumerates a pin's candidate media types.
pub type MediaTypeEnumerator = Enumerator<MediaType>;

impl<T: Clone + Send + Sync + 'static> Enumerator<T> {
    /// Enumerate a fixed list.
    pub fn from_snapshot(items: Vec<T>) -> Self {
        Self::new(Arc::new(Snapshot::new(items, None)))
    }
}

impl<T> Enumerator<T> {
    /// Enumerate `source` from the start.
    pub fn new(source: Arc<dyn ItemSource<T>>) -> Self {
        Self {
            source,
            cursor: 0,
            failed: false,
        }
    }

    /// Fetch up to `count` items.
    ///
    /// A source error is returned once and ends the sequence until
    /// [`reset`](Self::reset). Items pulled before the error are not
    /// consumed.
    pub fn next(&mut self, count: usize) -> Result<Fetched<T>> {
        if count == 0 {
            return Err(Error::invalid("item count must be at least one"));
        }

        let start = self.cursor;
        let mut items = SmallVec::new();
        while !self.failed && items.len() < count {
            match self.source.item(self.cursor) {
                Ok(Some(item)) => {
                    items.push(item);
                    self.cursor += 1;
                }
                Ok(None) => break,
                Err(e) => {
                    self.cursor = start;
                    self.failed = true;
                    return Err(e);
                }
            }
        }

        let status = EnumStatus::of(count, items.len());
        Ok(Fetched { items, status })
    }

    /// Fetch a single item.
    pub fn next_one(&mut self) -> Result<Option<T>> {
        Ok(self.next(1)?.items.into_iter().next())
    }

    /// Advance the cursor by up to `count` items.
    pub fn skip(&mut self, count: usize) -> Result<EnumStatus> {
        let start = self.cursor;
        let mut skipped = 0;
        while !self.failed && skipped < count {
            match self.source.item(self.cursor) {
                Ok(Some(_)) => {
                    self.cursor += 1;
                    skipped += 1;
                }
                Ok(None) => break,
                Err(e) => {
                    self.cursor = start;
                    self.failed = true;
                    return Err(e);
                }
            }
        }
        if count == 0 {
            return Ok(EnumStatus::Full);
        }
        Ok(EnumStatus::of(count, skipped))
    }

    /// Rewind to the first item.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.failed = false;
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl<T> Clone for Enumerator<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            cursor: self.cursor,
            failed: self.failed,
        }
    }
}

impl<T> std::fmt::Debug for Enumerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enumerator")
            .field("cursor", &self.cursor)
            .field("failed", &self.failed)
            .finish()
    }
}
