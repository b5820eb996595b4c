//! Media type selection for a connection attempt.

use crate::enumerator::MediaTypeEnumerator;
use crate::error::{Error, Result};
use crate::format::MediaType;
use smallvec::SmallVec;

/// Picks the media type of a connection.
///
/// Candidate sources are tried in the order they were added, each in
/// ascending index order. The first acceptable candidate wins.
///
/// ```rust
/// use parallax_wrapper::enumerator::Enumerator;
/// use parallax_wrapper::format::{MediaType, kinds, subtypes, formats};
/// use parallax_wrapper::negotiation::TypeNegotiator;
///
/// let pcm = MediaType::new(kinds::AUDIO, subtypes::PCM, formats::NONE);
/// let chosen = TypeNegotiator::new(None)
///     .with_candidates(Enumerator::from_snapshot(vec![pcm.clone()]))
///     .negotiate(|_| Ok(true))?;
/// assert_eq!(chosen, pcm);
/// # Ok::<(), parallax_wrapper::Error>(())
/// ```
pub struct TypeNegotiator<'a> {
    request: Option<&'a MediaType>,
    sources: SmallVec<[MediaTypeEnumerator; 2]>,
}

impl<'a> TypeNegotiator<'a> {
    /// Negotiate for `request`; `None` is a fully wildcarded request.
    pub fn new(request: Option<&'a MediaType>) -> Self {
        Self {
            request,
            sources: SmallVec::new(),
        }
    }

    /// Add a candidate source.
    pub fn with_candidates(mut self, candidates: MediaTypeEnumerator) -> Self {
        self.sources.push(candidates);
        self
    }

    /// Whether the request names a concrete type.
    pub fn is_exact(&self) -> bool {
        self.request.is_some_and(|mt| !mt.has_wildcards())
    }

    /// Run the negotiation.
    ///
    /// `accept` decides whether a concrete type is acceptable; an error from
    /// it aborts the negotiation. Returns the type to commit.
    pub fn negotiate<F>(self, mut accept: F) -> Result<MediaType>
    where
        F: FnMut(&MediaType) -> Result<bool>,
    {
        match self.request {
            Some(request) if !request.has_wildcards() => {
                // the acceptance test covers every field a candidate scan would compare
                if accept(request)? {
                    return Ok(request.clone());
                }
                tracing::debug!("exact media type rejected");
                Err(Error::TypeNotAccepted)
            }
            request => {
                let pattern = request.cloned().unwrap_or_default();
                for mut source in self.sources {
                    while let Some(candidate) = source.next_one()? {
                        if candidate.has_wildcards() || !candidate.matches_pattern(&pattern) {
                            continue;
                        }
                        if accept(&candidate)? {
                            return Ok(candidate);
                        }
                    }
                }
                tracing::debug!("no candidate satisfied the request");
                Err(Error::NoAcceptableTypes)
            }
        }
    }
}
