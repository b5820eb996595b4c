//! Filter lifecycle states.

use smallvec::SmallVec;

/// Lifecycle state of a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterState {
    /// No streaming resources held.
    #[default]
    Stopped,
    /// Resources allocated, data may flow but the clock is not running.
    Paused,
    /// Streaming.
    Running,
}

impl FilterState {
    /// Whether a single step can go from `self` to `next`.
    pub fn can_transition_to(&self, next: Self) -> bool {
        use FilterState::*;
        matches!(
            (self, next),
            (Stopped, Paused) | (Paused, Stopped) | (Paused, Running) | (Running, Paused)
        )
    }

    /// Whether streaming calls are allowed.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Stopped)
    }

    /// Adjacent steps from `self` to `target`, excluding `self`.
    ///
    /// Empty when already at `target`.
    pub fn path_to(self, target: Self) -> SmallVec<[FilterState; 2]> {
        use FilterState::*;
        let mut steps = SmallVec::new();
        match (self, target) {
            (Stopped, Running) => steps.extend([Paused, Running]),
            (Running, Stopped) => steps.extend([Paused, Stopped]),
            (from, to) if from != to => steps.push(to),
            _ => {}
        }
        steps
    }
}

impl std::fmt::Display for FilterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "Stopped"),
            Self::Paused => write!(f, "Paused"),
            Self::Running => write!(f, "Running"),
        }
    }
}
