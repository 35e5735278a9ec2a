//! Effects (side effects as data).
//!
//! Effects describe what should happen as a result of a state transition.
//! The interpreter executes them; the transition function only returns them.

use directory_core::QueryDescriptor;

use super::state::{FeedKind, Generation};

/// All effects that can be produced by state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one page of companies. `query` is already in request form.
    FetchCompanies {
        generation: Generation,
        query: QueryDescriptor,
    },

    FetchFacets { generation: Generation },

    FetchStats { generation: Generation },

    /// Log a message (for debugging/tracing).
    Log { level: LogLevel, message: String },
}

impl Effect {
    /// True if the effect performs I/O and reports back with an event.
    pub fn is_fetch(&self) -> bool {
        !matches!(self, Effect::Log { .. })
    }

    /// Feed and generation a fetch reports back to.
    pub fn fetch_target(&self) -> Option<(FeedKind, Generation)> {
        match self {
            Effect::FetchCompanies { generation, .. } => Some((FeedKind::Companies, *generation)),
            Effect::FetchFacets { generation } => Some((FeedKind::Facets, *generation)),
            Effect::FetchStats { generation } => Some((FeedKind::Stats, *generation)),
            Effect::Log { .. } => None,
        }
    }
}

/// Log level for logging effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}
