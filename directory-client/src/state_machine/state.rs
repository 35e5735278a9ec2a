//! State types for the query state machine.

use directory_core::{CompanyPage, Facets, QueryDescriptor, Stats, ALL};
use std::fmt;

/// How the company page is presented. Independent of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Table,
    Card,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Table => Self::Card,
            Self::Card => Self::Table,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Card => write!(f, "card"),
        }
    }
}

/// Lifecycle of the most recent fetch of one feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Identifies one of the three independently fetched feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Companies,
    Facets,
    Stats,
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Companies => write!(f, "companies"),
            Self::Facets => write!(f, "filters"),
            Self::Stats => write!(f, "stats"),
        }
    }
}

/// Monotonic per-feed fetch counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One data feed: the last good data plus the state of the latest fetch.
///
/// A failed fetch keeps `data` from the last success, so the UI can show
/// stale results behind the error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Feed<T> {
    pub status: FeedStatus,
    pub data: T,
    pub error: Option<String>,
    /// Latest generation dispatched for this feed.
    pub generation: Generation,
}

impl<T> Feed<T> {
    /// Start a new fetch and return its generation.
    pub fn begin(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.status = FeedStatus::Loading;
        self.error = None;
        self.generation
    }

    /// True if `generation` is the latest one dispatched.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    pub fn succeed(&mut self, data: T) {
        self.status = FeedStatus::Success;
        self.data = data;
        self.error = None;
    }

    pub fn fail(&mut self, error: String) {
        self.status = FeedStatus::Error;
        self.error = Some(error);
    }

    pub fn is_loading(&self) -> bool {
        self.status == FeedStatus::Loading
    }
}

/// Complete client state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Current query. Industry and location use [`ALL`] for "no filter".
    pub params: QueryDescriptor,
    pub view_mode: ViewMode,
    pub companies: Feed<CompanyPage>,
    pub facets: Feed<Facets>,
    pub stats: Feed<Stats>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            params: default_params(),
            view_mode: ViewMode::default(),
            companies: Feed::default(),
            facets: Feed::default(),
            stats: Feed::default(),
        }
    }
}

impl QueryState {
    /// Query actually sent to the server: `all` filters become empty strings.
    pub fn request_query(&self) -> QueryDescriptor {
        to_request(&self.params)
    }

    /// Errors of all feeds, in display order.
    pub fn errors(&self) -> Vec<(FeedKind, &str)> {
        [
            (FeedKind::Companies, self.companies.error.as_deref()),
            (FeedKind::Facets, self.facets.error.as_deref()),
            (FeedKind::Stats, self.stats.error.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, err)| err.map(|e| (kind, e)))
        .collect()
    }

    pub fn any_loading(&self) -> bool {
        self.companies.is_loading() || self.facets.is_loading() || self.stats.is_loading()
    }
}

/// Client defaults: first page of ten, no filters, sorted by name ascending.
pub fn default_params() -> QueryDescriptor {
    QueryDescriptor::default().with_industry(ALL).with_location(ALL)
}

pub fn to_request(params: &QueryDescriptor) -> QueryDescriptor {
    let mut request = params.clone();
    if request.industry == ALL {
        request.industry.clear();
    }
    if request.location == ALL {
        request.location.clear();
    }
    request
}
