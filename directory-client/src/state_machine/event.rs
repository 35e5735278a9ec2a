//! Events that trigger state transitions.
//!
//! Events are either user intents coming from the presentation layer or the
//! outcomes of fetches dispatched earlier. Outcomes carry the generation they
//! were dispatched with so stale ones can be recognized.

use directory_core::{CompanyPage, Facets, SortKey, SortOrder, Stats};

use super::state::{FeedKind, Generation};

/// Partial update of the query parameters, applied as one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsPatch {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
}

impl ParamsPatch {
    /// True if the patch changes anything that narrows or resizes the result
    /// set, which moves the view back to the first page.
    pub fn resets_page(&self) -> bool {
        self.search.is_some()
            || self.industry.is_some()
            || self.location.is_some()
            || self.limit.is_some()
    }
}

/// All events that can trigger state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // =========================================================================
    // Lifecycle
    // =========================================================================
    /// The UI was mounted: load facets, stats and the first page.
    Mounted,

    /// Refresh button: reload the current page and the stats.
    Refreshed,

    // =========================================================================
    // Query intents
    // =========================================================================
    SearchChanged(String),
    IndustryChanged(String),
    LocationChanged(String),
    SortChanged {
        sort_by: SortKey,
        sort_order: SortOrder,
    },
    PageChanged(u64),
    LimitChanged(u64),
    ParamsMerged(ParamsPatch),
    /// Restore every parameter except the page size to its default.
    FiltersReset,

    // =========================================================================
    // Presentation intents
    // =========================================================================
    ViewModeToggled,
    ErrorCleared,

    // =========================================================================
    // Fetch outcomes
    // =========================================================================
    CompaniesLoaded {
        generation: Generation,
        page: CompanyPage,
    },
    CompaniesFailed {
        generation: Generation,
        error: String,
    },
    FacetsLoaded {
        generation: Generation,
        facets: Facets,
    },
    FacetsFailed {
        generation: Generation,
        error: String,
    },
    StatsLoaded {
        generation: Generation,
        stats: Stats,
    },
    StatsFailed {
        generation: Generation,
        error: String,
    },
}

impl Event {
    /// Failure outcome for the given feed.
    pub fn fetch_failed(kind: FeedKind, generation: Generation, error: String) -> Self {
        match kind {
            FeedKind::Companies => Event::CompaniesFailed { generation, error },
            FeedKind::Facets => Event::FacetsFailed { generation, error },
            FeedKind::Stats => Event::StatsFailed { generation, error },
        }
    }

    /// True for events produced by the interpreter rather than the user.
    pub fn is_outcome(&self) -> bool {
        matches!(
            self,
            Event::CompaniesLoaded { .. }
                | Event::CompaniesFailed { .. }
                | Event::FacetsLoaded { .. }
                | Event::FacetsFailed { .. }
                | Event::StatsLoaded { .. }
                | Event::StatsFailed { .. }
        )
    }

    /// Returns a summary of the event suitable for logging.
    ///
    /// Result payloads are summarized by size rather than printed.
    pub fn log_summary(&self) -> String {
        match self {
            Event::Mounted => "Mounted".to_string(),
            Event::Refreshed => "Refreshed".to_string(),
            Event::SearchChanged(s) => format!("SearchChanged({:?})", s),
            Event::IndustryChanged(s) => format!("IndustryChanged({:?})", s),
            Event::LocationChanged(s) => format!("LocationChanged({:?})", s),
            Event::SortChanged {
                sort_by,
                sort_order,
            } => format!("SortChanged({} {})", sort_by, sort_order),
            Event::PageChanged(p) => format!("PageChanged({})", p),
            Event::LimitChanged(l) => format!("LimitChanged({})", l),
            Event::ParamsMerged(patch) => format!("ParamsMerged({:?})", patch),
            Event::FiltersReset => "FiltersReset".to_string(),
            Event::ViewModeToggled => "ViewModeToggled".to_string(),
            Event::ErrorCleared => "ErrorCleared".to_string(),
            Event::CompaniesLoaded { generation, page } => format!(
                "CompaniesLoaded {{ gen: {}, rows: {}, total: {} }}",
                generation,
                page.data.len(),
                page.pagination.total_companies
            ),
            Event::CompaniesFailed { generation, error } => {
                format!("CompaniesFailed {{ gen: {}, error: {} }}", generation, error)
            }
            Event::FacetsLoaded { generation, facets } => format!(
                "FacetsLoaded {{ gen: {}, industries: {}, locations: {} }}",
                generation,
                facets.industries.len(),
                facets.locations.len()
            ),
            Event::FacetsFailed { generation, error } => {
                format!("FacetsFailed {{ gen: {}, error: {} }}", generation, error)
            }
            Event::StatsLoaded { generation, .. } => {
                format!("StatsLoaded {{ gen: {} }}", generation)
            }
            Event::StatsFailed { generation, error } => {
                format!("StatsFailed {{ gen: {}, error: {} }}", generation, error)
            }
        }
    }
}
