//! Core of the companies directory: the immutable record store and the pure
//! functions that query it.
//!
//! - [`evaluate`] turns a [`QueryDescriptor`] into one page of results
//! - [`extract_facets`] lists the filter vocabularies
//! - [`compute_stats`] summarizes the whole store

pub mod company;
pub mod engine;
pub mod facets;
pub mod query;
pub mod stats;
pub mod store;
pub mod wire;

pub use company::{country_token, Company};
pub use engine::{evaluate, CompanyPage, Pagination};
pub use facets::{extract_facets, Facets};
pub use query::{
    QueryDescriptor, QueryError, RawCompanyQuery, SortKey, SortOrder, ALL, DEFAULT_LIMIT,
    DEFAULT_PAGE, LIMIT_PRESETS,
};
pub use stats::{compute_stats, Stats};
pub use store::{RecordStore, StoreError};
pub use wire::{CompaniesResponse, DataResponse, ErrorResponse, HealthResponse};
