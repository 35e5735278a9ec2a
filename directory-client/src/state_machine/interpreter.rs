//! Effect interpreter that executes effects against the directory API.
//!
//! The interpreter is the boundary between the pure state machine and the
//! network. Fetch effects become outcome events; log effects go to `tracing`.

use tracing::{debug, error, info, warn};

use super::effect::{Effect, LogLevel};
use super::event::Event;
use crate::api::DirectoryApi;

/// Execute a single effect and return the events it produced.
pub async fn execute_effect(api: &dyn DirectoryApi, effect: Effect) -> Vec<Event> {
    match effect {
        Effect::FetchCompanies { generation, query } => {
            let event = match api.fetch_companies(&query).await {
                Ok(page) => Event::CompaniesLoaded { generation, page },
                Err(e) => Event::CompaniesFailed {
                    generation,
                    error: e.to_string(),
                },
            };
            vec![event]
        }

        Effect::FetchFacets { generation } => {
            let event = match api.fetch_facets().await {
                Ok(facets) => Event::FacetsLoaded { generation, facets },
                Err(e) => Event::FacetsFailed {
                    generation,
                    error: e.to_string(),
                },
            };
            vec![event]
        }

        Effect::FetchStats { generation } => {
            let event = match api.fetch_stats().await {
                Ok(stats) => Event::StatsLoaded { generation, stats },
                Err(e) => Event::StatsFailed {
                    generation,
                    error: e.to_string(),
                },
            };
            vec![event]
        }

        Effect::Log { level, message } => {
            log_message(level, &message);
            vec![]
        }
    }
}

pub fn log_message(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => debug!("{}", message),
        LogLevel::Info => info!("{}", message),
        LogLevel::Warn => warn!("{}", message),
        LogLevel::Error => error!("{}", message),
    }
}
