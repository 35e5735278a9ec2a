//! Transitions for user intents.
//!
//! Every intent that changes the query parameters dispatches exactly one
//! company fetch. Intents that leave the parameters as they were dispatch
//! nothing.

use std::num::NonZeroU64;

use directory_core::QueryDescriptor;

use super::TransitionResult;
use crate::state_machine::effect::{Effect, LogLevel};
use crate::state_machine::event::{Event, ParamsPatch};
use crate::state_machine::state::{default_params, Feed, FeedStatus, QueryState};

pub fn handle(mut state: QueryState, event: Event) -> TransitionResult {
    match event {
        Event::Mounted => {
            let effects = vec![
                begin_facets(&mut state),
                begin_stats(&mut state),
                begin_companies(&mut state),
            ];
            TransitionResult::new(state, effects)
        }

        Event::Refreshed => {
            let effects = vec![begin_companies(&mut state), begin_stats(&mut state)];
            TransitionResult::new(state, effects)
        }

        // Filter changes reset the page in the same update.
        Event::SearchChanged(search) => update_params(state, |p| {
            p.search = search;
            p.page = 1;
        }),
        Event::IndustryChanged(industry) => update_params(state, |p| {
            p.industry = industry;
            p.page = 1;
        }),
        Event::LocationChanged(location) => update_params(state, |p| {
            p.location = location;
            p.page = 1;
        }),

        // Sorting keeps the current page.
        Event::SortChanged {
            sort_by,
            sort_order,
        } => update_params(state, |p| {
            p.sort_by = sort_by;
            p.sort_order = sort_order;
        }),

        Event::PageChanged(0) => ignored(state, "Ignoring request for page 0"),
        Event::PageChanged(page) => update_params(state, |p| p.page = page),

        Event::LimitChanged(limit) => match NonZeroU64::new(limit) {
            Some(limit) => update_params(state, |p| {
                p.limit = limit;
                p.page = 1;
            }),
            None => ignored(state, "Ignoring page size of 0"),
        },

        Event::ParamsMerged(patch) => update_params(state, |p| apply_patch(p, patch)),

        Event::FiltersReset => update_params(state, |p| {
            let limit = p.limit;
            *p = default_params();
            p.limit = limit;
        }),

        Event::ViewModeToggled => {
            state.view_mode = state.view_mode.toggled();
            TransitionResult::no_change(state)
        }

        Event::ErrorCleared => {
            clear_error(&mut state.companies);
            clear_error(&mut state.facets);
            clear_error(&mut state.stats);
            TransitionResult::no_change(state)
        }

        other => TransitionResult::new(
            state,
            vec![Effect::Log {
                level: LogLevel::Warn,
                message: format!("Unexpected event for intent handler: {}", other.log_summary()),
            }],
        ),
    }
}

/// Apply `update` to the parameters. Dispatch a fetch only if they changed.
fn update_params(
    mut state: QueryState,
    update: impl FnOnce(&mut QueryDescriptor),
) -> TransitionResult {
    let before = state.params.clone();
    update(&mut state.params);

    if state.params == before {
        return TransitionResult::no_change(state);
    }

    let effect = begin_companies(&mut state);
    TransitionResult::new(state, vec![effect])
}

fn apply_patch(params: &mut QueryDescriptor, patch: ParamsPatch) {
    let resets_page = patch.resets_page();

    if let Some(search) = patch.search {
        params.search = search;
    }
    if let Some(industry) = patch.industry {
        params.industry = industry;
    }
    if let Some(location) = patch.location {
        params.location = location;
    }
    if let Some(limit) = patch.limit.and_then(NonZeroU64::new) {
        params.limit = limit;
    }
    if let Some(sort_by) = patch.sort_by {
        params.sort_by = sort_by;
    }
    if let Some(sort_order) = patch.sort_order {
        params.sort_order = sort_order;
    }

    match patch.page.filter(|p| *p > 0) {
        Some(page) => params.page = page,
        None if resets_page => params.page = 1,
        None => {}
    }
}

fn clear_error<T>(feed: &mut Feed<T>) {
    feed.error = None;
    if feed.status == FeedStatus::Error {
        feed.status = FeedStatus::Idle;
    }
}

fn ignored(state: QueryState, message: &str) -> TransitionResult {
    TransitionResult::new(
        state,
        vec![Effect::Log {
            level: LogLevel::Warn,
            message: message.to_string(),
        }],
    )
}

fn begin_companies(state: &mut QueryState) -> Effect {
    let generation = state.companies.begin();
    Effect::FetchCompanies {
        generation,
        query: state.request_query(),
    }
}

fn begin_facets(state: &mut QueryState) -> Effect {
    Effect::FetchFacets {
        generation: state.facets.begin(),
    }
}

fn begin_stats(state: &mut QueryState) -> Effect {
    Effect::FetchStats {
        generation: state.stats.begin(),
    }
}
