//! Pure state transition function.
//!
//! Each kind of event has its own handler module with co-located tests:
//! - `intent`: user intents that change the query, the view or the errors
//! - `outcome`: fetch results, filtered by generation

mod intent;
mod outcome;

use super::effect::Effect;
use super::event::Event;
use super::state::QueryState;

/// Result of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub state: QueryState,
    /// Effects to execute.
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: QueryState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    pub fn no_change(state: QueryState) -> Self {
        Self {
            state,
            effects: vec![],
        }
    }
}

/// Pure state transition function.
///
/// Given the current state and an event, returns the new state and effects to execute.
pub fn transition(state: QueryState, event: Event) -> TransitionResult {
    if event.is_outcome() {
        outcome::handle(state, event)
    } else {
        intent::handle(state, event)
    }
}

#[cfg(test)]
mod tests {
    use super::super::state::{FeedStatus, Generation};
    use super::*;
    use directory_core::{CompanyPage, Pagination};

    fn fetch_generation(result: &TransitionResult) -> Generation {
        result
            .effects
            .iter()
            .find_map(|e| match e {
                Effect::FetchCompanies { generation, .. } => Some(*generation),
                _ => None,
            })
            .expect("a company fetch")
    }

    #[test]
    fn test_out_of_order_responses_keep_newest() {
        let state = QueryState::default();

        let first = transition(state, Event::SearchChanged("a".to_string()));
        let g1 = fetch_generation(&first);
        let second = transition(first.state, Event::SearchChanged("ab".to_string()));
        let g2 = fetch_generation(&second);

        // The newer request resolves first.
        let newest = CompanyPage {
            data: vec![],
            pagination: Pagination::new(1, 10, 7),
        };
        let after_new = transition(
            second.state,
            Event::CompaniesLoaded {
                generation: g2,
                page: newest.clone(),
            },
        );
        let after_old = transition(
            after_new.state,
            Event::CompaniesLoaded {
                generation: g1,
                page: CompanyPage {
                    data: vec![],
                    pagination: Pagination::new(1, 10, 99),
                },
            },
        );

        assert_eq!(after_old.state.companies.status, FeedStatus::Success);
        assert_eq!(after_old.state.companies.data, newest);
        assert_eq!(after_old.state.params.search, "ab");
    }

    #[test]
    fn test_each_mutation_dispatches_one_fetch() {
        let events = vec![
            Event::SearchChanged("x".to_string()),
            Event::PageChanged(2),
            Event::LimitChanged(20),
            Event::IndustryChanged("Media".to_string()),
            Event::FiltersReset,
        ];

        let mut state = QueryState::default();
        for event in events {
            let result = transition(state, event);
            let fetches = result.effects.iter().filter(|e| e.is_fetch()).count();
            assert_eq!(fetches, 1);
            state = result.state;
        }
        assert_eq!(state.companies.generation, Generation(5));
    }

    mod properties {
        use super::*;
        use directory_core::{SortKey, SortOrder};
        use proptest::prelude::*;

        fn arb_intent() -> impl Strategy<Value = Event> {
            prop_oneof![
                "[a-c]{0,2}".prop_map(Event::SearchChanged),
                prop_oneof![Just("all"), Just("Energy"), Just("Media")]
                    .prop_map(|s| Event::IndustryChanged(s.to_string())),
                prop_oneof![Just("all"), Just("USA"), Just("Oslo")]
                    .prop_map(|s| Event::LocationChanged(s.to_string())),
                (0u64..5).prop_map(Event::PageChanged),
                (0u64..30).prop_map(Event::LimitChanged),
                (
                    proptest::sample::select(SortKey::ALL.to_vec()),
                    prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)]
                )
                    .prop_map(|(sort_by, sort_order)| Event::SortChanged {
                        sort_by,
                        sort_order
                    }),
                Just(Event::FiltersReset),
                Just(Event::ViewModeToggled),
                Just(Event::Refreshed),
            ]
        }

        proptest! {
            #[test]
            fn prop_fetch_matches_params(events in prop::collection::vec(arb_intent(), 1..20)) {
                let mut state = QueryState::default();
                for event in events {
                    let result = transition(state, event);
                    let queries: Vec<_> = result
                        .effects
                        .iter()
                        .filter_map(|e| match e {
                            Effect::FetchCompanies { query, .. } => Some(query.clone()),
                            _ => None,
                        })
                        .collect();
                    prop_assert!(queries.len() <= 1);
                    if let Some(query) = queries.first() {
                        prop_assert_eq!(query, &result.state.request_query());
                    }
                    prop_assert!(result.state.params.page >= 1);
                    state = result.state;
                }
            }

            #[test]
            fn prop_latest_generation_wins(
                events in prop::collection::vec(arb_intent(), 1..12),
                keys in prop::collection::vec(any::<u32>(), 12),
            ) {
                let mut state = QueryState::default();
                let mut dispatched = Vec::new();
                for event in events {
                    let result = transition(state, event);
                    for effect in &result.effects {
                        if let Effect::FetchCompanies { generation, .. } = effect {
                            dispatched.push(*generation);
                        }
                    }
                    state = result.state;
                }
                prop_assume!(!dispatched.is_empty());

                // Deliver every response in an arbitrary order. Each page is
                // tagged with its generation through the total count.
                let mut order: Vec<usize> = (0..dispatched.len()).collect();
                order.sort_by_key(|i| keys[*i]);
                for i in order {
                    let generation = dispatched[i];
                    let page = CompanyPage {
                        data: vec![],
                        pagination: Pagination::new(1, 10, generation.0),
                    };
                    state = transition(state, Event::CompaniesLoaded { generation, page }).state;
                }

                let latest = dispatched[dispatched.len() - 1];
                prop_assert_eq!(state.companies.status, FeedStatus::Success);
                prop_assert_eq!(state.companies.data.pagination.total_companies, latest.0);
            }
        }
    }
}
