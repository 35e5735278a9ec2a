//! Transitions for fetch outcomes.
//!
//! An outcome is applied only if its generation is the latest one dispatched
//! for its feed; anything older is discarded. A failure keeps the last good
//! data in place.

use super::TransitionResult;
use crate::state_machine::effect::{Effect, LogLevel};
use crate::state_machine::event::Event;
use crate::state_machine::state::{Feed, FeedKind, Generation, QueryState};

pub fn handle(mut state: QueryState, event: Event) -> TransitionResult {
    let effects = match event {
        Event::CompaniesLoaded { generation, page } => {
            settle(&mut state.companies, FeedKind::Companies, generation, Ok(page))
        }
        Event::CompaniesFailed { generation, error } => {
            settle(&mut state.companies, FeedKind::Companies, generation, Err(error))
        }
        Event::FacetsLoaded { generation, facets } => {
            settle(&mut state.facets, FeedKind::Facets, generation, Ok(facets))
        }
        Event::FacetsFailed { generation, error } => {
            settle(&mut state.facets, FeedKind::Facets, generation, Err(error))
        }
        Event::StatsLoaded { generation, stats } => {
            settle(&mut state.stats, FeedKind::Stats, generation, Ok(stats))
        }
        Event::StatsFailed { generation, error } => {
            settle(&mut state.stats, FeedKind::Stats, generation, Err(error))
        }
        other => vec![Effect::Log {
            level: LogLevel::Warn,
            message: format!("Unexpected event for outcome handler: {}", other.log_summary()),
        }],
    };
    TransitionResult::new(state, effects)
}

fn settle<T>(
    feed: &mut Feed<T>,
    kind: FeedKind,
    generation: Generation,
    outcome: Result<T, String>,
) -> Vec<Effect> {
    if !feed.is_current(generation) {
        return vec![Effect::Log {
            level: LogLevel::Debug,
            message: format!(
                "Discarding stale {} response {} (latest {})",
                kind, generation, feed.generation
            ),
        }];
    }

    match outcome {
        Ok(data) => {
            feed.succeed(data);
            vec![]
        }
        Err(error) => {
            let effect = Effect::Log {
                level: LogLevel::Warn,
                message: format!("Failed to fetch {}: {}", kind, error),
            };
            feed.fail(error);
            vec![effect]
        }
    }
}
