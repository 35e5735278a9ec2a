//! Explicit state machine for the client's query state.
//!
//! The design separates:
//! - **State**: the current query parameters, view mode and three feeds (`QueryState`)
//! - **Events**: user intents and fetch outcomes (`Event`)
//! - **Effects**: fetches to run and messages to log (`Effect`)
//! - **Transition**: pure function `(State, Event) -> (State, Vec<Effect>)`
//!
//! The interpreter executes effects against a [`crate::api::DirectoryApi`] and
//! the session folds the resulting events back in.

pub mod effect;
pub mod event;
pub mod interpreter;
pub mod session;
pub mod state;
pub mod transition;

pub use effect::*;
pub use event::*;
pub use session::QuerySession;
pub use state::*;
pub use transition::*;
