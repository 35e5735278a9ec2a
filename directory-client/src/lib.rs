pub mod api;
pub mod commands;
pub mod render;
pub mod state_machine;

pub use api::{ApiClient, ApiClientError, DirectoryApi, DEFAULT_API_URL, DEFAULT_TIMEOUT};
pub use state_machine::{QuerySession, QueryState};
