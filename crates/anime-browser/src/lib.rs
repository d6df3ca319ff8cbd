//! Anime search and detail browser over the Jikan API.
//!
//! The library holds the request-lifecycle core:
//! - [`debounce`]: quiet-period filter for the search box
//! - [`search`] and [`detail`]: state containers and their transitions
//! - [`store`]: owns both containers, spawns cancellable fetches and
//!   applies only the latest completion of each request series
//! - [`view`] and [`browse`]: text rendering and the interactive loop

pub mod browse;
pub mod debounce;
pub mod detail;
pub mod models;
pub mod search;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use debounce::{debounce, Debounced};
pub use detail::{DetailPhase, DetailState};
pub use models::{AnimeDetail, AnimeSummary};
pub use search::{SearchPhase, SearchState};
pub use store::{Action, AppState, Completion, Completions, Store};
