//! Search layer: debounced search-and-suggest over query-matching endpoints.
//!
//! # Modules
//!
//! - [`debounced`]: [`DebouncedSearch`], the per-field search orchestrator
//! - [`debouncer`]: Timer re-arming primitive
//! - [`state`]: Suggestion and snapshot types
//!
//! Minimum character thresholds and selection handling live in the field
//! controller ([`crate::app`]), not here.

pub mod debounced;
pub mod debouncer;
pub mod state;

pub use debounced::{DebouncedSearch, SearchOutcome, SearchRequestFn};
pub use debouncer::Debouncer;
pub use state::{SearchState, Suggestions};
