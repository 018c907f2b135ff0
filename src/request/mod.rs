//! Request layer: tracked execution of network calls.
//!
//! Every network call issued by the UI goes through a [`RequestTracker`],
//! which owns the loading/retry flags for its call site. The search and
//! pagination layers are built on top of it.
//!
//! # Modules
//!
//! - [`tracker`]: Loading state, retry loop, per-attempt timeout
//! - [`retry`]: Retry policies and backoff settings
//! - [`fence`]: Sequence tickets that discard stale responses
//! - [`timeout`]: Fetch timeout wrapper

pub mod fence;
pub mod retry;
pub mod timeout;
pub mod tracker;

pub use fence::{SequenceFence, Ticket};
pub use retry::{RetryPolicy, RetrySettings};
pub use timeout::with_timeout;
pub use tracker::{RequestState, RequestTracker, RequestTrackerBuilder};
