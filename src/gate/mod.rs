//! Gates that hold a "next action" until a condition is met.
//!
//! - [`deferred`]: generic [`Gate`] primitive
//! - [`auth`]: [`AuthGate`], waits for an authenticated session
//! - [`confirmation`]: [`ConfirmationGate`], waits for explicit confirmation

pub mod auth;
pub mod confirmation;
pub mod deferred;

pub use auth::{spawn_resume_watcher, AuthGate, SessionCondition};
pub use confirmation::{Confirmation, ConfirmationGate};
pub use deferred::{Admission, Gate, GateCondition, GateState, PendingAction};
