//! Application layer: search field controllers.
//!
//! Sits between the UI, which reports what the user did to a field, and the
//! search layer, which talks to the network.
//!
//! ```text
//! UI → Event → handle_event → FieldState mutation → Actions → DebouncedSearch
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Effects emitted by the handler
//! - [`field`]: [`SearchField`], executes actions against a search
//! - [`handler`]: Event processing and field rules
//! - [`modes`]: Field kinds and their thresholds
//! - [`state`]: Per-field input state
//!
//! # Example
//!
//! ```rust
//! use bizdir::app::{handle_event, Event, FieldKind, FieldState};
//!
//! let mut state = FieldState::new(FieldKind::Category);
//! let actions = handle_event(&mut state, &Event::Input("ho".into()));
//! assert!(!actions.is_empty());
//! ```

pub mod actions;
pub mod field;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use field::SearchField;
pub use handler::{handle_event, Event};
pub use modes::FieldKind;
pub use state::FieldState;
