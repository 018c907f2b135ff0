//! Domain layer: errors, response schemas and the authentication session.
//!
//! These types are independent of the orchestration machinery and describe the
//! contracts of the external collaborators (REST client, auth provider).
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`response`]: Typed API response schemas
//! - [`session`]: Authentication session store and read handles

pub mod error;
pub mod response;
pub mod session;

pub use error::{BizdirError, RequestError, Result, TransportError, TransportResult};
pub use response::{
    ApiResponse, ApiStatus, CategoryMatches, City, CityMatches, Failure, ResultPage, SearchPayload,
};
pub use session::{AuthSession, Role, SessionHandle, SessionStore};
