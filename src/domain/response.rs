//! Typed response schemas for the REST API boundary.
//!
//! Every endpoint answers with a JSON object carrying a `status` field. Instead
//! of trusting ad hoc field lookups at each call site, responses decode into
//! [`ApiResponse<T>`], a tagged union keyed by `status`, where `T` is the
//! endpoint-specific success payload.
//!
//! ```
//! use bizdir::domain::{ApiResponse, CategoryMatches, SearchPayload};
//!
//! let body = r#"{"status":"SUCCESS","categories":["Hotels","Hot Springs"]}"#;
//! let response: ApiResponse<CategoryMatches> = ApiResponse::from_json(body).unwrap();
//! let items = response.into_success().unwrap().into_items();
//! assert_eq!(items, vec!["Hotels".to_string(), "Hot Springs".to_string()]);
//! ```

use super::error::TransportError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The `status` discriminator shared by every endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiStatus {
    Success,
    Fail,
    Error,
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "SUCCESS",
            Self::Fail => "FAIL",
            Self::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Details attached to a `FAIL` or `ERROR` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A decoded API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ApiResponse<T> {
    #[serde(rename = "SUCCESS")]
    Success(T),
    #[serde(rename = "FAIL")]
    Fail(Failure),
    #[serde(rename = "ERROR")]
    Error(Failure),
}

impl<T> ApiResponse<T> {
    /// Decodes a response body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the body is not a valid response for `T`.
    pub fn from_json(body: &str) -> Result<Self, TransportError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_str(body)?)
    }

    #[must_use]
    pub const fn status(&self) -> ApiStatus {
        match self {
            Self::Success(_) => ApiStatus::Success,
            Self::Fail(_) => ApiStatus::Fail,
            Self::Error(_) => ApiStatus::Error,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Consumes the response, returning the payload of a `SUCCESS`.
    #[must_use]
    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Fail(_) | Self::Error(_) => None,
        }
    }
}

/// A search endpoint payload that yields the list of suggested items.
///
/// Replaces selecting the result array by field name: each search endpoint
/// has its own payload type that knows where its items live.
pub trait SearchPayload {
    /// One suggestion.
    type Item: Clone + Send + Sync + 'static;

    /// Extracts the suggestions from the payload.
    fn into_items(self) -> Vec<Self::Item>;
}

/// Payload of the category query-matching endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMatches {
    #[serde(default)]
    pub categories: Vec<String>,
}

impl SearchPayload for CategoryMatches {
    type Item = String;

    fn into_items(self) -> Vec<String> {
        self.categories
    }
}

/// A city suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}, {region}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Payload of the city query-matching endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityMatches {
    #[serde(default)]
    pub cities: Vec<City>,
}

impl SearchPayload for CityMatches {
    type Item = City;

    fn into_items(self) -> Vec<City> {
        self.cities
    }
}

/// One page of a paginated result set (businesses, reviews, questions, tips).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
}

impl<T> ResultPage<T> {
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self {
            items,
            total_pages: None,
        }
    }

    /// Whether the page holds at least one item. Used as the cache predicate
    /// that decides if a navigation needs a round trip.
    #[must_use]
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fail_without_message() {
        let response: ApiResponse<CategoryMatches> =
            ApiResponse::from_json(r#"{"status":"FAIL"}"#).unwrap();
        assert_eq!(response.status(), ApiStatus::Fail);
        assert!(response.into_success().is_none());
    }

    #[test]
    fn decodes_error_with_message() {
        let response: ApiResponse<CityMatches> =
            ApiResponse::from_json(r#"{"status":"ERROR","message":"db down"}"#).unwrap();
        assert_eq!(
            response,
            ApiResponse::Error(Failure {
                message: Some("db down".to_string())
            })
        );
    }

    #[test]
    fn decodes_city_matches() {
        let body = r#"{"status":"SUCCESS","cities":[{"name":"Austin","region":"TX"},{"name":"Aurora"}]}"#;
        let response: ApiResponse<CityMatches> = ApiResponse::from_json(body).unwrap();
        let cities = response.into_success().unwrap().into_items();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].to_string(), "Austin, TX");
        assert_eq!(cities[1].to_string(), "Aurora");
    }

    #[test]
    fn unknown_status_is_a_transport_error() {
        let err = ApiResponse::<CategoryMatches>::from_json(r#"{"status":"MAYBE"}"#).unwrap_err();
        assert!(err.message().starts_with("malformed response body"));
    }

    #[test]
    fn result_page_defaults_to_empty() {
        let response: ApiResponse<ResultPage<String>> =
            ApiResponse::from_json(r#"{"status":"SUCCESS"}"#).unwrap();
        let page = response.into_success().unwrap();
        assert!(!page.has_items());
        assert_eq!(page.total_pages, None);
    }
}
