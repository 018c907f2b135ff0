//! bizdir: request and state orchestration for a local-business directory.
//!
//! The directory's views (search, business profiles, reviews, collections)
//! talk to a remote REST API. This crate is the layer between those views and
//! the network:
//! - Loading and retry state around every request
//! - Debounced search-as-you-type with stale-response fencing
//! - Cached pagination per query
//! - Deferring actions until the user signs in or confirms

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Views (out of scope)                               │
//! └─────────────────────────────────────────────────────┘
//!          │ events                 │ actions
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Field rules
//! │  - FieldState + handle_event → Actions              │
//! │  - SearchField executes actions                     │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ search/       │   │ pagination/   │   │ gate/         │
//! │ - Debouncer   │   │ - Page cache  │   │ - AuthGate    │
//! │ - Fencing     │   │ - Paginator   │   │ - Confirmation│
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  request/: RequestTracker, retry, timeout, fence    │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  domain/: errors, response schemas, session store   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Search field controllers with an event/action model
//! - [`context`]: Wires configuration and session into components
//! - [`domain`]: Errors, response schemas, authentication session
//! - [`gate`]: Auth and confirmation gates
//! - [`infrastructure`]: Path utilities
//! - [`observability`]: Tracing subscriber setup
//! - [`pagination`]: Page cache and paginator
//! - [`request`]: Request tracker, retry, timeout, sequence fence
//! - [`search`]: Debounced search
//!
//! # Configuration
//!
//! ```toml
//! category_debounce_ms = 100
//! city_debounce_ms = 250
//! fetch_timeout_ms = 10000
//! trace_level = "debug"
//! trace_file = "~/.local/share/bizdir/bizdir.log"
//! ```
//!
//! # Example
//!
//! ```rust
//! use bizdir::{initialize, Config};
//! use bizdir::app::FieldKind;
//! use bizdir::domain::{ApiResponse, CategoryMatches, TransportError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> bizdir::Result<()> {
//! let context = initialize(&Config::from_toml_str("category_debounce_ms = 100")?);
//!
//! let mut category = context.field(FieldKind::Category, |query: String| async move {
//!     Ok::<_, TransportError>(ApiResponse::Success(CategoryMatches {
//!         categories: vec![format!("{query}els")],
//!     }))
//! });
//! category.input("hot");
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod context;
pub mod domain;
pub mod gate;
pub mod infrastructure;
pub mod observability;
pub mod pagination;
pub mod request;
pub mod search;

pub use app::{handle_event, Action, Event, FieldKind, FieldState, SearchField};
pub use context::Context;
pub use domain::{
    ApiResponse, ApiStatus, AuthSession, BizdirError, RequestError, Result, SessionHandle,
    SessionStore, TransportError,
};
pub use gate::{AuthGate, ConfirmationGate};
pub use pagination::{PaginationCache, Paginator};
pub use request::{RequestState, RequestTracker, RetryPolicy};
pub use search::DebouncedSearch;

use crate::request::RetrySettings;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime configuration.
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quiet period before a category search fires. Default: 100
    pub category_debounce_ms: u64,

    /// Quiet period before a city search fires. Default: 250
    pub city_debounce_ms: u64,

    /// Characters required before a category search. Default: 3
    pub category_min_chars: usize,

    /// Characters required before a city search. Default: 2
    pub city_min_chars: usize,

    /// Per-attempt request timeout. `0` disables it. Default: 10000
    pub fetch_timeout_ms: u64,

    /// First retry delay. Default: 200
    pub retry_min_delay_ms: u64,

    /// Upper bound for retry delays. Default: 5000
    pub retry_max_delay_ms: u64,

    /// Wall-clock cap for retry-until-positive. `0` disables it. Default: 60000
    pub retry_max_elapsed_ms: u64,

    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Log file path; `~` expands to `$HOME`. Logs go to stderr when unset.
    pub trace_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            category_debounce_ms: 100,
            city_debounce_ms: 250,
            category_min_chars: FieldKind::Category.default_min_chars(),
            city_min_chars: FieldKind::City.default_min_chars(),
            fetch_timeout_ms: 10_000,
            retry_min_delay_ms: 200,
            retry_max_delay_ms: 5_000,
            retry_max_elapsed_ms: 60_000,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`BizdirError::Config`] for malformed TOML or mistyped values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BizdirError::Io`] if the file cannot be read and
    /// [`BizdirError::Config`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Builds a configuration from flat string pairs, e.g. environment or
    /// embedder settings.
    ///
    /// Missing or unparsable values fall back to their defaults. Empty
    /// strings unset `trace_level` and `trace_file`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use bizdir::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("city_debounce_ms".to_string(), "300".to_string());
    /// map.insert("fetch_timeout_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.city_debounce_ms, 300);
    /// assert_eq!(config.fetch_timeout_ms, 10_000);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        fn parsed<T: std::str::FromStr>(map: &BTreeMap<String, String>, key: &str, default: T) -> T {
            map.get(key)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(default)
        }

        fn text(map: &BTreeMap<String, String>, key: &str) -> Option<String> {
            map.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        }

        let defaults = Self::default();
        Self {
            category_debounce_ms: parsed(map, "category_debounce_ms", defaults.category_debounce_ms),
            city_debounce_ms: parsed(map, "city_debounce_ms", defaults.city_debounce_ms),
            category_min_chars: parsed(map, "category_min_chars", defaults.category_min_chars),
            city_min_chars: parsed(map, "city_min_chars", defaults.city_min_chars),
            fetch_timeout_ms: parsed(map, "fetch_timeout_ms", defaults.fetch_timeout_ms),
            retry_min_delay_ms: parsed(map, "retry_min_delay_ms", defaults.retry_min_delay_ms),
            retry_max_delay_ms: parsed(map, "retry_max_delay_ms", defaults.retry_max_delay_ms),
            retry_max_elapsed_ms: parsed(map, "retry_max_elapsed_ms", defaults.retry_max_elapsed_ms),
            trace_level: text(map, "trace_level"),
            trace_file: text(map, "trace_file"),
        }
    }

    #[must_use]
    pub const fn debounce_for(&self, kind: FieldKind) -> Duration {
        match kind {
            FieldKind::Category => Duration::from_millis(self.category_debounce_ms),
            FieldKind::City => Duration::from_millis(self.city_debounce_ms),
        }
    }

    #[must_use]
    pub const fn min_chars_for(&self, kind: FieldKind) -> usize {
        match kind {
            FieldKind::Category => self.category_min_chars,
            FieldKind::City => self.city_min_chars,
        }
    }

    #[must_use]
    pub const fn fetch_timeout(&self) -> Option<Duration> {
        match self.fetch_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    #[must_use]
    pub const fn retry_settings(&self) -> RetrySettings {
        RetrySettings {
            min_delay: Duration::from_millis(self.retry_min_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
            max_elapsed: match self.retry_max_elapsed_ms {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
        }
    }

    /// `trace_file` with `~` expanded.
    #[must_use]
    pub fn trace_file_path(&self) -> Option<PathBuf> {
        self.trace_file
            .as_deref()
            .map(infrastructure::expand_tilde)
    }
}

/// Creates the application [`Context`].
///
/// Does not install a tracing subscriber; call
/// [`observability::init_tracing`] first if the embedder has none.
#[must_use]
pub fn initialize(config: &Config) -> Context {
    tracing::debug!(
        category_debounce_ms = config.category_debounce_ms,
        city_debounce_ms = config.city_debounce_ms,
        fetch_timeout_ms = config.fetch_timeout_ms,
        "initializing bizdir"
    );
    Context::new(config.clone())
}
