//! Pagination layer: per-generation page cache and cached navigation.
//!
//! # Modules
//!
//! - [`cache`]: [`PaginationCache`], the page store
//! - [`paginator`]: [`Paginator`], cache + tracker + fetch function

pub mod cache;
pub mod paginator;

pub use cache::{PaginationCache, FIRST_PAGE};
pub use paginator::{PageFetch, Paginator};
