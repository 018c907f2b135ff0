//! Search field kinds.
//!
//! The directory has two kinds of search-as-you-type fields. They differ only
//! in how many characters must be typed before a search is worth issuing and
//! in how long the debounce window is (configured in
//! [`Config`](crate::Config)).
//!
//! # Example
//!
//! ```rust
//! use bizdir::app::FieldKind;
//!
//! assert_eq!(FieldKind::Category.default_min_chars(), 3);
//! assert_eq!(FieldKind::City.to_string(), "city");
//! ```

use std::fmt;

/// Kind of search field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Business category ("Hotels", "Hot Springs", ...).
    ///
    /// Short category prefixes match too much to be useful, so searching
    /// starts at three characters.
    Category,

    /// City or region.
    ///
    /// Searching starts at two characters.
    City,
}

impl FieldKind {
    /// Minimum number of characters before a search is issued.
    #[must_use]
    pub const fn default_min_chars(self) -> usize {
        match self {
            Self::Category => 3,
            Self::City => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::City => "city",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
