//! Path helpers.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the user's home directory (`$HOME`).
///
/// Paths without a leading `~`, and all paths when `$HOME` is unset, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use bizdir::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/var/log/bizdir.log").to_str(), Some("/var/log/bizdir.log"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    expand_tilde_with(path, home.as_deref())
}

/// Like [`expand_tilde`], with an explicit home directory.
#[must_use]
pub fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
